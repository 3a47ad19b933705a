//! The aggregation pass.
//!
//! This is the single place where the Platform invariants get established:
//! qualified-name uniqueness, and every relationship endpoint resolving to
//! a resource actually present in the platform.

use crate::model::{
    AwsDiscovery, IaCDiscovery, K8sResource, K8sResourceKind, KindSpecificSpec, Platform,
    Relationship, RelationshipType,
};
use std::collections::HashSet;

/// Assemble the [`Platform`] from everything the sub-extractors found.
/// Resources that collide on qualified name are kept in first-seen order;
/// the duplicate is dropped and recorded as a parse error rather than
/// silently overwriting the first.
pub fn build(resources: Vec<K8sResource>, iac: IaCDiscovery, aws: AwsDiscovery) -> Platform {
    let mut seen = HashSet::new();
    let mut deduped = Vec::with_capacity(resources.len());
    let mut parse_errors = Vec::new();

    for r in resources {
        let qname = r.qualified_name();
        if seen.insert(qname.clone()) {
            deduped.push(r);
        } else {
            parse_errors.push(format!(
                "duplicate resource {qname} in {} ignored (qualified name already claimed)",
                r.source_file
            ));
        }
    }

    let relationships = build_relationships(&deduped);

    Platform {
        resources: deduped,
        relationships,
        iac,
        aws,
        parse_errors,
    }
}

/// Build every `selects`/`routes_to`/`scales` edge.
fn build_relationships(resources: &[K8sResource]) -> Vec<Relationship> {
    let mut rels = Vec::new();

    for svc in resources.iter().filter(|r| r.kind == K8sResourceKind::Service) {
        let KindSpecificSpec::Service(spec) = &svc.spec else { continue };
        if spec.selector.is_empty() {
            continue;
        }
        for workload in resources.iter().filter(|r| r.is_workload() && r.namespace == svc.namespace) {
            let KindSpecificSpec::Deployment(ws)
            | KindSpecificSpec::StatefulSet(ws)
            | KindSpecificSpec::DaemonSet(ws)
            | KindSpecificSpec::Job(ws)
            | KindSpecificSpec::CronJob(ws) = &workload.spec
            else {
                continue;
            };
            if selector_matches(&spec.selector, &ws.pod_labels) {
                rels.push(Relationship {
                    source: svc.qualified_name(),
                    target: workload.qualified_name(),
                    rel_type: RelationshipType::Selects,
                });
            }
        }
    }

    for ing in resources.iter().filter(|r| r.kind == K8sResourceKind::Ingress) {
        let KindSpecificSpec::Ingress(spec) = &ing.spec else { continue };
        let mut backend_names: Vec<&str> = spec
            .rules
            .iter()
            .flat_map(|r| r.backend_services.iter().map(|s| s.as_str()))
            .collect();
        backend_names.sort();
        backend_names.dedup();

        for name in backend_names {
            if let Some(svc) = resources
                .iter()
                .find(|r| r.kind == K8sResourceKind::Service && r.namespace == ing.namespace && r.name == name)
            {
                rels.push(Relationship {
                    source: ing.qualified_name(),
                    target: svc.qualified_name(),
                    rel_type: RelationshipType::RoutesTo,
                });
            }
        }
    }

    for hpa in resources.iter().filter(|r| r.kind == K8sResourceKind::HorizontalPodAutoscaler) {
        let KindSpecificSpec::Hpa(spec) = &hpa.spec else { continue };
        if let Some(target) = resources.iter().find(|r| {
            r.is_workload()
                && r.namespace == hpa.namespace
                && r.name == spec.target_name
                && r.kind.as_str() == spec.target_kind
        }) {
            rels.push(Relationship {
                source: hpa.qualified_name(),
                target: target.qualified_name(),
                rel_type: RelationshipType::Scales,
            });
        }
    }

    rels
}

/// A Service selects a Workload iff every key/value in the Service's
/// selector is present and equal in the Workload's pod labels.
fn selector_matches(selector: &std::collections::HashMap<String, String>, pod_labels: &std::collections::HashMap<String, String>) -> bool {
    selector.iter().all(|(k, v)| pod_labels.get(k) == Some(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::manifest::scan_directory;
    use std::io::Write;

    fn write_file(dir: &std::path::Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut f = std::fs::File::create(path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn service_selects_workload_by_matching_labels() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(
            tmp.path(),
            "deploy.yaml",
            r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: default
spec:
  replicas: 2
  selector:
    matchLabels:
      app: web
  template:
    metadata:
      labels:
        app: web
    spec:
      containers:
      - name: web
        image: nginx:1.25
"#,
        );
        write_file(
            tmp.path(),
            "svc.yaml",
            r#"
apiVersion: v1
kind: Service
metadata:
  name: web-svc
  namespace: default
spec:
  selector:
    app: web
  ports:
  - port: 80
"#,
        );

        let scanned = scan_directory(tmp.path(), &["**/*.yaml".to_string()], &[]);
        let platform = build(scanned.resources, IaCDiscovery::default(), AwsDiscovery::default());

        assert_eq!(platform.relationships.len(), 1);
        assert_eq!(platform.relationships[0].rel_type, RelationshipType::Selects);
        assert_eq!(platform.relationships[0].source, "default/Service/web-svc");
        assert_eq!(platform.relationships[0].target, "default/Deployment/web");
    }

    #[test]
    fn every_relationship_endpoint_resolves_to_a_platform_resource() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(
            tmp.path(),
            "hpa.yaml",
            r#"
apiVersion: autoscaling/v2
kind: HorizontalPodAutoscaler
metadata:
  name: web-hpa
  namespace: default
spec:
  scaleTargetRef:
    kind: Deployment
    name: web
  minReplicas: 2
  maxReplicas: 10
"#,
        );
        write_file(
            tmp.path(),
            "deploy.yaml",
            r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: default
spec:
  replicas: 2
  template:
    spec:
      containers:
      - name: web
        image: nginx:1.25
"#,
        );

        let scanned = scan_directory(tmp.path(), &["**/*.yaml".to_string()], &[]);
        let platform = build(scanned.resources, IaCDiscovery::default(), AwsDiscovery::default());

        for rel in &platform.relationships {
            assert!(platform.find(&rel.source).is_some(), "source {} missing", rel.source);
            assert!(platform.find(&rel.target).is_some(), "target {} missing", rel.target);
        }
        assert_eq!(platform.relationships.len(), 1);
    }
}
