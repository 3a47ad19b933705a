//! The nine read-only analyze tools, operating on a [`Platform`] frozen for
//! the whole run. Each function returns the human-readable string the tool
//! executor hands back to the LLM; none of them can fail in a way that
//! propagates — a malformed filter argument degrades to "no matches" text.

use crate::classifier::REGISTRY;
use crate::error::{format_tool_error, ToolErrorCategory};
use crate::model::{IaCSource, K8sResourceKind, Platform, RelationshipType};
use serde_json::Value;
use std::fmt::Write as _;

fn str_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

pub fn list_resources(platform: &Platform, args: &Value) -> String {
    let kind_filter = str_arg(args, "kind").map(K8sResourceKind::from_kind_str);
    let ns_filter = str_arg(args, "namespace");

    let mut out = String::new();
    let mut count = 0;
    for r in &platform.resources {
        if let Some(k) = kind_filter {
            if r.kind != k {
                continue;
            }
        }
        if let Some(ns) = ns_filter {
            if r.namespace != ns {
                continue;
            }
        }
        writeln!(out, "- {}", r.qualified_name()).ok();
        count += 1;
    }
    if count == 0 {
        return "No resources match the given filter.".to_string();
    }
    format!("{count} resource(s):\n{out}")
}

pub fn get_resource_detail(platform: &Platform, args: &Value) -> String {
    let Some(qname) = str_arg(args, "qualified_name") else {
        return format_tool_error("get_resource_detail", ToolErrorCategory::ValidationFailed, "missing required field 'qualified_name'");
    };
    match platform.find(qname) {
        Some(r) => {
            let detail = serde_json::json!({
                "qualified_name": r.qualified_name(),
                "api_version": r.api_version,
                "kind": r.kind.as_str(),
                "labels": r.labels,
                "annotations": r.annotations,
                "source_file": r.source_file,
                "telemetry": r.telemetry,
                "replicas": r.replicas(),
                "containers": r.containers().iter().map(|c| serde_json::json!({
                    "name": c.name,
                    "image": c.image,
                    "archetype": c.classification.archetype.to_string(),
                    "bucket": c.classification.bucket,
                    "score": c.classification.score,
                })).collect::<Vec<_>>(),
            });
            serde_json::to_string_pretty(&detail).unwrap_or_else(|e| {
                format_tool_error("get_resource_detail", ToolErrorCategory::InternalError, &e.to_string())
            })
        }
        None => format_tool_error("get_resource_detail", ToolErrorCategory::NotFound, &format!("no resource with qualified name {qname}")),
    }
}

pub fn get_relationships(platform: &Platform, args: &Value) -> String {
    let endpoint = str_arg(args, "qualified_name");
    let rels: Vec<_> = match endpoint {
        Some(q) => platform.relationships_for(q),
        None => platform.relationships.iter().collect(),
    };
    if rels.is_empty() {
        return "No relationships match.".to_string();
    }
    let mut out = String::new();
    for r in rels {
        writeln!(out, "- {} --{}--> {}", r.source, r.rel_type, r.target).ok();
    }
    out
}

pub fn get_platform_summary(platform: &Platform) -> String {
    let mut out = String::new();
    writeln!(out, "Namespaces: {}", platform.namespaces().len()).ok();
    for (kind, count) in platform.summary_counts() {
        writeln!(out, "{kind}: {count}").ok();
    }
    let (mut ready, mut partial, mut not_ready) = (0, 0, 0);
    for w in platform.workloads() {
        match w.readiness() {
            crate::model::Readiness::Ready => ready += 1,
            crate::model::Readiness::Partial => partial += 1,
            crate::model::Readiness::NotReady => not_ready += 1,
        }
    }
    writeln!(out, "Readiness: ready={ready} partial={partial} not-ready={not_ready}").ok();
    writeln!(out, "IaC resources: {}", platform.iac.resources.len()).ok();
    writeln!(out, "AWS live resources: {}", platform.aws.resources.len()).ok();
    if !platform.parse_errors.is_empty() {
        writeln!(out, "Parse errors: {}", platform.parse_errors.len()).ok();
    }
    out
}

pub fn check_health_gaps(platform: &Platform) -> String {
    let mut gaps = Vec::new();

    for w in platform.workloads() {
        for c in w.containers() {
            if !c.liveness_probe {
                gaps.push(format!("{}: container {} has no liveness probe", w.qualified_name(), c.name));
            }
            if !c.readiness_probe {
                gaps.push(format!("{}: container {} has no readiness probe", w.qualified_name(), c.name));
            }
            if c.resource_requests.is_empty() {
                gaps.push(format!("{}: container {} has no resource requests", w.qualified_name(), c.name));
            }
            if c.resource_limits.is_empty() {
                gaps.push(format!("{}: container {} has no resource limits", w.qualified_name(), c.name));
            }

            if let Some(key) = &c.classification.registry_key {
                if let Some(profile) = REGISTRY.get(key) {
                    if !profile.exporter.is_empty() {
                        let sibling_images: Vec<&str> = w.containers().iter().map(|cc| cc.image.as_str()).collect();
                        let has_exporter_image = sibling_images.iter().any(|img| img.contains(&profile.exporter));
                        if !w.has_exporter() && !has_exporter_image {
                            gaps.push(format!(
                                "{}: classified as {} but no {} sidecar present",
                                w.qualified_name(),
                                profile.display_name,
                                profile.exporter
                            ));
                        }
                    }
                }
            }
        }
    }

    for svc in platform.by_kind(K8sResourceKind::Service) {
        let selects_anything = platform
            .relationships_for(&svc.qualified_name())
            .iter()
            .any(|r| r.rel_type == RelationshipType::Selects && r.source == svc.qualified_name());
        if !selects_anything {
            gaps.push(format!("{}: selector matches no workload", svc.qualified_name()));
        }
    }

    if gaps.is_empty() {
        return "No health gaps found.".to_string();
    }
    format!("{} gap(s):\n- {}", gaps.len(), gaps.join("\n- "))
}

/// The conditional-signal algorithm (new code, no prior-art ancestor):
/// evaluate every golden metric / alert's `requires` conjunction against
/// the workload and annotate unmet ones as CONDITIONAL with remediation.
pub fn get_workload_insights(platform: &Platform, args: &Value) -> String {
    let Some(qname) = str_arg(args, "qualified_name") else {
        return format_tool_error("get_workload_insights", ToolErrorCategory::ValidationFailed, "missing required field 'qualified_name'");
    };
    let Some(resource) = platform.find(qname) else {
        return format_tool_error("get_workload_insights", ToolErrorCategory::NotFound, &format!("no resource with qualified name {qname}"));
    };
    if !resource.is_workload() {
        return format_tool_error("get_workload_insights", ToolErrorCategory::ValidationFailed, &format!("{qname} is not a workload"));
    }

    let workload = crate::model::Workload { resource };
    let replicas = workload.replicas().unwrap_or(1);
    let has_exporter = workload.has_exporter();
    let is_statefulset = resource.kind == K8sResourceKind::StatefulSet;

    let mut out = String::new();
    writeln!(out, "Workload: {qname}").ok();
    writeln!(out, "Readiness: {}", workload.readiness()).ok();
    writeln!(out, "Telemetry: {:?}", workload.telemetry()).ok();

    for c in workload.containers() {
        let cl = &c.classification;
        writeln!(
            out,
            "Container {}: archetype={} bucket={:?} score={:.2} source={}",
            c.name, cl.archetype, cl.bucket, cl.score, cl.match_source
        )
        .ok();

        let Some(key) = &cl.registry_key else { continue };
        let Some(profile) = REGISTRY.get(key) else { continue };

        writeln!(out, "  Golden metrics:").ok();
        for m in &profile.golden_metrics {
            let (unmet, remediation) = eval_requires(&m.requires, has_exporter, replicas, is_statefulset, &profile.exporter);
            if unmet.is_empty() {
                writeln!(out, "  - {} [{}]: {}", m.name, m.panel_hint, m.query).ok();
            } else {
                writeln!(out, "  - {} [{}]: {} CONDITIONAL ({remediation})", m.name, m.panel_hint, m.query).ok();
            }
        }

        writeln!(out, "  Alerts:").ok();
        for a in &profile.alerts {
            let (unmet, remediation) = eval_requires(&a.requires, has_exporter, replicas, is_statefulset, &profile.exporter);
            if unmet.is_empty() {
                writeln!(out, "  - {} (severity={}): {}", a.name, a.severity, a.expr).ok();
            } else {
                writeln!(out, "  - {} (severity={}): {} CONDITIONAL ({remediation})", a.name, a.severity, a.expr).ok();
            }
        }

        writeln!(out, "  Dashboards: {:?}", profile.dashboard_ids).ok();
        writeln!(out, "  Recommendations: {:?}", profile.recommendations).ok();
    }

    out
}

/// Evaluate a `requires` conjunction; returns the unmet-token list (empty
/// means every conjunct held) plus a joined remediation string.
fn eval_requires(requires: &str, has_exporter: bool, replicas: i64, is_statefulset: bool, exporter_name: &str) -> (Vec<String>, String) {
    if requires.trim().is_empty() {
        return (Vec::new(), String::new());
    }
    let mut unmet = Vec::new();
    let mut remediation_parts = Vec::new();

    for token in requires.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token {
            "exporter" => {
                if !has_exporter {
                    unmet.push(token.to_string());
                    remediation_parts.push(format!("deploy {exporter_name} sidecar"));
                }
            }
            "replicas>1" => {
                if replicas <= 1 {
                    unmet.push(token.to_string());
                    remediation_parts.push(format!("replicas={replicas}, need >1"));
                }
            }
            "statefulset" => {
                if !is_statefulset {
                    unmet.push(token.to_string());
                    remediation_parts.push("workload is not a StatefulSet, expected StatefulSet".to_string());
                }
            }
            _ => {
                // Unknown token: assumed true, per §4.5.
            }
        }
    }

    (unmet, remediation_parts.join("; "))
}

pub fn get_iac_resources(platform: &Platform, args: &Value) -> String {
    let source_filter = str_arg(args, "source").and_then(|s| match s {
        "terraform" => Some(IaCSource::Terraform),
        "helm" => Some(IaCSource::Helm),
        "kustomize" => Some(IaCSource::Kustomize),
        "pulumi" => Some(IaCSource::Pulumi),
        _ => None,
    });

    let resources: Vec<_> = match source_filter {
        Some(s) => platform.iac.by_source(s).collect(),
        None => platform.iac.resources.iter().collect(),
    };
    if resources.is_empty() {
        return "No IaC resources match.".to_string();
    }
    let mut out = String::new();
    for r in resources {
        writeln!(out, "- [{}] {} {} (archetype={:?})", r.source, r.resource_type, r.name, r.archetype_hint).ok();
    }
    out
}

pub fn get_aws_resources(platform: &Platform, args: &Value) -> String {
    let service_filter = str_arg(args, "service");
    let resources: Vec<_> = platform
        .aws
        .resources
        .iter()
        .filter(|r| service_filter.map(|s| r.resource_type.contains(s)).unwrap_or(true))
        .collect();
    if resources.is_empty() {
        return "No AWS live resources match.".to_string();
    }
    let mut out = String::new();
    writeln!(out, "Regions queried: {}", platform.aws.regions_queried.join(", ")).ok();
    for r in resources {
        writeln!(out, "- {} {} ({:?})", r.resource_type, r.name, r.region).ok();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, Container, K8sResourceKind, KindSpecificSpec, WorkloadSpec};
    use std::collections::HashMap;

    fn postgres_workload(replicas: i64, with_exporter: bool) -> crate::model::K8sResource {
        let classification = Classification {
            archetype: crate::model::Archetype::Database,
            registry_key: Some("postgresql".to_string()),
            display_name: "PostgreSQL".to_string(),
            bucket: crate::model::Bucket::High,
            score: 0.70,
            match_source: "image".to_string(),
            evidence: vec!["image:postgres:15".to_string()],
        };
        let mut containers = vec![Container {
            name: "postgres".to_string(),
            image: "postgres:15".to_string(),
            ports: vec![],
            env_names: vec![],
            resource_requests: HashMap::new(),
            resource_limits: HashMap::new(),
            liveness_probe: true,
            readiness_probe: true,
            startup_probe: false,
            classification,
        }];
        let telemetry = if with_exporter {
            containers.push(Container {
                name: "postgres-exporter".to_string(),
                image: "prometheuscommunity/postgres-exporter:v0.15".to_string(),
                ports: vec![],
                env_names: vec![],
                resource_requests: HashMap::new(),
                resource_limits: HashMap::new(),
                liveness_probe: false,
                readiness_probe: false,
                startup_probe: false,
                classification: Classification::fallback(),
            });
            vec!["exporter:postgres_exporter".to_string()]
        } else {
            vec![]
        };

        crate::model::K8sResource {
            api_version: "apps/v1".to_string(),
            kind: K8sResourceKind::Deployment,
            name: "pg".to_string(),
            namespace: "default".to_string(),
            labels: HashMap::new(),
            annotations: HashMap::new(),
            source_file: "pg.yaml".to_string(),
            spec: KindSpecificSpec::Deployment(WorkloadSpec {
                replicas: Some(replicas),
                selector: HashMap::new(),
                pod_labels: HashMap::new(),
                pod_annotations: HashMap::new(),
                containers,
            }),
            telemetry,
        }
    }

    #[test]
    fn single_replica_no_exporter_marks_everything_conditional() {
        let platform = Platform {
            resources: vec![postgres_workload(1, false)],
            ..Default::default()
        };
        let args = serde_json::json!({"qualified_name": "default/Deployment/pg"});
        let out = get_workload_insights(&platform, &args);
        assert!(out.contains("CONDITIONAL"));
        assert!(out.contains("deploy postgres_exporter sidecar"));
        assert!(out.contains("replicas=1, need >1"));
    }

    #[test]
    fn three_replica_with_exporter_is_unconditional() {
        let platform = Platform {
            resources: vec![postgres_workload(3, true)],
            ..Default::default()
        };
        let args = serde_json::json!({"qualified_name": "default/Deployment/pg"});
        let out = get_workload_insights(&platform, &args);
        assert!(out.contains("PostgresReplicationLagHigh") || out.contains("replication"), "expected a replication-related signal in:\n{out}");
        assert!(!out.contains("replicas=3, need >1"));
    }
}
