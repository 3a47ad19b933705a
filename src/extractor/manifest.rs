//! Manifest directory walk, multi-document YAML/JSON parse, and workload
//! enrichment.

use crate::capability::infer_capabilities;
use crate::classifier::classify;
use crate::model::{
    Container, ContainerPort, HpaSpec, IngressRule, IngressSpec, K8sResource, K8sResourceKind,
    KindSpecificSpec, ServicePort, ServiceSpec, WorkloadSpec,
};
use glob::Pattern;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Manifests larger than this are skipped outright.
pub const MAX_FILE_SIZE_BYTES: u64 = 1_048_576;

pub const DEFAULT_INCLUDE: &[&str] = &["**/*.yaml", "**/*.yml", "**/*.json"];
pub const DEFAULT_EXCLUDE: &[&str] = &[
    "**/node_modules/**",
    "**/.git/**",
    "**/vendor/**",
    "**/__pycache__/**",
    "**/charts/**",
    "**/.terraform/**",
    "**/dist/**",
    "**/build/**",
    "**/venv/**",
    "**/.venv/**",
    "**/target/**",
    "**/.github/**",
    "**/.circleci/**",
];

/// Result of walking one repository for manifest files (before parsing).
pub struct ManifestScanResult {
    pub resources: Vec<K8sResource>,
    pub files_scanned: Vec<String>,
    pub errors: Vec<String>,
}

fn build_patterns(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect()
}

fn matches_any(patterns: &[Pattern], rel: &str) -> bool {
    patterns.iter().any(|p| p.matches(rel))
}

/// Walk `repo_root` and return paths that look like manifest candidates
/// (extension + glob match + size limit), sorted for determinism.
pub fn discover_manifest_files(repo_root: &Path, include: &[String], exclude: &[String]) -> Vec<PathBuf> {
    let inc = build_patterns(include);
    let exc = build_patterns(exclude);

    let mut candidates: Vec<PathBuf> = walkdir::WalkDir::new(repo_root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let path = e.path().to_path_buf();
            let meta = e.metadata().ok()?;
            if meta.len() > MAX_FILE_SIZE_BYTES {
                return None;
            }
            let rel = path.strip_prefix(repo_root).ok()?.to_string_lossy().replace('\\', "/");
            if matches_any(&inc, &rel) && !matches_any(&exc, &rel) {
                Some(path)
            } else {
                None
            }
        })
        .collect();

    candidates.sort();
    candidates
}

fn looks_like_k8s(doc: &Value) -> bool {
    let Value::Mapping(map) = doc else { return false };
    let has = |k: &str| map.contains_key(Value::String(k.to_string()));
    has("apiVersion") && has("kind") && has("metadata")
}

fn as_str(v: Option<&Value>) -> String {
    v.and_then(|v| v.as_str()).unwrap_or_default().to_string()
}

fn as_string_map(v: Option<&Value>) -> HashMap<String, String> {
    let mut out = HashMap::new();
    if let Some(Value::Mapping(map)) = v {
        for (k, val) in map {
            if let (Some(k), Some(val)) = (k.as_str(), val.as_str()) {
                out.insert(k.to_string(), val.to_string());
            }
        }
    }
    out
}

fn get<'a>(v: &'a Value, key: &str) -> Option<&'a Value> {
    v.as_mapping().and_then(|m| m.get(Value::String(key.to_string())))
}

/// Secret redaction: `data`/`stringData` values are replaced with a
/// redaction sentinel, preserving only key names.
fn sanitize_secret(doc: &Value) -> Value {
    let kind = get(doc, "kind").and_then(|v| v.as_str()).unwrap_or_default();
    if kind != "Secret" {
        return doc.clone();
    }
    let Value::Mapping(map) = doc else { return doc.clone() };
    let mut sanitized = serde_yaml::Mapping::new();
    for (k, v) in map {
        let key = k.as_str().unwrap_or_default();
        if key == "data" || key == "stringData" {
            if let Value::Mapping(inner) = v {
                let mut redacted = serde_yaml::Mapping::new();
                for (ik, _) in inner {
                    redacted.insert(ik.clone(), Value::String("REDACTED".to_string()));
                }
                sanitized.insert(k.clone(), Value::Mapping(redacted));
            } else {
                sanitized.insert(k.clone(), v.clone());
            }
        } else {
            sanitized.insert(k.clone(), v.clone());
        }
    }
    Value::Mapping(sanitized)
}

fn parse_container(raw: &Value, labels: &HashMap<String, String>) -> Container {
    let name = get(raw, "name").and_then(|v| v.as_str()).unwrap_or("unnamed").to_string();
    let image = as_str(get(raw, "image"));

    let mut ports = Vec::new();
    if let Some(Value::Sequence(seq)) = get(raw, "ports") {
        for p in seq {
            if let Some(port) = get(p, "containerPort").and_then(|v| v.as_u64()) {
                ports.push(ContainerPort {
                    name: get(p, "name").and_then(|v| v.as_str()).map(|s| s.to_string()),
                    container_port: port as u16,
                });
            }
        }
    }

    let mut env_names = Vec::new();
    if let Some(Value::Sequence(seq)) = get(raw, "env") {
        for e in seq {
            env_names.push(as_str(get(e, "name")));
        }
    }

    let resources = get(raw, "resources");
    let resource_requests = as_string_map(resources.and_then(|r| get(r, "requests")));
    let resource_limits = as_string_map(resources.and_then(|r| get(r, "limits")));

    let port_nums: Vec<u16> = ports.iter().map(|p| p.container_port).collect();
    let classification = classify(&image, &port_nums, &env_names, labels);

    Container {
        name,
        image,
        ports,
        env_names,
        resource_requests,
        resource_limits,
        liveness_probe: get(raw, "livenessProbe").is_some(),
        readiness_probe: get(raw, "readinessProbe").is_some(),
        startup_probe: get(raw, "startupProbe").is_some(),
        classification,
    }
}

fn containers_seq(pod_spec: &Value, key: &str) -> Vec<Value> {
    match get(pod_spec, key) {
        Some(Value::Sequence(seq)) => seq.clone(),
        _ => Vec::new(),
    }
}

fn workload_spec(spec: &Value, kind: &str) -> (WorkloadSpec, Vec<String>) {
    let template = get(spec, "template").cloned().unwrap_or(Value::Null);
    let mut pod_spec = get(&template, "spec").cloned().unwrap_or(Value::Null);

    if pod_spec == Value::Null && kind == "CronJob" {
        let job_template = get(spec, "jobTemplate").cloned().unwrap_or(Value::Null);
        let inner_template = get(&job_template, "template").cloned().unwrap_or(Value::Null);
        pod_spec = get(&inner_template, "spec").cloned().unwrap_or(Value::Null);
    }

    let pod_metadata = get(&template, "metadata").cloned().unwrap_or(Value::Null);
    let pod_labels = as_string_map(Some(&pod_metadata).map(|m| get(m, "labels").cloned().unwrap_or(Value::Null)).as_ref());
    let pod_annotations = as_string_map(Some(&pod_metadata).map(|m| get(m, "annotations").cloned().unwrap_or(Value::Null)).as_ref());

    let containers: Vec<Container> = containers_seq(&pod_spec, "containers")
        .iter()
        .map(|c| parse_container(c, &pod_labels))
        .collect();

    let all_images: Vec<String> = containers_seq(&pod_spec, "containers")
        .iter()
        .chain(containers_seq(&pod_spec, "initContainers").iter())
        .map(|c| as_str(get(c, "image")))
        .collect();

    let telemetry = infer_capabilities(&containers, &all_images, &pod_annotations);

    let selector = get(spec, "selector")
        .map(|s| as_string_map(get(s, "matchLabels")))
        .unwrap_or_default();

    let replicas = get(spec, "replicas").and_then(|v| v.as_i64());

    (
        WorkloadSpec {
            replicas,
            selector,
            pod_labels,
            pod_annotations,
            containers,
        },
        telemetry,
    )
}

fn parse_resource(doc: &Value, source_file: &str) -> K8sResource {
    let metadata = get(doc, "metadata").cloned().unwrap_or(Value::Null);
    let spec = get(doc, "spec").cloned().unwrap_or(Value::Null);

    let kind_str = get(doc, "kind").and_then(|v| v.as_str()).unwrap_or("Unknown").to_string();
    let kind = K8sResourceKind::from_kind_str(&kind_str);
    let name = get(&metadata, "name").and_then(|v| v.as_str()).unwrap_or("unnamed").to_string();
    let namespace = get(&metadata, "namespace").and_then(|v| v.as_str()).unwrap_or("default").to_string();
    let labels = as_string_map(get(&metadata, "labels"));
    let annotations = as_string_map(get(&metadata, "annotations"));

    let mut telemetry = Vec::new();

    let kind_spec = if kind.is_workload() {
        let (ws, tel) = workload_spec(&spec, &kind_str);
        telemetry = tel;
        match kind {
            K8sResourceKind::Deployment => KindSpecificSpec::Deployment(ws),
            K8sResourceKind::StatefulSet => KindSpecificSpec::StatefulSet(ws),
            K8sResourceKind::DaemonSet => KindSpecificSpec::DaemonSet(ws),
            K8sResourceKind::Job => KindSpecificSpec::Job(ws),
            K8sResourceKind::CronJob => KindSpecificSpec::CronJob(ws),
            _ => unreachable!(),
        }
    } else if kind == K8sResourceKind::Service {
        let ports = match get(&spec, "ports") {
            Some(Value::Sequence(seq)) => seq
                .iter()
                .filter_map(|p| {
                    let port = get(p, "port").and_then(|v| v.as_u64())? as u16;
                    Some(ServicePort {
                        port,
                        protocol: get(p, "protocol").and_then(|v| v.as_str()).unwrap_or("TCP").to_string(),
                        name: get(p, "name").and_then(|v| v.as_str()).map(|s| s.to_string()),
                    })
                })
                .collect(),
            _ => Vec::new(),
        };
        KindSpecificSpec::Service(ServiceSpec {
            service_type: get(&spec, "type").and_then(|v| v.as_str()).unwrap_or("ClusterIP").to_string(),
            selector: as_string_map(get(&spec, "selector")),
            ports,
        })
    } else if kind == K8sResourceKind::Ingress {
        let rules = match get(&spec, "rules") {
            Some(Value::Sequence(seq)) => seq
                .iter()
                .map(|r| {
                    let host = get(r, "host").and_then(|v| v.as_str()).map(|s| s.to_string());
                    let mut backends = Vec::new();
                    if let Some(http) = get(r, "http") {
                        if let Some(Value::Sequence(paths)) = get(http, "paths") {
                            for p in paths {
                                if let Some(backend) = get(p, "backend") {
                                    // networking.k8s.io/v1: backend.service.name
                                    if let Some(svc) = get(backend, "service") {
                                        if let Some(n) = get(svc, "name").and_then(|v| v.as_str()) {
                                            backends.push(n.to_string());
                                        }
                                    } else if let Some(n) = get(backend, "serviceName").and_then(|v| v.as_str()) {
                                        backends.push(n.to_string());
                                    }
                                }
                            }
                        }
                    }
                    IngressRule { host, backend_services: backends }
                })
                .collect(),
            _ => Vec::new(),
        };
        KindSpecificSpec::Ingress(IngressSpec { rules })
    } else if kind == K8sResourceKind::HorizontalPodAutoscaler {
        let target = get(&spec, "scaleTargetRef").cloned().unwrap_or(Value::Null);
        KindSpecificSpec::Hpa(HpaSpec {
            target_kind: get(&target, "kind").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
            target_name: get(&target, "name").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
            min_replicas: get(&spec, "minReplicas").and_then(|v| v.as_i64()),
            max_replicas: get(&spec, "maxReplicas").and_then(|v| v.as_i64()).unwrap_or(1),
        })
    } else {
        let sanitized = sanitize_secret(doc);
        let json = serde_json::to_value(&sanitized).unwrap_or(serde_json::Value::Null);
        KindSpecificSpec::Other(json)
    };

    K8sResource {
        api_version: as_str(get(doc, "apiVersion")),
        kind,
        name,
        namespace,
        labels,
        annotations,
        source_file: source_file.to_string(),
        spec: kind_spec,
        telemetry,
    }
}

/// Parse every document in a YAML/JSON file, unwrapping `List` kind and
/// skipping documents that don't look like K8s manifests.
pub fn parse_manifest_file(path: &Path, repo_root: &Path) -> (Vec<K8sResource>, Option<String>) {
    let rel = path
        .strip_prefix(repo_root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string();

    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => return (Vec::new(), Some(format!("{rel}: {e}"))),
    };

    let mut resources = Vec::new();
    for doc_result in serde_yaml::Deserializer::from_str(&text) {
        let doc = match Value::deserialize(doc_result) {
            Ok(Value::Null) => continue,
            Ok(v) => v,
            Err(e) => return (resources, Some(format!("{rel}: {e}"))),
        };

        let kind = get(&doc, "kind").and_then(|v| v.as_str()).unwrap_or_default();
        if kind == "List" {
            if let Some(Value::Sequence(items)) = get(&doc, "items") {
                for item in items {
                    if looks_like_k8s(item) {
                        resources.push(parse_resource(item, &rel));
                    }
                }
            }
        } else if looks_like_k8s(&doc) {
            resources.push(parse_resource(&doc, &rel));
        }
    }

    (resources, None)
}

/// Parse multi-document YAML already rendered by an external tool (`helm
/// template`, `kubectl kustomize`) rather than read from disk. Documents that
/// fail to parse are skipped rather than aborting the whole render — the
/// renderer's output as a whole is best-effort supplementary data.
pub fn parse_rendered_documents(text: &str, source_label: &str) -> Vec<K8sResource> {
    let mut resources = Vec::new();
    for doc_result in serde_yaml::Deserializer::from_str(text) {
        let Ok(doc) = Value::deserialize(doc_result) else { continue };
        if doc == Value::Null {
            continue;
        }
        if looks_like_k8s(&doc) {
            resources.push(parse_resource(&doc, source_label));
        }
    }
    resources
}

/// Scan a directory for K8s manifests. Does not run the IaC sub-passes —
/// see `extractor::iac` and `extractor::aggregator`.
pub fn scan_directory(repo_root: &Path, include: &[String], exclude: &[String]) -> ManifestScanResult {
    let files = discover_manifest_files(repo_root, include, exclude);
    let mut resources = Vec::new();
    let mut files_scanned = Vec::new();
    let mut errors = Vec::new();

    for f in &files {
        let rel = f.strip_prefix(repo_root).unwrap_or(f).to_string_lossy().to_string();
        let (parsed, err) = parse_manifest_file(f, repo_root);
        if !parsed.is_empty() {
            files_scanned.push(rel);
            resources.extend(parsed);
        }
        if let Some(e) = err {
            errors.push(e);
        }
    }

    ManifestScanResult { resources, files_scanned, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut f = std::fs::File::create(path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn secret_values_are_redacted() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(
            tmp.path(),
            "secret.yaml",
            "apiVersion: v1\nkind: Secret\nmetadata:\n  name: db-creds\n  namespace: default\ndata:\n  password: cGFzc3dvcmQ=\n",
        );
        let result = scan_directory(tmp.path(), &[
            "**/*.yaml".to_string(),
        ], &[]);
        assert_eq!(result.resources.len(), 1);
        let serialized = serde_json::to_string(&result.resources[0]).unwrap();
        assert!(!serialized.contains("cGFzc3dvcmQ="));
        assert!(serialized.contains("REDACTED"));
    }

    #[test]
    fn oversized_file_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let huge = "x".repeat((MAX_FILE_SIZE_BYTES + 1) as usize);
        write_file(tmp.path(), "big.yaml", &huge);
        let files = discover_manifest_files(tmp.path(), &DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect::<Vec<_>>(), &[]);
        assert!(files.is_empty());
    }

    #[test]
    fn cronjob_pod_template_is_nested_under_job_template() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(
            tmp.path(),
            "cron.yaml",
            r#"
apiVersion: batch/v1
kind: CronJob
metadata:
  name: nightly
  namespace: default
spec:
  schedule: "0 0 * * *"
  jobTemplate:
    spec:
      template:
        spec:
          containers:
          - name: worker
            image: postgres:15
"#,
        );
        let result = scan_directory(tmp.path(), &["**/*.yaml".to_string()], &[]);
        assert_eq!(result.resources.len(), 1);
        assert_eq!(result.resources[0].containers().len(), 1);
        assert_eq!(result.resources[0].containers()[0].image, "postgres:15");
    }

    #[test]
    fn list_kind_is_unwrapped() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(
            tmp.path(),
            "list.yaml",
            r#"
apiVersion: v1
kind: List
items:
- apiVersion: v1
  kind: ConfigMap
  metadata:
    name: a
    namespace: default
- apiVersion: v1
  kind: ConfigMap
  metadata:
    name: b
    namespace: default
"#,
        );
        let result = scan_directory(tmp.path(), &["**/*.yaml".to_string()], &[]);
        assert_eq!(result.resources.len(), 2);
    }
}
