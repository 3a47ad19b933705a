//! Capability / telemetry inferencer.
//!
//! Classification says *what* a workload probably is; this module says
//! whether its metrics are actually *collectable* right now. Without it,
//! the plan would recommend alerts on metrics that only exist once an
//! exporter sidecar is deployed.

use crate::classifier::{BUILTIN_METRICS_PROFILES, REGISTRY};
use crate::model::Container;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Image-regex table shared with the classifier: the same patterns prove
/// sidecar presence here that prove archetype identity there.
static EXPORTER_IMAGE_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        ("postgres_exporter", Regex::new(r"postgres[_-]?exporter").unwrap()),
        ("mysqld_exporter", Regex::new(r"mysql[d]?[_-]?exporter").unwrap()),
        ("redis_exporter", Regex::new(r"redis[_-]?exporter").unwrap()),
        ("memcached_exporter", Regex::new(r"memcached[_-]?exporter").unwrap()),
        ("mongodb_exporter", Regex::new(r"mongo(db)?[_-]?exporter").unwrap()),
        ("elasticsearch_exporter", Regex::new(r"elasticsearch[_-]?exporter").unwrap()),
        ("kafka_exporter", Regex::new(r"kafka[_-]?exporter|jmx[_-]?exporter").unwrap()),
        ("nats_exporter", Regex::new(r"(prometheus[_-])?nats[_-]?exporter").unwrap()),
        ("nginx_exporter", Regex::new(r"nginx[_-]?(prometheus[_-])?exporter|nginx[_-]vts").unwrap()),
        ("haproxy_exporter", Regex::new(r"haproxy[_-]?exporter").unwrap()),
        ("node_exporter", Regex::new(r"node[_-]?exporter").unwrap()),
    ]
});

/// Infer telemetry capabilities for one workload's containers. `raw_images`
/// is the full set of container images in the pod template (including ones
/// the classifier may not have scored), since a sidecar exporter container
/// is itself evidence independent of whichever container the classifier
/// picked as primary.
pub fn infer_capabilities(
    containers: &[Container],
    raw_images: &[String],
    pod_annotations: &HashMap<String, String>,
) -> Vec<String> {
    let mut caps = Vec::new();

    // 1. Exporter sidecar detection — one match per exporter is enough.
    for (exporter_name, pattern) in EXPORTER_IMAGE_PATTERNS.iter() {
        if raw_images.iter().any(|img| pattern.is_match(img)) {
            caps.push(format!("exporter:{exporter_name}"));
        }
    }

    // 2. Built-in metrics — any container classified into a built-in profile.
    for c in containers {
        let Some(registry_key) = c.classification.registry_key.as_deref() else {
            continue;
        };
        if BUILTIN_METRICS_PROFILES.contains(&registry_key) {
            caps.push("builtin_metrics".to_string());
            if let Some(profile) = REGISTRY.get(registry_key) {
                if !profile.exporter.is_empty() {
                    caps.push(format!("exporter:{}", profile.exporter));
                }
            }
        }
    }

    // 3. Ports literally named "metrics".
    for c in containers {
        for port in &c.ports {
            if port.name.as_deref().map(|n| n.eq_ignore_ascii_case("metrics")).unwrap_or(false) {
                caps.push(format!("metrics_port:{}", port.container_port));
            }
        }
    }

    // 4. Prometheus scrape annotations on the pod template.
    if pod_annotations
        .get("prometheus.io/scrape")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
    {
        caps.push("scrape_annotations".to_string());
        if let Some(port) = pod_annotations.get("prometheus.io/port") {
            if !port.is_empty() {
                caps.push(format!("metrics_port:{port}"));
            }
        }
    }

    caps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, ContainerPort};

    fn container(classification: Classification, ports: Vec<ContainerPort>) -> Container {
        Container {
            name: "main".to_string(),
            image: "irrelevant".to_string(),
            ports,
            env_names: vec![],
            resource_requests: HashMap::new(),
            resource_limits: HashMap::new(),
            liveness_probe: false,
            readiness_probe: false,
            startup_probe: false,
            classification,
        }
    }

    #[test]
    fn sidecar_exporter_image_is_detected() {
        let c = container(Classification::fallback(), vec![]);
        let images = vec!["prom/prometheus:v2".to_string(), "quay.io/prometheus/postgres-exporter:v0.15".to_string()];
        let caps = infer_capabilities(&[c], &images, &HashMap::new());
        assert!(caps.contains(&"exporter:postgres_exporter".to_string()));
    }

    #[test]
    fn scrape_annotation_with_port_is_detected() {
        let mut ann = HashMap::new();
        ann.insert("prometheus.io/scrape".to_string(), "true".to_string());
        ann.insert("prometheus.io/port".to_string(), "9100".to_string());
        let caps = infer_capabilities(&[], &[], &ann);
        assert!(caps.contains(&"scrape_annotations".to_string()));
        assert!(caps.contains(&"metrics_port:9100".to_string()));
    }

    #[test]
    fn builtin_metrics_profile_also_synthesizes_exporter_tag() {
        let classification = Classification {
            archetype: crate::model::Archetype::Monitoring,
            registry_key: Some("prometheus".to_string()),
            display_name: "Prometheus".to_string(),
            bucket: crate::model::Bucket::High,
            score: 0.70,
            match_source: "image".to_string(),
            evidence: vec![],
        };
        let c = container(classification, vec![]);
        let caps = infer_capabilities(&[c], &[], &HashMap::new());
        assert!(caps.contains(&"builtin_metrics".to_string()));
        assert!(caps.iter().any(|c| c.starts_with("exporter:")));
    }
}
