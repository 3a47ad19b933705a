//! Evidence-weighted container classifier.
//!
//! Classification is deterministic and runs during extraction, before the
//! agent ever starts reasoning: every container gets an archetype, a
//! confidence bucket, and a numeric score built up from whichever signals
//! (image name, exposed ports, env var names, `app.kubernetes.io/name`
//! label) are actually present.

pub mod profiles;

use crate::model::{bucket_for_score, ArchetypeProfile, Classification};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

const WEIGHT_IMAGE: f64 = 0.70;
const WEIGHT_PORT: f64 = 0.25;
const WEIGHT_ENV: f64 = 0.15;
const WEIGHT_LABEL: f64 = 0.20;

/// Profiles whose metrics are exposed by the main container itself — no
/// exporter sidecar is needed to scrape them.
pub const BUILTIN_METRICS_PROFILES: &[&str] = &[
    "rabbitmq",
    "envoy",
    "haproxy",
    "prometheus",
    "grafana",
    "fluentd_fluent_bit",
];

struct ImageRule {
    pattern: Regex,
    registry_key: &'static str,
}

fn rule(pattern: &str, registry_key: &'static str) -> ImageRule {
    ImageRule {
        pattern: Regex::new(pattern).expect("static classifier regex must compile"),
        registry_key,
    }
}

/// The fully constructed, immutable classifier registry. Profiles are
/// looked up by an explicit `registry_key` field, never derived from
/// `display_name` at matching time. Built once via
/// [`ClassifierRegistry::build`], never mutated afterward.
pub struct ClassifierRegistry {
    profiles: HashMap<&'static str, ArchetypeProfile>,
    image_rules: Vec<ImageRule>,
    port_hints: HashMap<u16, &'static str>,
    env_hints: HashMap<&'static str, &'static str>,
}

impl ClassifierRegistry {
    pub fn build() -> Self {
        let mut profiles = HashMap::new();
        for profile in profiles::all() {
            // Leak the key string once; registry keys are a small fixed set
            // constructed exactly once per process.
            let key: &'static str = Box::leak(profile.registry_key.clone().into_boxed_str());
            profiles.insert(key, profile);
        }

        let image_rules = vec![
            // Databases
            rule(r"(^|/)postgres(ql)?[:\-]|/pg[_-]", "postgresql"),
            rule(r"(^|/)(mysql|mariadb|percona)[:\-]", "mysql"),
            rule(r"(^|/)mongo(db)?[:\-]", "mongodb"),
            // Cache — memcached gets its own profile (Open Question 1)
            rule(r"(^|/)(redis|valkey|keydb|dragonfly)[:\-]", "redis"),
            rule(r"(^|/)memcache(d)?[:\-]", "memcached"),
            // Search
            rule(r"(^|/)(elasticsearch|opensearch)[:\-]", "elasticsearch"),
            rule(r"(^|/)elastic/elasticsearch", "elasticsearch"),
            // Message queues
            rule(r"(^|/)(kafka|confluentinc/cp-kafka|bitnami/kafka)[:\-]", "kafka"),
            rule(r"(^|/)rabbitmq[:\-]", "rabbitmq"),
            rule(r"(^|/)nats[:\-]", "nats"),
            // Web servers
            rule(r"(^|/)nginx[:\-]", "nginx"),
            rule(r"(^|/)(httpd|apache)[:\-]", "nginx"),
            rule(r"(^|/)caddy[:\-]", "nginx"),
            // Proxies / mesh
            rule(r"(^|/)envoy(proxy)?[:\-]", "envoy"),
            rule(r"(^|/)haproxy[:\-]", "haproxy"),
            rule(r"(^|/)istio/proxyv2", "envoy"),
            rule(r"(^|/)traefik[:\-]", "envoy"),
            // Monitoring
            rule(r"(^|/)prom(etheus)?/prometheus", "prometheus"),
            rule(r"(^|/)grafana/grafana", "grafana"),
            // Logging
            rule(r"(^|/)(fluentd|fluent-bit|fluent/fluent-bit)[:\-]", "fluentd_fluent_bit"),
        ];

        let port_hints = HashMap::from([
            (5432u16, "postgresql"),
            (3306, "mysql"),
            (27017, "mongodb"),
            (6379, "redis"),
            (11211, "memcached"),
            (9200, "elasticsearch"),
            (9092, "kafka"),
            (5672, "rabbitmq"),
            (4222, "nats"),
            (9090, "prometheus"),
            (3000, "grafana"),
        ]);

        let env_hints = HashMap::from([
            ("POSTGRES_PASSWORD", "postgresql"),
            ("POSTGRES_DB", "postgresql"),
            ("PGDATA", "postgresql"),
            ("MYSQL_ROOT_PASSWORD", "mysql"),
            ("MYSQL_DATABASE", "mysql"),
            ("MONGO_INITDB_ROOT_USERNAME", "mongodb"),
            ("REDIS_PASSWORD", "redis"),
            ("REDIS_URL", "redis"),
            ("ELASTICSEARCH_HOSTS", "elasticsearch"),
            ("KAFKA_BROKER_ID", "kafka"),
            ("KAFKA_ZOOKEEPER_CONNECT", "kafka"),
            ("RABBITMQ_DEFAULT_USER", "rabbitmq"),
        ]);

        ClassifierRegistry {
            profiles,
            image_rules,
            port_hints,
            env_hints,
        }
    }

    pub fn get(&self, registry_key: &str) -> Option<&ArchetypeProfile> {
        self.profiles.get(registry_key)
    }

    pub fn all(&self) -> impl Iterator<Item = &ArchetypeProfile> {
        self.profiles.values()
    }
}

/// Process-wide singleton, constructed once on first access.
pub static REGISTRY: Lazy<ClassifierRegistry> = Lazy::new(ClassifierRegistry::build);

struct Candidate {
    score: f64,
    registry_key: String,
    evidence: Vec<String>,
}

/// Classify a single container's signals into an archetype. Evidence from
/// every signal source is accumulated per candidate profile; the profile
/// with the highest aggregate score wins — this is deliberately not
/// first-match-wins across signal *kinds* (it is first-match-wins only
/// within the image-regex pass itself).
pub fn classify(
    image: &str,
    ports: &[u16],
    env_names: &[String],
    labels: &HashMap<String, String>,
) -> Classification {
    classify_with_registry(&REGISTRY, image, ports, env_names, labels)
}

pub fn classify_with_registry(
    registry: &ClassifierRegistry,
    image: &str,
    ports: &[u16],
    env_names: &[String],
    labels: &HashMap<String, String>,
) -> Classification {
    let mut candidates: HashMap<String, Candidate> = HashMap::new();

    let mut add = |key: &str, weight: f64, reason: String| {
        let entry = candidates.entry(key.to_string()).or_insert(Candidate {
            score: 0.0,
            registry_key: key.to_string(),
            evidence: Vec::new(),
        });
        entry.score += weight;
        entry.evidence.push(reason);
    };

    // 1. Image regex — first match wins within this pass only.
    for rule in &registry.image_rules {
        if rule.pattern.is_match(image) {
            add(rule.registry_key, WEIGHT_IMAGE, format!("image:{image}"));
            break;
        }
    }

    // 2. Port heuristics
    for port in ports {
        if let Some(key) = registry.port_hints.get(port) {
            add(key, WEIGHT_PORT, format!("port:{port}"));
        }
    }

    // 3. Env var heuristics — at most one contribution per profile.
    let mut seen_env_profiles: Vec<&str> = Vec::new();
    for env in env_names {
        if let Some(key) = registry.env_hints.get(env.as_str()) {
            if seen_env_profiles.contains(key) {
                continue;
            }
            seen_env_profiles.push(key);
            add(key, WEIGHT_ENV, format!("env:{env}"));
        }
    }

    // 4. Label heuristics (app.kubernetes.io/name re-scanned against image rules)
    if let Some(app_name) = labels.get("app.kubernetes.io/name") {
        let app_name = app_name.to_lowercase();
        if !app_name.is_empty() {
            let probe = if app_name.contains(':') || app_name.contains('-') {
                app_name.clone()
            } else {
                format!("{app_name}:")
            };
            for rule in &registry.image_rules {
                if rule.pattern.is_match(&probe) {
                    add(
                        rule.registry_key,
                        WEIGHT_LABEL,
                        format!("label:app.kubernetes.io/name={app_name}"),
                    );
                    break;
                }
            }
        }
    }

    let best = candidates
        .into_values()
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap());

    match best {
        Some(candidate) => {
            let profile = registry.get(&candidate.registry_key);
            let score = candidate.score.min(1.0);
            let match_source = candidate
                .evidence
                .first()
                .cloned()
                .unwrap_or_else(|| "unknown".to_string());
            let match_source = if let Some(rest) = match_source.strip_prefix("image:") {
                let _ = rest;
                "image".to_string()
            } else {
                match_source
            };
            Classification {
                archetype: profile.map(|p| p.archetype).unwrap_or(crate::model::Archetype::CustomApp),
                registry_key: Some(candidate.registry_key.clone()),
                display_name: profile.map(|p| p.display_name.clone()).unwrap_or_default(),
                bucket: bucket_for_score(score),
                score: (score * 100.0).round() / 100.0,
                match_source,
                evidence: candidate.evidence,
            }
        }
        None => Classification::fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn image_only_match_is_high_confidence() {
        let c = classify("docker.io/library/postgres:16", &[], &[], &HashMap::new());
        assert_eq!(c.registry_key.as_deref(), Some("postgresql"));
        assert_eq!(c.bucket, crate::model::Bucket::High);
        assert!((c.score - 0.70).abs() < 1e-9);
    }

    #[test]
    fn image_plus_port_accumulates_above_image_alone() {
        let c = classify("docker.io/library/postgres:16", &[5432], &[], &HashMap::new());
        assert!((c.score - 0.95).abs() < 1e-9);
    }

    #[test]
    fn score_caps_at_one() {
        let c = classify(
            "docker.io/library/postgres:16",
            &[5432],
            &env(&["POSTGRES_PASSWORD"]),
            &HashMap::new(),
        );
        assert!(c.score <= 1.0);
    }

    #[test]
    fn port_alone_is_medium_confidence() {
        let c = classify("ghcr.io/acme/custom-app:1.0", &[6379], &[], &HashMap::new());
        assert_eq!(c.registry_key.as_deref(), Some("redis"));
        assert_eq!(c.bucket, crate::model::Bucket::Medium);
    }

    #[test]
    fn memcached_gets_its_own_profile_not_redis() {
        let c = classify("memcached:1.6", &[], &[], &HashMap::new());
        assert_eq!(c.registry_key.as_deref(), Some("memcached"));
    }

    #[test]
    fn no_signals_falls_back_to_custom_app() {
        let c = classify("ghcr.io/acme/custom-app:1.0", &[], &[], &HashMap::new());
        assert_eq!(c.match_source, "fallback");
        assert_eq!(c.archetype, crate::model::Archetype::CustomApp);
        assert!((c.score - 0.10).abs() < 1e-9);
    }

    #[test]
    fn label_rescan_matches_app_kubernetes_io_name() {
        let mut labels = HashMap::new();
        labels.insert("app.kubernetes.io/name".to_string(), "redis".to_string());
        let c = classify("ghcr.io/acme/custom-wrapper:1.0", &[], &[], &labels);
        assert_eq!(c.registry_key.as_deref(), Some("redis"));
        assert_eq!(c.bucket, crate::model::Bucket::Medium);
    }
}
