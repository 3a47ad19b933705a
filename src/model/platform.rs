//! The Platform aggregate: every resource found during extraction, the
//! relationships between them, and the query surface the tool layer reads
//! through.

use super::iac::{AwsDiscovery, IaCDiscovery};
use super::resource::{K8sResource, K8sResourceKind, Relationship, RelationshipType, Workload};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Platform {
    pub resources: Vec<K8sResource>,
    pub relationships: Vec<Relationship>,
    pub iac: IaCDiscovery,
    pub aws: AwsDiscovery,
    /// Extraction problems that did not abort the run (bad YAML doc,
    /// unreadable file, …), surfaced verbatim in the report.
    pub parse_errors: Vec<String>,
}

impl Platform {
    pub fn by_kind(&self, kind: K8sResourceKind) -> impl Iterator<Item = &K8sResource> {
        self.resources.iter().filter(move |r| r.kind == kind)
    }

    pub fn by_namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a K8sResource> {
        self.resources.iter().filter(move |r| r.namespace == namespace)
    }

    pub fn find(&self, qualified_name: &str) -> Option<&K8sResource> {
        self.resources
            .iter()
            .find(|r| r.qualified_name() == qualified_name)
    }

    pub fn workloads(&self) -> impl Iterator<Item = Workload<'_>> {
        self.resources
            .iter()
            .filter(|r| r.is_workload())
            .map(|resource| Workload { resource })
    }

    pub fn relationships_for(&self, qualified_name: &str) -> Vec<&Relationship> {
        self.relationships
            .iter()
            .filter(|rel| rel.source == qualified_name || rel.target == qualified_name)
            .collect()
    }

    pub fn relationships_of_type(&self, rel_type: RelationshipType) -> Vec<&Relationship> {
        self.relationships
            .iter()
            .filter(|rel| rel.rel_type == rel_type)
            .collect()
    }

    pub fn namespaces(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for r in &self.resources {
            if !seen.contains(&r.namespace) {
                seen.push(r.namespace.clone());
            }
        }
        seen.sort();
        seen
    }

    /// Summary counts keyed by resource kind, in the stable declaration
    /// order of [`K8sResourceKind`].
    pub fn summary_counts(&self) -> Vec<(K8sResourceKind, usize)> {
        const KINDS: &[K8sResourceKind] = &[
            K8sResourceKind::Deployment,
            K8sResourceKind::StatefulSet,
            K8sResourceKind::DaemonSet,
            K8sResourceKind::Job,
            K8sResourceKind::CronJob,
            K8sResourceKind::Service,
            K8sResourceKind::Ingress,
            K8sResourceKind::ConfigMap,
            K8sResourceKind::Secret,
            K8sResourceKind::Namespace,
            K8sResourceKind::PersistentVolumeClaim,
            K8sResourceKind::HorizontalPodAutoscaler,
            K8sResourceKind::NetworkPolicy,
            K8sResourceKind::ServiceAccount,
            K8sResourceKind::Role,
            K8sResourceKind::RoleBinding,
            K8sResourceKind::ClusterRole,
            K8sResourceKind::ClusterRoleBinding,
            K8sResourceKind::Custom,
        ];
        KINDS
            .iter()
            .map(|k| (*k, self.by_kind(*k).count()))
            .filter(|(_, n)| *n > 0)
            .collect()
    }

    /// The deterministic human-readable text dump fed to the agent as its
    /// first user message. Section order and wording are fixed so that
    /// runs are reproducible turn-for-turn.
    pub fn report(&self) -> String {
        let mut out = String::new();

        writeln!(out, "=== Cluster Summary ===").ok();
        writeln!(out, "Namespaces: {}", self.namespaces().len()).ok();
        for (kind, count) in self.summary_counts() {
            writeln!(out, "{kind}: {count}").ok();
        }
        writeln!(out).ok();

        writeln!(out, "=== Workloads ===").ok();
        for w in self.workloads() {
            let probes = w
                .containers()
                .iter()
                .map(|c| {
                    format!(
                        "{}(live={},ready={},startup={})",
                        c.name, c.liveness_probe, c.readiness_probe, c.startup_probe
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            let archetype = w
                .containers()
                .first()
                .map(|c| c.classification.archetype.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            writeln!(
                out,
                "- {} [{}] replicas={:?} readiness={} probes=[{}]",
                w.qualified_name(),
                archetype,
                w.replicas(),
                w.readiness(),
                probes
            )
            .ok();
        }
        writeln!(out).ok();

        writeln!(out, "=== Services ===").ok();
        for svc in self.by_kind(K8sResourceKind::Service) {
            writeln!(out, "- {}", svc.qualified_name()).ok();
        }
        writeln!(out).ok();

        writeln!(out, "=== Relationships ===").ok();
        for rel in &self.relationships {
            writeln!(out, "- {} --{}--> {}", rel.source, rel.rel_type, rel.target).ok();
        }
        writeln!(out).ok();

        if !self.parse_errors.is_empty() {
            writeln!(out, "=== Parse Errors ===").ok();
            for e in &self.parse_errors {
                writeln!(out, "- {e}").ok();
            }
            writeln!(out).ok();
        }

        writeln!(out, "=== Infrastructure as Code ===").ok();
        if self.iac.resources.is_empty() {
            writeln!(out, "(none discovered)").ok();
        } else {
            for r in &self.iac.resources {
                writeln!(out, "- [{}] {} {}", r.source, r.resource_type, r.name).ok();
            }
        }
        if !self.iac.errors.is_empty() {
            for e in &self.iac.errors {
                writeln!(out, "  ! {e}").ok();
            }
        }
        writeln!(out).ok();

        writeln!(out, "=== AWS Live Discovery ===").ok();
        if self.aws.resources.is_empty() {
            writeln!(out, "(none discovered)").ok();
        } else {
            writeln!(out, "Regions queried: {}", self.aws.regions_queried.join(", ")).ok();
            for r in &self.aws.resources {
                writeln!(out, "- [{}] {} ({:?})", r.resource_type, r.name, r.region).ok();
            }
        }
        if !self.aws.errors.is_empty() {
            for e in &self.aws.errors {
                writeln!(out, "  ! {e}").ok();
            }
        }

        out
    }
}
