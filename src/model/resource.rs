//! Kubernetes resource shapes: containers, workloads, the uniform resource
//! envelope, and relationships between qualified names.

use super::Classification;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The workload-bearing and uniform-shape kinds this crate understands.
/// `Custom` covers every other kind encountered — it is still modeled,
/// just without kind-specific enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum K8sResourceKind {
    Deployment,
    StatefulSet,
    DaemonSet,
    Job,
    CronJob,
    Service,
    Ingress,
    ConfigMap,
    Secret,
    Namespace,
    PersistentVolumeClaim,
    HorizontalPodAutoscaler,
    NetworkPolicy,
    ServiceAccount,
    Role,
    RoleBinding,
    ClusterRole,
    ClusterRoleBinding,
    Custom,
}

impl K8sResourceKind {
    pub fn from_kind_str(s: &str) -> Self {
        match s {
            "Deployment" => Self::Deployment,
            "StatefulSet" => Self::StatefulSet,
            "DaemonSet" => Self::DaemonSet,
            "Job" => Self::Job,
            "CronJob" => Self::CronJob,
            "Service" => Self::Service,
            "Ingress" => Self::Ingress,
            "ConfigMap" => Self::ConfigMap,
            "Secret" => Self::Secret,
            "Namespace" => Self::Namespace,
            "PersistentVolumeClaim" => Self::PersistentVolumeClaim,
            "HorizontalPodAutoscaler" => Self::HorizontalPodAutoscaler,
            "NetworkPolicy" => Self::NetworkPolicy,
            "ServiceAccount" => Self::ServiceAccount,
            "Role" => Self::Role,
            "RoleBinding" => Self::RoleBinding,
            "ClusterRole" => Self::ClusterRole,
            "ClusterRoleBinding" => Self::ClusterRoleBinding,
            _ => Self::Custom,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deployment => "Deployment",
            Self::StatefulSet => "StatefulSet",
            Self::DaemonSet => "DaemonSet",
            Self::Job => "Job",
            Self::CronJob => "CronJob",
            Self::Service => "Service",
            Self::Ingress => "Ingress",
            Self::ConfigMap => "ConfigMap",
            Self::Secret => "Secret",
            Self::Namespace => "Namespace",
            Self::PersistentVolumeClaim => "PersistentVolumeClaim",
            Self::HorizontalPodAutoscaler => "HorizontalPodAutoscaler",
            Self::NetworkPolicy => "NetworkPolicy",
            Self::ServiceAccount => "ServiceAccount",
            Self::Role => "Role",
            Self::RoleBinding => "RoleBinding",
            Self::ClusterRole => "ClusterRole",
            Self::ClusterRoleBinding => "ClusterRoleBinding",
            Self::Custom => "Custom",
        }
    }

    pub fn is_workload(&self) -> bool {
        matches!(
            self,
            Self::Deployment | Self::StatefulSet | Self::DaemonSet | Self::Job | Self::CronJob
        )
    }
}

impl std::fmt::Display for K8sResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One container within a workload's pod template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub name: String,
    pub image: String,
    pub ports: Vec<ContainerPort>,
    /// Env var *names* only — values are never modeled, matching the
    /// redaction intent carried throughout the source.
    pub env_names: Vec<String>,
    pub resource_requests: HashMap<String, String>,
    pub resource_limits: HashMap<String, String>,
    pub liveness_probe: bool,
    pub readiness_probe: bool,
    pub startup_probe: bool,
    pub classification: Classification,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerPort {
    pub name: Option<String>,
    pub container_port: u16,
}

/// A typed escape hatch: the kind-specific payload is an explicit enum
/// rather than an untyped JSON blob, so callers match exhaustively instead
/// of probing keys at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum KindSpecificSpec {
    Deployment(WorkloadSpec),
    StatefulSet(WorkloadSpec),
    DaemonSet(WorkloadSpec),
    Job(WorkloadSpec),
    CronJob(WorkloadSpec),
    Service(ServiceSpec),
    Ingress(IngressSpec),
    Hpa(HpaSpec),
    /// Unknown or not-yet-modeled kinds keep the raw document for downstream
    /// reads that genuinely have no fixed shape (e.g. CRDs).
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadSpec {
    pub replicas: Option<i64>,
    pub selector: HashMap<String, String>,
    pub pod_labels: HashMap<String, String>,
    pub pod_annotations: HashMap<String, String>,
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSpec {
    pub service_type: String,
    pub selector: HashMap<String, String>,
    pub ports: Vec<ServicePort>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePort {
    pub port: u16,
    pub protocol: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngressRule {
    pub host: Option<String>,
    pub backend_services: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngressSpec {
    pub rules: Vec<IngressRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HpaSpec {
    pub target_kind: String,
    pub target_name: String,
    pub min_replicas: Option<i64>,
    pub max_replicas: i64,
}

/// The uniform resource envelope: every K8s object found during
/// extraction, whether or not it is a workload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct K8sResource {
    pub api_version: String,
    pub kind: K8sResourceKind,
    pub name: String,
    pub namespace: String,
    pub labels: HashMap<String, String>,
    pub annotations: HashMap<String, String>,
    pub source_file: String,
    pub spec: KindSpecificSpec,
    /// Telemetry capability tags; empty for non-workloads.
    pub telemetry: Vec<String>,
}

impl K8sResource {
    /// `namespace/Kind/name` — unique within a Platform.
    pub fn qualified_name(&self) -> String {
        format!("{}/{}/{}", self.namespace, self.kind, self.name)
    }

    pub fn is_workload(&self) -> bool {
        self.kind.is_workload()
    }

    pub fn replicas(&self) -> Option<i64> {
        match &self.spec {
            KindSpecificSpec::Deployment(w)
            | KindSpecificSpec::StatefulSet(w)
            | KindSpecificSpec::DaemonSet(w)
            | KindSpecificSpec::Job(w)
            | KindSpecificSpec::CronJob(w) => w.replicas,
            _ => None,
        }
    }

    pub fn containers(&self) -> &[Container] {
        match &self.spec {
            KindSpecificSpec::Deployment(w)
            | KindSpecificSpec::StatefulSet(w)
            | KindSpecificSpec::DaemonSet(w)
            | KindSpecificSpec::Job(w)
            | KindSpecificSpec::CronJob(w) => &w.containers,
            _ => &[],
        }
    }
}

/// A view onto one workload resource, used by the tool layer and the
/// readiness/conditional-signal algorithms. Unlike [`K8sResource`] this is
/// a borrowing convenience type, not stored in the Platform directly —
/// `Platform::workloads()` constructs it on demand.
pub struct Workload<'a> {
    pub resource: &'a K8sResource,
}

impl<'a> Workload<'a> {
    pub fn qualified_name(&self) -> String {
        self.resource.qualified_name()
    }

    pub fn replicas(&self) -> Option<i64> {
        self.resource.replicas()
    }

    pub fn containers(&self) -> &'a [Container] {
        self.resource.containers()
    }

    pub fn telemetry(&self) -> &'a [String] {
        &self.resource.telemetry
    }

    pub fn has_exporter(&self) -> bool {
        self.telemetry()
            .iter()
            .any(|t| t.starts_with("exporter:") || t == "builtin_metrics")
    }

    pub fn has_scrape_path(&self) -> bool {
        self.telemetry()
            .iter()
            .any(|t| t == "scrape_annotations" || t.starts_with("metrics_port:"))
    }

    /// Three-bucket readiness classification.
    pub fn readiness(&self) -> Readiness {
        match (self.has_exporter(), self.has_scrape_path()) {
            (true, true) => Readiness::Ready,
            (true, false) | (false, true) => Readiness::Partial,
            (false, false) => Readiness::NotReady,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Readiness {
    Ready,
    Partial,
    NotReady,
}

impl std::fmt::Display for Readiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Readiness::Ready => "ready",
            Readiness::Partial => "partial",
            Readiness::NotReady => "not-ready",
        };
        write!(f, "{s}")
    }
}

/// Directed edge between two qualified names, stored as a triple, never
/// as a resource-to-resource pointer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    pub rel_type: RelationshipType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Selects,
    RoutesTo,
    Scales,
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RelationshipType::Selects => "selects",
            RelationshipType::RoutesTo => "routes_to",
            RelationshipType::Scales => "scales",
        };
        write!(f, "{s}")
    }
}
