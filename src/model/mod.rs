//! The data model: archetype profiles, classifications, resources, and the
//! Platform aggregate that tools read from.

pub mod iac;
pub mod plan;
pub mod platform;
pub mod resource;

pub use iac::{AwsDiscovery, IaCDiscovery, IaCResource, IaCSource};
pub use plan::{
    AlertRule, DashboardImportResult, DashboardPanel, DashboardSpec,
    GrafanaDashboardRecommendation, MetricRecommendation, NoDataState, ObservabilityPlan,
    RemediationStep, ValidationCheck, ValidationReport,
};
pub use platform::Platform;
pub use resource::{
    Container, ContainerPort, HpaSpec, IngressRule, IngressSpec, K8sResource, K8sResourceKind,
    KindSpecificSpec, Readiness, Relationship, RelationshipType, ServicePort, ServiceSpec,
    Workload, WorkloadSpec,
};

use serde::{Deserialize, Serialize};

/// One of a closed set of semantic workload families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Archetype {
    Database,
    Cache,
    MessageQueue,
    SearchEngine,
    WebServer,
    ReverseProxy,
    ApiGateway,
    Monitoring,
    Logging,
    CustomApp,
}

impl Archetype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Database => "database",
            Archetype::Cache => "cache",
            Archetype::MessageQueue => "message-queue",
            Archetype::SearchEngine => "search-engine",
            Archetype::WebServer => "web-server",
            Archetype::ReverseProxy => "reverse-proxy",
            Archetype::ApiGateway => "api-gateway",
            Archetype::Monitoring => "monitoring",
            Archetype::Logging => "logging",
            Archetype::CustomApp => "custom-app",
        }
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A golden metric or alert's gating expression over `{exporter, replicas>1,
/// statefulset}`.
pub type RequiresExpr = String;

/// One curated golden metric, part of an [`ArchetypeProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSignal {
    pub name: String,
    pub description: String,
    pub query: String,
    /// Hint for the kind of dashboard panel this metric suits (graph, gauge, …).
    pub panel_hint: String,
    /// Gating expression; empty string means unconditional.
    pub requires: RequiresExpr,
}

/// One curated alert rule, part of an [`ArchetypeProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertSignal {
    pub name: String,
    pub expr: String,
    pub severity: String,
    pub for_duration: String,
    pub summary: String,
    pub requires: RequiresExpr,
}

/// The curated knowledge unit for one technology.
///
/// Process-wide, constructed once by [`crate::classifier::registry`], never
/// mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeProfile {
    /// Stable identity — never derived from `display_name` at runtime.
    pub registry_key: String,
    pub archetype: Archetype,
    pub display_name: String,
    pub description: String,
    pub exporter: String,
    pub exporter_port: u16,
    pub golden_metrics: Vec<MetricSignal>,
    pub alerts: Vec<AlertSignal>,
    pub dashboard_ids: Vec<u64>,
    pub dashboard_tags: Vec<String>,
    pub health_requirements: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Qualitative confidence bucket over a [`Classification`]'s score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    High,
    Medium,
    Low,
}

/// Bucket mapping: `high ⇔ score ≥ 0.60`;
/// `medium ⇔ 0.15 ≤ score < 0.60`; else `low`.
pub fn bucket_for_score(score: f64) -> Bucket {
    if score >= 0.60 {
        Bucket::High
    } else if score >= 0.15 {
        Bucket::Medium
    } else {
        Bucket::Low
    }
}

/// Result of scoring one container against the classifier registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub archetype: Archetype,
    /// `None` only for the `custom-app` fallback.
    pub registry_key: Option<String>,
    pub display_name: String,
    pub bucket: Bucket,
    pub score: f64,
    pub match_source: String,
    pub evidence: Vec<String>,
}

impl Classification {
    pub fn fallback() -> Self {
        Classification {
            archetype: Archetype::CustomApp,
            registry_key: None,
            display_name: String::new(),
            bucket: Bucket::Low,
            score: 0.10,
            match_source: "fallback".to_string(),
            evidence: vec!["no matching signals".to_string()],
        }
    }
}
