//! Observability plan and validation report domain objects: the structured
//! payloads the two terminal tools emit.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRecommendation {
    pub workload: String,
    pub name: String,
    pub query: String,
    pub description: String,
    pub panel_hint: String,
}

/// Alerting no-data behavior, mirrors Grafana/Prometheus alerting semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoDataState {
    NoData,
    Alerting,
    Ok,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    pub workload: String,
    pub name: String,
    pub expr: String,
    pub severity: String,
    pub for_duration: String,
    pub summary: String,
    pub no_data_state: NoDataState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardPanel {
    pub title: String,
    pub query: String,
    pub panel_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSpec {
    pub title: String,
    pub tags: Vec<String>,
    pub panels: Vec<DashboardPanel>,
}

/// A recommendation to import a curated community dashboard rather than
/// hand-build one, keyed by the grafana.com dashboard id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrafanaDashboardRecommendation {
    pub workload: String,
    pub dashboard_id: u64,
    pub title: String,
    pub reason: String,
}

/// The terminal artifact of the "analyze" flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityPlan {
    pub cluster_summary: String,
    pub metric_recommendations: Vec<MetricRecommendation>,
    pub alert_rules: Vec<AlertRule>,
    pub dashboards: Vec<DashboardSpec>,
    pub dashboard_imports: Vec<GrafanaDashboardRecommendation>,
    pub remediation_steps: Vec<RemediationStep>,
    pub narrative: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediationStep {
    pub description: String,
    pub command: Option<String>,
    pub risk: String,
}

/// One check performed during "validate".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardImportResult {
    pub dashboard_id: u64,
    pub title: String,
    pub imported: bool,
    pub detail: String,
}

/// The terminal artifact of the "validate" flow, also what gets persisted
/// to the history store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub cluster_context: String,
    pub cluster_summary: String,
    pub checks: Vec<ValidationCheck>,
    pub dashboards_imported: Vec<DashboardImportResult>,
    pub recommendations: Vec<String>,
    pub remediation_steps: Vec<RemediationStep>,
}
