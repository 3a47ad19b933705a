//! Tool registry: a closed, tagged set of tool names plus a total dispatch
//! function — no duck-typed lookup by string, and an unknown name degrades
//! to a structured error result rather than a panic.

pub mod analyze;
pub mod clients;
pub mod live;

use crate::error::{format_tool_error, ToolErrorCategory};
use crate::model::{ObservabilityPlan, Platform, ValidationReport};
use serde_json::Value;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    // Analyze tools
    ListResources,
    GetResourceDetail,
    GetRelationships,
    GetPlatformSummary,
    CheckHealthGaps,
    GetWorkloadInsights,
    GetIacResources,
    GetAwsResources,
    GenerateObservabilityPlan,
    // Live tools
    CheckClusterConnectivity,
    FindMonitoringStack,
    GetClusterResources,
    DescribeClusterResource,
    GetPodLogs,
    GetClusterEvents,
    CheckScrapeTargets,
    ValidateMetricExists,
    RunPromqlQuery,
    GetPrometheusAlerts,
    GetPrometheusRules,
    ListGrafanaDashboards,
    CheckGrafanaDatasources,
    ImportGrafanaDashboard,
    ApplyKubernetesManifest,
    GenerateValidationReport,
}

impl ToolName {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "list_resources" => Self::ListResources,
            "get_resource_detail" => Self::GetResourceDetail,
            "get_relationships" => Self::GetRelationships,
            "get_platform_summary" => Self::GetPlatformSummary,
            "check_health_gaps" => Self::CheckHealthGaps,
            "get_workload_insights" => Self::GetWorkloadInsights,
            "get_iac_resources" => Self::GetIacResources,
            "get_aws_resources" => Self::GetAwsResources,
            "generate_observability_plan" => Self::GenerateObservabilityPlan,
            "check_cluster_connectivity" => Self::CheckClusterConnectivity,
            "find_monitoring_stack" => Self::FindMonitoringStack,
            "get_cluster_resources" => Self::GetClusterResources,
            "describe_cluster_resource" => Self::DescribeClusterResource,
            "get_pod_logs" => Self::GetPodLogs,
            "get_cluster_events" => Self::GetClusterEvents,
            "check_scrape_targets" => Self::CheckScrapeTargets,
            "validate_metric_exists" => Self::ValidateMetricExists,
            "run_promql_query" => Self::RunPromqlQuery,
            "get_prometheus_alerts" => Self::GetPrometheusAlerts,
            "get_prometheus_rules" => Self::GetPrometheusRules,
            "list_grafana_dashboards" => Self::ListGrafanaDashboards,
            "check_grafana_datasources" => Self::CheckGrafanaDatasources,
            "import_grafana_dashboard" => Self::ImportGrafanaDashboard,
            "apply_kubernetes_manifest" => Self::ApplyKubernetesManifest,
            "generate_validation_report" => Self::GenerateValidationReport,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListResources => "list_resources",
            Self::GetResourceDetail => "get_resource_detail",
            Self::GetRelationships => "get_relationships",
            Self::GetPlatformSummary => "get_platform_summary",
            Self::CheckHealthGaps => "check_health_gaps",
            Self::GetWorkloadInsights => "get_workload_insights",
            Self::GetIacResources => "get_iac_resources",
            Self::GetAwsResources => "get_aws_resources",
            Self::GenerateObservabilityPlan => "generate_observability_plan",
            Self::CheckClusterConnectivity => "check_cluster_connectivity",
            Self::FindMonitoringStack => "find_monitoring_stack",
            Self::GetClusterResources => "get_cluster_resources",
            Self::DescribeClusterResource => "describe_cluster_resource",
            Self::GetPodLogs => "get_pod_logs",
            Self::GetClusterEvents => "get_cluster_events",
            Self::CheckScrapeTargets => "check_scrape_targets",
            Self::ValidateMetricExists => "validate_metric_exists",
            Self::RunPromqlQuery => "run_promql_query",
            Self::GetPrometheusAlerts => "get_prometheus_alerts",
            Self::GetPrometheusRules => "get_prometheus_rules",
            Self::ListGrafanaDashboards => "list_grafana_dashboards",
            Self::CheckGrafanaDatasources => "check_grafana_datasources",
            Self::ImportGrafanaDashboard => "import_grafana_dashboard",
            Self::ApplyKubernetesManifest => "apply_kubernetes_manifest",
            Self::GenerateValidationReport => "generate_validation_report",
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(
            self,
            Self::CheckClusterConnectivity
                | Self::FindMonitoringStack
                | Self::GetClusterResources
                | Self::DescribeClusterResource
                | Self::GetPodLogs
                | Self::GetClusterEvents
                | Self::CheckScrapeTargets
                | Self::ValidateMetricExists
                | Self::RunPromqlQuery
                | Self::GetPrometheusAlerts
                | Self::GetPrometheusRules
                | Self::ListGrafanaDashboards
                | Self::CheckGrafanaDatasources
                | Self::ImportGrafanaDashboard
                | Self::ApplyKubernetesManifest
                | Self::GenerateValidationReport
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::GenerateObservabilityPlan | Self::GenerateValidationReport)
    }
}

/// What dispatching a tool call produced.
pub enum DispatchOutcome {
    Text(String),
    TerminalPlan(ObservabilityPlan),
    TerminalValidation(ValidationReport),
}

pub fn analyze_tool_specs() -> Vec<crate::agent::llm::ToolSpec> {
    use crate::agent::llm::ToolSpec;
    use serde_json::json;

    vec![
        ToolSpec {
            name: "list_resources".into(),
            description: "List resources in the platform, optionally filtered by kind and/or namespace.".into(),
            parameters: json!({"type":"object","properties":{"kind":{"type":"string"},"namespace":{"type":"string"}}}),
        },
        ToolSpec {
            name: "get_resource_detail".into(),
            description: "Get structured detail for one resource by its qualified name (namespace/Kind/name).".into(),
            parameters: json!({"type":"object","properties":{"qualified_name":{"type":"string"}},"required":["qualified_name"]}),
        },
        ToolSpec {
            name: "get_relationships".into(),
            description: "List relationship edges, optionally filtered to those touching one qualified name.".into(),
            parameters: json!({"type":"object","properties":{"qualified_name":{"type":"string"}}}),
        },
        ToolSpec {
            name: "get_platform_summary".into(),
            description: "Cluster-wide counts, readiness roll-up, and IaC/cloud roll-up.".into(),
            parameters: json!({"type":"object","properties":{}}),
        },
        ToolSpec {
            name: "check_health_gaps".into(),
            description: "List probe, resource-request/limit, exporter-sidecar, and selector gaps across all workloads.".into(),
            parameters: json!({"type":"object","properties":{}}),
        },
        ToolSpec {
            name: "get_workload_insights".into(),
            description: "Per-workload archetype, capabilities, golden metrics, alerts, dashboards, and recommendations, with CONDITIONAL annotations where prerequisites are unmet. Call this before proposing signals for a workload.".into(),
            parameters: json!({"type":"object","properties":{"qualified_name":{"type":"string"}},"required":["qualified_name"]}),
        },
        ToolSpec {
            name: "get_iac_resources".into(),
            description: "List infrastructure-as-code resources, optionally filtered by source (terraform/helm/kustomize/pulumi).".into(),
            parameters: json!({"type":"object","properties":{"source":{"type":"string"}}}),
        },
        ToolSpec {
            name: "get_aws_resources".into(),
            description: "List AWS live-discovered resources, optionally filtered by service substring.".into(),
            parameters: json!({"type":"object","properties":{"service":{"type":"string"}}}),
        },
        ToolSpec {
            name: "generate_observability_plan".into(),
            description: "Terminal tool. Emit the final observability plan. Call exactly once, when you have enough information.".into(),
            parameters: json!({"type":"object","properties":{
                "cluster_summary":{"type":"string"},
                "metric_recommendations":{"type":"array"},
                "alert_rules":{"type":"array"},
                "dashboards":{"type":"array"},
                "dashboard_imports":{"type":"array"},
                "remediation_steps":{"type":"array"},
                "narrative":{"type":"string"}
            }}),
        },
    ]
}

pub fn live_tool_specs() -> Vec<crate::agent::llm::ToolSpec> {
    use crate::agent::llm::ToolSpec;
    use serde_json::json;

    vec![
        ToolSpec { name: "check_cluster_connectivity".into(), description: "Verify kubectl can reach the cluster.".into(), parameters: json!({"type":"object","properties":{}}) },
        ToolSpec { name: "find_monitoring_stack".into(), description: "Discover Prometheus and Grafana in-cluster by common label selectors; caches their clients for subsequent tool calls.".into(), parameters: json!({"type":"object","properties":{}}) },
        ToolSpec { name: "get_cluster_resources".into(), description: "List live cluster resources of a kind, optionally filtered by namespace.".into(), parameters: json!({"type":"object","properties":{"kind":{"type":"string"},"namespace":{"type":"string"}},"required":["kind"]}) },
        ToolSpec { name: "describe_cluster_resource".into(), description: "Describe one live cluster resource.".into(), parameters: json!({"type":"object","properties":{"kind":{"type":"string"},"name":{"type":"string"},"namespace":{"type":"string"}},"required":["kind","name","namespace"]}) },
        ToolSpec { name: "get_pod_logs".into(), description: "Fetch recent logs for a pod (truncated at 512 KiB).".into(), parameters: json!({"type":"object","properties":{"name":{"type":"string"},"namespace":{"type":"string"},"container":{"type":"string"}},"required":["name","namespace"]}) },
        ToolSpec { name: "get_cluster_events".into(), description: "List recent cluster events, optionally scoped to a namespace.".into(), parameters: json!({"type":"object","properties":{"namespace":{"type":"string"}}}) },
        ToolSpec { name: "check_scrape_targets".into(), description: "Per-job up/down target counts from Prometheus, with failing-target detail.".into(), parameters: json!({"type":"object","properties":{}}) },
        ToolSpec { name: "validate_metric_exists".into(), description: "Batch-check whether metric names currently have series in Prometheus.".into(), parameters: json!({"type":"object","properties":{"metric_names":{"type":"array","items":{"type":"string"}}},"required":["metric_names"]}) },
        ToolSpec { name: "run_promql_query".into(), description: "Validate and execute a PromQL expression, returning labeled values.".into(), parameters: json!({"type":"object","properties":{"query":{"type":"string"}},"required":["query"]}) },
        ToolSpec { name: "get_prometheus_alerts".into(), description: "List currently configured/firing Prometheus alerts.".into(), parameters: json!({"type":"object","properties":{}}) },
        ToolSpec { name: "get_prometheus_rules".into(), description: "List configured Prometheus recording/alerting rules.".into(), parameters: json!({"type":"object","properties":{}}) },
        ToolSpec { name: "list_grafana_dashboards".into(), description: "List existing Grafana dashboards.".into(), parameters: json!({"type":"object","properties":{}}) },
        ToolSpec { name: "check_grafana_datasources".into(), description: "List configured Grafana datasources and their health.".into(), parameters: json!({"type":"object","properties":{}}) },
        ToolSpec { name: "import_grafana_dashboard".into(), description: "Import a community dashboard into Grafana by its grafana.com numeric id.".into(), parameters: json!({"type":"object","properties":{"dashboard_id":{"type":"integer"}},"required":["dashboard_id"]}) },
        ToolSpec { name: "apply_kubernetes_manifest".into(), description: "Apply a Kubernetes manifest to the live cluster. Gated behind an explicit operator opt-in; refused by default.".into(), parameters: json!({"type":"object","properties":{"manifest_yaml":{"type":"string"}},"required":["manifest_yaml"]}) },
        ToolSpec {
            name: "generate_validation_report".into(),
            description: "Terminal tool. Emit the final validation report. Call exactly once, when you have enough information.".into(),
            parameters: json!({"type":"object","properties":{
                "cluster_context":{"type":"string"},
                "cluster_summary":{"type":"string"},
                "checks":{"type":"array"},
                "dashboards_imported":{"type":"array"},
                "recommendations":{"type":"array"},
                "remediation_steps":{"type":"array"}
            }}),
        },
    ]
}

/// Live-tool shared state: cached clients, plus the write-gate flag.
pub struct LiveContext {
    pub allow_writes: bool,
    pub kubectl: clients::kubectl::KubectlClient,
    pub prometheus: Mutex<Option<clients::prometheus::PrometheusClient>>,
    pub grafana: Mutex<Option<clients::grafana::GrafanaClient>>,
}

impl LiveContext {
    pub fn new(allow_writes: bool) -> Self {
        LiveContext {
            allow_writes,
            kubectl: clients::kubectl::KubectlClient::new(),
            prometheus: Mutex::new(None),
            grafana: Mutex::new(None),
        }
    }
}

/// Route one `tool_use` block by name to the analyze or live executor.
/// Live names are a fixed set; anything else is an analyze tool; an
/// unknown name degrades to an error string. Never panics.
pub async fn dispatch(name: &str, input: &Value, platform: &Platform, live: &LiveContext) -> DispatchOutcome {
    let Some(tool) = ToolName::parse(name) else {
        return DispatchOutcome::Text(format_tool_error(name, ToolErrorCategory::NotFound, "unknown tool name"));
    };

    if tool == ToolName::GenerateObservabilityPlan {
        return match crate::agent::plan::parse_observability_plan(input) {
            Ok(plan) => DispatchOutcome::TerminalPlan(plan),
            Err(msg) => DispatchOutcome::Text(format_tool_error(name, ToolErrorCategory::ValidationFailed, &msg)),
        };
    }
    if tool == ToolName::GenerateValidationReport {
        return match crate::agent::plan::parse_validation_report(input) {
            Ok(report) => DispatchOutcome::TerminalValidation(report),
            Err(msg) => DispatchOutcome::Text(format_tool_error(name, ToolErrorCategory::ValidationFailed, &msg)),
        };
    }

    if tool.is_live() {
        DispatchOutcome::Text(live::dispatch(tool, input, live).await)
    } else {
        DispatchOutcome::Text(dispatch_analyze(tool, input, platform))
    }
}

fn dispatch_analyze(tool: ToolName, input: &Value, platform: &Platform) -> String {
    match tool {
        ToolName::ListResources => analyze::list_resources(platform, input),
        ToolName::GetResourceDetail => analyze::get_resource_detail(platform, input),
        ToolName::GetRelationships => analyze::get_relationships(platform, input),
        ToolName::GetPlatformSummary => analyze::get_platform_summary(platform),
        ToolName::CheckHealthGaps => analyze::check_health_gaps(platform),
        ToolName::GetWorkloadInsights => analyze::get_workload_insights(platform, input),
        ToolName::GetIacResources => analyze::get_iac_resources(platform, input),
        ToolName::GetAwsResources => analyze::get_aws_resources(platform, input),
        _ => unreachable!("non-analyze tool routed to dispatch_analyze"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tool_name_is_a_structured_error_not_a_panic() {
        assert!(ToolName::parse("delete_everything").is_none());
    }

    #[test]
    fn terminal_tools_are_flagged_correctly() {
        assert!(ToolName::GenerateObservabilityPlan.is_terminal());
        assert!(ToolName::GenerateValidationReport.is_terminal());
        assert!(!ToolName::ListResources.is_terminal());
    }

    #[tokio::test]
    async fn dispatching_unknown_name_returns_text_error_result() {
        let platform = Platform::default();
        let live = LiveContext::new(false);
        match dispatch("not_a_real_tool", &serde_json::json!({}), &platform, &live).await {
            DispatchOutcome::Text(s) => assert!(s.contains("unknown tool name")),
            _ => panic!("expected a text error result"),
        }
    }
}
