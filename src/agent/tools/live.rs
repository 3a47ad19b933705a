//! The sixteen live tools, operating on a cluster/Prometheus/Grafana client
//! set. `apply_kubernetes_manifest` is the only mutator and is gated
//! behind `LiveContext::allow_writes`.

use super::clients::grafana::GrafanaClient;
use super::clients::kubectl::{GRAFANA_SELECTORS, PROMETHEUS_SELECTORS};
use super::clients::prometheus::PrometheusClient;
use super::{LiveContext, ToolName};
use crate::error::{format_tool_error, ToolErrorCategory};
use serde_json::Value;

fn str_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

fn err(tool: &str, category: ToolErrorCategory, message: impl std::fmt::Display) -> String {
    format_tool_error(tool, category, &message.to_string())
}

pub async fn dispatch(tool: ToolName, args: &Value, ctx: &LiveContext) -> String {
    match tool {
        ToolName::CheckClusterConnectivity => match ctx.kubectl.check_connectivity().await {
            Ok(out) => format!("Cluster reachable.\n{out}"),
            Err(e) => err("check_cluster_connectivity", ToolErrorCategory::NetworkError, e),
        },
        ToolName::FindMonitoringStack => find_monitoring_stack(ctx).await,
        ToolName::GetClusterResources => {
            let Some(kind) = str_arg(args, "kind") else {
                return err("get_cluster_resources", ToolErrorCategory::ValidationFailed, "missing required field 'kind'");
            };
            match ctx.kubectl.get_resources(kind, str_arg(args, "namespace")).await {
                Ok(out) => out,
                Err(e) => err("get_cluster_resources", ToolErrorCategory::ExternalCommandFailed, e),
            }
        }
        ToolName::DescribeClusterResource => {
            let (Some(kind), Some(name), Some(ns)) = (str_arg(args, "kind"), str_arg(args, "name"), str_arg(args, "namespace")) else {
                return err("describe_cluster_resource", ToolErrorCategory::ValidationFailed, "requires 'kind', 'name', and 'namespace'");
            };
            match ctx.kubectl.describe_resource(kind, name, ns).await {
                Ok(out) => out,
                Err(e) => err("describe_cluster_resource", ToolErrorCategory::ExternalCommandFailed, e),
            }
        }
        ToolName::GetPodLogs => {
            let (Some(name), Some(ns)) = (str_arg(args, "name"), str_arg(args, "namespace")) else {
                return err("get_pod_logs", ToolErrorCategory::ValidationFailed, "requires 'name' and 'namespace'");
            };
            match ctx.kubectl.get_pod_logs(name, ns, str_arg(args, "container")).await {
                Ok(out) => out,
                Err(e) => err("get_pod_logs", ToolErrorCategory::ExternalCommandFailed, e),
            }
        }
        ToolName::GetClusterEvents => match ctx.kubectl.get_events(str_arg(args, "namespace")).await {
            Ok(out) => out,
            Err(e) => err("get_cluster_events", ToolErrorCategory::ExternalCommandFailed, e),
        },
        ToolName::CheckScrapeTargets => with_prometheus(ctx, "check_scrape_targets", |p| Box::pin(check_scrape_targets(p))).await,
        ToolName::ValidateMetricExists => {
            let Some(names) = args.get("metric_names").and_then(Value::as_array) else {
                return err("validate_metric_exists", ToolErrorCategory::ValidationFailed, "missing required field 'metric_names'");
            };
            let names: Vec<String> = names.iter().filter_map(|v| v.as_str().map(str::to_string)).collect();
            with_prometheus(ctx, "validate_metric_exists", move |p| Box::pin(validate_metric_exists(p, names.clone()))).await
        }
        ToolName::RunPromqlQuery => {
            let Some(query) = str_arg(args, "query") else {
                return err("run_promql_query", ToolErrorCategory::ValidationFailed, "missing required field 'query'");
            };
            let query = query.to_string();
            with_prometheus(ctx, "run_promql_query", move |p| Box::pin(run_promql_query(p, query.clone()))).await
        }
        ToolName::GetPrometheusAlerts => with_prometheus(ctx, "get_prometheus_alerts", |p| Box::pin(async move {
            p.alerts().await.map(|v| v.to_string())
        })).await,
        ToolName::GetPrometheusRules => with_prometheus(ctx, "get_prometheus_rules", |p| Box::pin(async move {
            p.rules().await.map(|v| v.to_string())
        })).await,
        ToolName::ListGrafanaDashboards => with_grafana(ctx, "list_grafana_dashboards", |g| Box::pin(async move {
            g.search_dashboards().await.map(|v| v.to_string())
        })).await,
        ToolName::CheckGrafanaDatasources => with_grafana(ctx, "check_grafana_datasources", |g| Box::pin(async move {
            g.list_datasources().await.map(|v| v.to_string())
        })).await,
        ToolName::ImportGrafanaDashboard => {
            let Some(id) = args.get("dashboard_id").and_then(Value::as_u64) else {
                return err("import_grafana_dashboard", ToolErrorCategory::ValidationFailed, "missing required integer field 'dashboard_id'");
            };
            with_grafana(ctx, "import_grafana_dashboard", move |g| Box::pin(async move {
                g.import_community_dashboard(id, "prometheus").await.map(|v| v.to_string())
            }))
            .await
        }
        ToolName::ApplyKubernetesManifest => {
            if !ctx.allow_writes {
                return "Write refused: cluster mutation is disabled for this run. The operator must opt in with --allow-writes.".to_string();
            }
            let Some(manifest) = str_arg(args, "manifest_yaml") else {
                return err("apply_kubernetes_manifest", ToolErrorCategory::ValidationFailed, "missing required field 'manifest_yaml'");
            };
            match ctx.kubectl.apply_manifest(manifest).await {
                Ok(out) => out,
                Err(e) => err("apply_kubernetes_manifest", ToolErrorCategory::ExternalCommandFailed, e),
            }
        }
        ToolName::GenerateValidationReport | ToolName::GenerateObservabilityPlan => {
            unreachable!("terminal tools are intercepted before live dispatch")
        }
        _ => unreachable!("non-live tool routed to live::dispatch"),
    }
}

async fn find_monitoring_stack(ctx: &LiveContext) -> String {
    let mut found_prom = None;
    for selector in PROMETHEUS_SELECTORS {
        if let Ok(out) = ctx.kubectl.find_services_by_selector(selector).await {
            if let Some(url) = first_service_base_url(&out) {
                found_prom = Some(url);
                break;
            }
        }
    }
    let mut found_grafana = None;
    for selector in GRAFANA_SELECTORS {
        if let Ok(out) = ctx.kubectl.find_services_by_selector(selector).await {
            if let Some(url) = first_service_base_url(&out) {
                found_grafana = Some(url);
                break;
            }
        }
    }

    let mut summary = String::new();
    if let Some(url) = &found_prom {
        *ctx.prometheus.lock().unwrap() = Some(PrometheusClient::new(url.clone()));
        summary.push_str(&format!("Prometheus found at {url}.\n"));
    } else {
        summary.push_str("Prometheus not found via label selectors.\n");
    }
    if let Some(url) = &found_grafana {
        *ctx.grafana.lock().unwrap() = Some(GrafanaClient::new(url.clone(), None));
        summary.push_str(&format!("Grafana found at {url}.\n"));
    } else {
        summary.push_str("Grafana not found via label selectors.\n");
    }
    summary
}

fn first_service_base_url(kubectl_json: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(kubectl_json).ok()?;
    let items = parsed.get("items")?.as_array()?;
    let svc = items.first()?;
    let cluster_ip = svc.get("spec")?.get("clusterIP")?.as_str()?;
    let port = svc
        .get("spec")?
        .get("ports")?
        .as_array()?
        .first()?
        .get("port")?
        .as_u64()?;
    Some(format!("http://{cluster_ip}:{port}"))
}

async fn with_prometheus<F>(ctx: &LiveContext, tool_name: &str, f: F) -> String
where
    F: for<'a> FnOnce(&'a PrometheusClient) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, String>> + 'a>>,
{
    let guard = ctx.prometheus.lock().unwrap();
    let Some(client) = guard.as_ref() else {
        return err(tool_name, ToolErrorCategory::NotFound, "Prometheus client not initialized — call find_monitoring_stack first");
    };
    match f(client).await {
        Ok(s) => s,
        Err(e) => err(tool_name, ToolErrorCategory::NetworkError, e),
    }
}

async fn with_grafana<F>(ctx: &LiveContext, tool_name: &str, f: F) -> String
where
    F: for<'a> FnOnce(&'a GrafanaClient) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, String>> + 'a>>,
{
    let guard = ctx.grafana.lock().unwrap();
    let Some(client) = guard.as_ref() else {
        return err(tool_name, ToolErrorCategory::NotFound, "Grafana client not initialized — call find_monitoring_stack first");
    };
    match f(client).await {
        Ok(s) => s,
        Err(e) => err(tool_name, ToolErrorCategory::NetworkError, e),
    }
}

async fn check_scrape_targets(prom: &PrometheusClient) -> Result<String, String> {
    let targets = prom.targets().await?;
    Ok(targets.to_string())
}

async fn validate_metric_exists(prom: &PrometheusClient, metric_names: Vec<String>) -> Result<String, String> {
    let mut out = String::new();
    for name in metric_names {
        let result = prom.query(&name).await?;
        let has_series = result
            .get("data")
            .and_then(|d| d.get("result"))
            .and_then(Value::as_array)
            .map(|arr| !arr.is_empty())
            .unwrap_or(false);
        out.push_str(&format!("{name}: {}\n", if has_series { "present" } else { "no series" }));
    }
    Ok(out)
}

async fn run_promql_query(prom: &PrometheusClient, query: String) -> Result<String, String> {
    let result = prom.query(&query).await?;
    Ok(result.to_string())
}
