//! CLI command handlers: thin glue between the `analyze`/`scan`/`validate`
//! surface (spec.md §6 — explicitly out of the core's scope) and the
//! extractor/agent/history subsystems that are.
//!
//! Output here is deliberately plain — "rich terminal printing" is another
//! out-of-scope external collaborator. A real deployment would hand the
//! returned [`ObservabilityPlan`]/[`ValidationReport`] to a renderer; these
//! handlers just print enough for an operator running the CLI directly.

use crate::agent::driver;
use crate::agent::llm::RigAnthropicClient;
use crate::agent::tools::LiveContext;
use crate::config::types::{AgentConfig, ExtractionConfig};
use crate::error::{ObsAgentError, Result};
use crate::extractor::{self, ExtractOptions};
use crate::history::HistoryStore;
use crate::model::{ObservabilityPlan, ValidationReport};
use colored::Colorize;
use std::path::{Path, PathBuf};

fn build_extract_options(extraction: &ExtractionConfig, extra_aws_regions: &[String]) -> ExtractOptions {
    let mut aws_regions = extraction.aws_regions.clone();
    aws_regions.extend(extra_aws_regions.iter().cloned());
    ExtractOptions {
        include: extraction.include_globs.clone(),
        exclude: extraction.exclude_globs.clone(),
        aws_regions,
    }
}

fn resolve_api_key(agent: &AgentConfig, cli_override: Option<String>) -> Result<String> {
    cli_override
        .or_else(|| agent.api_key.clone())
        .ok_or(ObsAgentError::MissingApiKey)
}

fn default_history_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("k8s-obs-agent")
        .join("history.sqlite3")
}

/// `scan <repo>` — extraction only, no LLM call. Exit code 0 even when the
/// platform comes back empty; an empty platform is not an error.
pub async fn handle_scan(path: &Path, extraction: &ExtractionConfig, aws_regions: &[String], json: bool) -> Result<()> {
    let options = build_extract_options(extraction, aws_regions);
    let platform = extractor::extract(path, &options).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&platform)?);
    } else {
        println!("{}", platform.report());
        if platform.resources.is_empty() {
            eprintln!("{}", "warning: no resources found under this path".yellow());
        }
        if !platform.parse_errors.is_empty() {
            eprintln!(
                "{}",
                format!("warning: {} file(s) could not be parsed; see errors above", platform.parse_errors.len()).yellow()
            );
        }
    }
    Ok(())
}

/// `analyze <repo>` — extraction, then the bounded agent loop, emitting an
/// [`ObservabilityPlan`].
pub async fn handle_analyze(
    path: &Path,
    extraction: &ExtractionConfig,
    agent: &AgentConfig,
    aws_regions: &[String],
    api_key_override: Option<String>,
    model_override: Option<String>,
    max_turns_override: Option<u32>,
    json: bool,
) -> Result<ObservabilityPlan> {
    let api_key = resolve_api_key(agent, api_key_override)?;
    let model = model_override.unwrap_or_else(|| agent.model.clone());
    let max_turns = max_turns_override.unwrap_or(agent.max_turns_analyze);

    let options = build_extract_options(extraction, aws_regions);
    let platform = extractor::extract(path, &options).await?;
    if platform.resources.is_empty() {
        eprintln!("{}", "warning: no resources found under this path".yellow());
    }

    let llm = RigAnthropicClient::new(&api_key, model);
    let plan = driver::run_analyze(&platform, &llm, max_turns, agent.max_tokens)
        .await
        .map_err(ObsAgentError::from)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
    }
    Ok(plan)
}

/// `validate` — live-cluster agent loop, seeded with a digest of the last
/// run for this cluster context and persisting the new report when done.
pub async fn handle_validate(
    agent: &AgentConfig,
    api_key_override: Option<String>,
    model_override: Option<String>,
    max_turns_override: Option<u32>,
    allow_writes: bool,
    history_db: Option<PathBuf>,
    json: bool,
) -> Result<ValidationReport> {
    let api_key = resolve_api_key(agent, api_key_override)?;
    let model = model_override.unwrap_or_else(|| agent.model.clone());
    let max_turns = max_turns_override.unwrap_or(agent.max_turns_validate);

    let live = LiveContext::new(allow_writes || agent.allow_cluster_writes);
    let cluster_context = live
        .kubectl
        .current_context()
        .await
        .unwrap_or_else(|_| "unknown-context".to_string());

    let history = HistoryStore::open(history_db.unwrap_or_else(default_history_db_path))?;
    let digest = history.previous_run_summary(&cluster_context)?;
    let digest_opt = if digest.is_empty() { None } else { Some(digest.as_str()) };

    let llm = RigAnthropicClient::new(&api_key, model);
    let mut report = driver::run_validate(&cluster_context, &llm, &live, max_turns, agent.max_tokens, digest_opt)
        .await
        .map_err(ObsAgentError::from)?;
    report.cluster_context = cluster_context.clone();

    let run_at = chrono::Utc::now().to_rfc3339();
    history.save_run(&report, &run_at)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_validation_report(&report);
    }
    Ok(report)
}

fn print_plan(plan: &ObservabilityPlan) {
    println!("{}", "Observability plan".bold());
    println!("{}", plan.cluster_summary);
    println!();
    println!("{} metric recommendation(s), {} alert rule(s), {} dashboard(s), {} dashboard import(s)",
        plan.metric_recommendations.len(),
        plan.alert_rules.len(),
        plan.dashboards.len(),
        plan.dashboard_imports.len(),
    );
    if !plan.remediation_steps.is_empty() {
        println!();
        println!("{}", "Remediation steps:".bold());
        for step in &plan.remediation_steps {
            println!("  - [{}] {}", step.risk, step.description);
        }
    }
    if !plan.narrative.is_empty() {
        println!();
        println!("{}", plan.narrative);
    }
}

fn print_validation_report(report: &ValidationReport) {
    println!("{}", format!("Validation report — {}", report.cluster_context).bold());
    println!("{}", report.cluster_summary);
    println!();
    let passed = report.checks.iter().filter(|c| c.passed).count();
    let failed = report.checks.len() - passed;
    println!("{passed} passed, {failed} failed");
    for check in &report.checks {
        let marker = if check.passed { "PASS".green() } else { "FAIL".red() };
        println!("  [{marker}] {}: {}", check.name, check.detail);
    }
    if !report.recommendations.is_empty() {
        println!();
        println!("{}", "Recommendations:".bold());
        for rec in &report.recommendations {
            println!("  - {rec}");
        }
    }
}
