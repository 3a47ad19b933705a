//! System prompts for the two agent modes. Content is paraphrased in this
//! crate's own voice, not translated line-for-line from any prior art.

pub fn analyze_system_prompt() -> String {
    "You are an SRE assistant analyzing a Kubernetes platform from its declarative \
     source (manifests, Helm, Kustomize, Terraform, Pulumi, discovered cloud resources). \
     You have read-only tools over a frozen snapshot of that platform. Before proposing \
     any metric, alert, or dashboard for a workload, call get_workload_insights for it — \
     it already tells you what is conditionally unavailable and why. Prefer recommending \
     an existing community Grafana dashboard by id over inventing one from scratch. When \
     you have enough information, call generate_observability_plan exactly once with the \
     complete plan; do not call it more than once, and do not stop before calling it \
     unless you are genuinely out of turns."
        .to_string()
}

pub fn validate_system_prompt() -> String {
    "You are an SRE assistant validating observability on a live Kubernetes cluster. \
     You have tools to inspect cluster state, query Prometheus, and inspect Grafana, plus \
     a gated tool to apply manifests only if the operator has opted in. If a prior \
     validation run is summarized below, re-check its failing items first before looking \
     at anything new. When you are done, call generate_validation_report exactly once with \
     the complete report; do not call it more than once."
        .to_string()
}

/// The initial user message for `analyze` mode: the deterministic platform
/// report the driver built once, wrapped with a short instruction header.
pub fn analyze_initial_message(platform_report: &str) -> String {
    format!(
        "Here is the current platform snapshot. Use it as ground truth; it was \
         produced by deterministic extraction, not by you.\n\n{platform_report}"
    )
}

/// The initial user message for `validate` mode, optionally prefixed with a
/// digest of the previous run for this cluster context.
pub fn validate_initial_message(cluster_context: &str, history_digest: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(digest) = history_digest {
        out.push_str(digest);
        out.push_str("\n\n");
    }
    out.push_str(&format!(
        "Validating observability for cluster context `{cluster_context}`. Use the live \
         tools to check cluster, Prometheus, and Grafana state before reporting."
    ));
    out
}

/// Builds the "Previous validation run" digest: a one-paragraph summary
/// naming at least the failed checks from the last run.
pub fn history_digest(cluster_summary: &str, failed_check_names: &[String], run_at: &str) -> String {
    let mut out = format!("Previous validation run ({run_at}): {cluster_summary}\n");
    if failed_check_names.is_empty() {
        out.push_str("All checks passed last time.");
    } else {
        out.push_str("Failed checks to re-verify first: ");
        out.push_str(&failed_check_names.join(", "));
        out.push('.');
    }
    out
}
