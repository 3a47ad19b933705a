//! Parses a terminal tool's `input` JSON into the structured object it
//! promises. A parse failure is tool misuse: it is reported as a string,
//! never as a Rust panic or propagated `Err`.

use crate::model::{ObservabilityPlan, ValidationReport};
use serde_json::Value;

pub fn parse_observability_plan(input: &Value) -> Result<ObservabilityPlan, String> {
    serde_json::from_value(input.clone()).map_err(|e| format!("malformed generate_observability_plan input: {e}"))
}

pub fn parse_validation_report(input: &Value) -> Result<ValidationReport, String> {
    serde_json::from_value(input.clone()).map_err(|e| format!("malformed generate_validation_report input: {e}"))
}

/// Fallback used when the turn budget is exhausted without a terminal tool
/// call, or the LLM stopped with no tool calls at all.
pub fn unstructured_plan(reason: &str) -> ObservabilityPlan {
    ObservabilityPlan {
        narrative: format!("Agent did not emit a structured plan ({reason}). Review agent output."),
        ..Default::default()
    }
}

pub fn unstructured_validation_report(cluster_context: &str, reason: &str) -> ValidationReport {
    ValidationReport {
        cluster_context: cluster_context.to_string(),
        recommendations: vec![format!(
            "Agent did not emit a structured validation report ({reason}). Review agent output."
        )],
        ..Default::default()
    }
}
