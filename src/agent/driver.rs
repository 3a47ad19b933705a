//! The bounded agent loop: call the LLM, execute whatever tools it asked
//! for in emission order, feed the results back, repeat until a terminal
//! tool fires or the turn budget runs out.
//!
//! States, informally: a turn calls the LLM once (with retry/backoff); if
//! the response has no tool calls at all, the run ends unstructured; if it
//! does, every tool call is executed sequentially and the results appended
//! to history before the next turn. A terminal tool call (`generate_observability_plan`
//! / `generate_validation_report`) ends the run immediately, even if it
//! shared a turn with other tool calls. Exceeding the turn budget ends the
//! run with a fallback result — the loop never runs an extra turn to "clean
//! up".

use crate::agent::backoff::{attempt_with_backoff, tokio_sleep};
use crate::agent::llm::{ContentBlock, LlmCallError, LlmClient, Message, StopReason, UserBlock};
use crate::agent::plan::{unstructured_plan, unstructured_validation_report};
use crate::agent::prompts::{analyze_initial_message, analyze_system_prompt, validate_initial_message, validate_system_prompt};
use crate::agent::tools::{self, DispatchOutcome, LiveContext};
use crate::error::{AgentError, ErrorClass};
use crate::model::{ObservabilityPlan, Platform, ValidationReport};

const MAX_LLM_ATTEMPTS: u32 = 3;

enum TerminalOutcome {
    Plan(ObservabilityPlan),
    Validation(ValidationReport),
    Unstructured(String),
    TurnLimitExceeded,
}

fn classify_llm_error(err: &LlmCallError) -> ErrorClass {
    match err {
        LlmCallError::Transient(_) => ErrorClass::Retryable,
        LlmCallError::Denied(_) => ErrorClass::NonRetryableFatal,
    }
}

async fn call_llm_with_retry(
    llm: &dyn LlmClient,
    system: &str,
    messages: &[Message],
    tool_specs: &[crate::agent::llm::ToolSpec],
    max_tokens: u32,
) -> Result<crate::agent::llm::LlmResponse, AgentError> {
    attempt_with_backoff(
        || async { llm.call(system, messages, tool_specs, max_tokens).await },
        MAX_LLM_ATTEMPTS,
        classify_llm_error,
        tokio_sleep,
    )
    .await
    .map_err(|e| match e {
        LlmCallError::Transient(m) => AgentError::LlmUnavailable(m),
        LlmCallError::Denied(m) => AgentError::LlmDenied(m),
    })
}

async fn run_loop(
    system: String,
    mut messages: Vec<Message>,
    tool_specs: Vec<crate::agent::llm::ToolSpec>,
    max_turns: u32,
    max_tokens: u32,
    llm: &dyn LlmClient,
    platform: &Platform,
    live: &LiveContext,
) -> Result<TerminalOutcome, AgentError> {
    // Once a terminal tool fires, its outcome is kept here rather than
    // returned immediately — the LLM is allowed to keep talking (usually a
    // closing summary) until a turn's `stop_reason` is actually `EndTurn`,
    // per the per-turn protocol. The real Anthropic backend sets
    // `stop_reason = ToolUse` on the very turn that calls the terminal
    // tool, so that turn alone is never enough to stop on.
    let mut terminal: Option<TerminalOutcome> = None;

    for _turn in 1..=max_turns {
        let response = call_llm_with_retry(llm, &system, &messages, &tool_specs, max_tokens).await?;
        let tool_uses: Vec<(String, String, serde_json::Value)> = response
            .tool_uses()
            .into_iter()
            .map(|(id, name, input)| (id.to_string(), name.to_string(), input.clone()))
            .collect();

        if tool_uses.is_empty() {
            if let Some(done) = terminal {
                return Ok(done);
            }
            let text = response.text_blocks().join("\n");
            return Ok(TerminalOutcome::Unstructured(text));
        }

        messages.push(Message::Assistant(response.content.clone()));

        let mut result_blocks = Vec::with_capacity(tool_uses.len());
        for (id, name, input) in &tool_uses {
            match tools::dispatch(name, input, platform, live).await {
                DispatchOutcome::Text(s) => {
                    result_blocks.push(UserBlock::ToolResult { tool_use_id: id.clone(), content: s });
                }
                DispatchOutcome::TerminalPlan(plan) => {
                    result_blocks.push(UserBlock::ToolResult { tool_use_id: id.clone(), content: "plan recorded".to_string() });
                    terminal = Some(TerminalOutcome::Plan(plan));
                }
                DispatchOutcome::TerminalValidation(report) => {
                    result_blocks.push(UserBlock::ToolResult { tool_use_id: id.clone(), content: "report recorded".to_string() });
                    terminal = Some(TerminalOutcome::Validation(report));
                }
            }
        }
        messages.push(Message::User(result_blocks));

        if terminal.is_some() && response.stop_reason == StopReason::EndTurn {
            return Ok(terminal.unwrap());
        }
    }
    Ok(terminal.unwrap_or(TerminalOutcome::TurnLimitExceeded))
}

pub async fn run_analyze(
    platform: &Platform,
    llm: &dyn LlmClient,
    max_turns: u32,
    max_tokens: u32,
) -> Result<ObservabilityPlan, AgentError> {
    let system = analyze_system_prompt();
    let messages = vec![Message::user_text(analyze_initial_message(&platform.report()))];
    let tool_specs = tools::analyze_tool_specs();
    let live = LiveContext::new(false);

    match run_loop(system, messages, tool_specs, max_turns, max_tokens, llm, platform, &live).await? {
        TerminalOutcome::Plan(plan) => Ok(plan),
        TerminalOutcome::Unstructured(text) => Ok(unstructured_plan(&format!("model stopped without calling a tool: {text}"))),
        TerminalOutcome::TurnLimitExceeded => Ok(unstructured_plan("turn limit exceeded before a plan was generated")),
        TerminalOutcome::Validation(_) => Ok(unstructured_plan("model called generate_validation_report during an analyze run")),
    }
}

pub async fn run_validate(
    cluster_context: &str,
    llm: &dyn LlmClient,
    live: &LiveContext,
    max_turns: u32,
    max_tokens: u32,
    history_digest: Option<&str>,
) -> Result<ValidationReport, AgentError> {
    let system = validate_system_prompt();
    let messages = vec![Message::user_text(validate_initial_message(cluster_context, history_digest))];
    let tool_specs = tools::live_tool_specs();
    let platform = Platform::default();

    match run_loop(system, messages, tool_specs, max_turns, max_tokens, llm, &platform, live).await? {
        TerminalOutcome::Validation(report) => Ok(report),
        TerminalOutcome::Unstructured(text) => {
            Ok(unstructured_validation_report(cluster_context, &format!("model stopped without calling a tool: {text}")))
        }
        TerminalOutcome::TurnLimitExceeded => Ok(unstructured_validation_report(cluster_context, "turn limit exceeded before a report was generated")),
        TerminalOutcome::Plan(_) => Ok(unstructured_validation_report(cluster_context, "model called generate_observability_plan during a validate run")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::llm::{LlmResponse, MockLlmClient};
    use serde_json::json;

    fn tool_use_response(id: &str, name: &str, input: serde_json::Value) -> Result<LlmResponse, LlmCallError> {
        Ok(LlmResponse {
            content: vec![ContentBlock::ToolUse { id: id.to_string(), name: name.to_string(), input }],
            stop_reason: StopReason::ToolUse,
        })
    }

    fn end_turn_text_response(text: &str) -> Result<LlmResponse, LlmCallError> {
        Ok(LlmResponse {
            content: vec![ContentBlock::Text(text.to_string())],
            stop_reason: StopReason::EndTurn,
        })
    }

    fn sample_plan_input() -> serde_json::Value {
        json!({
            "cluster_summary": "3 namespaces, 12 workloads",
            "metric_recommendations": [],
            "alert_rules": [],
            "dashboards": [],
            "dashboard_imports": [],
            "remediation_steps": [],
            "narrative": "straightforward cluster",
        })
    }

    #[tokio::test]
    async fn terminal_tool_call_keeps_looping_until_a_turn_ends_with_end_turn() {
        // The terminal turn itself reports `stop_reason: ToolUse` (as the
        // real Anthropic backend always does for a turn with a tool_use
        // block) — the driver must not stop there, and only returns once a
        // later turn's stop_reason is EndTurn.
        let mock = MockLlmClient::new(vec![
            tool_use_response("t1", "list_resources", json!({})),
            tool_use_response("t2", "get_platform_summary", json!({})),
            tool_use_response("t3", "generate_observability_plan", sample_plan_input()),
            end_turn_text_response("Plan generated covering all three namespaces."),
        ]);

        let platform = Platform::default();
        let plan = run_analyze(&platform, &mock, 30, 4096).await.unwrap();

        assert_eq!(mock.call_count(), 4, "driver must keep looping past a ToolUse-stop terminal turn until stop_reason is EndTurn");
        assert_eq!(plan.cluster_summary, "3 namespaces, 12 workloads");
    }

    #[tokio::test]
    async fn terminal_turn_that_itself_reports_end_turn_stops_immediately() {
        let mock = MockLlmClient::new(vec![Ok(LlmResponse {
            content: vec![ContentBlock::ToolUse {
                id: "t1".to_string(),
                name: "generate_observability_plan".to_string(),
                input: sample_plan_input(),
            }],
            stop_reason: StopReason::EndTurn,
        })]);

        let platform = Platform::default();
        let plan = run_analyze(&platform, &mock, 30, 4096).await.unwrap();

        assert_eq!(mock.call_count(), 1, "no further turn is needed once the terminal turn already reports EndTurn");
        assert_eq!(plan.cluster_summary, "3 namespaces, 12 workloads");
    }

    #[tokio::test]
    async fn no_tool_calls_ends_the_run_unstructured_after_one_call() {
        let mock = MockLlmClient::new(vec![Ok(LlmResponse {
            content: vec![ContentBlock::Text("I looked around but found nothing notable.".to_string())],
            stop_reason: StopReason::EndTurn,
        })]);

        let platform = Platform::default();
        let plan = run_analyze(&platform, &mock, 30, 4096).await.unwrap();

        assert_eq!(mock.call_count(), 1);
        assert!(plan.narrative.contains("did not emit a structured plan"));
    }

    #[tokio::test]
    async fn exhausting_the_turn_budget_returns_a_fallback_without_exceeding_it() {
        let mock = MockLlmClient::new(vec![
            tool_use_response("a", "list_resources", json!({})),
            tool_use_response("b", "list_resources", json!({})),
        ]);

        let platform = Platform::default();
        let plan = run_analyze(&platform, &mock, 2, 4096).await.unwrap();

        assert_eq!(mock.call_count(), 2);
        assert!(plan.narrative.contains("turn limit exceeded"));
    }
}
