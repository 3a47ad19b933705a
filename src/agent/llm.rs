//! The abstract "messages with tools" endpoint the driver calls against.
//!
//! The provider itself is out of scope for this crate — the driver only
//! ever speaks to whatever implements [`LlmClient`]. `RigAnthropicClient`
//! is the production backend (built on `rig-core`'s Anthropic completion
//! model); tests use `MockLlmClient` to script an exact transcript.

use async_trait::async_trait;
use serde_json::Value;

/// One tool the LLM may call, in the shape every provider's "tools" field
/// expects: stable name, natural-language description, JSON-Schema input.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A block of assistant output: either prose or a request to call a tool.
#[derive(Debug, Clone)]
pub enum ContentBlock {
    Text(String),
    ToolUse { id: String, name: String, input: Value },
}

/// A block of user-role content: either plain text or the result of a
/// previously requested tool call, keyed by the tool_use id it answers.
#[derive(Debug, Clone)]
pub enum UserBlock {
    Text(String),
    ToolResult { tool_use_id: String, content: String },
}

#[derive(Debug, Clone)]
pub enum Message {
    User(Vec<UserBlock>),
    Assistant(Vec<ContentBlock>),
}

impl Message {
    pub fn user_text(text: impl Into<String>) -> Self {
        Message::User(vec![UserBlock::Text(text.into())])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
}

#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: StopReason,
}

impl LlmResponse {
    pub fn tool_uses(&self) -> Vec<(&str, &str, &Value)> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { id, name, input } => Some((id.as_str(), name.as_str(), input)),
                ContentBlock::Text(_) => None,
            })
            .collect()
    }

    pub fn text_blocks(&self) -> Vec<&str> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Text(t) => Some(t.as_str()),
                ContentBlock::ToolUse { .. } => None,
            })
            .collect()
    }
}

/// Distinguishes why a call failed, for `attempt_with_backoff`'s classifier.
#[derive(Debug, Clone)]
pub enum LlmCallError {
    /// Rate limit, 5xx, connection reset — worth retrying.
    Transient(String),
    /// Bad credentials / RBAC-equivalent denial — do not retry.
    Denied(String),
}

impl std::fmt::Display for LlmCallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmCallError::Transient(m) => write!(f, "transient LLM error: {m}"),
            LlmCallError::Denied(m) => write!(f, "LLM provider denied request: {m}"),
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn call(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[ToolSpec],
        max_tokens: u32,
    ) -> Result<LlmResponse, LlmCallError>;
}

/// Production backend, talking to Anthropic through `rig-core`.
pub struct RigAnthropicClient {
    client: rig::providers::anthropic::Client,
    model: String,
}

impl RigAnthropicClient {
    pub fn new(api_key: &str, model: impl Into<String>) -> Self {
        RigAnthropicClient {
            client: rig::providers::anthropic::Client::new(api_key),
            model: model.into(),
        }
    }
}

#[async_trait]
impl LlmClient for RigAnthropicClient {
    async fn call(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[ToolSpec],
        max_tokens: u32,
    ) -> Result<LlmResponse, LlmCallError> {
        let chat_history = to_rig_messages(messages);
        let rig_tools: Vec<rig::completion::ToolDefinition> = tools
            .iter()
            .map(|t| rig::completion::ToolDefinition {
                name: t.name.clone(),
                description: t.description.clone(),
                parameters: t.parameters.clone(),
            })
            .collect();

        let model = self.client.completion_model(&self.model);
        let request = rig::completion::CompletionRequest {
            preamble: Some(system.to_string()),
            chat_history,
            documents: Vec::new(),
            tools: rig_tools,
            temperature: None,
            max_tokens: Some(max_tokens as u64),
            additional_params: None,
        };

        let response = model
            .completion(request)
            .await
            .map_err(|e| LlmCallError::Transient(e.to_string()))?;

        Ok(from_rig_response(response))
    }
}

fn to_rig_messages(messages: &[Message]) -> Vec<rig::completion::Message> {
    use rig::completion::message::{AssistantContent, Text, ToolResultContent, UserContent};
    use rig::one_or_many::OneOrMany;

    messages
        .iter()
        .map(|m| match m {
            Message::User(blocks) => {
                let content: Vec<UserContent> = blocks
                    .iter()
                    .map(|b| match b {
                        UserBlock::Text(t) => UserContent::text(t.clone()),
                        UserBlock::ToolResult { tool_use_id, content } => {
                            UserContent::tool_result(tool_use_id.clone(), OneOrMany::one(ToolResultContent::Text(Text { text: content.clone() })))
                        }
                    })
                    .collect();
                rig::completion::Message::User {
                    content: OneOrMany::many(content).unwrap_or_else(|_| OneOrMany::one(UserContent::text(""))),
                }
            }
            Message::Assistant(blocks) => {
                let content: Vec<AssistantContent> = blocks
                    .iter()
                    .map(|b| match b {
                        ContentBlock::Text(t) => AssistantContent::text(t.clone()),
                        ContentBlock::ToolUse { id, name, input } => {
                            AssistantContent::tool_call(id.clone(), name.clone(), input.clone())
                        }
                    })
                    .collect();
                rig::completion::Message::Assistant {
                    content: OneOrMany::many(content).unwrap_or_else(|_| OneOrMany::one(AssistantContent::text(""))),
                }
            }
        })
        .collect()
}

fn from_rig_response(response: rig::completion::CompletionResponse<impl std::fmt::Debug>) -> LlmResponse {
    use rig::completion::message::AssistantContent;

    let mut content = Vec::new();
    for block in response.choice.iter() {
        match block {
            AssistantContent::Text(t) => content.push(ContentBlock::Text(t.text.clone())),
            AssistantContent::ToolCall(tc) => content.push(ContentBlock::ToolUse {
                id: tc.id.clone(),
                name: tc.function.name.clone(),
                input: tc.function.arguments.clone(),
            }),
            _ => {}
        }
    }

    let stop_reason = if content.iter().any(|b| matches!(b, ContentBlock::ToolUse { .. })) {
        StopReason::ToolUse
    } else {
        StopReason::EndTurn
    };

    LlmResponse { content, stop_reason }
}

/// Scripted backend for tests: returns one pre-built response per call, in
/// order, and records how many times it was invoked.
pub struct MockLlmClient {
    transcript: std::sync::Mutex<std::collections::VecDeque<Result<LlmResponse, LlmCallError>>>,
    pub calls: std::sync::atomic::AtomicU32,
}

impl MockLlmClient {
    pub fn new(transcript: Vec<Result<LlmResponse, LlmCallError>>) -> Self {
        MockLlmClient {
            transcript: std::sync::Mutex::new(transcript.into()),
            calls: std::sync::atomic::AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn call(
        &self,
        _system: &str,
        _messages: &[Message],
        _tools: &[ToolSpec],
        _max_tokens: u32,
    ) -> Result<LlmResponse, LlmCallError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let mut guard = self.transcript.lock().unwrap();
        guard
            .pop_front()
            .unwrap_or(Err(LlmCallError::Transient("mock transcript exhausted".to_string())))
    }
}
