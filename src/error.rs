//! Crate-wide error types.
//!
//! Each subsystem gets its own leaf error enum; [`ObsAgentError`] wraps them
//! so call sites can propagate with `?` while handlers still match on the
//! originating subsystem. Extraction and tool execution never bubble an
//! `Err` up through here — this type is reserved for the categories that are
//! genuinely fatal: missing input, config, and I/O.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ObsAgentError>;

#[derive(Debug, Error)]
pub enum ObsAgentError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("repository path does not exist: {0}")]
    RepoNotFound(std::path::PathBuf),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("history store error: {0}")]
    History(#[from] HistoryError),

    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("ANTHROPIC_API_KEY is not set. Export it as an environment variable or pass --api-key.")]
    MissingApiKey,

    #[error("failed to render JSON output: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config file: {0}")]
    ParsingFailed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to (de)serialize history record: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Terminal outcomes of the agent driver's bounded loop.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("LLM call failed after retries: {0}")]
    LlmUnavailable(String),
    #[error("LLM provider rejected the request: {0}")]
    LlmDenied(String),
    #[error("missing API key for provider")]
    MissingApiKey,
}

/// A common error-classification trait used by [`crate::agent::backoff::attempt_with_backoff`]
/// and by the tool executors' uncaught-error formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transient — worth retrying with backoff (rate limit, connection reset).
    Retryable,
    /// Permanent but not fatal to the process — degrade the current run.
    NonRetryableDegraded,
    /// Permanent and fatal — abort the process.
    NonRetryableFatal,
}

/// Shared categories for tool-local errors, used when a tool fails and must
/// degrade to a string result rather than propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorCategory {
    NotFound,
    ValidationFailed,
    ExternalCommandFailed,
    PermissionDenied,
    Timeout,
    NetworkError,
    InternalError,
}

/// Format an uncaught tool error the way the executor contract requires:
/// `"Tool '<name>' error: <message>"`.
pub fn format_tool_error(tool_name: &str, category: ToolErrorCategory, message: &str) -> String {
    format!("Tool '{tool_name}' error ({category:?}): {message}")
}
