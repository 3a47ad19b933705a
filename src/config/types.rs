//! Persisted configuration shape: the agent's LLM-facing settings plus
//! manifest/IaC extraction settings, loaded from a local-then-global TOML
//! file.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// LLM-facing settings: API key, model, and token/turn budgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Never serialized back out in plaintext logs; only persisted to the
    /// local config file the operator controls.
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    /// Default turn budget for `analyze`.
    pub max_turns_analyze: u32,
    /// Default turn budget for `validate`.
    pub max_turns_validate: u32,
    pub verbose: bool,
    /// `apply_kubernetes_manifest` is gated behind this; default deny.
    pub allow_cluster_writes: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            api_key: None,
            model: "claude-sonnet-4-5".to_string(),
            max_tokens: 4096,
            max_turns_analyze: 30,
            max_turns_validate: 40,
            verbose: false,
            allow_cluster_writes: false,
        }
    }
}

/// Manifest/IaC scan settings: include/exclude globs and AWS regions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub include_globs: Vec<String>,
    pub exclude_globs: Vec<String>,
    pub aws_regions: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            include_globs: crate::extractor::manifest::DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect(),
            exclude_globs: crate::extractor::manifest::DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect(),
            aws_regions: Vec::new(),
        }
    }
}
