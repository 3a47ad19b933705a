use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "k8s-obs-agent")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Analyze a Kubernetes platform and drive an LLM agent to produce and validate an observability plan")]
#[command(long_about = "Scans a repository of Kubernetes manifests and IaC (and, for `validate`, a live \
cluster), then drives a tool-calling LLM agent over the resulting platform model to \
produce or validate a domain-aware observability plan: Prometheus metrics and alert \
rules, Grafana dashboards, and remediation steps.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file (defaults to ./.k8s-obs-agent.toml then ~/.k8s-obs-agent.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print the final plan/report as JSON instead of a rendered summary
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a repository, then drive the agent to produce an observability plan
    Analyze {
        /// Path to the repository to analyze
        #[arg(value_name = "REPO_PATH")]
        path: PathBuf,

        /// Anthropic API key (falls back to $ANTHROPIC_API_KEY, then the saved config)
        #[arg(long, env = "ANTHROPIC_API_KEY")]
        api_key: Option<String>,

        /// Model id to use for the agent's LLM calls
        #[arg(long)]
        model: Option<String>,

        /// Maximum agent turns before giving up (default from config, spec default 30)
        #[arg(long)]
        max_turns: Option<u32>,

        /// AWS regions to additionally discover live cloud resources in
        #[arg(long, value_delimiter = ',')]
        aws_region: Vec<String>,
    },

    /// Scan a repository and print the deterministic platform report, no agent call
    Scan {
        /// Path to the repository to scan
        #[arg(value_name = "REPO_PATH")]
        path: PathBuf,

        /// AWS regions to additionally discover live cloud resources in
        #[arg(long, value_delimiter = ',')]
        aws_region: Vec<String>,
    },

    /// Drive the agent against a live cluster to validate existing observability
    Validate {
        /// Anthropic API key (falls back to $ANTHROPIC_API_KEY, then the saved config)
        #[arg(long, env = "ANTHROPIC_API_KEY")]
        api_key: Option<String>,

        /// Model id to use for the agent's LLM calls
        #[arg(long)]
        model: Option<String>,

        /// Maximum agent turns before giving up (default from config, spec default 40)
        #[arg(long)]
        max_turns: Option<u32>,

        /// Allow the agent's apply_kubernetes_manifest tool to mutate the cluster.
        /// Default is deny; the tool returns a permission-denial result instead.
        #[arg(long)]
        allow_writes: bool,

        /// Path to the validation history SQLite database
        #[arg(long)]
        history_db: Option<PathBuf>,
    },
}

impl Cli {
    /// Initialize logging based on verbosity level, matching the teacher's
    /// `env_logger`-over-`log` setup.
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env().filter_level(level).init();
    }
}
