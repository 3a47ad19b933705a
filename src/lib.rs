//! # k8s-observability-agent
//!
//! Analyzes a Kubernetes platform — both its declarative source (a
//! repository of manifests and IaC) and its live runtime state — and
//! drives a tool-calling LLM agent to produce and validate a domain-aware
//! observability plan: Prometheus metrics and alert rules, Grafana
//! dashboards, and remediation manifests.
//!
//! The crate is organized around three coupled subsystems:
//!
//! - [`classifier`] + [`capability`] — deterministic, evidence-weighted
//!   workload archetype identification and telemetry capability inference.
//! - [`extractor`] + [`model`] — multi-source scanning (manifests, Helm,
//!   Kustomize, Pulumi, Terraform, live cloud APIs) into a single
//!   relational [`model::Platform`].
//! - [`agent`] — a bounded, retrying tool-calling loop over that platform
//!   (and, in `validate` mode, a live cluster).
//!
//! Everything except the LLM turn itself is deterministic and reproducible
//! from inputs.

pub mod agent;
pub mod capability;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod handlers;
pub mod history;
pub mod model;

pub use error::{ObsAgentError, Result};

/// The current version of the CLI tool.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
