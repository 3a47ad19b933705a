//! kubectl subprocess wrapper: run arbitrary read subcommands, apply from
//! stdin, and discover Prometheus/Grafana services by label selector.

use super::{truncate, CONNECTIVITY_TIMEOUT_SECS, KUBECTL_APPLY_TIMEOUT_SECS, KUBECTL_READ_TIMEOUT_SECS};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Label selectors probed for the in-cluster monitoring stack, in order.
pub const PROMETHEUS_SELECTORS: &[&str] = &[
    "app=prometheus",
    "app.kubernetes.io/name=prometheus",
    "app=kube-prometheus-stack-prometheus",
    "app.kubernetes.io/component=prometheus",
];

pub const GRAFANA_SELECTORS: &[&str] = &["app=grafana", "app.kubernetes.io/name=grafana", "app=kube-prometheus-stack-grafana"];

pub struct KubectlClient;

impl Default for KubectlClient {
    fn default() -> Self {
        Self::new()
    }
}

impl KubectlClient {
    pub fn new() -> Self {
        KubectlClient
    }

    async fn run(&self, args: &[&str], timeout: Duration) -> Result<String, String> {
        let mut cmd = Command::new("kubectl");
        cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());

        let output = tokio::time::timeout(timeout, cmd.output())
            .await
            .map_err(|_| format!("kubectl {} timed out after {:?}", args.join(" "), timeout))?
            .map_err(|e| format!("failed to spawn kubectl: {e}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(truncate(format!("kubectl {} failed: {stderr}", args.join(" "))));
        }
        Ok(truncate(String::from_utf8_lossy(&output.stdout).to_string()))
    }

    pub async fn check_connectivity(&self) -> Result<String, String> {
        self.run(&["cluster-info"], Duration::from_secs(CONNECTIVITY_TIMEOUT_SECS)).await
    }

    /// The active kubeconfig context name, used as the history store's
    /// partitioning key.
    pub async fn current_context(&self) -> Result<String, String> {
        self.run(&["config", "current-context"], Duration::from_secs(CONNECTIVITY_TIMEOUT_SECS))
            .await
            .map(|s| s.trim().to_string())
    }

    pub async fn get_resources(&self, kind: &str, namespace: Option<&str>) -> Result<String, String> {
        let mut args = vec!["get", kind, "-o", "json"];
        if let Some(ns) = namespace {
            args.push("-n");
            args.push(ns);
        } else {
            args.push("-A");
        }
        self.run(&args, Duration::from_secs(KUBECTL_READ_TIMEOUT_SECS)).await
    }

    pub async fn describe_resource(&self, kind: &str, name: &str, namespace: &str) -> Result<String, String> {
        self.run(&["describe", kind, name, "-n", namespace], Duration::from_secs(KUBECTL_READ_TIMEOUT_SECS))
            .await
    }

    pub async fn get_pod_logs(&self, name: &str, namespace: &str, container: Option<&str>) -> Result<String, String> {
        let mut args = vec!["logs", name, "-n", namespace, "--tail=500"];
        if let Some(c) = container {
            args.push("-c");
            args.push(c);
        }
        self.run(&args, Duration::from_secs(KUBECTL_READ_TIMEOUT_SECS)).await
    }

    pub async fn get_events(&self, namespace: Option<&str>) -> Result<String, String> {
        let mut args = vec!["get", "events", "-o", "json"];
        if let Some(ns) = namespace {
            args.push("-n");
            args.push(ns);
        } else {
            args.push("-A");
        }
        self.run(&args, Duration::from_secs(KUBECTL_READ_TIMEOUT_SECS)).await
    }

    pub async fn find_services_by_selector(&self, selector: &str) -> Result<String, String> {
        self.run(&["get", "svc", "-A", "-l", selector, "-o", "json"], Duration::from_secs(KUBECTL_READ_TIMEOUT_SECS))
            .await
    }

    /// `kubectl apply -f -`, piping `manifest_yaml` in over stdin. Callers
    /// must have already checked the `allow_writes` gate; this function
    /// performs no gating of its own.
    pub async fn apply_manifest(&self, manifest_yaml: &str) -> Result<String, String> {
        let mut cmd = Command::new("kubectl");
        cmd.args(["apply", "-f", "-"]).stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| format!("failed to spawn kubectl apply: {e}"))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(manifest_yaml.as_bytes())
                .await
                .map_err(|e| format!("failed to write manifest to kubectl stdin: {e}"))?;
        }

        let output = tokio::time::timeout(Duration::from_secs(KUBECTL_APPLY_TIMEOUT_SECS), child.wait_with_output())
            .await
            .map_err(|_| "kubectl apply timed out after 30s".to_string())?
            .map_err(|e| format!("kubectl apply failed: {e}"))?;

        if !output.status.success() {
            return Err(truncate(String::from_utf8_lossy(&output.stderr).to_string()));
        }
        Ok(truncate(String::from_utf8_lossy(&output.stdout).to_string()))
    }
}
