//! Prometheus HTTP API v1 client: targets, instant query, rules, alerts.

use super::HTTP_TIMEOUT_SECS;
use serde_json::Value;
use std::time::Duration;

pub struct PrometheusClient {
    base_url: String,
    client: reqwest::Client,
}

impl PrometheusClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        PrometheusClient {
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, String> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| format!("prometheus request to {path} failed: {e}"))?;
        resp.json::<Value>().await.map_err(|e| format!("prometheus response from {path} was not JSON: {e}"))
    }

    pub async fn targets(&self) -> Result<Value, String> {
        self.get_json("/api/v1/targets", &[]).await
    }

    pub async fn query(&self, promql: &str) -> Result<Value, String> {
        self.get_json("/api/v1/query", &[("query", promql)]).await
    }

    pub async fn rules(&self) -> Result<Value, String> {
        self.get_json("/api/v1/rules", &[]).await
    }

    pub async fn alerts(&self) -> Result<Value, String> {
        self.get_json("/api/v1/alerts", &[]).await
    }

    pub async fn buildinfo(&self) -> Result<Value, String> {
        self.get_json("/api/v1/status/buildinfo", &[]).await
    }
}
