//! Grafana HTTP API client: health, datasources, dashboards, folders, plus
//! fetching a community dashboard JSON from grafana.com for import.

use super::HTTP_TIMEOUT_SECS;
use serde_json::Value;
use std::time::Duration;

pub struct GrafanaClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GrafanaClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        GrafanaClient {
            base_url: base_url.into(),
            api_key,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    pub async fn health(&self) -> Result<Value, String> {
        let url = format!("{}/api/health", self.base_url);
        let resp = self.authed(self.client.get(&url)).send().await.map_err(|e| format!("grafana health check failed: {e}"))?;
        resp.json::<Value>().await.map_err(|e| format!("grafana health response was not JSON: {e}"))
    }

    pub async fn search_dashboards(&self) -> Result<Value, String> {
        let url = format!("{}/api/search", self.base_url);
        let resp = self.authed(self.client.get(&url)).send().await.map_err(|e| format!("grafana dashboard search failed: {e}"))?;
        resp.json::<Value>().await.map_err(|e| format!("grafana search response was not JSON: {e}"))
    }

    pub async fn list_datasources(&self) -> Result<Value, String> {
        let url = format!("{}/api/datasources", self.base_url);
        let resp = self.authed(self.client.get(&url)).send().await.map_err(|e| format!("grafana datasource list failed: {e}"))?;
        resp.json::<Value>().await.map_err(|e| format!("grafana datasources response was not JSON: {e}"))
    }

    pub async fn datasource_health(&self, datasource_uid: &str) -> Result<Value, String> {
        let url = format!("{}/api/datasources/uid/{datasource_uid}/health", self.base_url);
        let resp = self.authed(self.client.get(&url)).send().await.map_err(|e| format!("grafana datasource health check failed: {e}"))?;
        resp.json::<Value>().await.map_err(|e| format!("grafana datasource health response was not JSON: {e}"))
    }

    pub async fn list_folders(&self) -> Result<Value, String> {
        let url = format!("{}/api/folders", self.base_url);
        let resp = self.authed(self.client.get(&url)).send().await.map_err(|e| format!("grafana folder list failed: {e}"))?;
        resp.json::<Value>().await.map_err(|e| format!("grafana folders response was not JSON: {e}"))
    }

    /// Fetch a community dashboard's JSON model from grafana.com, then
    /// import it via `/api/dashboards/import`.
    pub async fn import_community_dashboard(&self, dashboard_id: u64, datasource_uid: &str) -> Result<Value, String> {
        let community_url = format!("https://grafana.com/api/dashboards/{dashboard_id}/revisions/latest/download");
        let dashboard_json: Value = self
            .client
            .get(&community_url)
            .send()
            .await
            .map_err(|e| format!("failed to fetch community dashboard {dashboard_id}: {e}"))?
            .json()
            .await
            .map_err(|e| format!("community dashboard {dashboard_id} response was not JSON: {e}"))?;

        let import_url = format!("{}/api/dashboards/import", self.base_url);
        let body = serde_json::json!({
            "dashboard": dashboard_json,
            "overwrite": true,
            "inputs": [{
                "name": "DS_PROMETHEUS",
                "type": "datasource",
                "pluginId": "prometheus",
                "value": datasource_uid,
            }],
        });

        let resp = self
            .authed(self.client.post(&import_url).json(&body))
            .send()
            .await
            .map_err(|e| format!("grafana dashboard import failed: {e}"))?;
        resp.json::<Value>().await.map_err(|e| format!("grafana import response was not JSON: {e}"))
    }
}
