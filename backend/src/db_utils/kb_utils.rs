use std::future::Future;

use common::search_options::SearchOptions;
use tracing::debug;


/// Read access to the knowledge-base REST service. The KB lookups only talk to it
/// through this.
pub trait KbService {
    /// GETs `path` (relative to the service root) and returns the decoded JSON body.
    fn get_json(&self, path: &str, query: &[(&str, String)]) -> impl Future<Output = anyhow::Result<serde_json::Value>> + Send;
}


/// REST client for the knowledge-base service (`kb_service_host`).
#[derive(Debug, Clone)]
pub struct KbServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl KbServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self { http: reqwest::Client::new(), base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn from_options(options: &SearchOptions) -> Self {
        Self::new(options.kb_service_host.clone())
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl KbService for KbServiceClient {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<serde_json::Value> {
        let url = self.url(path);
        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        let response_txt = response.text().await?;
        if status.is_client_error() || status.is_server_error() {
            anyhow::bail!("Error: {}: {}", status, response_txt);
        }
        debug!(url = %url, len = response_txt.len(), "kb service response");
        Ok(serde_json::from_str(&response_txt)?)
    }
}
