//! Wikipedia page thumbnails for entity cards.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

const WIKIMEDIA_ENDPOINT: &str =
    "https://{lang}.wikipedia.org/w/api.php?action=query&prop=pageimages&format=json&pithumbsize=200&pageids=";


/// Thumbnail lookups memoized by language and page id. Only found images are
/// remembered; a page without a thumbnail is asked again next time.
#[derive(Debug)]
pub struct WikimediaImageLookup {
    http: reqwest::Client,
    endpoint: String,
    cache: RwLock<HashMap<(String, String), String>>,
}

impl Default for WikimediaImageLookup {
    fn default() -> Self {
        Self::with_endpoint(WIKIMEDIA_ENDPOINT)
    }
}

impl WikimediaImageLookup {
    /// `endpoint` may contain a `{lang}` placeholder; the page id is appended.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), endpoint: endpoint.into(), cache: RwLock::new(HashMap::new()) }
    }

    pub fn page_url(&self, page_id: &str, lang: &str) -> String {
        format!("{}{}", self.endpoint.replace("{lang}", lang_or_default(lang)), page_id)
    }

    pub async fn cached(&self, page_id: &str, lang: &str) -> Option<String> {
        let key = (lang_or_default(lang).to_string(), page_id.to_string());
        self.cache.read().await.get(&key).cloned()
    }

    pub async fn lookup(&self, page_id: &str, lang: &str) -> anyhow::Result<Option<String>> {
        if let Some(url) = self.cached(page_id, lang).await {
            return Ok(Some(url));
        }
        let response = self
            .http
            .get(self.page_url(page_id, lang))
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;
        let thumbnail = extract_thumbnail(&response, page_id);
        match &thumbnail {
            Some(url) => {
                self.remember(page_id, lang, url.clone()).await;
            }
            None => debug!("no thumbnail for {}:{}", lang, page_id),
        }
        Ok(thumbnail)
    }

    async fn remember(&self, page_id: &str, lang: &str, url: String) {
        let key = (lang_or_default(lang).to_string(), page_id.to_string());
        self.cache.write().await.insert(key, url);
    }
}

fn lang_or_default(lang: &str) -> &str {
    if lang.is_empty() { "en" } else { lang }
}

/// `query.pages[page_id].thumbnail.source`, when present.
pub fn extract_thumbnail(response: &serde_json::Value, page_id: &str) -> Option<String> {
    response
        .get("query")?
        .get("pages")?
        .get(page_id)?
        .get("thumbnail")?
        .get("source")?
        .as_str()
        .map(|s| s.to_string())
}
