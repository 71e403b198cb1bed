use std::collections::BTreeMap;
use std::future::Future;

use common::search_options::SearchOptions;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::SearchError;


/// Raw backend response. Every level defaults so partial payloads still parse.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSearchResult {
    #[serde(deserialize_with = "null_as_default")]
    pub hits: RawSearchResultHits,
    /// Server time in ms; some proxies send it as a float.
    pub took: Option<f64>,
    pub timed_out: Option<bool>,
    #[serde(deserialize_with = "null_as_default")]
    pub aggregations: BTreeMap<String, RawSearchResultAggregation>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSearchResultHits {
    #[serde(deserialize_with = "null_as_default")]
    pub hits: Vec<RawSearchResultHit>,
    pub total: Option<RawTotalHits>,
}

/// `hits.total` is a bare number on old backends and `{value, relation}` on newer ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTotalHits {
    Count(u64),
    Tracked { value: u64, relation: Option<String> },
}

impl RawTotalHits {
    pub fn value(&self) -> u64 {
        match self {
            Self::Count(count) => *count,
            Self::Tracked { value, .. } => *value,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSearchResultHit {
    pub _id: Option<String>,
    pub _score: Option<f64>,
    pub fields: Option<BTreeMap<String, serde_json::Value>>,
    pub _source: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(deserialize_with = "null_as_default")]
    pub highlight: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSearchResultAggregation {
    /// A list for plain aggregations, an object for keyed ones, absent for metric aggregations.
    pub buckets: Option<RawBuckets>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawBuckets {
    List(Vec<RawSearchResultAggregationBucket>),
    Keyed(BTreeMap<String, RawKeyedBucket>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSearchResultAggregationBucket {
    pub key: serde_json::Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub doc_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawKeyedBucket {
    #[serde(default, deserialize_with = "null_as_default")]
    pub doc_count: u64,
}

/// Reads an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}


/// Executes query documents. The session only talks to the backend through this.
pub trait SearchBackend {
    fn search(&self, query: &serde_json::Value) -> impl Future<Output = Result<serde_json::Value, SearchError>> + Send;
}


/// HTTP client for `{es_host}/{fulltext_index}/_search`.
#[derive(Debug, Clone)]
pub struct EsSearchClient {
    http: reqwest::Client,
    search_url: String,
}

impl EsSearchClient {
    pub fn new(search_url: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), search_url: search_url.into() }
    }

    pub fn from_options(options: &SearchOptions) -> Self {
        Self::new(options.search_url())
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }
}

impl SearchBackend for EsSearchClient {
    async fn search(&self, query: &serde_json::Value) -> Result<serde_json::Value, SearchError> {
        let t0 = std::time::Instant::now();
        let response = self.http.post(&self.search_url).json(query).send().await?;
        let status = response.status();
        let response_txt = response.text().await?;
        if status.is_client_error() || status.is_server_error() {
            warn!("search backend error {}: {} bytes", status, response_txt.len());
            return Err(SearchError::Status { status: status.as_u16(), body: response_txt });
        }
        let dt_ms = t0.elapsed().as_millis() as u64;
        debug!(len = response_txt.len(), dt_ms, "search response received");
        let response = serde_json::from_str(&response_txt)?;
        Ok(response)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_hits_both_shapes() {
        let old: RawSearchResultHits = serde_json::from_value(serde_json::json!({"hits": [], "total": 42})).unwrap();
        assert_eq!(old.total.unwrap().value(), 42);
        let new: RawSearchResultHits =
            serde_json::from_value(serde_json::json!({"hits": [], "total": {"value": 7, "relation": "eq"}})).unwrap();
        assert_eq!(new.total.unwrap().value(), 7);
    }

    #[test]
    fn partial_payload_parses() {
        let raw: RawSearchResult = serde_json::from_value(serde_json::json!({"took": 3})).unwrap();
        assert!(raw.hits.hits.is_empty());
        assert!(raw.aggregations.is_empty());
        assert_eq!(raw.took, Some(3.0));
    }

    #[test]
    fn null_containers_read_as_empty() {
        let raw: RawSearchResult = serde_json::from_value(serde_json::json!({
            "hits": { "total": 1, "hits": [ { "_id": "software/1", "highlight": null, "fields": null } ] },
            "aggregations": null
        }))
        .unwrap();
        assert_eq!(raw.hits.hits.len(), 1);
        assert!(raw.hits.hits[0].highlight.is_empty());
        assert!(raw.aggregations.is_empty());

        let raw: RawSearchResult = serde_json::from_value(serde_json::json!({ "hits": null })).unwrap();
        assert!(raw.hits.hits.is_empty());
        let raw: RawSearchResult = serde_json::from_value(serde_json::json!({ "hits": { "hits": null } })).unwrap();
        assert!(raw.hits.hits.is_empty());
    }

    #[test]
    fn client_url_from_options() {
        let options = SearchOptions { es_host: "http://localhost:8050/search/".to_string(), ..SearchOptions::default() };
        assert_eq!(EsSearchClient::from_options(&options).search_url(), "http://localhost:8050/search/software-kb/_search");
    }
}
