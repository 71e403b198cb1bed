//! Search page configuration and the initial facet state derived from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::search_const::{DEFAULT_PAGE_SIZE, FALLBACK_PAGE_SIZE};
use crate::search_query::{FacetConfig, FacetKind, FacetOrder, FacetState, Paging, ViewMode};
use crate::search_result::BucketKey;


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Base URL of the search proxy; queries go to `{es_host}/{fulltext_index}/_search`.
    pub es_host: String,
    pub kb_service_host: String,
    pub fulltext_index: String,
    pub paging: PagingOptions,
    pub aggs: Vec<FacetOption>,
    pub predefined_filters: BTreeMap<String, BucketKey>,
    pub snippet_style: SnippetStyle,
    /// Run free-text searches after `freetext_submit_delay` ms of inactivity
    /// instead of waiting for an explicit submit.
    pub use_delay: bool,
    /// Milliseconds; older configs write it as a string.
    #[serde(deserialize_with = "number_or_string")]
    pub freetext_submit_delay: u64,
    pub display_images: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            es_host: "http://0.0.0.0:8050/search".to_string(),
            kb_service_host: "http://0.0.0.0:8050".to_string(),
            fulltext_index: "software-kb".to_string(),
            paging: PagingOptions::default(),
            aggs: Vec::new(),
            predefined_filters: BTreeMap::new(),
            snippet_style: SnippetStyle::default(),
            use_delay: false,
            freetext_submit_delay: 400,
            display_images: true,
        }
    }
}

impl SearchOptions {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// `ES_HOST` and `KB_SERVICE_HOST` take precedence over configured hosts.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(es_host) = std::env::var("ES_HOST") {
            self.es_host = es_host;
        }
        if let Ok(kb_service_host) = std::env::var("KB_SERVICE_HOST") {
            self.kb_service_host = kb_service_host;
        }
        self
    }

    pub fn search_url(&self) -> String {
        format!("{}/{}/_search", self.es_host.trim_end_matches('/'), self.fulltext_index)
    }

    /// Facet configs keyed by facet (aggregation) name.
    pub fn facet_configs(&self) -> BTreeMap<String, FacetConfig> {
        self.aggs.iter().map(|facet| (facet.display.clone(), facet.to_config())).collect()
    }

    /// State of a freshly opened search page.
    pub fn initial_state(&self) -> FacetState {
        FacetState {
            predefined_filters: self.predefined_filters.clone(),
            paging: Paging {
                offset: self.paging.from,
                page_size: if self.paging.size == 0 { FALLBACK_PAGE_SIZE } else { self.paging.size },
            },
            facet_configs: self.facet_configs(),
            ..FacetState::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingOptions {
    pub from: u64,
    pub size: u64,
}

impl Default for PagingOptions {
    fn default() -> Self {
        Self { from: 0, size: DEFAULT_PAGE_SIZE }
    }
}

/// One entry of the `aggs` option list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetOption {
    pub field: String,
    pub display: String,
    #[serde(default = "default_facet_size")]
    pub size: u64,
    #[serde(rename = "type", default = "default_facet_kind")]
    pub kind: FacetKind,
    #[serde(default)]
    pub view: ViewMode,
    #[serde(default)]
    pub order: FacetOrder,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(number) => Ok(number),
        NumberOrString::String(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn default_facet_size() -> u64 {
    6
}

fn default_facet_kind() -> FacetKind {
    FacetKind::Plain
}

impl FacetOption {
    pub fn to_config(&self) -> FacetConfig {
        FacetConfig {
            backing_field: self.field.clone(),
            display_name: self.display.clone(),
            size_limit: self.size,
            kind: self.kind,
            view_mode: self.view,
            order: self.order,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnippetStyle {
    /// At least one snippet per matched term first, then the rest.
    #[default]
    Andlauer,
    /// Backend order.
    Default,
}
