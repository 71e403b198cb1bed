use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::text_highlight::HighlightTextSpan;


/// One search response, flattened into the shape the result views consume.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultSet {
    /// Field maps of the hits, in backend ranking order.
    pub records: Vec<BTreeMap<String, serde_json::Value>>,
    /// Parallel to `records`: field name to highlighted snippets.
    pub highlights: Vec<BTreeMap<String, Vec<String>>>,
    /// Parallel to `records`.
    pub ids: Vec<String>,
    /// Parallel to `records`; `None` when the backend sorted without scoring.
    pub scores: Vec<Option<f64>>,
    pub total_found: u64,
    pub took_millis: u64,
    /// Facet name to buckets, in the order the backend returned them.
    pub aggregations: BTreeMap<String, Vec<AggregationBucket>>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first `limit` buckets of a facet; unknown facets have none.
    pub fn top_buckets(&self, facet: &str, limit: u64) -> &[AggregationBucket] {
        match self.aggregations.get(facet) {
            Some(buckets) => &buckets[..buckets.len().min(limit as usize)],
            None => &[],
        }
    }

    pub fn bucket_count(&self, facet: &str, key: &BucketKey) -> Option<u64> {
        self.aggregations
            .get(facet)?
            .iter()
            .find(|bucket| &bucket.key == key)
            .map(|bucket| bucket.count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationBucket {
    pub key: BucketKey,
    pub count: u64,
}

/// Value of a bucket key or term filter. Date histogram keys are epoch millis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialOrd, Ord, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum BucketKey {
    Int(i64),
    String(String),
}

impl BucketKey {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Int(i) => serde_json::Value::from(*i),
            Self::String(s) => serde_json::Value::from(s.as_str()),
        }
    }
}

impl std::fmt::Display for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for BucketKey {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for BucketKey {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for BucketKey {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}


/// A highlight snippet split into plain and highlighted spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnippetSpans {
    pub field: String,
    pub spans: Vec<HighlightTextSpan>,
}


/// Position of the current page within the result set, for pager controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    /// 1-based index of the first record on the page; 0 when nothing was found.
    pub from: u64,
    /// 1-based index of the last record on the page.
    pub to: u64,
    pub total: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageWindow {
    pub fn new(offset: u64, page_size: u64, total: u64) -> Self {
        let to = offset.saturating_add(page_size).min(total);
        Self {
            from: if total == 0 { 0 } else { offset.saturating_add(1).min(total) },
            to,
            total,
            has_previous: offset > 0,
            has_next: offset.saturating_add(page_size) < total,
        }
    }
}
