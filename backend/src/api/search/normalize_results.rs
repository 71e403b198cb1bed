//! Flattens backend responses into result sets.

use common::search_result::{AggregationBucket, BucketKey, ResultSet};
use tracing::{debug, warn};

use crate::db_utils::es_utils::{RawBuckets, RawSearchResult};


/// Never fails: whatever is missing or unreadable comes out empty, so the views
/// can still show a zero-result state.
pub fn normalize(raw: serde_json::Value) -> ResultSet {
    match serde_json::from_value::<RawSearchResult>(raw) {
        Ok(response) => normalize_response(response),
        Err(err) => {
            warn!("unreadable search response, showing no results: {}", err);
            ResultSet::default()
        }
    }
}

pub fn normalize_response(response: RawSearchResult) -> ResultSet {
    let mut result = ResultSet::default();

    for hit in response.hits.hits {
        result.ids.push(hit._id.unwrap_or_default());
        result.scores.push(hit._score);
        result.records.push(hit.fields.or(hit._source).unwrap_or_default());
        result.highlights.push(hit.highlight);
    }
    result.total_found = match &response.hits.total {
        Some(total) => total.value(),
        None => result.records.len() as u64,
    };
    result.took_millis = response.took.map(|took| took.max(0.0) as u64).unwrap_or(0);

    for (facet, aggregation) in response.aggregations {
        let Some(buckets) = aggregation.buckets else {
            debug!("aggregation {} has no buckets", facet);
            continue;
        };
        let buckets = match buckets {
            RawBuckets::List(buckets) => buckets
                .into_iter()
                .filter_map(|bucket| {
                    let key = bucket_key(&bucket.key)?;
                    Some(AggregationBucket { key, count: bucket.doc_count })
                })
                .collect::<Vec<_>>(),
            RawBuckets::Keyed(buckets) => buckets
                .into_iter()
                .map(|(key, bucket)| AggregationBucket { key: BucketKey::String(key), count: bucket.doc_count })
                .collect::<Vec<_>>(),
        };
        result.aggregations.insert(facet, buckets);
    }

    result
}

fn bucket_key(key: &serde_json::Value) -> Option<BucketKey> {
    match key {
        serde_json::Value::String(s) => Some(BucketKey::String(s.clone())),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Some(BucketKey::Int(i)),
            None => Some(BucketKey::String(n.to_string())),
        },
        serde_json::Value::Bool(b) => Some(BucketKey::String(b.to_string())),
        _ => {
            debug!("skipping bucket with key {}", key);
            None
        }
    }
}
