//! One search round trip: build the document, run it, normalize the answer.

use common::{search_query::FacetState, search_result::ResultSet};
use tracing::debug;

use crate::api::search::{normalize_results::normalize, search_query_dsl::build_query};
use crate::db_utils::es_utils::SearchBackend;
use crate::error::SearchError;

pub async fn search_for_results<B: SearchBackend>(backend: &B, state: &FacetState) -> Result<ResultSet, SearchError> {
    let query = build_query(state);
    let response = backend.search(&query).await?;
    let result = normalize(response);
    debug!(
        records = result.records.len(),
        total = result.total_found,
        took_ms = result.took_millis,
        "search results normalized"
    );
    Ok(result)
}
