//! Query DSL builder for facet states.

use common::search_const::{
    FALLBACK_PAGE_SIZE, HIGHLIGHT_FRAGMENT_SIZE, HIGHLIGHT_NUMBER_OF_FRAGMENTS, HIGHLIGHT_POST_TAG, HIGHLIGHT_PRE_TAG,
    TERMS_AGG_OVERFETCH,
};
use common::search_query::{BooleanRole, FacetConfig, FacetKind, FacetOrder, FacetState, FieldSelector, FilterClause, FreetextClause};
use serde_json::{Map, Value, json};


/// Builds the full backend query document for a facet state. Same state, same document.
pub fn build_query(state: &FacetState) -> Value {
    let page_size = if state.paging.page_size == 0 { FALLBACK_PAGE_SIZE } else { state.paging.page_size };

    let mut document = Map::new();
    document.insert("query".to_string(), build_query_clause(state));
    document.insert("from".to_string(), json!(state.paging.offset));
    document.insert("size".to_string(), json!(page_size));
    document.insert(
        "sort".to_string(),
        json!([{ state.sort.field.as_str(): { "order": state.sort.direction.as_str() } }]),
    );
    document.insert("fields".to_string(), json!(state.returned_fields));
    document.insert("_source".to_string(), json!(false));
    document.insert("track_total_hits".to_string(), json!(true));
    document.insert("aggs".to_string(), build_aggregations(state));
    if let Some(highlight) = build_highlight(state) {
        document.insert("highlight".to_string(), highlight);
    }
    Value::Object(document)
}

/// The `query` part of the document.
///
/// - nothing active: `match_all`
/// - filters only: `bool.must` of the filter clauses
/// - free text only: `bool.{must,should,must_not}` of `query_string` clauses
/// - both: the free-text bool with the filters nested under `bool.filter`
///
/// Filters are a hard constraint in every case. With nested filters a bool query no
/// longer requires any `should` clause to match, so `minimum_should_match` is pinned to 1
/// when free text has `should` clauses and no `must` clause.
pub fn build_query_clause(state: &FacetState) -> Value {
    let filters = build_filter_clauses(state);
    let freetext = state.active_freetext().collect::<Vec<_>>();

    match (filters.is_empty(), freetext.is_empty()) {
        (true, true) => json!({ "match_all": {} }),
        (false, true) => json!({ "bool": { "must": filters } }),
        (true, false) => json!({ "bool": freetext_bool(&freetext) }),
        (false, false) => {
            let mut bool_query = freetext_bool(&freetext);
            let has_must = freetext.iter().any(|clause| clause.role == BooleanRole::Must);
            let has_should = freetext.iter().any(|clause| clause.role == BooleanRole::Should);
            if has_should && !has_must {
                bool_query.insert("minimum_should_match".to_string(), json!(1));
            }
            bool_query.insert("filter".to_string(), json!({ "bool": { "must": filters } }));
            json!({ "bool": bool_query })
        }
    }
}

/// User filters in chip order, then the predefined ones.
pub fn build_filter_clauses(state: &FacetState) -> Vec<Value> {
    let mut clauses = state.filters.iter().map(filter_clause).collect::<Vec<_>>();
    for (field, value) in state.predefined_filters.iter() {
        clauses.push(json!({ "term": { field.as_str(): value.to_json() } }));
    }
    clauses
}

pub fn filter_clause(filter: &FilterClause) -> Value {
    match filter {
        FilterClause::Term { field, value } => json!({ "term": { field.as_str(): value.to_json() } }),
        FilterClause::Range { field, from, to } => json!({ "range": { field.as_str(): { "gte": from, "lte": to } } }),
        FilterClause::DateBucket { field, from_epoch_millis, to_epoch_millis } => {
            json!({ "range": { field.as_str(): { "gte": from_epoch_millis, "lt": to_epoch_millis } } })
        }
    }
}

fn freetext_bool(clauses: &[&FreetextClause]) -> Map<String, Value> {
    let mut bool_query = Map::new();
    for role in [BooleanRole::Should, BooleanRole::Must, BooleanRole::MustNot] {
        let role_clauses = clauses
            .iter()
            .filter(|clause| clause.role == role)
            .map(|clause| query_string_clause(clause))
            .collect::<Vec<_>>();
        bool_query.insert(role.as_str().to_string(), Value::Array(role_clauses));
    }
    bool_query
}

pub fn query_string_clause(clause: &FreetextClause) -> Value {
    let text = clause.text.trim();
    match &clause.field {
        FieldSelector::AllFields => json!({
            "query_string": { "default_field": clause.field.target_field(), "query": text, "default_operator": "AND" }
        }),
        FieldSelector::Field(field) => json!({
            "query_string": { "fields": [field], "query": text, "default_operator": "AND" }
        }),
    }
}

/// One aggregation per configured facet, keyed by facet name.
pub fn build_aggregations(state: &FacetState) -> Value {
    let aggs = state
        .facet_configs
        .iter()
        .map(|(name, config)| (name.clone(), facet_aggregation(config)))
        .collect::<Map<_, _>>();
    Value::Object(aggs)
}

pub fn facet_aggregation(config: &FacetConfig) -> Value {
    match config.kind {
        FacetKind::Date => json!({
            "date_histogram": { "field": config.backing_field, "interval": "year" }
        }),
        _ => json!({
            "terms": {
                "field": config.backing_field,
                "size": config.size_limit.saturating_add(TERMS_AGG_OVERFETCH),
                "order": terms_order(config.order),
            }
        }),
    }
}

fn terms_order(order: FacetOrder) -> Value {
    match order {
        FacetOrder::Count => json!({ "_count": "desc" }),
        FacetOrder::ReverseCount => json!({ "_count": "asc" }),
        FacetOrder::Term => json!({ "_key": "asc" }),
        FacetOrder::ReverseTerm => json!({ "_key": "desc" }),
    }
}

/// Highlight request for every field an active free-text clause searches.
fn build_highlight(state: &FacetState) -> Option<Value> {
    let fields = state
        .active_freetext()
        .map(|clause| {
            (
                clause.field.target_field().to_string(),
                json!({ "fragment_size": HIGHLIGHT_FRAGMENT_SIZE, "number_of_fragments": HIGHLIGHT_NUMBER_OF_FRAGMENTS }),
            )
        })
        .collect::<Map<_, _>>();
    if fields.is_empty() {
        return None;
    }
    Some(json!({
        "fields": fields,
        "order": "score",
        "pre_tags": [HIGHLIGHT_PRE_TAG],
        "post_tags": [HIGHLIGHT_POST_TAG],
        "require_field_match": true,
    }))
}
