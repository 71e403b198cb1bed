//! Shared search state models and helpers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::search_const::{ALL_FIELDS, DEFAULT_PAGE_SIZE, DEFAULT_SORT_FIELD, RETURNED_FIELDS, YEAR_MILLIS};
use crate::search_result::BucketKey;


/// Everything that decides which query is sent for the current search page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetState {
    /// Active user filters, in the order their chips are displayed.
    pub filters: Vec<FilterClause>,
    /// Term filters applied to every search and never shown as chips.
    pub predefined_filters: BTreeMap<String, BucketKey>,
    pub freetext_clauses: Vec<FreetextClause>,
    pub sort: SortClause,
    pub paging: Paging,
    pub facet_configs: BTreeMap<String, FacetConfig>,
    pub returned_fields: Vec<String>,
}

impl Default for FacetState {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            predefined_filters: BTreeMap::new(),
            freetext_clauses: Vec::new(),
            sort: SortClause::default(),
            paging: Paging::default(),
            facet_configs: BTreeMap::new(),
            returned_fields: RETURNED_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl FacetState {
    pub fn active_freetext(&self) -> impl Iterator<Item = &FreetextClause> {
        self.freetext_clauses.iter().filter(|clause| clause.is_active())
    }

    pub fn has_active_freetext(&self) -> bool {
        self.active_freetext().next().is_some()
    }

    /// True when any user or predefined filter constrains the result set.
    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty() || !self.predefined_filters.is_empty()
    }

    pub fn contains_filter(&self, clause: &FilterClause) -> bool {
        self.filters.iter().any(|existing| existing == clause)
    }
}


/// A filter chip. The kind is fixed when the filter is created, so date handling
/// never depends on how the backing field is named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterClause {
    /// Exact match of `field = value`.
    Term { field: String, value: BucketKey },
    /// Inclusive range on both ends.
    Range { field: String, from: i64, to: i64 },
    /// One date-histogram bucket, `[from, to)` in epoch millis.
    DateBucket { field: String, from_epoch_millis: i64, to_epoch_millis: i64 },
}

impl FilterClause {
    pub fn term(field: impl Into<String>, value: impl Into<BucketKey>) -> Self {
        Self::Term { field: field.into(), value: value.into() }
    }

    pub fn range(field: impl Into<String>, from: i64, to: i64) -> Self {
        Self::Range { field: field.into(), from, to }
    }

    /// Expands a histogram tick into the one-year window starting at it.
    pub fn date_bucket(field: impl Into<String>, tick_epoch_millis: i64) -> Self {
        Self::DateBucket {
            field: field.into(),
            from_epoch_millis: tick_epoch_millis,
            to_epoch_millis: tick_epoch_millis.saturating_add(YEAR_MILLIS),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Self::Term { field, .. } | Self::Range { field, .. } | Self::DateBucket { field, .. } => field,
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreetextClause {
    pub field: FieldSelector,
    pub role: BooleanRole,
    pub text: String,
}

impl FreetextClause {
    pub fn new(field: FieldSelector, role: BooleanRole, text: impl Into<String>) -> Self {
        Self { field, role, text: text.into() }
    }

    /// Blank clauses contribute nothing to the query.
    pub fn is_active(&self) -> bool {
        !self.text.trim().is_empty()
    }
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSelector {
    AllFields,
    Field(String),
}

impl FieldSelector {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Maps the labels of the search-bar field picker to index fields.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "all fields" | "" => Self::AllFields,
            "software" => Self::field("labels"),
            "mentions" => Self::field("contexts"),
            other => Self::field(other),
        }
    }

    /// The index field a highlight is requested for.
    pub fn target_field(&self) -> &str {
        match self {
            Self::AllFields => ALL_FIELDS,
            Self::Field(name) => name,
        }
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanRole {
    Must,
    Should,
    MustNot,
}

impl BooleanRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Must => "must",
            Self::Should => "should",
            Self::MustNot => "must_not",
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortClause {
    pub field: String,
    pub direction: SortDirection,
}

impl SortClause {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self { field: field.into(), direction }
    }
}

impl Default for SortClause {
    fn default() -> Self {
        Self::new(DEFAULT_SORT_FIELD, SortDirection::Desc)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub offset: u64,
    pub page_size: u64,
}

impl Default for Paging {
    fn default() -> Self {
        Self { offset: 0, page_size: DEFAULT_PAGE_SIZE }
    }
}


/// Display and aggregation settings of one facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetConfig {
    pub backing_field: String,
    pub display_name: String,
    /// Number of buckets shown to the user.
    pub size_limit: u64,
    pub kind: FacetKind,
    #[serde(default)]
    pub view_mode: ViewMode,
    #[serde(default)]
    pub order: FacetOrder,
}

impl FacetConfig {
    pub fn new(backing_field: impl Into<String>, display_name: impl Into<String>, size_limit: u64, kind: FacetKind) -> Self {
        Self {
            backing_field: backing_field.into(),
            display_name: display_name.into(),
            size_limit,
            kind,
            view_mode: ViewMode::default(),
            order: FacetOrder::default(),
        }
    }

    pub fn with_view_mode(mut self, view_mode: ViewMode) -> Self {
        self.view_mode = view_mode;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKind {
    Date,
    Class,
    Entity,
    Taxonomy,
    Cloud,
    Country,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Hidden,
    Graphic,
    Textual,
    All,
}

/// Bucket ordering requested from the terms aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetOrder {
    #[default]
    Count,
    Term,
    ReverseCount,
    ReverseTerm,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_bucket_spans_one_year() {
        let clause = FilterClause::date_bucket("date", 1_577_836_800_000);
        assert_eq!(
            clause,
            FilterClause::DateBucket {
                field: "date".to_string(),
                from_epoch_millis: 1_577_836_800_000,
                to_epoch_millis: 1_577_836_800_000 + 31_536_000_000,
            }
        );
    }

    #[test]
    fn filter_equality_is_by_field_and_value() {
        assert_eq!(FilterClause::term("licenses", "MIT"), FilterClause::term("licenses", "MIT"));
        assert_ne!(FilterClause::term("licenses", "MIT"), FilterClause::term("licenses", "BSD"));
        assert_ne!(FilterClause::term("licenses", "MIT"), FilterClause::term("collection", "MIT"));
    }

    #[test]
    fn blank_freetext_is_inactive() {
        let mut state = FacetState::default();
        state.freetext_clauses.push(FreetextClause::new(FieldSelector::AllFields, BooleanRole::Must, "   "));
        assert!(!state.has_active_freetext());
        state.freetext_clauses.push(FreetextClause::new(FieldSelector::AllFields, BooleanRole::Should, "numpy"));
        assert!(state.has_active_freetext());
        assert_eq!(state.active_freetext().count(), 1);
    }

    #[test]
    fn field_picker_labels() {
        assert_eq!(FieldSelector::from_label("all fields"), FieldSelector::AllFields);
        assert_eq!(FieldSelector::from_label("software"), FieldSelector::field("labels"));
        assert_eq!(FieldSelector::from_label("mentions"), FieldSelector::field("contexts"));
        assert_eq!(FieldSelector::from_label(" licenses "), FieldSelector::field("licenses"));
        assert_eq!(FieldSelector::AllFields.target_field(), "all");
    }

    #[test]
    fn filter_clause_json_is_tagged_by_kind() {
        let json = serde_json::to_value(FilterClause::range("number_mentions", 10, 100)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "range", "field": "number_mentions", "from": 10, "to": 100}));
    }
}
