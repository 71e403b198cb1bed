//! Constants shared by the query builder, the store and the result views.

/// Page size used when the configured one is missing or zero.
pub const FALLBACK_PAGE_SIZE: u64 = 10;

/// Page size of a fresh search session.
pub const DEFAULT_PAGE_SIZE: u64 = 12;

/// Field used for the default sort order.
pub const DEFAULT_SORT_FIELD: &str = "number_mentions";

/// Width of a date-histogram bucket filter: 365 days in milliseconds.
pub const YEAR_MILLIS: i64 = 365 * 24 * 60 * 60 * 1000;

/// Extra buckets requested on top of a facet's display size.
/// Distributed term aggregations undercount the tail when asked for exactly N.
pub const TERMS_AGG_OVERFETCH: u64 = 50;

pub const HIGHLIGHT_FRAGMENT_SIZE: u64 = 130;
pub const HIGHLIGHT_NUMBER_OF_FRAGMENTS: u64 = 3;
pub const HIGHLIGHT_PRE_TAG: &str = "<strong>";
pub const HIGHLIGHT_POST_TAG: &str = "</strong>";

/// Snippets longer than this are cut around their first highlight.
pub const MAX_SNIPPET_CHARS: usize = 200;

/// Field name the backend uses for the catch-all text field.
pub const ALL_FIELDS: &str = "all";

/// Record fields requested from the search backend.
pub const RETURNED_FIELDS: &[&str] = &[
    "_id",
    "labels",
    "authors",
    "licenses",
    "collection",
    "programming_language_class",
    "organizations",
    "date",
    "number_mentions",
    "number_documents",
    "number_software",
    "descriptions",
    "summary",
];

/// Snippets shown per result.
pub const MAX_DISPLAYED_SNIPPETS: usize = 3;

/// Characters kept from the first highlight when a snippet is too long.
pub const SNIPPET_CUT_CHARS: usize = 100;
