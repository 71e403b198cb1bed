//! Search query construction, execution and response shaping.

mod search_for_results;
pub use search_for_results::search_for_results;

mod normalize_results;
pub use normalize_results::{normalize, normalize_response};

pub mod search_query_dsl;
pub use search_query_dsl::build_query;

pub mod snippets;
