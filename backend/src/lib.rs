//! Search core of the software-mentions knowledge base: query construction,
//! response normalization, facet state and the session loop tying them together.

pub mod api;
pub mod db_utils;
pub mod error;
pub mod session;
pub mod tracing_setup;

pub use error::SearchError;
