//! Models shared between the search session, the search client and result views.

extern crate serde;


pub mod search_query;
pub mod search_result;
pub mod search_options;
pub mod text_highlight;
pub mod search_const;
pub mod kb_records;
pub mod state_link;
