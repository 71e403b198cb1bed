//! Knowledge-base entity, relation and mention retrieval.

mod get_entity;
pub use get_entity::{get_entities_by_path, get_entity, get_entity_by_path, get_entity_in_format, get_relation};

mod get_mentions;
pub use get_mentions::{MENTION_RANKER, get_citations, get_mentions};
