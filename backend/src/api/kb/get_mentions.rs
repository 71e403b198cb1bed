//! Paged mention listing of an entity, and the documents its mentions cite.

use common::kb_records::{CitationPage, MentionPage};

use crate::db_utils::kb_utils::KbService;

/// Mentions grouped by citing document.
pub const MENTION_RANKER: &str = "group_by_document";

pub async fn get_mentions<K: KbService>(
    client: &K,
    entity_type: &str,
    id: &str,
    page_rank: u64,
    page_size: u64,
) -> anyhow::Result<MentionPage> {
    let path = format!("entities/{}/{}/mentions", entity_type, id);
    let query = mention_page_query(page_rank, page_size);
    Ok(serde_json::from_value(client.get_json(&path, &query).await?)?)
}

/// The `n_best` documents most often cited together with a software's mentions.
pub async fn get_citations<K: KbService>(client: &K, software_id: &str, n_best: u64) -> anyhow::Result<CitationPage> {
    let path = format!("entities/software/{}/citeas", software_id);
    let query = [("n_best", n_best.max(1).to_string())];
    Ok(serde_json::from_value(client.get_json(&path, &query).await?)?)
}

fn mention_page_query(page_rank: u64, page_size: u64) -> Vec<(&'static str, String)> {
    vec![
        ("page_rank", page_rank.to_string()),
        ("page_size", page_size.max(1).to_string()),
        ("ranker", MENTION_RANKER.to_string()),
    ]
}
