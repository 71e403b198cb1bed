//! Entity record lookups.

use common::kb_records::{EntityFormat, EntityRecord, EntityRecordResponse};
use futures::future::join_all;

use crate::db_utils::kb_utils::KbService;

pub async fn get_entity<K: KbService>(client: &K, entity_type: &str, id: &str) -> anyhow::Result<EntityRecord> {
    get_entity_by_path(client, &format!("{}/{}", entity_type, id)).await
}

/// The entity document in `format`. Only [`EntityFormat::Full`] has the shape of an
/// [`EntityRecord`], so the body is returned as is.
pub async fn get_entity_in_format<K: KbService>(
    client: &K,
    entity_type: &str,
    id: &str,
    format: EntityFormat,
) -> anyhow::Result<serde_json::Value> {
    let path = format!("entities/{}/{}", entity_type, id);
    let query = format.query_value().map(|value| vec![("format", value.to_string())]).unwrap_or_default();
    client.get_json(&path, &query).await
}

/// Looks up an entity by its `{type}/{id}` handle, as found in mention and citation records.
pub async fn get_entity_by_path<K: KbService>(client: &K, handle: &str) -> anyhow::Result<EntityRecord> {
    let path = format!("entities/{}", handle.trim_start_matches('/'));
    let response: EntityRecordResponse = serde_json::from_value(client.get_json(&path, &[]).await?)?;
    Ok(response.record)
}

/// Fetches several entities concurrently. Each lookup fails on its own so one
/// missing record never hides the others.
pub async fn get_entities_by_path<K: KbService>(client: &K, handles: &[String]) -> Vec<anyhow::Result<EntityRecord>> {
    join_all(handles.iter().map(|handle| get_entity_by_path(client, handle))).await
}

/// A mention relation (`/relations/{id}`), with its snippet and annotations in `claims`.
pub async fn get_relation<K: KbService>(client: &K, mention_id: &str) -> anyhow::Result<EntityRecord> {
    let path = format!("relations/{}", mention_id.trim_start_matches('/'));
    let response: EntityRecordResponse = serde_json::from_value(client.get_json(&path, &[]).await?)?;
    Ok(response.record)
}
