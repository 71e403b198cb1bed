//! Response shapes of the knowledge-base REST service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};


/// `GET /entities/{type}/{id}` and `GET /relations/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecordResponse {
    pub record: EntityRecord,
}

/// An entity record. Only the identifier is required; everything else is optional
/// and views skip what is missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub labels: Option<String>,
    pub descriptions: Option<String>,
    pub summary: Option<String>,
    /// Wikidata-style claims keyed by property id.
    pub claims: BTreeMap<String, serde_json::Value>,
    pub metadata: Option<EntityMetadata>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityMetadata {
    pub title: Option<String>,
    pub author: Option<Vec<serde_json::Value>>,
    pub year: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}


/// `GET /entities/{type}/{id}/mentions?page_rank=..&page_size=..`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionPage {
    #[serde(default)]
    pub records: Vec<serde_json::Value>,
    #[serde(default)]
    pub full_count: u64,
    #[serde(default)]
    pub page_rank: u64,
    #[serde(default)]
    pub page_size: u64,
}

impl MentionPage {
    /// Offset of the first record of this page within `full_count`.
    pub fn first_record_offset(&self) -> u64 {
        self.page_rank.saturating_mul(self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.first_record_offset().saturating_add(self.page_size) < self.full_count
    }
}


/// Serialization requested from `/entities/{type}/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityFormat {
    /// The KB's own Wikidata-like record.
    #[default]
    Full,
    /// Claims flattened to plain values.
    Simple,
    Codemeta,
}

impl EntityFormat {
    /// Value of the `format` query parameter; the full record takes none.
    pub fn query_value(&self) -> Option<&'static str> {
        match self {
            Self::Full => None,
            Self::Simple => Some("simple"),
            Self::Codemeta => Some("codemeta"),
        }
    }
}


/// `GET /entities/software/{id}/citeas?n_best=..`: the documents most often cited
/// together with the software's mentions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CitationPage {
    pub records: Vec<CitedDocument>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CitedDocument {
    /// `{type}/{id}` handle of the cited document.
    pub document: String,
    /// Number of mentions citing it.
    pub size: u64,
}

impl CitationPage {
    /// Cited documents with at least one citing mention, best first as returned.
    pub fn cited(&self) -> impl Iterator<Item = &CitedDocument> {
        self.records.iter().filter(|record| record.size > 0)
    }
}
