use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use common::kb_records::EntityFormat;
use kbsearch_backend::api::kb::{
    get_citations, get_entities_by_path, get_entity, get_entity_by_path, get_entity_in_format, get_mentions, get_relation,
};
use kbsearch_backend::db_utils::kb_utils::KbService;
use serde_json::{Value, json};


/// Serves canned bodies by path and records every request with its query string.
#[derive(Clone, Default)]
struct FakeKb {
    bodies: Arc<HashMap<String, Value>>,
    requests: Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>,
}

impl FakeKb {
    fn serving(bodies: Vec<(&str, Value)>) -> Self {
        let bodies = bodies.into_iter().map(|(path, body)| (path.to_string(), body)).collect();
        Self { bodies: Arc::new(bodies), ..Self::default() }
    }

    fn requests(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.requests.lock().unwrap().clone()
    }
}

impl KbService for FakeKb {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<Value> {
        let query: Vec<(String, String)> = query.iter().map(|(key, value)| (key.to_string(), value.clone())).collect();
        self.requests.lock().unwrap().push((path.to_string(), query));
        match self.bodies.get(path) {
            Some(body) => Ok(body.clone()),
            None => anyhow::bail!("Error: 404 Not Found: {}", path),
        }
    }
}

fn pandas_record() -> Value {
    json!({ "record": { "_id": "software/42", "labels": "pandas", "descriptions": "Python data analysis library" } })
}


#[tokio::test]
async fn entity_by_type_and_id() {
    let kb = FakeKb::serving(vec![("entities/software/42", pandas_record())]);
    let record = get_entity(&kb, "software", "42").await.unwrap();
    assert_eq!(record.id, "software/42");
    assert_eq!(record.labels.as_deref(), Some("pandas"));
    assert_eq!(kb.requests(), vec![("entities/software/42".to_string(), Vec::<(String, String)>::new())]);
}

#[tokio::test]
async fn entity_by_handle_tolerates_a_leading_slash() {
    let kb = FakeKb::serving(vec![("entities/software/42", pandas_record())]);
    let record = get_entity_by_path(&kb, "/software/42").await.unwrap();
    assert_eq!(record.descriptions.as_deref(), Some("Python data analysis library"));
}

#[tokio::test]
async fn batch_lookup_isolates_failures() {
    let kb = FakeKb::serving(vec![
        ("entities/software/42", pandas_record()),
        ("entities/documents/7", json!({ "record": { "_id": "documents/7", "metadata": { "title": "A study" } } })),
        ("entities/software/broken", json!({ "unexpected": true })),
    ]);
    let handles = ["software/42", "software/missing", "documents/7", "software/broken"].map(String::from);
    let records = get_entities_by_path(&kb, &handles).await;

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].as_ref().unwrap().id, "software/42");
    assert!(records[1].as_ref().unwrap_err().to_string().contains("404"));
    assert_eq!(records[2].as_ref().unwrap().metadata.as_ref().unwrap().title.as_deref(), Some("A study"));
    assert!(records[3].is_err());
}

#[tokio::test]
async fn entity_formats_set_the_query_parameter() {
    let kb = FakeKb::serving(vec![("entities/software/42", json!({ "name": "pandas", "@type": "SoftwareSourceCode" }))]);
    let codemeta = get_entity_in_format(&kb, "software", "42", EntityFormat::Codemeta).await.unwrap();
    assert_eq!(codemeta["@type"], json!("SoftwareSourceCode"));
    get_entity_in_format(&kb, "software", "42", EntityFormat::Simple).await.unwrap();
    get_entity_in_format(&kb, "software", "42", EntityFormat::Full).await.unwrap();

    let queries = kb.requests().into_iter().map(|(_, query)| query).collect::<Vec<_>>();
    assert_eq!(queries[0], vec![("format".to_string(), "codemeta".to_string())]);
    assert_eq!(queries[1], vec![("format".to_string(), "simple".to_string())]);
    assert!(queries[2].is_empty());
}

#[tokio::test]
async fn relation_record_of_a_mention() {
    let kb = FakeKb::serving(vec![(
        "relations/m-17",
        json!({ "record": { "_id": "m-17", "claims": { "P7081": [ { "value": "we used pandas" } ] } } }),
    )]);
    let relation = get_relation(&kb, "m-17").await.unwrap();
    assert_eq!(relation.claims["P7081"][0]["value"], json!("we used pandas"));
}

#[tokio::test]
async fn mention_page_request_and_payload() {
    let kb = FakeKb::serving(vec![(
        "entities/software/42/mentions",
        json!({ "records": ["m-1", "m-2"], "full_count": 12, "page_rank": 1, "page_size": 2 }),
    )]);
    let page = get_mentions(&kb, "software", "42", 1, 2).await.unwrap();
    assert_eq!(page.records, vec![json!("m-1"), json!("m-2")]);
    assert_eq!(page.first_record_offset(), 2);
    assert!(page.has_next());

    let (path, query) = kb.requests().remove(0);
    assert_eq!(path, "entities/software/42/mentions");
    assert_eq!(
        query,
        vec![
            ("page_rank".to_string(), "1".to_string()),
            ("page_size".to_string(), "2".to_string()),
            ("ranker".to_string(), "group_by_document".to_string()),
        ]
    );
}

#[tokio::test]
async fn missing_mentions_endpoint_is_an_error() {
    let kb = FakeKb::default();
    assert!(get_mentions(&kb, "software", "42", 0, 10).await.is_err());
}

#[tokio::test]
async fn citations_of_a_software() {
    let kb = FakeKb::serving(vec![(
        "entities/software/42/citeas",
        json!({ "records": [ { "document": "documents/3", "size": 9 }, { "document": "documents/8", "size": 0 } ] }),
    )]);
    let citations = get_citations(&kb, "42", 5).await.unwrap();
    let cited = citations.cited().map(|record| record.document.clone()).collect::<Vec<_>>();
    assert_eq!(cited, vec!["documents/3"]);
    assert_eq!(kb.requests()[0].1, vec![("n_best".to_string(), "5".to_string())]);
}
