mod store;

pub(crate) use store::{FailingStore, FailurePoint, RecordingStore, StoreCall};

use crate::document::Document;

/// Type namespace shared by the engine fixtures.
pub(crate) const PERSON: &str = "Person";

/// Build a typed person document.
pub(crate) fn person(id: &str, age: i64, city: &str) -> Document {
    Document::new(id)
        .with_type(PERSON)
        .with("age", age)
        .with("city", city)
}

/// The three-person fixture used by the query tests.
pub(crate) fn people() -> Vec<Document> {
    vec![
        person("1", 30, "NY"),
        person("2", 30, "LA"),
        person("3", 25, "NY"),
    ]
}

/// Sorted ids of a query result.
pub(crate) fn ids(documents: &[Document]) -> Vec<String> {
    let mut ids: Vec<String> = documents
        .iter()
        .filter_map(|document| document.id().map(str::to_string))
        .collect();
    ids.sort();

    ids
}
