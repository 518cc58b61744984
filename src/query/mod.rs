//! Document collections backed by SQLite
//!
//! Each row stores the JSON document in `doc`; a few fields are copied into
//! their own columns at write time so they can be filtered and sorted on.

pub mod checkout;
pub mod service;

use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::prelude::FromRow;

pub use checkout::{delete_checkout, find_checkouts, insert_checkout, set_checkout_updated};
pub use service::{ServiceFilter, SortOrder, find_service_by_id, find_services, insert_service};

pub type Document = Map<String, Value>;

/// Key the row id is exposed under in returned documents
pub const ID_FIELD: &str = "_id";

#[derive(Debug, FromRow)]
pub(crate) struct DocumentRow {
    pub id: String,
    pub doc: String,
}

impl DocumentRow {
    pub(crate) fn into_document(self) -> anyhow::Result<Document> {
        let mut doc: Document = serde_json::from_str(&self.doc)?;
        doc.insert(ID_FIELD.to_owned(), Value::String(self.id));

        Ok(doc)
    }
}

/// Drop any client supplied id; ids are always generated server side
pub(crate) fn without_id(mut doc: Document) -> Document {
    doc.remove(ID_FIELD);
    doc
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}
