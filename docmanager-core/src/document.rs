//! Stored documents, their authors, and the drafts callers hand to `save`.
//!
//! A [`Document`] is a record owned by the store: its `id` is generated by the
//! store and its `created` timestamp is stamped once, at insertion. Callers never
//! build a `Document` directly; they build a [`DocumentDraft`] and pass it to
//! [`DocumentStore::save`](crate::store::DocumentStore::save).

use bson::{Bson, DateTime, Uuid, de::deserialize_from_bson, ser::serialize_to_bson};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, from_value, to_value};

use crate::error::DocumentStoreResult;

/// The person a document is attributed to.
///
/// Authors are compared by value: two authors with the same `id` but different
/// names are different authors as far as `save` is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Identifier of the author. Uniqueness is up to the caller.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Author {
    /// Creates a new author.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A document as held by the store.
///
/// # Example
///
/// ```ignore
/// use docmanager::prelude::*;
///
/// let saved = store
///     .save(DocumentDraft::new("Intro", "Hello", Author::new("u1", "Ada")))
///     .await?;
///
/// assert_eq!(store.find_by_id(saved.id).await?, Some(saved));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Store-generated identifier.
    pub id: Uuid,
    /// Title of the document. Searched by prefix.
    pub title: String,
    /// Body of the document. Searched by substring.
    pub content: String,
    /// Author the document is attributed to.
    pub author: Author,
    /// Creation time, stamped once when the document is first saved.
    pub created: DateTime,
}

impl Document {
    /// Returns the creation time as a `chrono` timestamp.
    pub fn created_at(&self) -> chrono::DateTime<Utc> {
        self.created.to_chrono()
    }

    /// Converts this document to a BSON value for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_bson(&self) -> DocumentStoreResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    /// Creates a document from a BSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    pub fn from_bson(bson: Bson) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }

    /// Converts this document to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> DocumentStoreResult<Value> {
        Ok(to_value(self)?)
    }

    /// Creates a document from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    pub fn from_json(value: Value) -> DocumentStoreResult<Self> {
        Ok(from_value(value)?)
    }
}

/// The caller-supplied half of a document.
///
/// Without an `id` a draft describes a new document. With an `id` it describes
/// the desired content of an already stored document; saving it replaces the
/// fields that differ and keeps the stored `created` timestamp.
///
/// # Example
///
/// ```ignore
/// use docmanager::document::{Author, DocumentDraft};
///
/// let draft = DocumentDraft::new("Intro", "Hello", Author::new("u1", "Ada"));
///
/// // Re-title an existing document
/// let mut edit = DocumentDraft::from(saved);
/// edit.title = "Introduction".to_string();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDraft {
    /// Identifier of the stored document to update, or `None` to create one.
    pub id: Option<Uuid>,
    /// Desired title.
    pub title: String,
    /// Desired content.
    pub content: String,
    /// Desired author, compared as a whole value on update.
    pub author: Author,
}

impl DocumentDraft {
    /// Creates a draft for a new document.
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: Author) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            author,
        }
    }

    /// Targets the stored document with the given identifier.
    pub fn with_id(mut self, id: impl Into<Uuid>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Replaces the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Replaces the content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Replaces the author.
    pub fn with_author(mut self, author: Author) -> Self {
        self.author = author;
        self
    }
}

impl From<Document> for DocumentDraft {
    fn from(document: Document) -> Self {
        Self {
            id: Some(document.id),
            title: document.title,
            content: document.content,
            author: document.author,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document {
            id: Uuid::new(),
            title: "Intro".to_string(),
            content: "Hello there".to_string(),
            author: Author::new("u1", "Ada"),
            created: DateTime::from_millis(1_700_000_000_000),
        }
    }

    #[test]
    fn bson_form_nests_the_author() {
        let bson = sample().to_bson().unwrap();
        let doc = bson.as_document().unwrap();

        assert_eq!(doc.get_str("title").unwrap(), "Intro");
        assert_eq!(
            doc.get_document("author").unwrap().get_str("id").unwrap(),
            "u1"
        );
        assert_eq!(
            doc.get_datetime("created").unwrap(),
            &DateTime::from_millis(1_700_000_000_000)
        );
    }

    #[test]
    fn bson_conversion_preserves_every_field() {
        let document = sample();
        let restored = Document::from_bson(document.to_bson().unwrap()).unwrap();

        assert_eq!(restored, document);
    }

    #[test]
    fn from_bson_rejects_records_without_content() {
        let bson = Bson::Document(bson::doc! {
            "id": Uuid::new(),
            "title": "Intro",
            "author": { "id": "u1", "name": "Ada" },
            "created": DateTime::now(),
        });

        assert!(Document::from_bson(bson).is_err());
    }

    #[test]
    fn json_form_carries_title_and_author() {
        let json = sample().to_json().unwrap();

        assert_eq!(json["title"], "Intro");
        assert_eq!(json["author"]["name"], "Ada");
    }

    #[test]
    fn draft_from_document_keeps_id_and_drops_created() {
        let document = sample();
        let draft = DocumentDraft::from(document.clone());

        assert_eq!(draft.id, Some(document.id));
        assert_eq!(draft.title, document.title);
        assert_eq!(draft.author, document.author);
    }

    #[test]
    fn created_at_matches_the_stored_millis() {
        let document = sample();

        assert_eq!(document.created_at().timestamp_millis(), 1_700_000_000_000);
    }
}
