//! In-memory storage implementation.
//!
//! Documents are held as BSON values in a vector, in insertion order, with an
//! id index pointing into it. The whole state sits behind one async-aware
//! read-write lock and every backend operation holds that lock from start to
//! finish.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Uuid, Bson, Document as BsonDocument};
use tracing::{debug, instrument, trace};

use docmanager_core::{
    query::Query,
    error::{DocumentStoreError, DocumentStoreResult},
    backend::{StoreBackend, StoreBackendBuilder},
};

use crate::evaluator::DocumentEvaluator;


#[derive(Default, Debug)]
struct Entries {
    /// Stored documents, oldest first
    documents: Vec<Bson>,
    /// document id -> position in `documents`
    positions: HashMap<Uuid, usize>,
}

impl Entries {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            documents: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }
}


/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable; clones share the same underlying data.
///
/// # Performance
///
/// Queries scan every document (no indexing). Lookups by id go through a hash
/// index.
///
/// # Example
///
/// ```ignore
/// use docmanager_memory::InMemoryStore;
/// use docmanager::backend::StoreBackend;
/// use bson::{Uuid, Bson, doc};
///
/// let store = InMemoryStore::new();
///
/// let id = Uuid::new();
/// store.insert_document(id, Bson::Document(doc! { "title": "Intro" })).await?;
///
/// assert!(store.get_document(id).await?.is_some());
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    entries: Arc<RwLock<Entries>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty store with room for `capacity` documents.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Entries::with_capacity(capacity))),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore` with custom options.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    #[instrument(skip(self, document))]
    async fn insert_document(&self, id: Uuid, document: Bson) -> DocumentStoreResult<()> {
        let mut entries = self.entries.write().await;

        if entries.positions.contains_key(&id) {
            return Err(DocumentStoreError::DocumentAlreadyExists(id.to_string()));
        }

        let position = entries.documents.len();
        entries.documents.push(document);
        entries.positions.insert(id, position);

        debug!(doc_id = %id, position, "Inserted document into in-memory store");

        Ok(())
    }

    #[instrument(skip(self, changes))]
    async fn update_document(&self, id: Uuid, changes: BsonDocument) -> DocumentStoreResult<Bson> {
        let mut entries = self.entries.write().await;

        let position = *entries
            .positions
            .get(&id)
            .ok_or_else(|| DocumentStoreError::DocumentNotFound(id.to_string()))?;

        let stored = entries
            .documents
            .get_mut(position)
            .ok_or_else(|| DocumentStoreError::Backend(format!("index entry for {id} points past the end")))?;

        let stored_doc = stored
            .as_document_mut()
            .ok_or_else(|| DocumentStoreError::InvalidDocument(id.to_string()))?;

        // Only write fields whose value actually changed
        let mut changed = Vec::new();
        for (field, value) in changes {
            if stored_doc.get(&field) != Some(&value) {
                stored_doc.insert(field.clone(), value);
                changed.push(field);
            }
        }

        debug!(doc_id = %id, ?changed, "Updated document in in-memory store");

        Ok(stored.clone())
    }

    async fn get_document(&self, id: Uuid) -> DocumentStoreResult<Option<Bson>> {
        let entries = self.entries.read().await;

        trace!(doc_id = %id, "Getting document from in-memory store");

        Ok(
            entries.positions
                .get(&id)
                .and_then(|position| entries.documents.get(*position))
                .cloned()
        )
    }

    #[instrument(skip(self))]
    async fn query_documents(&self, query: Query) -> DocumentStoreResult<Vec<Bson>> {
        let entries = self.entries.read().await;

        let documents = match &query.filter {
            Some(filter) => DocumentEvaluator::filter_documents(
                entries.documents.iter(),
                filter,
            )?,
            None => entries.documents.clone(),
        };

        debug!(scanned = entries.documents.len(), matched = documents.len(), "Queried in-memory store");

        Ok(documents)
    }

    async fn count_documents(&self) -> DocumentStoreResult<usize> {
        Ok(self.entries.read().await.documents.len())
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use docmanager_memory::InMemoryStore;
/// use docmanager::backend::StoreBackendBuilder;
///
/// let store = InMemoryStore::builder().with_capacity(1_024).build().await?;
/// ```
#[derive(Default, Debug)]
pub struct InMemoryStoreBuilder {
    capacity: Option<usize>,
}

impl InMemoryStoreBuilder {
    /// Pre-sizes the store for `capacity` documents.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::with_capacity(self.capacity.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;
    use docmanager_core::query::Filter;

    use super::*;

    fn record(title: &str, author: &str) -> Bson {
        Bson::Document(doc! {
            "title": title,
            "content": "body",
            "author": { "id": author, "name": "Someone" },
        })
    }

    fn titles(documents: &[Bson]) -> Vec<&str> {
        documents
            .iter()
            .map(|doc| doc.as_document().unwrap().get_str("title").unwrap())
            .collect()
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_ids() {
        let store = InMemoryStore::new();
        let id = Uuid::new();

        store.insert_document(id, record("A", "u1")).await.unwrap();
        let result = store.insert_document(id, record("B", "u1")).await;

        assert!(matches!(result, Err(DocumentStoreError::DocumentAlreadyExists(_))));
        assert_eq!(store.count_documents().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_writes_only_listed_fields() {
        let store = InMemoryStore::new();
        let id = Uuid::new();
        store.insert_document(id, record("A", "u1")).await.unwrap();

        let updated = store
            .update_document(id, doc! { "title": "B", "author": { "id": "u1", "name": "Someone" } })
            .await
            .unwrap();

        let updated = updated.as_document().unwrap();
        assert_eq!(updated.get_str("title").unwrap(), "B");
        assert_eq!(updated.get_str("content").unwrap(), "body");
        assert_eq!(store.get_document(id).await.unwrap().unwrap().as_document().unwrap(), updated);
    }

    #[tokio::test]
    async fn update_of_unknown_id_inserts_nothing() {
        let store = InMemoryStore::new();

        let result = store.update_document(Uuid::new(), doc! { "title": "B" }).await;

        assert!(matches!(result, Err(DocumentStoreError::DocumentNotFound(_))));
        assert_eq!(store.count_documents().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn query_preserves_insertion_order() {
        let store = InMemoryStore::builder().with_capacity(4).build().await.unwrap();
        for (title, author) in [("C", "u1"), ("A", "u2"), ("B", "u1")] {
            store.insert_document(Uuid::new(), record(title, author)).await.unwrap();
        }

        let all = store.query_documents(Query::all()).await.unwrap();
        let by_u1 = store
            .query_documents(Query::filtered(Filter::any_of("author.id", ["u1"])))
            .await
            .unwrap();

        assert_eq!(titles(&all), vec!["C", "A", "B"]);
        assert_eq!(titles(&by_u1), vec!["C", "B"]);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryStore::new();
        let handle = store.clone();
        let id = Uuid::new();

        handle.insert_document(id, record("A", "u1")).await.unwrap();

        assert!(store.get_document(id).await.unwrap().is_some());
        assert!(store.get_document(Uuid::new()).await.unwrap().is_none());
    }
}
