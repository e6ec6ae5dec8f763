//! Main document store interface.
//!
//! [`DocumentStore`] owns the document semantics: it generates ids, stamps the
//! creation time, turns drafts into field updates, and converts between typed
//! [`Document`]s and the BSON form its [`StoreBackend`] holds.
//!
//! # Example
//!
//! ```ignore
//! use docmanager::{prelude::*, memory::InMemoryStore};
//!
//! let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//!
//! let saved = store
//!     .save(DocumentDraft::new("Intro", "Hello", Author::new("u1", "Ada")))
//!     .await?;
//!
//! let found = store
//!     .search(SearchRequest::builder().title_prefixes(["In"]).build())
//!     .await?;
//!
//! assert_eq!(found, vec![saved]);
//! ```

use bson::{DateTime, Uuid, doc, ser::serialize_to_bson};
use tracing::{debug, instrument, trace};

use crate::{
    backend::StoreBackend,
    document::{Document, DocumentDraft},
    error::DocumentStoreResult,
    query::SearchRequest,
};

/// A document store bound to a specific backend implementation.
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Saves a draft, creating or updating a document.
    ///
    /// A draft without an id creates a new document with a fresh id and the
    /// current time as `created`. A draft with an id updates that document:
    /// `title`, `content` and `author` are replaced where they differ from the
    /// stored values, while `id` and `created` are kept.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentNotFound`](crate::error::DocumentStoreError::DocumentNotFound)
    /// if the draft names an id that is not stored. No document is inserted in
    /// that case.
    #[instrument(skip(self, draft), fields(doc_id = ?draft.id))]
    pub async fn save(&self, draft: DocumentDraft) -> DocumentStoreResult<Document> {
        match draft.id {
            Some(id) => self.update(id, draft).await,
            None => self.create(draft).await,
        }
    }

    async fn create(&self, draft: DocumentDraft) -> DocumentStoreResult<Document> {
        let document = Document {
            id: Uuid::from(uuid::Uuid::new_v4()),
            title: draft.title,
            content: draft.content,
            author: draft.author,
            created: DateTime::now(),
        };

        self.backend
            .insert_document(document.id, document.to_bson()?)
            .await?;

        debug!(doc_id = %document.id, created = %document.created, "Created document");

        Ok(document)
    }

    async fn update(&self, id: Uuid, draft: DocumentDraft) -> DocumentStoreResult<Document> {
        let changes = doc! {
            "title": draft.title,
            "content": draft.content,
            "author": serialize_to_bson(&draft.author)?,
        };

        let stored = self.backend.update_document(id, changes).await?;

        debug!(doc_id = %id, "Updated document");

        Document::from_bson(stored)
    }

    /// Looks up a document by id. An unknown id yields `Ok(None)`.
    #[instrument(skip(self, id))]
    pub async fn find_by_id(&self, id: impl Into<Uuid>) -> DocumentStoreResult<Option<Document>> {
        self.backend
            .get_document(id.into())
            .await?
            .map(Document::from_bson)
            .transpose()
    }

    /// Looks up a document by the string form of its id.
    ///
    /// A string that is not a UUID cannot name a stored document and yields
    /// `Ok(None)`.
    #[instrument(skip(self))]
    pub async fn find_by_id_str(&self, id: &str) -> DocumentStoreResult<Option<Document>> {
        match uuid::Uuid::parse_str(id) {
            Ok(id) => self.find_by_id(id).await,
            Err(err) => {
                trace!(%err, "Lookup id is not a UUID");
                Ok(None)
            }
        }
    }

    /// Returns every document matching `request`, in insertion order.
    ///
    /// The result is a snapshot; later saves do not affect it.
    #[instrument(skip(self))]
    pub async fn search(&self, request: SearchRequest) -> DocumentStoreResult<Vec<Document>> {
        let documents = self
            .backend
            .query_documents(request.to_query())
            .await?
            .into_iter()
            .map(Document::from_bson)
            .collect::<DocumentStoreResult<Vec<_>>>()?;

        debug!(matched = documents.len(), "Searched documents");

        Ok(documents)
    }

    /// Returns the number of stored documents.
    pub async fn count(&self) -> DocumentStoreResult<usize> {
        self.backend.count_documents().await
    }

    /// Shuts down the store and releases backend resources.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bson::{Bson, Document as BsonDocument};

    use super::*;
    use crate::{document::Author, error::DocumentStoreError, query::Query};

    /// Records calls and keeps documents in a plain vector; filters are ignored.
    #[derive(Debug, Default)]
    struct RecordingBackend {
        documents: Mutex<Vec<(Uuid, Bson)>>,
        updates: Mutex<Vec<(Uuid, BsonDocument)>>,
    }

    #[async_trait]
    impl StoreBackend for RecordingBackend {
        async fn insert_document(&self, id: Uuid, document: Bson) -> DocumentStoreResult<()> {
            self.documents.lock().unwrap().push((id, document));
            Ok(())
        }

        async fn update_document(&self, id: Uuid, changes: BsonDocument) -> DocumentStoreResult<Bson> {
            self.updates.lock().unwrap().push((id, changes.clone()));

            let mut documents = self.documents.lock().unwrap();
            let (_, stored) = documents
                .iter_mut()
                .find(|(stored_id, _)| *stored_id == id)
                .ok_or_else(|| DocumentStoreError::DocumentNotFound(id.to_string()))?;

            let stored_doc = stored.as_document_mut().unwrap();
            for (key, value) in changes {
                stored_doc.insert(key, value);
            }

            Ok(stored.clone())
        }

        async fn get_document(&self, id: Uuid) -> DocumentStoreResult<Option<Bson>> {
            Ok(self
                .documents
                .lock()
                .unwrap()
                .iter()
                .find(|(stored_id, _)| *stored_id == id)
                .map(|(_, doc)| doc.clone()))
        }

        async fn query_documents(&self, _query: Query) -> DocumentStoreResult<Vec<Bson>> {
            Ok(self
                .documents
                .lock()
                .unwrap()
                .iter()
                .map(|(_, doc)| doc.clone())
                .collect())
        }

        async fn count_documents(&self) -> DocumentStoreResult<usize> {
            Ok(self.documents.lock().unwrap().len())
        }
    }

    fn draft() -> DocumentDraft {
        DocumentDraft::new("Intro", "Hello", Author::new("u1", "Ada"))
    }

    #[tokio::test]
    async fn create_stamps_id_and_created() {
        let store = DocumentStore::new(RecordingBackend::default());

        let saved = store.save(draft()).await.unwrap();

        assert_eq!(saved.title, "Intro");
        assert_eq!(store.find_by_id(saved.id).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn update_sends_only_content_fields() {
        let backend = RecordingBackend::default();
        let store = DocumentStore::new(&backend);
        let saved = store.save(draft()).await.unwrap();

        store
            .save(DocumentDraft::from(saved.clone()).with_title("Introduction"))
            .await
            .unwrap();

        let updates = backend.updates.lock().unwrap();
        let (id, changes) = &updates[0];
        assert_eq!(*id, saved.id);
        assert_eq!(
            changes.keys().collect::<Vec<_>>(),
            vec!["title", "content", "author"]
        );
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let store = DocumentStore::new(RecordingBackend::default());

        let result = store.save(draft().with_id(Uuid::new())).await;

        assert!(matches!(result, Err(DocumentStoreError::DocumentNotFound(_))));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn find_by_id_str_parses_and_tolerates_garbage() {
        let store = DocumentStore::new(RecordingBackend::default());
        let saved = store.save(draft()).await.unwrap();

        assert_eq!(
            store.find_by_id_str(&saved.id.to_string()).await.unwrap(),
            Some(saved)
        );
        assert_eq!(store.find_by_id_str("not-a-uuid").await.unwrap(), None);
    }
}
