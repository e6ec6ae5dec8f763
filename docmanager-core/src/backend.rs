//! Storage backend abstraction for the document store.
//!
//! The [`StoreBackend`] trait is the seam between [`DocumentStore`](crate::store::DocumentStore),
//! which owns the document semantics (id generation, `created` stamping, typed
//! conversion), and a concrete storage strategy holding documents as BSON.
//!
//! # Ordering
//!
//! Backends keep documents in insertion order. [`StoreBackend::query_documents`]
//! returns matches in that order.
//!
//! # Atomicity
//!
//! Every method is a single atomic step against the backend's state. In particular
//! [`StoreBackend::update_document`] performs its lookup, comparison and write
//! without releasing the backend's lock in between.

use async_trait::async_trait;
use bson::{Bson, Document as BsonDocument, Uuid};
use std::fmt::Debug;

use crate::{error::DocumentStoreResult, query::Query};

/// Abstract interface for document storage backends.
///
/// Implementations must be thread-safe (`Send + Sync`). The concurrency model is
/// implementation-specific, but each method must behave as one indivisible
/// operation.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Appends a new document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentAlreadyExists`](crate::error::DocumentStoreError::DocumentAlreadyExists)
    /// if a document with the same id is already stored.
    async fn insert_document(&self, id: Uuid, document: Bson) -> DocumentStoreResult<()>;

    /// Sets each top-level field of `changes` on the stored document whose value
    /// differs from the stored one, leaving every other field untouched.
    ///
    /// Returns the stored document after the update.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentNotFound`](crate::error::DocumentStoreError::DocumentNotFound)
    /// if no document carries `id`. Nothing is inserted in that case.
    async fn update_document(&self, id: Uuid, changes: BsonDocument) -> DocumentStoreResult<Bson>;

    /// Retrieves a document by id, or `None` if it is not stored.
    async fn get_document(&self, id: Uuid) -> DocumentStoreResult<Option<Bson>>;

    /// Returns every document matching `query`, in insertion order.
    async fn query_documents(&self, query: Query) -> DocumentStoreResult<Vec<Bson>>;

    /// Returns the number of stored documents.
    async fn count_documents(&self) -> DocumentStoreResult<usize>;

    /// Releases backend resources. The default implementation is a no-op.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn insert_document(&self, id: Uuid, document: Bson) -> DocumentStoreResult<()> {
        (**self).insert_document(id, document).await
    }

    async fn update_document(&self, id: Uuid, changes: BsonDocument) -> DocumentStoreResult<Bson> {
        (**self).update_document(id, changes).await
    }

    async fn get_document(&self, id: Uuid) -> DocumentStoreResult<Option<Bson>> {
        (**self).get_document(id).await
    }

    async fn query_documents(&self, query: Query) -> DocumentStoreResult<Vec<Bson>> {
        (**self).query_documents(query).await
    }

    async fn count_documents(&self) -> DocumentStoreResult<usize> {
        (**self).count_documents().await
    }
}

/// Factory for backend instances.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    /// Builds the backend.
    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
