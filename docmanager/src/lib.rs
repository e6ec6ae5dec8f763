//! Main docmanager crate: an in-memory document repository.
//!
//! This crate is the primary entry point. It re-exports the core types from
//! `docmanager-core` and the in-memory backend from `docmanager-memory`.
//!
//! # Features
//!
//! - **Upsert** - `save` creates a document from a draft, or updates the fields that changed
//! - **Point lookup** - `find_by_id` returns `None` for unknown ids
//! - **Filtered search** - title prefixes, content substrings, author ids and an exclusive
//!   creation-time window, combined with AND across dimensions and OR within one
//!
//! # Quick Start
//!
//! ```ignore
//! use docmanager::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await.unwrap());
//!
//!     let ada = Author::new("u1", "Ada");
//!     let intro = store
//!         .save(DocumentDraft::new("Intro", "Ownership and borrowing", ada.clone()))
//!         .await
//!         .unwrap();
//!
//!     // Update: only changed fields are written, `created` is kept
//!     let intro = store
//!         .save(DocumentDraft::from(intro).with_title("Introduction"))
//!         .await
//!         .unwrap();
//!
//!     let results = store
//!         .search(
//!             SearchRequest::builder()
//!                 .title_prefixes(["Intro"])
//!                 .author_ids(["u1"])
//!                 .build(),
//!         )
//!         .await
//!         .unwrap();
//!
//!     println!("Found documents: {:?}", results);
//!
//!     store.shutdown().await.unwrap();
//! }
//! ```

pub mod prelude;

pub use docmanager_core::{backend, document, error, query, store};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use docmanager_memory::{InMemoryStore, InMemoryStoreBuilder};
}
