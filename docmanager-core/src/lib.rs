//! Core of the docmanager project: an in-memory document repository with upsert,
//! point lookup and multi-field filtered search.
//!
//! - **Documents** ([`document`]) - Stored documents, authors and drafts
//! - **Search** ([`query`]) - Search requests and the filter expressions they lower to
//! - **Backends** ([`backend`]) - The trait a storage strategy implements
//! - **Document store** ([`store`]) - `save`, `find_by_id` and `search`
//! - **Errors** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use docmanager::{prelude::*, memory::InMemoryStore};
//!
//! let store = DocumentStore::new(InMemoryStore::new());
//! let saved = store
//!     .save(DocumentDraft::new("Intro", "Hello", Author::new("u1", "Ada")))
//!     .await?;
//!
//! let edited = store
//!     .save(DocumentDraft::from(saved.clone()).with_title("Introduction"))
//!     .await?;
//!
//! assert_eq!(edited.created, saved.created);
//! ```

#[allow(unused_extern_crates)]
extern crate self as docmanager_core;

pub mod backend;
pub mod document;
pub mod error;
pub mod query;
pub mod store;
