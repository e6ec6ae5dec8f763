//! In-memory document storage backend for docmanager.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! Nothing is persisted: the documents live as long as the last clone of the store.
//!
//! # Features
//!
//! - **Thread-safe access** - Every operation runs under one async-aware RwLock
//! - **Insertion order** - Queries return documents in the order they were first saved
//! - **Full filter support** - Evaluates every `Expr` the core query module can build
//!
//! # Quick Start
//!
//! ```ignore
//! use docmanager::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//!
//!     let saved = store
//!         .save(DocumentDraft::new("Intro", "Hello", Author::new("u1", "Ada")))
//!         .await?;
//!
//!     assert!(store.find_by_id(saved.id).await?.is_some());
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docmanager_memory;

pub mod store;
pub mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
