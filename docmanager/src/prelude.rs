//! Convenient re-exports of commonly used types from docmanager.
//!
//! ```ignore
//! use docmanager::prelude::*;
//! ```

pub use docmanager_core::{
    store::DocumentStore,
    document::{Author, Document, DocumentDraft},
    backend::{StoreBackend, StoreBackendBuilder},
    query::{SearchRequest, SearchRequestBuilder, IntoBound, Query, QueryVisitor, Expr, FieldOp, Filter},
    error::{DocumentStoreError, DocumentStoreResult},
};
