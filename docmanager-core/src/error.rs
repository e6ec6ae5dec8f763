//! Error types and result types for document store operations.
//!
//! Use [`DocumentStoreResult<T>`] as the return type for fallible operations.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// Serialization/deserialization error when converting between document formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// A document with the given ID is already stored.
    #[error("Document {0} already exists")]
    DocumentAlreadyExists(String),
    /// No stored document carries the given ID.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),
    /// A stored record does not have the shape of a document.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<BsonError> for DocumentStoreError {
    fn from(err: BsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_id() {
        let err = DocumentStoreError::DocumentNotFound("abc".to_string());
        assert_eq!(err.to_string(), "Document not found: abc");
    }

    #[test]
    fn serde_json_errors_become_serialization_errors() {
        let err: DocumentStoreError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, DocumentStoreError::Serialization(_)));
    }
}
