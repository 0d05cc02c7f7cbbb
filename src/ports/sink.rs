use async_trait::async_trait;
use thiserror::Error;

use crate::domain::TokenRecord;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to create directory: {0}")]
    DirectoryError(String),

    #[error("Failed to write {path}: {reason}")]
    WriteError { path: String, reason: String },

    #[error("Failed to read {path}: {reason}")]
    ReadError { path: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Final destination for an enriched batch (storage, export)
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Short name for logs and the run summary
    fn name(&self) -> &str;

    /// Accept the final batch. Returns how many records were written.
    async fn accept(&self, records: &[TokenRecord]) -> Result<usize, SinkError>;
}
