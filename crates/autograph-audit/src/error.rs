use autograph_types::ProvenanceId;
use thiserror::Error;

/// Errors from the provenance store.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("provenance record not found: {0}")]
    NotFound(ProvenanceId),

    #[error("duplicate provenance id: {0}")]
    DuplicateEntry(ProvenanceId),

    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
