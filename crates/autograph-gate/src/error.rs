use autograph_audit::AuditError;
use autograph_types::{ProvenanceId, ReviewStatus};
use thiserror::Error;

/// Errors from the commit engine and review queue.
///
/// Policy outcomes (floor veto, auto-reject, rate limiting) are *not*
/// errors — they are decisions. This enum covers genuine failures:
/// missing wiring, I/O failures, illegal review transitions.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A dependency-injection invariant was violated: the operation
    /// needs an adapter that was never configured.
    #[error("required adapter not configured: {0}")]
    AdapterMissing(&'static str),

    #[error("provenance record not found: {0}")]
    NotFound(ProvenanceId),

    #[error("invalid review transition: {from} -> {to}")]
    InvalidTransition {
        from: ReviewStatus,
        to: ReviewStatus,
    },

    /// The caller-supplied commit function failed. No audit record was
    /// written and the rate limiter was not advanced.
    #[error("commit execution failed: {0}")]
    Executor(#[source] anyhow::Error),

    /// A delete adapter failed during revert.
    #[error("revert adapter failure: {0}")]
    Adapter(#[source] anyhow::Error),

    #[error("audit store error: {0}")]
    Audit(#[from] AuditError),
}
