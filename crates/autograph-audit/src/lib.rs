//! Provenance / audit store for autonomous commit decisions.
//!
//! Every decision that reaches a committed or queued state leaves an
//! [`AutoCommitProvenance`](autograph_types::AutoCommitProvenance) record
//! here; auto-rejections leave a lightweight outcome mark. Records are
//! append-only: once written, only the three review fields ever change,
//! and nothing is physically deleted — this is the audit trail, and it is
//! the single durable source of truth for daily commit counts, queue
//! depth, and the outcome history that drives threshold adjustment.

pub mod adjustment;
pub mod error;
pub mod memory;
pub mod stats;
pub mod store;

pub use adjustment::ThresholdAdjustment;
pub use error::AuditError;
pub use memory::MemoryProvenanceStore;
pub use stats::DecisionStats;
pub use store::ProvenanceStore;
