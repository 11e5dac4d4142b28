use async_trait::async_trait;
use autograph_types::{
    AutoCommitProvenance, CorrelationId, ProvenanceId, RevertSnapshot, ReviewStatus,
};
use chrono::{DateTime, Utc};

use crate::adjustment::ThresholdAdjustment;
use crate::error::AuditError;
use crate::stats::DecisionStats;

/// The audit store contract.
///
/// Implementations must be safe under concurrent append/update (multiple
/// proposals may be evaluated at once) and must provide read-after-write
/// consistency: a committed record is visible to every later capacity
/// check in the same process.
///
/// Status transitions: the store applies `update_review_status` blindly.
/// The four legal transitions are encoded on
/// [`ReviewStatus::can_transition_to`] and the Review Queue is the
/// enforcing party; an illegal transition reaching the store is a logic
/// error in the caller, not a store-level validation concern.
#[async_trait]
pub trait ProvenanceStore: Send + Sync {
    /// Append a new provenance record. Fails on duplicate id.
    async fn record(&self, record: AutoCommitProvenance) -> Result<(), AuditError>;

    async fn get(&self, id: &ProvenanceId) -> Result<Option<AutoCommitProvenance>, AuditError>;

    async fn get_by_status(
        &self,
        status: ReviewStatus,
    ) -> Result<Vec<AutoCommitProvenance>, AuditError>;

    async fn get_by_correlation(
        &self,
        correlation_id: &CorrelationId,
    ) -> Result<Vec<AutoCommitProvenance>, AuditError>;

    /// Most recent records first.
    async fn get_recent(&self, limit: usize) -> Result<Vec<AutoCommitProvenance>, AuditError>;

    /// Update the three mutable review fields; everything else is
    /// immutable once recorded. Returns the updated record.
    async fn update_review_status(
        &self,
        id: &ProvenanceId,
        status: ReviewStatus,
        note: Option<String>,
    ) -> Result<AutoCommitProvenance, AuditError>;

    async fn get_revert_snapshot(
        &self,
        id: &ProvenanceId,
    ) -> Result<Option<RevertSnapshot>, AuditError>;

    /// Committed (revertable) records created at or after `since`.
    /// Authoritative input for the daily rate limit — restart-safe where
    /// the in-memory hourly window is not.
    async fn count_committed_since(&self, since: DateTime<Utc>) -> Result<usize, AuditError>;

    /// Records currently awaiting human review.
    async fn count_pending(&self) -> Result<usize, AuditError>;

    /// Mark an auto-rejection. Auto-rejects write no provenance row, but
    /// they are decisions and must feed the outcome aggregates.
    async fn record_auto_reject(&self, correlation_id: &CorrelationId)
        -> Result<(), AuditError>;

    /// Outcome aggregates over the last `window` decisions (provenance
    /// rows and auto-rejects merged by time, newest first).
    async fn decision_stats(&self, window: usize) -> Result<DecisionStats, AuditError>;

    /// Outcome aggregates over the trailing `hours` hours.
    async fn get_stats(&self, hours: u32) -> Result<DecisionStats, AuditError>;

    /// Append an immutable threshold-adjustment event.
    async fn record_adjustment(&self, adjustment: ThresholdAdjustment)
        -> Result<(), AuditError>;

    /// Most recent adjustment events first.
    async fn recent_adjustments(
        &self,
        limit: usize,
    ) -> Result<Vec<ThresholdAdjustment>, AuditError>;
}
