use std::sync::Arc;

use autograph_types::{
    AutoCommitProvenance, ProvenanceId, QueueReason, ReviewStatus,
};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::engine::CommitEngine;
use crate::error::EngineError;
use crate::events::ReviewEvent;

/// One pending item as presented to a reviewer.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewQueueItem {
    pub provenance: AutoCommitProvenance,
    pub queue_reason: Option<QueueReason>,
    pub queued_at: DateTime<Utc>,
}

/// Result of a bulk review action.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BulkOutcome {
    pub succeeded: usize,
    /// Items that could not be decided, left untouched.
    pub failed: Vec<ProvenanceId>,
}

/// Human decision surface over the audit store.
///
/// This is the transition-enforcing party: every status change a human
/// makes goes through here, where the four legal
/// [`ReviewStatus`] transitions are checked before the store is asked to
/// apply them. Rejecting a *committed* record also reverts it.
pub struct ReviewQueue {
    engine: Arc<CommitEngine>,
}

impl ReviewQueue {
    pub fn new(engine: Arc<CommitEngine>) -> Self {
        Self { engine }
    }

    /// Pending items, oldest first.
    pub async fn list(&self) -> Result<Vec<ReviewQueueItem>, EngineError> {
        let mut pending = self
            .engine
            .store()
            .get_by_status(ReviewStatus::PendingReview)
            .await?;
        pending.sort_by_key(|record| record.created_at);
        Ok(pending
            .into_iter()
            .map(|provenance| ReviewQueueItem {
                queue_reason: provenance.queue_reason,
                queued_at: provenance.created_at,
                provenance,
            })
            .collect())
    }

    pub async fn depth(&self) -> Result<usize, EngineError> {
        Ok(self.engine.store().count_pending().await?)
    }

    /// Confirm one item. Legal from `PendingReview` and from
    /// `AutoApproved` (a post-hoc human endorsement of an auto-commit).
    pub async fn approve(
        &self,
        id: &ProvenanceId,
        note: Option<String>,
    ) -> Result<AutoCommitProvenance, EngineError> {
        let record = self.approve_inner(id, note).await?;
        self.engine.events().emit(ReviewEvent::Decided {
            provenance_id: record.id.clone(),
            status: ReviewStatus::HumanConfirmed,
        });
        Ok(record)
    }

    /// Reject one item. Committed records are reverted (their creations
    /// deleted) before the status moves; queued records just move.
    pub async fn reject(
        &self,
        id: &ProvenanceId,
        note: Option<String>,
    ) -> Result<AutoCommitProvenance, EngineError> {
        let record = self.reject_inner(id, note).await?;
        self.engine.events().emit(ReviewEvent::Decided {
            provenance_id: record.id.clone(),
            status: ReviewStatus::HumanReverted,
        });
        Ok(record)
    }

    /// Approve with a note describing the reviewer's manual edits. The
    /// proposal content itself lives in the graph; this only records
    /// *that* an edit happened and what it was.
    pub async fn edit_and_approve(
        &self,
        id: &ProvenanceId,
        summary: &str,
    ) -> Result<AutoCommitProvenance, EngineError> {
        self.approve(id, Some(format!("edited: {summary}"))).await
    }

    /// Approve many items. Failures skip the item and continue; one
    /// batch notification is emitted at the end.
    pub async fn bulk_approve(&self, ids: &[ProvenanceId]) -> Result<BulkOutcome, EngineError> {
        let mut outcome = BulkOutcome::default();
        for id in ids {
            match self.approve_inner(id, None).await {
                Ok(_) => outcome.succeeded += 1,
                Err(error) => {
                    info!(provenance = %id, %error, "bulk approve skipped item");
                    outcome.failed.push(id.clone());
                }
            }
        }
        self.engine.events().emit(ReviewEvent::BatchDecided {
            approved: outcome.succeeded,
            rejected: 0,
            failed: outcome.failed.len(),
        });
        Ok(outcome)
    }

    /// Reject many items, reverting committed ones.
    pub async fn bulk_reject(&self, ids: &[ProvenanceId]) -> Result<BulkOutcome, EngineError> {
        let mut outcome = BulkOutcome::default();
        for id in ids {
            match self.reject_inner(id, None).await {
                Ok(_) => outcome.succeeded += 1,
                Err(error) => {
                    info!(provenance = %id, %error, "bulk reject skipped item");
                    outcome.failed.push(id.clone());
                }
            }
        }
        self.engine.events().emit(ReviewEvent::BatchDecided {
            approved: 0,
            rejected: outcome.succeeded,
            failed: outcome.failed.len(),
        });
        Ok(outcome)
    }

    async fn approve_inner(
        &self,
        id: &ProvenanceId,
        note: Option<String>,
    ) -> Result<AutoCommitProvenance, EngineError> {
        let record = self
            .engine
            .store()
            .get(id)
            .await?
            .ok_or_else(|| EngineError::NotFound(id.clone()))?;
        if !record
            .review_status
            .can_transition_to(ReviewStatus::HumanConfirmed)
        {
            return Err(EngineError::InvalidTransition {
                from: record.review_status,
                to: ReviewStatus::HumanConfirmed,
            });
        }
        Ok(self
            .engine
            .store()
            .update_review_status(id, ReviewStatus::HumanConfirmed, note)
            .await?)
    }

    async fn reject_inner(
        &self,
        id: &ProvenanceId,
        note: Option<String>,
    ) -> Result<AutoCommitProvenance, EngineError> {
        let record = self
            .engine
            .store()
            .get(id)
            .await?
            .ok_or_else(|| EngineError::NotFound(id.clone()))?;
        if !record
            .review_status
            .can_transition_to(ReviewStatus::HumanReverted)
        {
            return Err(EngineError::InvalidTransition {
                from: record.review_status,
                to: ReviewStatus::HumanReverted,
            });
        }

        if record.can_revert && record.revert_snapshot.is_some() {
            // Revert updates the status itself.
            if self.engine.revert(id, note.clone()).await? {
                return self
                    .engine
                    .store()
                    .get(id)
                    .await?
                    .ok_or_else(|| EngineError::NotFound(id.clone()));
            }
        }
        Ok(self
            .engine
            .store()
            .update_review_status(id, ReviewStatus::HumanReverted, note)
            .await?)
    }
}
