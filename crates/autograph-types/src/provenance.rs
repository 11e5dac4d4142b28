use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AutonomousConfig;
use crate::confidence::ConfidenceFactors;
use crate::decision::QueueReason;
use crate::ids::{ConnectionId, CorrelationId, EntityId, ProvenanceId};

/// Where the proposal originated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvenanceSource {
    ChatExtraction,
    DocumentImport,
    Api,
    Manual,
}

/// What kind of target a provenance record covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Entity,
    Connection,
    /// A mixed batch of entities and connections.
    Batch,
}

/// Review lifecycle of a provenance record.
///
/// Allowed transitions:
/// `AutoApproved -> HumanConfirmed`, `AutoApproved -> HumanReverted`,
/// `PendingReview -> HumanConfirmed`, `PendingReview -> HumanReverted`.
/// No other transition is valid; attempting one is a logic error in the
/// caller. The Review Queue is the enforcing party — the store itself
/// applies transitions blindly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    AutoApproved,
    PendingReview,
    HumanConfirmed,
    HumanReverted,
}

impl ReviewStatus {
    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: ReviewStatus) -> bool {
        matches!(
            (self, next),
            (ReviewStatus::AutoApproved, ReviewStatus::HumanConfirmed)
                | (ReviewStatus::AutoApproved, ReviewStatus::HumanReverted)
                | (ReviewStatus::PendingReview, ReviewStatus::HumanConfirmed)
                | (ReviewStatus::PendingReview, ReviewStatus::HumanReverted)
        )
    }

    /// Terminal states cannot transition further.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReviewStatus::HumanConfirmed | ReviewStatus::HumanReverted)
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReviewStatus::AutoApproved => "auto_approved",
            ReviewStatus::PendingReview => "pending_review",
            ReviewStatus::HumanConfirmed => "human_confirmed",
            ReviewStatus::HumanReverted => "human_reverted",
        };
        f.write_str(s)
    }
}

/// Pre-commit existence facts for one affected target.
///
/// For creations `existed_before` is always `false`; that single flag is
/// all revert needs to safely undo a creation. `previous_state` is
/// reserved for reverting *modifications* — the revert path never reads
/// it in this version (documented limitation, not an inferred feature).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotTarget<Id> {
    pub id: Id,
    pub existed_before: bool,
    pub previous_state: Option<serde_json::Value>,
}

impl<Id> SnapshotTarget<Id> {
    pub fn created(id: Id) -> Self {
        Self {
            id,
            existed_before: false,
            previous_state: None,
        }
    }
}

/// The minimal pre-commit state needed to undo one committed batch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RevertSnapshot {
    pub entities: Vec<SnapshotTarget<EntityId>>,
    pub connections: Vec<SnapshotTarget<ConnectionId>>,
}

impl RevertSnapshot {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.connections.is_empty()
    }
}

/// The audit record for one autonomous decision.
///
/// Once created, everything except `review_status`, `reviewed_at` and
/// `review_note` is immutable; those three change only through the
/// transitions defined on [`ReviewStatus`]. Records are never physically
/// deleted — this is the audit trail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AutoCommitProvenance {
    pub id: ProvenanceId,
    pub target_type: TargetType,
    /// Identifiers of every created target, as reported by the executor.
    pub entity_ids: Vec<EntityId>,
    pub connection_ids: Vec<ConnectionId>,
    pub source: ProvenanceSource,
    pub correlation_id: CorrelationId,
    pub confidence: f64,
    pub confidence_factors: ConfidenceFactors,
    /// Names of upstream validations that passed.
    pub validations_passed: Vec<String>,
    pub critique_survival: Option<f64>,
    pub created_at: DateTime<Utc>,
    /// Config the decision was made under.
    pub config_snapshot: AutonomousConfig,
    pub review_status: ReviewStatus,
    /// Why the record was queued, when it was (immutable, set at creation).
    pub queue_reason: Option<QueueReason>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_note: Option<String>,
    pub can_revert: bool,
    pub revert_snapshot: Option<RevertSnapshot>,
}

impl AutoCommitProvenance {
    /// Apply a review transition in place. The caller (Review Queue) is
    /// responsible for having checked `can_transition_to`.
    pub fn apply_review(
        &mut self,
        status: ReviewStatus,
        note: Option<String>,
        at: DateTime<Utc>,
    ) {
        self.review_status = status;
        self.reviewed_at = Some(at);
        if note.is_some() {
            self.review_note = note;
        }
    }
}
