use serde::{Deserialize, Serialize};

/// Terminal outcome of one proposal evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// Master switch is off.
    Disabled,
    /// Commit autonomously.
    AutoCommit,
    /// Hold for human review.
    QueueForReview,
    /// Reject outright — score below the reject floor.
    AutoReject,
    /// Capacity denied by the rate limiter.
    RateLimited,
}

impl std::fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DecisionKind::Disabled => "disabled",
            DecisionKind::AutoCommit => "auto_commit",
            DecisionKind::QueueForReview => "queue_for_review",
            DecisionKind::AutoReject => "auto_reject",
            DecisionKind::RateLimited => "rate_limited",
        };
        f.write_str(s)
    }
}

/// Why an item landed in the review queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueReason {
    ScopeViolation,
    ValidationFailed,
    FloorVeto,
    BelowThreshold,
    CritiqueMissing,
}

/// One decision, with the human-readable rationale that gate produced.
///
/// `reason` is always populated — a decision without a rationale is a
/// defect, since the string feeds both the audit record and the UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub kind: DecisionKind,
    pub reason: String,
    /// Overall confidence score, when the evaluation got that far.
    pub score: Option<f64>,
    /// Populated for `QueueForReview` decisions.
    pub queue_reason: Option<QueueReason>,
}

impl Decision {
    pub fn new(kind: DecisionKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
            score: None,
            queue_reason: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn queued(reason: impl Into<String>, queue_reason: QueueReason) -> Self {
        Self {
            kind: DecisionKind::QueueForReview,
            reason: reason.into(),
            score: None,
            queue_reason: Some(queue_reason),
        }
    }

    pub fn is_terminal_commit(&self) -> bool {
        self.kind == DecisionKind::AutoCommit
    }
}
