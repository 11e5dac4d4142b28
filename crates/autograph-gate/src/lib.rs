//! The Autograph commit engine — the decision layer between an AI
//! proposal-validation pipeline and the graph it wants to mutate.
//!
//! For each validated proposal the engine produces one of five
//! decisions: `disabled`, `auto_commit`, `queue_for_review`,
//! `auto_reject` or `rate_limited`, evaluated through ten gates in a
//! fixed, short-circuiting order:
//!
//! 1. Master enable flag
//! 2. Entity-type scope rules (violations queue, never reject)
//! 3. Upstream validation requirement (failures queue, never reject)
//! 4. Confidence calculation (legacy or multi-factor, switchable)
//! 5. Floor veto (multi-factor only)
//! 6. Auto-reject floor
//! 7. Auto-accept threshold (entity vs. connection)
//! 8. Critique requirement
//! 9. Rate limiter capacity
//! 10. Auto-commit
//!
//! Gate order is a policy property, not an optimization target: a
//! proposal that violates scope *and* scores below the reject floor is
//! queued, not rejected, because scope violations need a human.
//!
//! Every committed decision writes an audit record with a revert
//! snapshot; humans later act through the [`ReviewQueue`], which updates
//! audit status and may trigger revert.

pub mod engine;
pub mod error;
pub mod events;
pub mod executor;
pub mod mocks;
pub mod rate_limit;
pub mod review;
pub mod thresholds;

pub use engine::{CommitEngine, Evaluation, EvaluationRequest};
pub use error::EngineError;
pub use events::{EventBridge, NullEventBridge, ReviewEvent};
pub use executor::{CommitExecutor, CommittedIds, ConnectionAdapter, EntityAdapter};
pub use mocks::{
    MockCommitExecutor, MockConnectionAdapter, MockEntityAdapter, RecordingEventBridge,
};
pub use rate_limit::{RateDecision, RateLimiter};
pub use review::{BulkOutcome, ReviewQueue, ReviewQueueItem};
pub use thresholds::{AdjustedThresholds, GlobalRatioAdjuster, StaticThresholds, ThresholdAdjuster};
