//! Core type definitions for the Autograph commit engine.
//!
//! This crate provides all shared type definitions. No business logic — just types.
//! Every Autograph crate depends on this crate.

pub mod config;
pub mod confidence;
pub mod decision;
pub mod ids;
pub mod proposal;
pub mod provenance;
pub mod workflow;

// Re-export primary types at crate root for ergonomic use.
pub use config::{
    AdjustmentPolicy, AutonomousConfig, ConfigPreset, EntityTypeFilter, RateLimits, ScopeRules,
    Thresholds, ThresholdStrategy, UiFlags,
};
pub use confidence::{ConfidenceFactors, FactorKind};
pub use decision::{Decision, DecisionKind, QueueReason};
pub use ids::{ConnectionId, CorrelationId, EntityId, ProvenanceId};
pub use proposal::{Proposal, ProposedConnection, ProposedEntity};
pub use provenance::{
    AutoCommitProvenance, ProvenanceSource, RevertSnapshot, ReviewStatus, SnapshotTarget,
    TargetType,
};
pub use workflow::{WorkflowResult, WorkflowTransition};
