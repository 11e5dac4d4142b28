//! Confidence scoring for AI-proposed graph mutations.
//!
//! Two layers:
//!
//! 1. **Factor evaluators** — independent async scorers, one per
//!    [`FactorKind`](autograph_types::FactorKind). Each produces a value in
//!    [0,1] or reports the dimension as *absent* (not yet tested). Evaluator
//!    failure and timeout map to absent, never to zero.
//! 2. **Calculators** — pure functions from a
//!    [`ConfidenceFactors`](autograph_types::ConfidenceFactors) snapshot to a
//!    [`ConfidenceResult`]: the weighted multi-factor calculator with
//!    per-factor floor vetoes, and the simple legacy 4-factor mean. The two
//!    are interchangeable behind [`ConfidenceModel`] so the decision gates
//!    never care which one is configured.
//!
//! Absent factors are dropped from both the numerator and the weight sum.
//! This is a renormalization, not a zero-fill: an untested dimension must
//! not drag the score down.

pub mod adapters;
pub mod calculator;
pub mod error;
pub mod evaluators;
pub mod explanation;
pub mod pipeline;
pub mod result;
pub mod similarity;

pub use adapters::{EmbeddingIndex, GraphNeighborhood};
pub use calculator::{
    ConfidenceModel, FactorFloors, FactorWeights, LegacyModel, MultiFactorCalculator,
};
pub use error::EvaluatorError;
pub use evaluators::{EvaluationInput, FactorEvaluator};
pub use explanation::{FactorExplanation, Severity};
pub use pipeline::FactorPipeline;
pub use result::ConfidenceResult;
pub use similarity::cosine_similarity;
