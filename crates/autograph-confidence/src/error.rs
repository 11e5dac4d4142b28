use autograph_types::FactorKind;
use thiserror::Error;

/// Errors from factor evaluators and their adapters.
///
/// The factor pipeline treats every evaluator error as "factor absent";
/// these errors never abort an evaluation.
#[derive(Error, Debug)]
pub enum EvaluatorError {
    #[error("adapter failure while evaluating {kind}: {message}")]
    Adapter { kind: FactorKind, message: String },

    #[error("evaluator for {0} timed out")]
    Timeout(FactorKind),

    #[error("embedding dimensions do not match: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("zero-norm embedding vector has no direction")]
    ZeroNorm,
}
