use async_trait::async_trait;
use autograph_types::FactorKind;

use super::{EvaluationInput, FactorEvaluator};
use crate::error::EvaluatorError;

/// Passes through the structural-invariance signal: how much of the
/// proposed structure survived a re-extraction of the same material.
/// Optional dimension; absent unless the upstream pipeline measured it.
#[derive(Clone, Copy, Debug, Default)]
pub struct StructuralInvarianceEvaluator;

#[async_trait]
impl FactorEvaluator for StructuralInvarianceEvaluator {
    fn kind(&self) -> FactorKind {
        FactorKind::StructuralInvariance
    }

    async fn evaluate(
        &self,
        input: &EvaluationInput<'_>,
    ) -> Result<Option<f64>, EvaluatorError> {
        Ok(input.invariance.map(|s| s.clamp(0.0, 1.0)))
    }
}
