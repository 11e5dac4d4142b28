use async_trait::async_trait;
use autograph_types::FactorKind;

use super::{EvaluationInput, FactorEvaluator};
use crate::error::EvaluatorError;

/// The proposal's own AI-assigned confidence, averaged over the batch.
/// Input to the legacy calculator; unweighted in the multi-factor stack.
#[derive(Clone, Copy, Debug, Default)]
pub struct AiSelfReportEvaluator;

#[async_trait]
impl FactorEvaluator for AiSelfReportEvaluator {
    fn kind(&self) -> FactorKind {
        FactorKind::AiSelfReport
    }

    async fn evaluate(
        &self,
        input: &EvaluationInput<'_>,
    ) -> Result<Option<f64>, EvaluatorError> {
        Ok(input
            .proposal
            .mean_ai_confidence()
            .map(|c| c.clamp(0.0, 1.0)))
    }
}
