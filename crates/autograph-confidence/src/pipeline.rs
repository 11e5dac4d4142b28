use autograph_types::ConfidenceFactors;
use futures::future::join_all;
use tracing::warn;

use crate::evaluators::{EvaluationInput, FactorEvaluator};

/// Runs a set of factor evaluators over one proposal and collects the
/// results into a [`ConfidenceFactors`] snapshot.
///
/// Evaluators are independent, so they run concurrently; the snapshot
/// they produce is consumed by a calculator, which is pure and ordered.
/// An evaluator error never fails the pipeline — the dimension is
/// recorded as absent and the failure is logged, because "we could not
/// test this" must not read as "this tested badly".
pub struct FactorPipeline {
    evaluators: Vec<Box<dyn FactorEvaluator>>,
}

impl FactorPipeline {
    pub fn new(evaluators: Vec<Box<dyn FactorEvaluator>>) -> Self {
        Self { evaluators }
    }

    /// The evaluators that need no backend adapters: source trust,
    /// extraction clarity, validation outcome, critique survival,
    /// structural invariance and AI self-report.
    pub fn baseline() -> Self {
        use crate::evaluators::{
            AiSelfReportEvaluator, CritiqueSurvivalEvaluator, ExtractionClarityEvaluator,
            SourceTrustEvaluator, StructuralInvarianceEvaluator, ValidationOutcomeEvaluator,
        };
        Self::new(vec![
            Box::new(SourceTrustEvaluator),
            Box::new(ExtractionClarityEvaluator),
            Box::new(ValidationOutcomeEvaluator),
            Box::new(CritiqueSurvivalEvaluator),
            Box::new(StructuralInvarianceEvaluator),
            Box::new(AiSelfReportEvaluator),
        ])
    }

    /// The full nine-evaluator stack, given the two backend adapters.
    pub fn standard(
        embedding: std::sync::Arc<dyn crate::adapters::EmbeddingIndex>,
        graph: std::sync::Arc<dyn crate::adapters::GraphNeighborhood>,
    ) -> Self {
        use crate::evaluators::{
            EmbeddingSimilarityEvaluator, GraphCoherenceEvaluator, NoveltyEvaluator,
        };
        let mut pipeline = Self::baseline();
        pipeline.push(Box::new(GraphCoherenceEvaluator::new(std::sync::Arc::clone(
            &graph,
        ))));
        pipeline.push(Box::new(EmbeddingSimilarityEvaluator::new(
            std::sync::Arc::clone(&embedding),
        )));
        pipeline.push(Box::new(NoveltyEvaluator::new(embedding)));
        pipeline
    }

    pub fn push(&mut self, evaluator: Box<dyn FactorEvaluator>) {
        self.evaluators.push(evaluator);
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }

    pub async fn gather(&self, input: &EvaluationInput<'_>) -> ConfidenceFactors {
        let futures = self
            .evaluators
            .iter()
            .map(|evaluator| async move { (evaluator.kind(), evaluator.evaluate(input).await) });

        let mut factors = ConfidenceFactors::new();
        for (kind, outcome) in join_all(futures).await {
            match outcome {
                Ok(value) => factors.set(kind, value),
                Err(error) => {
                    warn!(factor = %kind, %error, "factor evaluator failed; treating as absent");
                    factors.set(kind, None);
                }
            }
        }
        factors
    }
}
