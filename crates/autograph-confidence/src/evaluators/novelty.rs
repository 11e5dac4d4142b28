use std::sync::Arc;

use async_trait::async_trait;
use autograph_types::FactorKind;

use super::similarity::best_neighbor_similarity;
use super::{EvaluationInput, FactorEvaluator};
use crate::adapters::EmbeddingIndex;
use crate::error::EvaluatorError;

/// Scores how novel the proposed content is: the inverse of its best
/// stored-neighbor similarity. Near-duplicates score low and should be
/// caught by review rather than silently re-committed.
pub struct NoveltyEvaluator {
    index: Arc<dyn EmbeddingIndex>,
}

impl NoveltyEvaluator {
    pub fn new(index: Arc<dyn EmbeddingIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl FactorEvaluator for NoveltyEvaluator {
    fn kind(&self) -> FactorKind {
        FactorKind::Novelty
    }

    async fn evaluate(
        &self,
        input: &EvaluationInput<'_>,
    ) -> Result<Option<f64>, EvaluatorError> {
        let similarity = best_neighbor_similarity(self.index.as_ref(), input).await?;
        Ok(similarity.map(|s| (1.0 - s).clamp(0.0, 1.0)))
    }
}
