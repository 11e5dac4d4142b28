use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use autograph_types::{EntityId, FactorKind};

use super::{EvaluationInput, FactorEvaluator};
use crate::adapters::GraphNeighborhood;
use crate::error::EvaluatorError;

/// Folds per-connection neighborhood overlaps into one coherence score.
///
/// Strategy-polymorphic so deployments can swap the aggregation without
/// touching the evaluator; selected by configuration, not subclassing.
pub trait CoherenceStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Aggregate overlap measurements into a score, or decline when
    /// there is nothing to aggregate.
    fn score(&self, overlaps: &[f64]) -> Option<f64>;
}

/// Mean Jaccard overlap of endpoint neighborhoods.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeighborhoodCoherence;

impl CoherenceStrategy for NeighborhoodCoherence {
    fn name(&self) -> &'static str {
        "neighborhood"
    }

    fn score(&self, overlaps: &[f64]) -> Option<f64> {
        if overlaps.is_empty() {
            return None;
        }
        Some(overlaps.iter().sum::<f64>() / overlaps.len() as f64)
    }
}

/// Scores how well proposed connections fit the existing graph.
///
/// For each proposed connection whose endpoints already exist, measures
/// the Jaccard overlap of the endpoints' neighbor sets: connections
/// between well-connected, related regions cohere; connections between
/// strangers do not. Batches with no resolvable connections report the
/// dimension absent.
pub struct GraphCoherenceEvaluator {
    graph: Arc<dyn GraphNeighborhood>,
    strategy: Box<dyn CoherenceStrategy>,
}

impl GraphCoherenceEvaluator {
    pub fn new(graph: Arc<dyn GraphNeighborhood>) -> Self {
        Self {
            graph,
            strategy: Box::new(NeighborhoodCoherence),
        }
    }

    pub fn with_strategy(mut self, strategy: Box<dyn CoherenceStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    async fn endpoint_overlap(
        &self,
        from: &EntityId,
        to: &EntityId,
    ) -> Result<Option<f64>, EvaluatorError> {
        if !self.graph.contains(from).await? || !self.graph.contains(to).await? {
            return Ok(None);
        }

        let from_neighbors: HashSet<EntityId> =
            self.graph.neighbors(from).await?.into_iter().collect();
        let to_neighbors: HashSet<EntityId> =
            self.graph.neighbors(to).await?.into_iter().collect();

        if from_neighbors.is_empty() && to_neighbors.is_empty() {
            return Ok(None);
        }

        let intersection = from_neighbors.intersection(&to_neighbors).count();
        let union = from_neighbors.union(&to_neighbors).count();
        Ok(Some(intersection as f64 / union as f64))
    }
}

#[async_trait]
impl FactorEvaluator for GraphCoherenceEvaluator {
    fn kind(&self) -> FactorKind {
        FactorKind::GraphCoherence
    }

    async fn evaluate(
        &self,
        input: &EvaluationInput<'_>,
    ) -> Result<Option<f64>, EvaluatorError> {
        let mut overlaps = Vec::new();
        for connection in &input.proposal.connections {
            if let Some(overlap) = self
                .endpoint_overlap(&connection.from, &connection.to)
                .await?
            {
                overlaps.push(overlap);
            }
        }
        Ok(self.strategy.score(&overlaps))
    }
}
