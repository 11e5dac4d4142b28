use serde::{Deserialize, Serialize};

use crate::ids::{CorrelationId, EntityId};

/// A single proposed entity creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProposedEntity {
    /// Caller-assigned identifier the entity will be created under.
    pub id: EntityId,
    /// Entity type as resolved by extraction (e.g. "person", "concept").
    pub entity_type: String,
    /// Display label.
    pub label: String,
    /// AI-assigned confidence in [0,1] for this individual creation.
    pub ai_confidence: f64,
}

/// A single proposed relationship creation between two entities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProposedConnection {
    pub from: EntityId,
    pub to: EntityId,
    /// Relationship kind (e.g. "references", "contradicts").
    pub relation: String,
    /// AI-assigned confidence in [0,1] for this individual creation.
    pub ai_confidence: f64,
}

/// A batch of AI-suggested entity and/or relationship creations awaiting
/// a commit decision.
///
/// Immutable once produced: a regenerated extraction supersedes its
/// predecessor rather than mutating it. The correlation id links the
/// batch back to the conversation/extraction that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub correlation_id: CorrelationId,
    pub entities: Vec<ProposedEntity>,
    pub connections: Vec<ProposedConnection>,
}

impl Proposal {
    pub fn new(correlation_id: CorrelationId) -> Self {
        Self {
            correlation_id,
            entities: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn with_entity(mut self, entity: ProposedEntity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn with_connection(mut self, connection: ProposedConnection) -> Self {
        self.connections.push(connection);
        self
    }

    /// Total number of proposed creations in the batch.
    pub fn target_count(&self) -> usize {
        self.entities.len() + self.connections.len()
    }

    /// A batch with any proposed entities is gated by the entity
    /// threshold; connection-only batches use the connection threshold.
    pub fn has_entities(&self) -> bool {
        !self.entities.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.connections.is_empty()
    }

    /// Mean of the per-creation AI confidences, or `None` for an empty batch.
    pub fn mean_ai_confidence(&self) -> Option<f64> {
        let count = self.target_count();
        if count == 0 {
            return None;
        }
        let sum: f64 = self
            .entities
            .iter()
            .map(|e| e.ai_confidence)
            .chain(self.connections.iter().map(|c| c.ai_confidence))
            .sum();
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: &str, confidence: f64) -> ProposedEntity {
        ProposedEntity {
            id: EntityId(id.into()),
            entity_type: "concept".into(),
            label: id.into(),
            ai_confidence: confidence,
        }
    }

    #[test]
    fn target_count_spans_entities_and_connections() {
        let proposal = Proposal::new(CorrelationId::new())
            .with_entity(entity("a", 0.9))
            .with_connection(ProposedConnection {
                from: EntityId("a".into()),
                to: EntityId("b".into()),
                relation: "references".into(),
                ai_confidence: 0.8,
            });

        assert_eq!(proposal.target_count(), 2);
        assert!(proposal.has_entities());
    }

    #[test]
    fn mean_ai_confidence_empty_batch_is_none() {
        let proposal = Proposal::new(CorrelationId::new());
        assert!(proposal.mean_ai_confidence().is_none());
    }

    #[test]
    fn mean_ai_confidence_averages_all_targets() {
        let proposal = Proposal::new(CorrelationId::new())
            .with_entity(entity("a", 1.0))
            .with_entity(entity("b", 0.5));
        let mean = proposal.mean_ai_confidence().unwrap();
        assert!((mean - 0.75).abs() < 1e-9);
    }

    #[test]
    fn proposal_serialization_round_trip() {
        let proposal = Proposal::new(CorrelationId::new()).with_entity(entity("a", 0.9));
        let json = serde_json::to_string(&proposal).unwrap();
        let restored: Proposal = serde_json::from_str(&json).unwrap();
        assert_eq!(proposal, restored);
    }
}
