use serde::{Deserialize, Serialize};

/// The nine named confidence dimensions.
///
/// Each dimension is scored in [0,1] by an independent evaluator. A
/// dimension that has not been tested yet is *absent* — represented as
/// `Option::None` in [`ConfidenceFactors`], never as a zero score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    /// Trustworthiness of the extraction source (chat, import, API...).
    SourceTrust,
    /// How unambiguous the extraction itself was.
    ExtractionClarity,
    /// Fit with the existing graph neighborhood.
    GraphCoherence,
    /// Embedding similarity against nearby content.
    EmbeddingSimilarity,
    /// How novel the proposed content is (inverse of duplication).
    Novelty,
    /// Outcome quality of the upstream validation workflow.
    ValidationOutcome,
    /// Fraction of adversarial critiques the proposal survived.
    CritiqueSurvival,
    /// Structural invariance under re-extraction.
    StructuralInvariance,
    /// The proposal's own AI-assigned confidence (legacy calculator input).
    AiSelfReport,
}

impl FactorKind {
    /// All dimensions, in canonical order.
    pub const ALL: [FactorKind; 9] = [
        FactorKind::SourceTrust,
        FactorKind::ExtractionClarity,
        FactorKind::GraphCoherence,
        FactorKind::EmbeddingSimilarity,
        FactorKind::Novelty,
        FactorKind::ValidationOutcome,
        FactorKind::CritiqueSurvival,
        FactorKind::StructuralInvariance,
        FactorKind::AiSelfReport,
    ];

    /// Stable snake_case name, matching the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            FactorKind::SourceTrust => "source_trust",
            FactorKind::ExtractionClarity => "extraction_clarity",
            FactorKind::GraphCoherence => "graph_coherence",
            FactorKind::EmbeddingSimilarity => "embedding_similarity",
            FactorKind::Novelty => "novelty",
            FactorKind::ValidationOutcome => "validation_outcome",
            FactorKind::CritiqueSurvival => "critique_survival",
            FactorKind::StructuralInvariance => "structural_invariance",
            FactorKind::AiSelfReport => "ai_self_report",
        }
    }
}

impl std::fmt::Display for FactorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of all confidence dimensions for one proposal.
///
/// Every field is `Option<f64>`: `None` means "not yet tested" and is
/// excluded from weighting entirely. Absence is a distinct state from a
/// low score — an evaluator that times out reports `None`, never `0.0`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceFactors {
    pub source_trust: Option<f64>,
    pub extraction_clarity: Option<f64>,
    pub graph_coherence: Option<f64>,
    pub embedding_similarity: Option<f64>,
    pub novelty: Option<f64>,
    pub validation_outcome: Option<f64>,
    pub critique_survival: Option<f64>,
    pub structural_invariance: Option<f64>,
    pub ai_self_report: Option<f64>,
}

impl ConfidenceFactors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: FactorKind) -> Option<f64> {
        match kind {
            FactorKind::SourceTrust => self.source_trust,
            FactorKind::ExtractionClarity => self.extraction_clarity,
            FactorKind::GraphCoherence => self.graph_coherence,
            FactorKind::EmbeddingSimilarity => self.embedding_similarity,
            FactorKind::Novelty => self.novelty,
            FactorKind::ValidationOutcome => self.validation_outcome,
            FactorKind::CritiqueSurvival => self.critique_survival,
            FactorKind::StructuralInvariance => self.structural_invariance,
            FactorKind::AiSelfReport => self.ai_self_report,
        }
    }

    pub fn set(&mut self, kind: FactorKind, value: Option<f64>) {
        let slot = match kind {
            FactorKind::SourceTrust => &mut self.source_trust,
            FactorKind::ExtractionClarity => &mut self.extraction_clarity,
            FactorKind::GraphCoherence => &mut self.graph_coherence,
            FactorKind::EmbeddingSimilarity => &mut self.embedding_similarity,
            FactorKind::Novelty => &mut self.novelty,
            FactorKind::ValidationOutcome => &mut self.validation_outcome,
            FactorKind::CritiqueSurvival => &mut self.critique_survival,
            FactorKind::StructuralInvariance => &mut self.structural_invariance,
            FactorKind::AiSelfReport => &mut self.ai_self_report,
        };
        *slot = value;
    }

    /// Builder-style setter.
    pub fn with(mut self, kind: FactorKind, value: f64) -> Self {
        self.set(kind, Some(value));
        self
    }

    /// All dimensions that have been tested, in canonical order.
    pub fn present(&self) -> Vec<(FactorKind, f64)> {
        FactorKind::ALL
            .iter()
            .filter_map(|&kind| self.get(kind).map(|v| (kind, v)))
            .collect()
    }

    /// All dimensions that have not been tested yet.
    pub fn absent(&self) -> Vec<FactorKind> {
        FactorKind::ALL
            .iter()
            .filter(|&&kind| self.get(kind).is_none())
            .copied()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        FactorKind::ALL.iter().all(|&kind| self.get(kind).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_by_default() {
        let factors = ConfidenceFactors::new();
        assert!(factors.is_empty());
        assert_eq!(factors.absent().len(), 9);
    }

    #[test]
    fn present_preserves_canonical_order() {
        let factors = ConfidenceFactors::new()
            .with(FactorKind::Novelty, 0.5)
            .with(FactorKind::SourceTrust, 0.9);

        let present = factors.present();
        assert_eq!(present.len(), 2);
        assert_eq!(present[0].0, FactorKind::SourceTrust);
        assert_eq!(present[1].0, FactorKind::Novelty);
    }

    #[test]
    fn get_set_round_trip() {
        let mut factors = ConfidenceFactors::new();
        for kind in FactorKind::ALL {
            factors.set(kind, Some(0.42));
            assert_eq!(factors.get(kind), Some(0.42));
        }
    }

    #[test]
    fn absent_survives_serialization() {
        let factors = ConfidenceFactors::new().with(FactorKind::GraphCoherence, 0.1);
        let json = serde_json::to_string(&factors).unwrap();
        let restored: ConfidenceFactors = serde_json::from_str(&json).unwrap();
        assert_eq!(factors, restored);
        assert!(restored.critique_survival.is_none());
    }
}
