use autograph_types::{ConfidenceFactors, FactorKind};
use serde::{Deserialize, Serialize};

use crate::explanation::FactorExplanation;

/// Output of one confidence calculation.
///
/// Derived data — never persisted on its own, only as part of the
/// provenance record of the decision it informed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceResult {
    /// Weighted overall score, clamped to [0,1].
    pub score: f64,
    /// The factor snapshot the score was computed from.
    pub factors: ConfidenceFactors,
    pub explanations: Vec<FactorExplanation>,
    /// Whether any active factor fell below its configured floor.
    pub has_floor_veto: bool,
    /// The factor(s) that vetoed, in canonical order.
    pub veto_factors: Vec<FactorKind>,
    /// Normalized weights actually applied (active factors only, sums to 1).
    pub applied_weights: Vec<(FactorKind, f64)>,
}

impl ConfidenceResult {
    /// Summary line for logs and audit reasons.
    pub fn summary(&self) -> String {
        if self.has_floor_veto {
            let names: Vec<&str> = self.veto_factors.iter().map(|f| f.name()).collect();
            format!(
                "score {:.2}, Floor veto by [{}]",
                self.score,
                names.join(", ")
            )
        } else {
            format!("score {:.2}", self.score)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_names_veto_factors() {
        let result = ConfidenceResult {
            score: 0.77,
            factors: ConfidenceFactors::new(),
            explanations: vec![],
            has_floor_veto: true,
            veto_factors: vec![FactorKind::GraphCoherence],
            applied_weights: vec![],
        };
        assert!(result.summary().contains("Floor veto"));
        assert!(result.summary().contains("graph_coherence"));
    }
}
