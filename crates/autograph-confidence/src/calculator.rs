use std::collections::HashMap;

use autograph_types::{ConfidenceFactors, FactorKind};
use tracing::debug;

use crate::explanation::FactorExplanation;
use crate::result::ConfidenceResult;

/// Per-factor weights. A factor with weight 0 bears no weight and is
/// never part of the active set, even when a value is present.
#[derive(Clone, Debug, PartialEq)]
pub struct FactorWeights {
    weights: HashMap<FactorKind, f64>,
}

impl FactorWeights {
    pub fn new(weights: HashMap<FactorKind, f64>) -> Self {
        Self { weights }
    }

    pub fn weight(&self, kind: FactorKind) -> f64 {
        self.weights.get(&kind).copied().unwrap_or(0.0)
    }

    /// Whether a factor appears in the configured table at all. Factors
    /// outside the table are invisible to the calculator.
    pub fn is_configured(&self, kind: FactorKind) -> bool {
        self.weights.contains_key(&kind)
    }

    pub fn set(&mut self, kind: FactorKind, weight: f64) {
        self.weights.insert(kind, weight);
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        let mut weights = HashMap::new();
        weights.insert(FactorKind::SourceTrust, 0.15);
        weights.insert(FactorKind::ExtractionClarity, 0.15);
        weights.insert(FactorKind::GraphCoherence, 0.15);
        weights.insert(FactorKind::EmbeddingSimilarity, 0.15);
        weights.insert(FactorKind::Novelty, 0.10);
        weights.insert(FactorKind::ValidationOutcome, 0.15);
        weights.insert(FactorKind::CritiqueSurvival, 0.10);
        weights.insert(FactorKind::StructuralInvariance, 0.05);
        // AiSelfReport is the legacy calculator's input; it bears no
        // weight in the multi-factor stack.
        Self { weights }
    }
}

/// Per-factor hard minimums. A floor of 0 disables the veto for that
/// factor; any active factor strictly below its nonzero floor vetoes
/// the whole proposal into human review.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FactorFloors {
    floors: HashMap<FactorKind, f64>,
}

impl FactorFloors {
    pub fn new(floors: HashMap<FactorKind, f64>) -> Self {
        Self { floors }
    }

    pub fn floor(&self, kind: FactorKind) -> f64 {
        self.floors.get(&kind).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, kind: FactorKind, floor: f64) {
        self.floors.insert(kind, floor);
    }

    /// Default floors: graph coherence below 0.2 always needs a human.
    pub fn balanced() -> Self {
        let mut floors = HashMap::new();
        floors.insert(FactorKind::GraphCoherence, 0.2);
        Self { floors }
    }
}

/// A calculator from a factor snapshot to a [`ConfidenceResult`].
///
/// The decision gates are agnostic to which implementation is
/// configured; swapping legacy for multi-factor changes the score, not
/// the gate order.
pub trait ConfidenceModel: Send + Sync {
    fn name(&self) -> &'static str;
    fn calculate(&self, factors: &ConfidenceFactors) -> ConfidenceResult;
}

/// The multi-factor calculator: normalized weighted sum plus floor vetoes.
#[derive(Clone, Debug, Default)]
pub struct MultiFactorCalculator {
    pub weights: FactorWeights,
    pub floors: FactorFloors,
}

impl MultiFactorCalculator {
    pub fn new(weights: FactorWeights, floors: FactorFloors) -> Self {
        Self { weights, floors }
    }

    pub fn balanced() -> Self {
        Self {
            weights: FactorWeights::default(),
            floors: FactorFloors::balanced(),
        }
    }

    /// The active set: configured factors with a present value. A zero
    /// configured weight keeps a factor in the set (the equal-weight
    /// fallback may still score it); only unconfigured factors are out.
    fn active(&self, factors: &ConfidenceFactors) -> Vec<(FactorKind, f64)> {
        factors
            .present()
            .into_iter()
            .filter(|(kind, _)| self.weights.is_configured(*kind))
            .collect()
    }

    /// Normalize configured weights over the active subset so they sum
    /// to 1. If the active subset's configured weights sum to zero, fall
    /// back to equal weighting — never divide by zero, never silently
    /// zero the score.
    fn normalized_weights(&self, active: &[(FactorKind, f64)]) -> Vec<(FactorKind, f64)> {
        if active.is_empty() {
            return Vec::new();
        }
        let total: f64 = active
            .iter()
            .map(|(kind, _)| self.weights.weight(*kind))
            .sum();
        if total <= 0.0 {
            let equal = 1.0 / active.len() as f64;
            return active.iter().map(|(kind, _)| (*kind, equal)).collect();
        }
        active
            .iter()
            .map(|(kind, _)| (*kind, self.weights.weight(*kind) / total))
            .collect()
    }

    /// Active factors strictly below their configured nonzero floor.
    fn veto_factors(&self, active: &[(FactorKind, f64)]) -> Vec<FactorKind> {
        active
            .iter()
            .filter(|(kind, value)| {
                let floor = self.floors.floor(*kind);
                floor > 0.0 && *value < floor
            })
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Build explanations for a factor snapshot and a veto set.
    ///
    /// Side-effect free and deterministic; callable without (re)running
    /// `calculate` — the UI uses it to re-render stored snapshots. Each
    /// factor yields at most one explanation, chosen by priority:
    /// absent, floor veto, warning (< 0.4), strong signal (> 0.9).
    pub fn explain(
        &self,
        factors: &ConfidenceFactors,
        veto_factors: &[FactorKind],
    ) -> Vec<FactorExplanation> {
        let mut explanations = Vec::new();
        for kind in FactorKind::ALL {
            // Only configured dimensions are worth explaining.
            if !self.weights.is_configured(kind) {
                continue;
            }
            match factors.get(kind) {
                None => explanations.push(FactorExplanation::absent(kind)),
                Some(value) if veto_factors.contains(&kind) => {
                    explanations.push(FactorExplanation::floor_veto(
                        kind,
                        value,
                        self.floors.floor(kind),
                    ));
                }
                Some(value) if value < 0.4 => {
                    explanations.push(FactorExplanation::warning(kind, value));
                }
                Some(value) if value > 0.9 => {
                    explanations.push(FactorExplanation::positive(kind, value));
                }
                Some(_) => {}
            }
        }
        explanations
    }
}

impl ConfidenceModel for MultiFactorCalculator {
    fn name(&self) -> &'static str {
        "multi_factor"
    }

    fn calculate(&self, factors: &ConfidenceFactors) -> ConfidenceResult {
        let active = self.active(factors);
        let applied_weights = self.normalized_weights(&active);

        let score: f64 = active
            .iter()
            .zip(applied_weights.iter())
            .map(|((_, value), (_, weight))| value * weight)
            .sum::<f64>()
            .clamp(0.0, 1.0);

        let veto_factors = self.veto_factors(&active);
        let has_floor_veto = !veto_factors.is_empty();
        let explanations = self.explain(factors, &veto_factors);

        debug!(
            score,
            active = active.len(),
            vetoes = veto_factors.len(),
            "multi-factor confidence computed"
        );

        ConfidenceResult {
            score,
            factors: factors.clone(),
            explanations,
            has_floor_veto,
            veto_factors,
            applied_weights,
        }
    }
}

/// The legacy 4-factor calculator: unweighted mean of AI self-report,
/// source trust, extraction clarity and validation outcome. No floors,
/// no vetoes. Kept for configurations predating the multi-factor stack.
#[derive(Clone, Copy, Debug, Default)]
pub struct LegacyModel;

impl LegacyModel {
    const FACTORS: [FactorKind; 4] = [
        FactorKind::AiSelfReport,
        FactorKind::SourceTrust,
        FactorKind::ExtractionClarity,
        FactorKind::ValidationOutcome,
    ];
}

impl ConfidenceModel for LegacyModel {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn calculate(&self, factors: &ConfidenceFactors) -> ConfidenceResult {
        let active: Vec<(FactorKind, f64)> = Self::FACTORS
            .iter()
            .filter_map(|&kind| factors.get(kind).map(|v| (kind, v)))
            .collect();

        let (score, applied_weights) = if active.is_empty() {
            (0.0, Vec::new())
        } else {
            let equal = 1.0 / active.len() as f64;
            let score = active.iter().map(|(_, v)| v * equal).sum::<f64>();
            (
                score.clamp(0.0, 1.0),
                active.iter().map(|(kind, _)| (*kind, equal)).collect(),
            )
        };

        ConfidenceResult {
            score,
            factors: factors.clone(),
            explanations: Vec::new(),
            has_floor_veto: false,
            veto_factors: Vec::new(),
            applied_weights,
        }
    }
}
