use autograph_types::FactorKind;
use serde::{Deserialize, Serialize};

/// How notable a factor explanation is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Floor veto — forces human review.
    Critical,
    /// Value below the warning line (0.4).
    Warning,
    /// Informational: absent dimension or strong positive signal.
    Ok,
}

/// One human-readable note about one factor.
///
/// Explanations exist to highlight outliers, not to restate every score:
/// a present factor in [0.4, 0.9] with no veto produces none.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactorExplanation {
    pub factor: FactorKind,
    pub severity: Severity,
    pub message: String,
}

impl FactorExplanation {
    pub fn absent(factor: FactorKind) -> Self {
        Self {
            factor,
            severity: Severity::Ok,
            message: format!("{factor}: not yet tested"),
        }
    }

    pub fn floor_veto(factor: FactorKind, value: f64, floor: f64) -> Self {
        Self {
            factor,
            severity: Severity::Critical,
            message: format!("{factor}: Floor veto, {value:.2} is below floor {floor:.2}"),
        }
    }

    pub fn warning(factor: FactorKind, value: f64) -> Self {
        Self {
            factor,
            severity: Severity::Warning,
            message: format!("{factor}: low score {value:.2}"),
        }
    }

    pub fn positive(factor: FactorKind, value: f64) -> Self {
        Self {
            factor,
            severity: Severity::Ok,
            message: format!("{factor}: strong signal {value:.2}"),
        }
    }
}
