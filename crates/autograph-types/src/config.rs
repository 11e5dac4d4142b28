use serde::{Deserialize, Serialize};

/// The three acceptance thresholds the decision gates compare against.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum score for a batch containing entities to auto-commit.
    pub auto_accept_entity: f64,
    /// Minimum score for a connection-only batch to auto-commit.
    pub auto_accept_connection: f64,
    /// Scores strictly below this floor are rejected outright.
    pub auto_reject_below: f64,
}

/// Rate and queue limits enforced before any auto-commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimits {
    pub max_auto_commits_per_hour: u32,
    pub max_auto_commits_per_day: u32,
    /// Auto-commits stop once this many items await human review.
    pub max_pending_reviews: u32,
    /// Upper bound on creations in a single committed batch.
    pub max_targets_per_commit: u32,
}

/// Allow-list over entity types. `Wildcard` admits every type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityTypeFilter {
    Wildcard,
    Only(Vec<String>),
}

impl EntityTypeFilter {
    pub fn admits(&self, entity_type: &str) -> bool {
        match self {
            EntityTypeFilter::Wildcard => true,
            EntityTypeFilter::Only(types) => types.iter().any(|t| t == entity_type),
        }
    }
}

/// Scope rules: which proposals the engine may decide autonomously.
///
/// Scope violations are policy concerns, not quality concerns — they
/// always queue for review and are never auto-rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeRules {
    pub allowed_entity_types: EntityTypeFilter,
    pub blocked_entity_types: Vec<String>,
    /// Upstream validation must have succeeded.
    pub require_validation: bool,
    /// A critique-survival signal must be present.
    pub require_critique: bool,
}

/// Display-layer flags. Carried in the config so presets round-trip,
/// ignored by the decision core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiFlags {
    pub show_toasts: bool,
    pub show_review_badge: bool,
}

/// Which threshold-adjustment strategy is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdStrategy {
    /// Pass-through, thresholds never move.
    Static,
    /// Ratio of reverted/rejected outcomes over a recent window drives
    /// tightening and loosening.
    GlobalRatio,
}

/// Tuning for dynamic threshold adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentPolicy {
    pub strategy: ThresholdStrategy,
    /// Number of recent decisions considered.
    pub window: usize,
    /// Rejection rate above which thresholds tighten.
    pub tighten_above: f64,
    /// Rejection rate below which thresholds loosen.
    pub loosen_below: f64,
    /// Full adjustment step. Tightening applies the full step to accept
    /// thresholds and half to the reject floor; loosening applies half
    /// to accept thresholds only.
    pub step: f64,
    /// Clamp bounds for the accept thresholds.
    pub accept_bounds: (f64, f64),
    /// Clamp bounds for the reject floor.
    pub reject_bounds: (f64, f64),
}

impl Default for AdjustmentPolicy {
    fn default() -> Self {
        Self {
            strategy: ThresholdStrategy::Static,
            window: 20,
            tighten_above: 0.3,
            loosen_below: 0.05,
            step: 0.05,
            accept_bounds: (0.70, 0.99),
            reject_bounds: (0.10, 0.60),
        }
    }
}

/// Named preset a config was derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigPreset {
    Strict,
    Balanced,
    Permissive,
    /// A user-edited copy of one of the fixed presets.
    Custom,
}

/// Full configuration for the autonomous commit engine.
///
/// A configuration value, not a long-lived entity: the engine holds a
/// snapshot and every provenance record stores the snapshot it was
/// decided under.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AutonomousConfig {
    /// Master switch. When off, every evaluation returns `Disabled`.
    pub enabled: bool,
    pub preset: ConfigPreset,
    pub thresholds: Thresholds,
    pub limits: RateLimits,
    pub scope: ScopeRules,
    pub adjustment: AdjustmentPolicy,
    pub ui: UiFlags,
}

impl AutonomousConfig {
    /// High thresholds, tight limits, validation and critique mandatory.
    pub fn strict() -> Self {
        Self {
            enabled: true,
            preset: ConfigPreset::Strict,
            thresholds: Thresholds {
                auto_accept_entity: 0.95,
                auto_accept_connection: 0.92,
                auto_reject_below: 0.40,
            },
            limits: RateLimits {
                max_auto_commits_per_hour: 5,
                max_auto_commits_per_day: 25,
                max_pending_reviews: 20,
                max_targets_per_commit: 5,
            },
            scope: ScopeRules {
                allowed_entity_types: EntityTypeFilter::Wildcard,
                blocked_entity_types: vec!["person".into()],
                require_validation: true,
                require_critique: true,
            },
            adjustment: AdjustmentPolicy {
                strategy: ThresholdStrategy::GlobalRatio,
                ..AdjustmentPolicy::default()
            },
            ui: UiFlags {
                show_toasts: true,
                show_review_badge: true,
            },
        }
    }

    /// Default operating point.
    pub fn balanced() -> Self {
        Self {
            enabled: true,
            preset: ConfigPreset::Balanced,
            thresholds: Thresholds {
                auto_accept_entity: 0.90,
                auto_accept_connection: 0.85,
                auto_reject_below: 0.30,
            },
            limits: RateLimits {
                max_auto_commits_per_hour: 20,
                max_auto_commits_per_day: 100,
                max_pending_reviews: 50,
                max_targets_per_commit: 10,
            },
            scope: ScopeRules {
                allowed_entity_types: EntityTypeFilter::Wildcard,
                blocked_entity_types: Vec::new(),
                require_validation: true,
                require_critique: false,
            },
            adjustment: AdjustmentPolicy::default(),
            ui: UiFlags {
                show_toasts: true,
                show_review_badge: true,
            },
        }
    }

    /// Low thresholds, generous limits, validation optional.
    pub fn permissive() -> Self {
        Self {
            enabled: true,
            preset: ConfigPreset::Permissive,
            thresholds: Thresholds {
                auto_accept_entity: 0.80,
                auto_accept_connection: 0.75,
                auto_reject_below: 0.20,
            },
            limits: RateLimits {
                max_auto_commits_per_hour: 60,
                max_auto_commits_per_day: 400,
                max_pending_reviews: 200,
                max_targets_per_commit: 25,
            },
            scope: ScopeRules {
                allowed_entity_types: EntityTypeFilter::Wildcard,
                blocked_entity_types: Vec::new(),
                require_validation: false,
                require_critique: false,
            },
            adjustment: AdjustmentPolicy::default(),
            ui: UiFlags::default(),
        }
    }

    /// Mark a config as user-edited.
    pub fn into_custom(mut self) -> Self {
        self.preset = ConfigPreset::Custom;
        self
    }
}

impl Default for AutonomousConfig {
    fn default() -> Self {
        Self::balanced()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_admits_everything() {
        assert!(EntityTypeFilter::Wildcard.admits("anything"));
    }

    #[test]
    fn only_filter_is_exact() {
        let filter = EntityTypeFilter::Only(vec!["concept".into(), "source".into()]);
        assert!(filter.admits("concept"));
        assert!(!filter.admits("person"));
    }

    #[test]
    fn presets_are_ordered_by_strictness() {
        let strict = AutonomousConfig::strict();
        let balanced = AutonomousConfig::balanced();
        let permissive = AutonomousConfig::permissive();

        assert!(strict.thresholds.auto_accept_entity > balanced.thresholds.auto_accept_entity);
        assert!(balanced.thresholds.auto_accept_entity > permissive.thresholds.auto_accept_entity);
        assert!(strict.limits.max_auto_commits_per_hour < permissive.limits.max_auto_commits_per_hour);
    }

    #[test]
    fn editing_a_preset_makes_it_custom() {
        let mut config = AutonomousConfig::balanced();
        config.thresholds.auto_accept_entity = 0.88;
        let config = config.into_custom();
        assert_eq!(config.preset, ConfigPreset::Custom);
    }

    #[test]
    fn config_serialization_round_trip() {
        let config = AutonomousConfig::strict();
        let json = serde_json::to_string(&config).unwrap();
        let restored: AutonomousConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
