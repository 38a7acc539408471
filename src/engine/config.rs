use crate::Probability;
use crate::Turn;

/// decision-policy knobs, fixed at engine construction. defaults mirror
/// the crate-level constants; simulations and tests override fields.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// chance of playing a uniformly random available move instead of
    /// the ensemble choice
    pub exploration_rate: Probability,
    /// observations before predictors earn full sample weight
    pub min_battles_for_confidence: usize,
    /// turns before the blend earns full early-game weight
    pub early_ramp: Turn,
    /// rolling win rate below which the defensive fallback engages
    pub defensive_threshold: Probability,
    /// rolling outcome window length
    pub recent_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exploration_rate: crate::EXPLORATION_RATE,
            min_battles_for_confidence: crate::MIN_BATTLES_FOR_CONFIDENCE,
            early_ramp: crate::EARLY_RAMP,
            defensive_threshold: crate::DEFENSIVE_THRESHOLD,
            recent_window: crate::RECENT_WINDOW,
        }
    }
}

impl Config {
    /// a deterministic engine for tests and head-to-head evaluation
    pub fn pure() -> Self {
        Self {
            exploration_rate: 0.,
            ..Self::default()
        }
    }
}
