use crate::Confidence;
use crate::combat::Move;
use crate::meta::Loop;
use crate::predict::Source;
use crate::simplex::Dist;

/// which policy path produced the final move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Rationale {
    /// risk-adjusted argmax over the blended forecast
    Ensemble,
    /// deliberate random move to stay unpredictable
    Exploration,
    /// rolling win rate degraded; countering the historical modal move
    Defensive,
    /// an adaptation loop supplied the target distribution
    Override(Loop),
    /// nothing to go on yet
    ColdStart,
}

impl std::fmt::Display for Rationale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Override(l) => write!(f, "override({})", l),
            r => write!(f, "{:?}", r),
        }
    }
}

/// the engine's final answer for one turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub choice: Move,
    pub confidence: Confidence,
    /// the heaviest contributor to the blend
    pub source: Source,
    pub rationale: Rationale,
    /// the opponent forecast the choice was scored against
    pub forecast: Dist,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({:.2}) via {} [{}]",
            self.choice, self.confidence, self.source, self.rationale
        )
    }
}
