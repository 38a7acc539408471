use super::context::TurnContext;
use super::moves::Move;
use super::outcome::Outcome;
use crate::Arbitrary;
use crate::Turn;

/// one completed turn against one opponent. created once the opponent's
/// move becomes known and never mutated afterwards; every predictor
/// consumes the identical record.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Observation {
    pub opponent: String,
    pub turn: Turn,
    pub ours: Move,
    pub theirs: Move,
    pub outcome: Outcome,
    pub context: Option<TurnContext>,
}

impl Observation {
    pub fn new(opponent: &str, turn: Turn, ours: Move, theirs: Move) -> Self {
        Self {
            opponent: opponent.to_string(),
            turn,
            ours,
            theirs,
            outcome: Outcome::of(ours, theirs),
            context: None,
        }
    }
    pub fn with_context(mut self, context: TurnContext) -> Self {
        self.context = Some(context);
        self
    }
}

impl std::fmt::Display for Observation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "t{:<4} {} vs {} {}",
            self.turn, self.ours, self.theirs, self.outcome
        )
    }
}

impl Arbitrary for Observation {
    fn random() -> Self {
        Self::new("anon", 0, Move::random(), Move::random())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_matches_moves() {
        let obs = Observation::new("x", 3, Move::Rock, Move::Scissor);
        assert_eq!(obs.outcome, Outcome::Win);
        let obs = Observation::new("x", 4, Move::Rock, Move::Paper);
        assert_eq!(obs.outcome, Outcome::Loss);
    }
}
