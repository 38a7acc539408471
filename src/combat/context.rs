use super::moves::Move;
use super::moveset::MoveSet;
use crate::Probability;
use crate::Utility;

/// numeric turn features supplied by the battle session. every field is
/// optional in spirit: a missing or nonsensical context downgrades risk
/// adjustment to flat payoffs instead of failing the turn.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TurnContext {
    /// our health fraction in [0, 1]
    pub our_health: Probability,
    /// our shield fraction in [0, 1]
    pub our_shield: Probability,
    /// opponent health fraction in [0, 1]
    pub opp_health: Probability,
    /// damage dealt by each opponent move, indexed by Move
    pub opp_attack: [Utility; 3],
    /// our remaining charges per move
    pub charges: [u8; 3],
}

impl TurnContext {
    /// fractions in range and attacks non-negative; anything else is
    /// treated as an absent context upstream
    pub fn sane(&self) -> bool {
        let frac = |x: Probability| (0.0..=1.0).contains(&x) && x.is_finite();
        frac(self.our_health)
            && frac(self.our_shield)
            && frac(self.opp_health)
            && self.opp_attack.iter().all(|a| a.is_finite() && *a >= 0.)
    }
    /// could this opponent move end us this turn?
    pub fn lethal(&self, theirs: Move) -> bool {
        self.opp_attack[theirs.index()] >= self.our_health
    }
    /// any lethal threat on the board at all
    pub fn threatened(&self) -> bool {
        Move::ALL.into_iter().any(|m| self.lethal(m))
    }
    pub fn available(&self) -> MoveSet {
        MoveSet::from_charges(self.charges)
    }
}
