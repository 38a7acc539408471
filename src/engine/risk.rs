use crate::LETHAL_DRAW;
use crate::LETHAL_LOSS;
use crate::SOFT_LOSS;
use crate::Utility;
use crate::combat::Move;
use crate::combat::Outcome;
use crate::combat::TurnContext;
use crate::simplex::Density;

/// payoff weights for the three outcomes under current game context.
///
/// flat ±1 scoring is the fallback shape; with a sane context, lethal
/// turns pull draw toward win and make loss steeply negative (surviving
/// outranks expected value), while safe turns value draws by how much
/// shield regeneration is worth and only lightly penalize losses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Payoffs {
    pub win: Utility,
    pub draw: Utility,
    pub loss: Utility,
}

impl Payoffs {
    pub fn flat() -> Self {
        Self {
            win: 1.,
            draw: 0.,
            loss: -1.,
        }
    }
    pub fn from_context(context: Option<&TurnContext>) -> Self {
        match context {
            Some(ctx) if ctx.sane() => {
                if ctx.threatened() {
                    Self {
                        win: 1.,
                        draw: LETHAL_DRAW,
                        loss: LETHAL_LOSS,
                    }
                } else {
                    Self {
                        win: 1.,
                        draw: 0.5 * (1. - ctx.our_shield),
                        loss: SOFT_LOSS,
                    }
                }
            }
            _ => Self::flat(),
        }
    }
    pub fn score(&self, outcome: Outcome) -> Utility {
        match outcome {
            Outcome::Win => self.win,
            Outcome::Draw => self.draw,
            Outcome::Loss => self.loss,
        }
    }
    /// expected payoff of playing `ours` against any forecast density
    pub fn expected<D>(&self, ours: Move, forecast: &D) -> Utility
    where
        D: Density<S = Move>,
    {
        Move::ALL
            .into_iter()
            .map(|theirs| forecast.density(&theirs) * self.score(Outcome::of(ours, theirs)))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TurnContext {
        TurnContext {
            our_health: 0.6,
            our_shield: 0.4,
            opp_health: 0.8,
            opp_attack: [0.2, 0.3, 0.1],
            charges: [3, 3, 3],
        }
    }

    #[test]
    fn missing_context_scores_flat() {
        assert_eq!(Payoffs::from_context(None), Payoffs::flat());
    }

    #[test]
    fn insane_context_scores_flat() {
        let mut broken = ctx();
        broken.opp_attack[1] = f32::NAN;
        assert_eq!(Payoffs::from_context(Some(&broken)), Payoffs::flat());
    }

    #[test]
    fn lethal_turns_prioritize_survival() {
        let mut danger = ctx();
        danger.our_health = 0.25;
        let payoffs = Payoffs::from_context(Some(&danger));
        assert_eq!(payoffs.loss, LETHAL_LOSS);
        assert!(payoffs.win - payoffs.draw < 0.5);
    }

    #[test]
    fn draws_gain_value_as_shield_drops() {
        let mut low = ctx();
        low.our_shield = 0.1;
        let mut high = ctx();
        high.our_shield = 0.9;
        let low = Payoffs::from_context(Some(&low));
        let high = Payoffs::from_context(Some(&high));
        assert!(low.draw > high.draw);
    }

    #[test]
    fn expected_payoff_rewards_countering_the_forecast() {
        use crate::simplex::Dist;
        let payoffs = Payoffs::flat();
        let forecast = Dist::pointed(Move::Rock, 0.9);
        let paper = payoffs.expected(Move::Paper, &forecast);
        let rock = payoffs.expected(Move::Rock, &forecast);
        let scissor = payoffs.expected(Move::Scissor, &forecast);
        assert!(paper > rock);
        assert!(paper > scissor);
    }
}
