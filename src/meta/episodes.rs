use crate::CHAIN_FADE_TURNS;
use crate::CHAIN_RATE;
use crate::CHAIN_SUPPORT;
use crate::Confidence;
use crate::Turn;
use crate::combat::EpisodeSummary;
use crate::combat::Move;
use crate::predict::Prediction;
use crate::predict::Source;
use crate::simplex::Dist;

/// a behavioral regularity between consecutive completed episodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Chain {
    /// next dominant counters whatever beat last episode's dominant
    CounterBeater,
    /// dominant rotates one step along the cycle each episode
    Rotation,
    /// keeps the dominant after a won episode, abandons it after a loss
    StayWinShiftLose,
    /// next dominant counters their own previous dominant
    CounterSelf,
}

impl Chain {
    // ties resolve toward the later, more specific pattern
    pub const ALL: [Self; 4] = [
        Self::StayWinShiftLose,
        Self::CounterBeater,
        Self::Rotation,
        Self::CounterSelf,
    ];

    /// does this transition fit the pattern?
    fn fits(&self, prev: &EpisodeSummary, next: &EpisodeSummary) -> bool {
        match self {
            // what beat them was prev.dominant.counter(); countering that
            // lands two steps along the cycle
            Self::CounterBeater => next.dominant == prev.dominant.counter().counter(),
            Self::Rotation => next.dominant == prev.dominant.beats(),
            Self::StayWinShiftLose => match prev.won() {
                true => next.dominant == prev.dominant,
                false => next.dominant != prev.dominant,
            },
            Self::CounterSelf => next.dominant == prev.dominant.counter(),
        }
    }
    /// the dominant move this pattern forecasts after the given episode
    fn extrapolate(&self, last: &EpisodeSummary) -> Move {
        match self {
            Self::CounterBeater => last.dominant.counter().counter(),
            Self::Rotation => last.dominant.beats(),
            // a shift is underdetermined; expect the self-counter
            Self::StayWinShiftLose => match last.won() {
                true => last.dominant,
                false => last.dominant.counter(),
            },
            Self::CounterSelf => last.dominant.counter(),
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// at most one detected chain with its forecast dominant for the
/// upcoming episode.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Forecast {
    pub chain: Chain,
    pub dominant: Move,
    pub confidence: Confidence,
}

impl Forecast {
    /// the episode history's best-supported chain, if any clears the
    /// minimum transition count and rate
    pub fn over(episodes: &[EpisodeSummary]) -> Option<Self> {
        if episodes.len() < CHAIN_SUPPORT + 1 {
            return None;
        }
        let transitions = episodes.len() - 1;
        let last = episodes.last().expect("nonempty by guard");
        Chain::ALL
            .into_iter()
            .map(|chain| {
                let hits = episodes
                    .windows(2)
                    .filter(|w| chain.fits(&w[0], &w[1]))
                    .count();
                (chain, hits as f32 / transitions as f32)
            })
            .filter(|(_, rate)| *rate > CHAIN_RATE)
            .max_by(|a, b| a.1.partial_cmp(&b.1).expect("rates are finite"))
            .map(|(chain, rate)| Self {
                chain,
                dominant: chain.extrapolate(last),
                confidence: rate,
            })
    }
    /// advisory forecast for the first turns of a fresh episode, fading
    /// as within-episode observations accumulate
    pub fn prediction(&self, turn: Turn) -> Option<Prediction> {
        if turn >= CHAIN_FADE_TURNS {
            return None;
        }
        let fade = 1. - turn as f32 / CHAIN_FADE_TURNS as f32;
        Some(Prediction::new(
            Dist::pointed(self.dominant, 0.7),
            self.confidence * fade,
            Source::Chain,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(dominant: Move, win_rate: f32) -> EpisodeSummary {
        EpisodeSummary {
            dominant,
            win_rate,
            turns: 20,
            dist: Dist::pointed(dominant, 0.8),
        }
    }

    #[test]
    fn too_few_episodes_forecast_nothing() {
        let history = vec![episode(Move::Rock, 0.4); 3];
        assert!(Forecast::over(&history).is_none());
    }

    #[test]
    fn rotation_is_detected() {
        let mut dominant = Move::Rock;
        let mut history = Vec::new();
        for _ in 0..5 {
            history.push(episode(dominant, 0.5));
            dominant = dominant.beats();
        }
        let f = Forecast::over(&history).expect("clean rotation");
        assert_eq!(f.chain, Chain::Rotation);
        assert_eq!(f.dominant, history.last().unwrap().dominant.beats());
        assert!(f.confidence > 0.9);
    }

    #[test]
    fn self_counter_is_detected() {
        let mut dominant = Move::Rock;
        let mut history = Vec::new();
        for _ in 0..5 {
            history.push(episode(dominant, 0.5));
            dominant = dominant.counter();
        }
        let f = Forecast::over(&history).expect("clean self-counter");
        assert_eq!(f.chain, Chain::CounterSelf);
        assert_eq!(f.dominant, history.last().unwrap().dominant.counter());
    }

    #[test]
    fn forecast_fades_within_episode() {
        let f = Forecast {
            chain: Chain::Rotation,
            dominant: Move::Paper,
            confidence: 0.8,
        };
        let first = f.prediction(0).expect("fresh episode");
        let later = f.prediction(3).expect("still early");
        assert!(first.confidence > later.confidence);
        assert!(f.prediction(CHAIN_FADE_TURNS).is_none());
        assert_eq!(first.dist.mode(), Move::Paper);
    }
}
