use super::blend::Blend;
use super::config::Config;
use super::decision::Decision;
use super::decision::Rationale;
use super::phase::Phase;
use super::risk::Payoffs;
use crate::Utility;
use crate::combat::Move;
use crate::combat::MoveSet;
use crate::combat::Observation;
use crate::combat::TurnContext;
use crate::meta::Signal;
use crate::predict::Source;
use crate::profile::OpponentProfile;
use crate::profile::Snapshot;
use crate::profile::Store;
use crate::simplex::Dist;

/// how much a conditioned context-tree response bends the forecast when
/// scoring one candidate move
const RESPONSE_MIX: f32 = 0.3;
/// score slack treated as a tie during move selection
const TIE_SLACK: Utility = 1e-6;

/// per-turn input from the battle-session collaborator: which of our
/// moves still have charges, and the numeric turn features if known.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TurnInput {
    pub available: MoveSet,
    pub context: Option<TurnContext>,
}

impl From<TurnContext> for TurnInput {
    fn from(context: TurnContext) -> Self {
        Self {
            available: context.available(),
            context: Some(context),
        }
    }
}

/// the opponent-modeling decision engine. owns every profile it has
/// ever seen and runs the cyclic turn machine per opponent:
/// gather forecasts, blend, adjust for risk, select under the
/// exploration and defensive policies, then fold in the real outcome.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: Config,
    store: Store,
}

impl From<Config> for Engine {
    fn from(config: Config) -> Self {
        Self {
            config,
            store: Store::default(),
        }
    }
}

impl Engine {
    pub fn config(&self) -> &Config {
        &self.config
    }
    pub fn profile(&self, id: &str) -> Option<&OpponentProfile> {
        self.store.peek(id)
    }
    pub fn opponents(&self) -> impl Iterator<Item = &str> {
        self.store.ids()
    }

    /// the only call a collaborator needs for a move recommendation.
    /// never fails: with nothing to go on it explores.
    pub fn decide(&mut self, id: &str, input: &TurnInput) -> Decision {
        let config = self.config;
        let profile = self.store.profile(id);
        if !profile.phase.ready() {
            log::warn!("{:<32}{:<32}", "decision out of phase", profile.phase);
        }
        let available = match input.available.is_empty() {
            true => MoveSet::all(),
            false => input.available,
        };
        profile.phase = Phase::Gather;
        let mut predictions = profile.predictors.gather();
        if let Some(chain) = profile.chain() {
            if let Some(p) = chain.prediction(profile.episode_turn) {
                predictions.push(p);
            }
        }
        profile.phase = Phase::Blend;
        let mut blend = Blend::over(&predictions, profile.turn, profile.turn, &config);
        let mut rationale = Rationale::Ensemble;
        if let Some(signal) = Signal::over(profile.recent()) {
            log::debug!("{:<32}{:<32}", "adaptation loop", signal.kind);
            blend = Blend {
                forecast: signal.target,
                confidence: signal.confidence,
                source: Source::Loop,
            };
            rationale = Rationale::Override(signal.kind);
        }
        profile.phase = Phase::RiskAdjust;
        let payoffs = Payoffs::from_context(input.context.as_ref());
        profile.phase = Phase::Select;
        let ref mut rng = crate::rng(id, profile.turn);
        let degraded = profile
            .win_rate(config.recent_window)
            .is_some_and(|rate| rate < config.defensive_threshold);
        let choice = if degraded {
            rationale = Rationale::Defensive;
            let target = profile.modal().counter();
            log::info!("{:<32}{:<32}", "defensive fallback active", target);
            match available.contains(target) {
                true => target,
                false => Self::argmax(profile, &blend.forecast, &payoffs, available),
            }
        } else if Self::roll(rng, config.exploration_rate) {
            rationale = Rationale::Exploration;
            Self::any(rng, available)
        } else if blend.confidence <= 0. {
            rationale = Rationale::ColdStart;
            Self::any(rng, available)
        } else {
            Self::argmax(profile, &blend.forecast, &payoffs, available)
        };
        profile.phase = Phase::AwaitOutcome;
        let decision = Decision {
            choice,
            confidence: blend.confidence,
            source: blend.source,
            rationale,
            forecast: blend.forecast,
        };
        log::debug!("{:<32}{:<32}", id, decision);
        decision
    }

    /// feed the completed turn back into every model. exactly once per
    /// decision, in turn order; violations are logged and absorbed.
    pub fn record(&mut self, obs: Observation) {
        let profile = self.store.profile(&obs.opponent);
        if !profile.phase.pending() {
            log::warn!("{:<32}{:<32}", "observation out of phase", profile.phase);
        }
        if obs.turn != profile.turn {
            log::warn!(
                "{:<32}expected {}, got {}",
                "turn index mismatch",
                profile.turn,
                obs.turn
            );
        }
        profile.phase = Phase::Update;
        profile.observe(obs);
        profile.phase = Phase::Idle;
    }

    /// the engagement ended; summarize it for the episode-chain analyzer
    /// and leave the profile consistent for the next one
    pub fn close_episode(&mut self, id: &str) {
        let profile = self.store.profile(id);
        profile.close_episode();
        profile.phase = Phase::Idle;
    }

    /// serializable snapshot for persistence across restarts
    pub fn export(&self, id: &str) -> Option<Snapshot> {
        self.store.export(id)
    }
    /// restore a snapshot; stale versions are refused and the engine
    /// simply continues fresh
    pub fn import(&mut self, snapshot: Snapshot) -> bool {
        self.store.import(snapshot)
    }

    /// expected-payoff argmax over the available moves, folding in the
    /// context tree's conditioned response per candidate; ties prefer
    /// the move that beats the forecast's modal move
    fn argmax(
        profile: &OpponentProfile,
        forecast: &Dist,
        payoffs: &Payoffs,
        available: MoveSet,
    ) -> Move {
        let favorite = forecast.mode().counter();
        let mut best: Option<(Move, Utility)> = None;
        for candidate in available.iter() {
            let induced = profile
                .predictors
                .pattern
                .respond(candidate)
                .map(|response| forecast.mix(&response, RESPONSE_MIX))
                .unwrap_or(*forecast);
            let value = payoffs.expected(candidate, &induced);
            best = match best {
                None => Some((candidate, value)),
                Some((_, held)) if value > held + TIE_SLACK => Some((candidate, value)),
                Some((_, held)) if (value - held).abs() <= TIE_SLACK && candidate == favorite => {
                    Some((candidate, value))
                }
                keep => keep,
            };
        }
        best.map(|(m, _)| m).expect("available set is nonempty")
    }
    fn any(rng: &mut rand::rngs::SmallRng, available: MoveSet) -> Move {
        use rand::prelude::IndexedRandom;
        available
            .iter()
            .collect::<Vec<_>>()
            .choose(rng)
            .copied()
            .expect("available set is nonempty")
    }
    fn roll(rng: &mut rand::rngs::SmallRng, rate: f32) -> bool {
        use rand::Rng;
        rate > 0. && rng.random::<f32>() < rate
    }
}
