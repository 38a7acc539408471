use crate::HISTORY_CAP;
use crate::Probability;
use crate::Turn;
use crate::combat::EpisodeSummary;
use crate::combat::Move;
use crate::combat::Observation;
use crate::combat::Outcome;
use crate::engine::Phase;
use crate::meta::Forecast;
use crate::predict::Predictors;

/// everything the engine knows about one opponent. exclusively owned by
/// the task driving that opponent's battles; never shared for mutation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OpponentProfile {
    pub id: String,
    /// turns observed over the profile's lifetime
    pub turn: Turn,
    /// turns observed in the current episode
    pub episode_turn: Turn,
    pub predictors: Predictors,
    pub phase: Phase,
    history: Vec<Observation>,
    /// observations of the episode in progress
    episode: Vec<Observation>,
    episodes: Vec<EpisodeSummary>,
    /// lifetime opponent move counts
    counts: [f32; 3],
    /// standing forecast from the episode-chain analyzer, if any
    chain: Option<Forecast>,
}

impl OpponentProfile {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            turn: 0,
            episode_turn: 0,
            predictors: Predictors::default(),
            phase: Phase::Idle,
            history: Vec::new(),
            episode: Vec::new(),
            episodes: Vec::new(),
            counts: [0.; 3],
            chain: None,
        }
    }
    /// fold one completed turn into every predictor and every ledger
    pub fn observe(&mut self, obs: Observation) {
        self.predictors.observe(&obs);
        self.counts[obs.theirs.index()] += 1.;
        self.history.push(obs.clone());
        if self.history.len() > HISTORY_CAP {
            self.history.drain(..self.history.len() - HISTORY_CAP);
        }
        self.episode.push(obs);
        if self.episode.len() > HISTORY_CAP {
            self.episode.drain(..self.episode.len() - HISTORY_CAP);
        }
        self.turn += 1;
        self.episode_turn += 1;
    }
    /// close the episode in progress: summarize it, refresh the chain
    /// forecast, and reset within-episode state
    pub fn close_episode(&mut self) {
        if self.episode.is_empty() {
            return;
        }
        let summary = self.episode.iter().collect::<EpisodeSummary>();
        log::debug!("{:<32}{:<32}", "episode closed", &summary);
        self.episodes.push(summary);
        self.episode.clear();
        self.episode_turn = 0;
        self.chain = Forecast::over(&self.episodes);
    }
    /// the opponent's single most frequent move over the full history
    pub fn modal(&self) -> Move {
        Move::ALL
            .into_iter()
            .max_by(|a, b| {
                self.counts[a.index()]
                    .partial_cmp(&self.counts[b.index()])
                    .expect("counts are finite")
            })
            .expect("ALL is nonempty")
    }
    /// win rate over the last `window` turns, or None until the window
    /// has filled once
    pub fn win_rate(&self, window: usize) -> Option<Probability> {
        if self.history.len() < window || window == 0 {
            return None;
        }
        let recent = &self.history[self.history.len() - window..];
        let wins = recent
            .iter()
            .filter(|o| o.outcome == Outcome::Win)
            .count();
        Some(wins as Probability / window as Probability)
    }
    pub fn recent(&self) -> &[Observation] {
        &self.history
    }
    pub fn episodes(&self) -> &[EpisodeSummary] {
        &self.episodes
    }
    pub fn chain(&self) -> Option<&Forecast> {
        self.chain.as_ref()
    }
}
