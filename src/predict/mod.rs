//! The predictor set: independent models consuming the same observation
//! stream, each producing a forecast over the opponent's next move.
//!
//! Every variant hides behind the same two-method contract, so the
//! decision engine can gather forecasts uniformly and a model can be
//! added, disabled, or fail on a turn without touching the combiner.

mod bayes;
mod hypothesis;
mod markov;
mod pattern;
mod prediction;
mod recurrent;
mod wsls;

pub use bayes::*;
pub use hypothesis::*;
pub use markov::*;
pub use pattern::*;
pub use prediction::*;
pub use recurrent::*;
pub use wsls::*;

use crate::combat::Observation;

/// shared contract over the predictor set. `update` folds one observed
/// turn into the model's sufficient statistics; `predict` produces a
/// forecast or `None` when the model has nothing defensible to say.
/// insufficient history is a normal condition, not an error.
pub trait Predictor {
    fn update(&mut self, obs: &Observation);
    fn predict(&self) -> Option<Prediction>;
}

/// the full model registry for one opponent. updates fan out to every
/// member; forecasts are gathered from whoever can produce one.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Predictors {
    pub markov: Markov,
    pub bayes: Bayes,
    pub pattern: Pattern,
    pub recurrent: Recurrent,
    pub wsls: Wsls,
    pub hypotheses: Hypotheses,
}

impl Predictors {
    pub fn observe(&mut self, obs: &Observation) {
        for model in self.each_mut() {
            model.update(obs);
        }
    }
    /// every forecast the set can currently defend
    pub fn gather(&self) -> Vec<Prediction> {
        self.each()
            .into_iter()
            .filter_map(|model| model.predict())
            .filter(|p| p.dist.valid())
            .collect()
    }
    fn each(&self) -> [&dyn Predictor; 6] {
        [
            &self.markov,
            &self.bayes,
            &self.pattern,
            &self.recurrent,
            &self.wsls,
            &self.hypotheses,
        ]
    }
    fn each_mut(&mut self) -> [&mut dyn Predictor; 6] {
        [
            &mut self.markov,
            &mut self.bayes,
            &mut self.pattern,
            &mut self.recurrent,
            &mut self.wsls,
            &mut self.hypotheses,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Move;

    #[test]
    fn gather_is_empty_before_any_observation() {
        assert!(Predictors::default().gather().is_empty());
    }

    #[test]
    fn gathered_forecasts_are_valid_distributions() {
        let mut set = Predictors::default();
        for t in 0..200 {
            let obs = Observation::new("x", t, Move::from(t), Move::from(t * 2));
            set.observe(&obs);
            for p in set.gather() {
                assert!(p.dist.valid());
                assert!((0. ..=1.).contains(&p.confidence));
            }
        }
    }
}
