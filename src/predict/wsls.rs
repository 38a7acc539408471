use super::Prediction;
use super::Predictor;
use super::Source;
use crate::combat::Move;
use crate::combat::Observation;
use crate::combat::Outcome;
use crate::simplex::Dist;

/// win-stay/lose-shift behavioral model. tracks, separately for each
/// outcome the opponent just experienced, how often they repeat their
/// previous move versus switch. the forecast concentrates on their last
/// move scaled by the stay rate, remainder split over the other two.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Wsls {
    /// [their prior outcome][stayed = 0, shifted = 1]
    stay: [[f32; 2]; 3],
    /// their previous move and the outcome it earned them
    prev: Option<(Move, Outcome)>,
}

impl Wsls {
    /// Jeffreys-smoothed stay rate after the given outcome
    pub fn stay_rate(&self, after: Outcome) -> f32 {
        let ref row = self.stay[after.index()];
        (row[0] + 0.5) / (row[0] + row[1] + 1.)
    }
}

impl Predictor for Wsls {
    fn update(&mut self, obs: &Observation) {
        if let Some((m, o)) = self.prev {
            let stayed = obs.theirs == m;
            self.stay[o.index()][if stayed { 0 } else { 1 }] += 1.;
        }
        self.prev = Some((obs.theirs, obs.outcome.flip()));
    }

    fn predict(&self) -> Option<Prediction> {
        let (m, o) = self.prev?;
        let ref row = self.stay[o.index()];
        let n = row[0] + row[1];
        if n < 4. {
            return None;
        }
        let stay = self.stay_rate(o);
        let dist = Dist::pointed(m, stay);
        // an even stay rate says nothing at all
        let confidence = (stay - 0.5).abs() * 2. * (n / 20.).min(1.);
        Some(Prediction::new(dist, confidence, Source::Wsls))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_without_prior_outcome_history() {
        let mut model = Wsls::default();
        assert!(model.predict().is_none());
        model.update(&Observation::new("x", 0, Move::Rock, Move::Paper));
        assert!(model.predict().is_none());
    }

    #[test]
    fn detects_a_stayer_after_wins() {
        let mut model = Wsls::default();
        // opponent plays paper into our rock: they keep winning, keep staying
        for t in 0..30 {
            model.update(&Observation::new("x", t, Move::Rock, Move::Paper));
        }
        let p = model.predict().expect("long streak");
        assert_eq!(p.dist.mode(), Move::Paper);
        assert!(model.stay_rate(Outcome::Win) > 0.9);
        assert!(p.confidence > 0.5);
    }

    #[test]
    fn detects_a_shifter_after_losses() {
        let mut model = Wsls::default();
        // we counter whatever they just played; they always switch
        let mut theirs = Move::Rock;
        for t in 0..30 {
            model.update(&Observation::new("x", t, theirs.counter(), theirs));
            theirs = theirs.beats();
        }
        assert!(model.stay_rate(Outcome::Loss) < 0.2);
        let p = model.predict().expect("long streak");
        // mass flows away from their last move
        assert!(p.dist[theirs.counter()] < 0.4);
    }
}
