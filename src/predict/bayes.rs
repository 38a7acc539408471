use super::Prediction;
use super::Predictor;
use super::Source;
use crate::BAYES_FLOOR;
use crate::BAYES_FOCUS;
use crate::Confidence;
use crate::Probability;
use crate::combat::Move;
use crate::combat::Observation;
use crate::simplex::Dist;

/// the behavioral archetypes an opponent may embody. each defines a
/// likelihood of the next observed move given recent history, and the
/// posterior over all five is maintained online.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Archetype {
    /// plays uniformly at random
    Random,
    /// prefers some moves unconditionally
    Biased,
    /// counters our previous move
    Counter,
    /// copies our previous move
    Copier,
    /// follows its own first-order move sequence
    Sequence,
}

impl Archetype {
    pub const ALL: [Self; 5] = [
        Self::Random,
        Self::Biased,
        Self::Counter,
        Self::Copier,
        Self::Sequence,
    ];

    fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|a| a == self)
            .expect("archetype is listed")
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Bayesian opponent-type model. after each observation the posterior is
/// reweighted by each archetype's likelihood of the move that actually
/// appeared, floored so no type is ever permanently ruled out. the
/// forecast is the posterior-weighted mixture of each archetype's own
/// implied distribution.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bayes {
    posterior: [Probability; 5],
    dirichlet: [f32; 3],
    transitions: [[f32; 3]; 3],
    our_last: Option<Move>,
    their_last: Option<Move>,
    n: usize,
}

impl Default for Bayes {
    fn default() -> Self {
        Self {
            posterior: [1. / 5.; 5],
            dirichlet: [0.; 3],
            transitions: [[0.; 3]; 3],
            our_last: None,
            their_last: None,
            n: 0,
        }
    }
}

impl Bayes {
    /// posterior mass currently on an archetype
    pub fn belief(&self, archetype: Archetype) -> Probability {
        self.posterior[archetype.index()]
    }
    /// the archetype's own predictive distribution under current statistics
    fn implied(&self, archetype: Archetype) -> Dist {
        match archetype {
            Archetype::Random => Dist::uniform(),
            Archetype::Biased => Dist::try_from([
                self.dirichlet[0] + 0.5,
                self.dirichlet[1] + 0.5,
                self.dirichlet[2] + 0.5,
            ])
            .expect("pseudo-counts are positive"),
            Archetype::Counter => match self.our_last {
                Some(m) => Dist::pointed(m.counter(), BAYES_FOCUS),
                None => Dist::uniform(),
            },
            Archetype::Copier => match self.our_last {
                Some(m) => Dist::pointed(m, BAYES_FOCUS),
                None => Dist::uniform(),
            },
            Archetype::Sequence => match self.their_last {
                Some(m) => {
                    let ref row = self.transitions[m.index()];
                    Dist::try_from([row[0] + 0.5, row[1] + 0.5, row[2] + 0.5])
                        .expect("pseudo-counts are positive")
                }
                None => Dist::uniform(),
            },
        }
    }
    /// concentration of the posterior, used as forecast confidence
    fn conviction(&self) -> Confidence {
        let h = self
            .posterior
            .iter()
            .filter(|p| **p > 0.)
            .map(|p| -p * p.ln())
            .sum::<f32>();
        1. - h / (5f32).ln()
    }
    fn renormalize(&mut self) {
        let sum = self.posterior.iter().sum::<Probability>();
        for p in self.posterior.iter_mut() {
            *p /= sum;
        }
    }
}

impl Predictor for Bayes {
    fn update(&mut self, obs: &Observation) {
        for archetype in Archetype::ALL {
            let likelihood = self.implied(archetype)[obs.theirs];
            self.posterior[archetype.index()] *= likelihood;
        }
        self.renormalize();
        for p in self.posterior.iter_mut() {
            *p = p.max(BAYES_FLOOR);
        }
        self.renormalize();
        self.dirichlet[obs.theirs.index()] += 1.;
        if let Some(m) = self.their_last {
            self.transitions[m.index()][obs.theirs.index()] += 1.;
        }
        self.our_last = Some(obs.ours);
        self.their_last = Some(obs.theirs);
        self.n += 1;
    }

    fn predict(&self) -> Option<Prediction> {
        if self.n < 3 {
            return None;
        }
        let mut mixture = [0f32; 3];
        for archetype in Archetype::ALL {
            let weight = self.belief(archetype);
            let implied = self.implied(archetype);
            for m in Move::ALL {
                mixture[m.index()] += weight * implied[m];
            }
        }
        let dist = Dist::try_from(mixture).ok()?;
        // a posterior certain of the Random archetype is certain of
        // nothing exploitable; conviction only counts when the mixture
        // actually leans somewhere
        let lean = (dist.slack() * 1.5).clamp(0., 1.);
        let confidence = self.conviction() * lean * (self.n as f32 / 15.).min(1.);
        Some(Prediction::new(dist, confidence, Source::Bayes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_before_three_observations() {
        let mut model = Bayes::default();
        assert!(model.predict().is_none());
        model.update(&Observation::new("x", 0, Move::Rock, Move::Paper));
        assert!(model.predict().is_none());
    }

    #[test]
    fn counter_archetype_dominates_against_counter_bot() {
        let mut model = Bayes::default();
        let mut prev = Move::Rock;
        for t in 0..20 {
            let ours = Move::from(t);
            let theirs = prev.counter();
            model.update(&Observation::new("x", t, ours, theirs));
            prev = ours;
        }
        assert!(model.belief(Archetype::Counter) > 0.6);
        let p = model.predict().expect("history is sufficient");
        assert_eq!(p.dist.mode(), prev.counter());
    }

    #[test]
    fn biased_archetype_dominates_against_constant_bot() {
        let mut model = Bayes::default();
        for t in 0..30 {
            model.update(&Observation::new("x", t, Move::from(t), Move::Rock));
        }
        let biased = model.belief(Archetype::Biased);
        let sequence = model.belief(Archetype::Sequence);
        assert!(biased + sequence > 0.8);
        assert_eq!(model.predict().expect("sufficient").dist.mode(), Move::Rock);
    }

    #[test]
    fn posterior_stays_normalized() {
        let mut model = Bayes::default();
        for t in 0..50 {
            model.update(&Observation::new("x", t, Move::from(t * 2), Move::from(t)));
            let sum = Archetype::ALL.into_iter().map(|a| model.belief(a)).sum::<f32>();
            assert!((sum - 1.).abs() < 1e-4);
        }
    }
}
