use super::Prediction;
use super::Predictor;
use super::Source;
use crate::CHI2_CRITICAL;
use crate::Confidence;
use crate::HYPOTHESIS_BOOST;
use crate::HYPOTHESIS_DECAY;
use crate::HYPOTHESIS_FADE;
use crate::HYPOTHESIS_FLOOR;
use crate::HYPOTHESIS_SUPPORT;
use crate::Z_CRITICAL;
use crate::combat::Move;
use crate::combat::Observation;
use crate::combat::Outcome;
use crate::simplex::Dist;

/// a simple named claim about the opponent, testable against the
/// recency-weighted observation set.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Hypothesis {
    /// fixed preference for one move
    Bias(Move),
    /// counters our previous move
    Counter,
    /// copies our previous move
    Copier,
    /// stay/shift behavior after this outcome differs from coin-flip
    Result(Outcome),
}

impl std::fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bias(m) => write!(f, "bias({})", m),
            Self::Counter => write!(f, "counter"),
            Self::Copier => write!(f, "copier"),
            Self::Result(o) => write!(f, "result({})", o),
        }
    }
}

/// a hypothesis that passed its test, scored online thereafter:
/// confidence multiplies up on correct modal predictions, down on
/// misses, and the hypothesis is discarded once it falls below floor.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
struct Held {
    hypothesis: Hypothesis,
    confidence: Confidence,
}

/// statistical hypothesis detector. maintains exponentially decayed
/// sufficient statistics and runs a small battery each turn: move bias
/// (chi-square against uniform), reactive counter/copy of our last move
/// (z-test against 1/3), and result-conditioned switching (z-test
/// against 1/2). only claims that clear both the critical value and the
/// minimum weighted sample count are retained.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Hypotheses {
    weight: f32,
    moves: [f32; 3],
    /// decayed turns where our previous move was known
    reactive: f32,
    countered: f32,
    copied: f32,
    /// decayed [their prior outcome][stayed = 0, shifted = 1]
    stay: [[f32; 2]; 3],
    /// raw sample counts gating each test family; the rates above stay
    /// recency-weighted, but support is counted in real observations
    seen: usize,
    reacted: usize,
    resulted: [usize; 3],
    our_last: Option<Move>,
    their_last: Option<(Move, Outcome)>,
    held: Vec<Held>,
}

impl Default for Hypotheses {
    fn default() -> Self {
        Self {
            weight: 0.,
            moves: [0.; 3],
            reactive: 0.,
            countered: 0.,
            copied: 0.,
            stay: [[0.; 2]; 3],
            seen: 0,
            reacted: 0,
            resulted: [0; 3],
            our_last: None,
            their_last: None,
            held: Vec::new(),
        }
    }
}

impl Hypotheses {
    /// is any hypothesis currently retained?
    pub fn detected(&self) -> bool {
        !self.held.is_empty()
    }
    /// the retained claims, strongest first
    pub fn holdings(&self) -> impl Iterator<Item = (Hypothesis, Confidence)> + '_ {
        self.held.iter().map(|h| (h.hypothesis, h.confidence))
    }
    /// the distribution a hypothesis implies for the next move
    fn implied(&self, hypothesis: Hypothesis) -> Dist {
        match hypothesis {
            Hypothesis::Bias(_) => {
                Dist::try_from(self.moves).unwrap_or_default()
            }
            Hypothesis::Counter => match self.our_last {
                Some(m) => Dist::pointed(m.counter(), 0.8),
                None => Dist::uniform(),
            },
            Hypothesis::Copier => match self.our_last {
                Some(m) => Dist::pointed(m, 0.8),
                None => Dist::uniform(),
            },
            Hypothesis::Result(after) => match self.their_last {
                Some((m, o)) if o == after => {
                    let ref row = self.stay[after.index()];
                    let stay = (row[0] + 1.) / (row[0] + row[1] + 2.);
                    Dist::pointed(m, stay)
                }
                _ => Dist::uniform(),
            },
        }
    }
    /// chi-square goodness-of-fit of decayed move counts against uniform
    fn chi2(&self) -> f32 {
        let expected = self.weight / 3.;
        if expected <= 0. {
            return 0.;
        }
        self.moves
            .iter()
            .map(|c| (c - expected).powi(2) / expected)
            .sum()
    }
    /// one-sided z of a reactive rate against the 1/3 baseline
    fn reactive_z(&self, hits: f32) -> f32 {
        if self.reactive <= 0. {
            return 0.;
        }
        let p = hits / self.reactive;
        (p - 1. / 3.) / ((2. / 9.) / self.reactive).sqrt()
    }
    /// two-sided z of a stay rate against the 1/2 baseline
    fn stay_z(&self, after: Outcome) -> f32 {
        let ref row = self.stay[after.index()];
        let n = row[0] + row[1];
        if n <= 0. {
            return 0.;
        }
        let p = row[0] / n;
        (p - 0.5).abs() / (0.25 / n).sqrt()
    }
    /// every hypothesis currently clearing its test
    fn battery(&self) -> Vec<Hypothesis> {
        let support = HYPOTHESIS_SUPPORT;
        let mut passed = Vec::new();
        if self.seen >= support && self.chi2() > CHI2_CRITICAL {
            let modal = Dist::try_from(self.moves)
                .map(|d| d.mode())
                .unwrap_or(Move::Rock);
            passed.push(Hypothesis::Bias(modal));
        }
        if self.reacted >= support {
            if self.reactive_z(self.countered) > Z_CRITICAL {
                passed.push(Hypothesis::Counter);
            }
            if self.reactive_z(self.copied) > Z_CRITICAL {
                passed.push(Hypothesis::Copier);
            }
        }
        for outcome in [Outcome::Win, Outcome::Loss, Outcome::Draw] {
            if self.resulted[outcome.index()] >= support && self.stay_z(outcome) > Z_CRITICAL {
                passed.push(Hypothesis::Result(outcome));
            }
        }
        passed
    }
}

impl Predictor for Hypotheses {
    fn update(&mut self, obs: &Observation) {
        // score current holdings against the move that actually appeared
        for i in 0..self.held.len() {
            let implied = match self.held[i].hypothesis {
                Hypothesis::Bias(m) => Dist::pointed(m, 0.8),
                h => self.implied(h),
            };
            let ref mut held = self.held[i];
            held.confidence *= match implied.mode() == obs.theirs {
                true => HYPOTHESIS_BOOST,
                false => HYPOTHESIS_FADE,
            };
            held.confidence = held.confidence.min(0.99);
        }
        self.held.retain(|h| h.confidence >= HYPOTHESIS_FLOOR);
        // fold the observation into the decayed sample set
        self.weight *= HYPOTHESIS_DECAY;
        self.reactive *= HYPOTHESIS_DECAY;
        self.countered *= HYPOTHESIS_DECAY;
        self.copied *= HYPOTHESIS_DECAY;
        for c in self.moves.iter_mut() {
            *c *= HYPOTHESIS_DECAY;
        }
        for row in self.stay.iter_mut() {
            row[0] *= HYPOTHESIS_DECAY;
            row[1] *= HYPOTHESIS_DECAY;
        }
        self.weight += 1.;
        self.seen += 1;
        self.moves[obs.theirs.index()] += 1.;
        if let Some(ours) = self.our_last {
            self.reactive += 1.;
            self.reacted += 1;
            if obs.theirs == ours.counter() {
                self.countered += 1.;
            }
            if obs.theirs == ours {
                self.copied += 1.;
            }
        }
        if let Some((m, o)) = self.their_last {
            self.stay[o.index()][if obs.theirs == m { 0 } else { 1 }] += 1.;
            self.resulted[o.index()] += 1;
        }
        self.our_last = Some(obs.ours);
        self.their_last = Some((obs.theirs, obs.outcome.flip()));
        // admit fresh detections
        for hypothesis in self.battery() {
            if !self.held.iter().any(|h| h.hypothesis == hypothesis) {
                self.held.push(Held {
                    hypothesis,
                    confidence: 0.7,
                });
            }
        }
    }

    fn predict(&self) -> Option<Prediction> {
        let best = self
            .held
            .iter()
            .max_by(|a, b| {
                a.confidence
                    .partial_cmp(&b.confidence)
                    .expect("confidence is finite")
            })?;
        let dist = self.implied(best.hypothesis);
        Some(Prediction::new(dist, best.confidence, Source::Hypothesis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_detected_on_empty_history() {
        let model = Hypotheses::default();
        assert!(!model.detected());
        assert!(model.predict().is_none());
    }

    #[test]
    fn strong_bias_is_detected() {
        let mut model = Hypotheses::default();
        for t in 0..25 {
            model.update(&Observation::new("x", t, Move::from(t), Move::Rock));
        }
        assert!(model.detected());
        assert!(model
            .holdings()
            .any(|(h, _)| matches!(h, Hypothesis::Bias(Move::Rock))));
        let p = model.predict().expect("bias is held");
        assert_eq!(p.dist.mode(), Move::Rock);
    }

    #[test]
    fn reactive_counter_is_detected() {
        let mut model = Hypotheses::default();
        let mut prev = Move::Rock;
        for t in 0..30 {
            let ours = Move::from(t);
            model.update(&Observation::new("x", t, ours, prev.counter()));
            prev = ours;
        }
        assert!(model
            .holdings()
            .any(|(h, _)| matches!(h, Hypothesis::Counter)));
    }

    #[test]
    fn hypotheses_fade_when_behavior_changes() {
        let mut model = Hypotheses::default();
        for t in 0..25 {
            model.update(&Observation::new("x", t, Move::from(t), Move::Rock));
        }
        assert!(model.detected());
        // bias evaporates once the opponent goes flat
        for t in 25..150 {
            model.update(&Observation::new("x", t, Move::from(t), Move::from(t * 2)));
        }
        assert!(model
            .holdings()
            .all(|(h, _)| !matches!(h, Hypothesis::Bias(_))));
    }
}
