use super::Prediction;
use super::Predictor;
use super::Source;
use crate::RNN_HIDDEN;
use crate::RNN_RATE;
use crate::RNN_SEED;
use crate::combat::Move;
use crate::combat::Observation;
use crate::simplex::Dist;

/// joint-pair input width (one-hot over ours x theirs)
const INPUT: usize = 9;
/// move output width
const OUTPUT: usize = 3;

/// minimal single-hidden-layer recurrent model over one-hot joint
/// (ours, theirs) pairs. the hidden state persists across turns; each
/// observation triggers one forward pass and one local gradient step
/// against the move that actually appeared (no backpropagation through
/// time). weights initialize from a fixed seed so a fresh model is
/// identical across restarts.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Recurrent {
    wxh: Vec<f32>,
    whh: Vec<f32>,
    why: Vec<f32>,
    bh: Vec<f32>,
    by: Vec<f32>,
    hidden: Vec<f32>,
    last: Option<(Move, Move)>,
    n: usize,
}

impl Default for Recurrent {
    fn default() -> Self {
        use rand::Rng;
        use rand::SeedableRng;
        let mut rng = rand::rngs::SmallRng::seed_from_u64(RNN_SEED);
        let mut init = |len: usize| {
            (0..len)
                .map(|_| rng.random_range(-0.1..0.1))
                .collect::<Vec<f32>>()
        };
        Self {
            wxh: init(RNN_HIDDEN * INPUT),
            whh: init(RNN_HIDDEN * RNN_HIDDEN),
            why: init(OUTPUT * RNN_HIDDEN),
            bh: vec![0.; RNN_HIDDEN],
            by: vec![0.; OUTPUT],
            hidden: vec![0.; RNN_HIDDEN],
            last: None,
            n: 0,
        }
    }
}

impl Recurrent {
    fn onehot(pair: (Move, Move)) -> [f32; INPUT] {
        let mut x = [0.; INPUT];
        x[pair.0.index() * 3 + pair.1.index()] = 1.;
        x
    }
    /// single step: new hidden activation and softmax output
    fn forward(&self, x: &[f32; INPUT]) -> (Vec<f32>, [f32; OUTPUT]) {
        let mut h = vec![0f32; RNN_HIDDEN];
        for j in 0..RNN_HIDDEN {
            let mut a = self.bh[j];
            for i in 0..INPUT {
                a += self.wxh[j * INPUT + i] * x[i];
            }
            for k in 0..RNN_HIDDEN {
                a += self.whh[j * RNN_HIDDEN + k] * self.hidden[k];
            }
            h[j] = a.tanh();
        }
        let mut y = [0f32; OUTPUT];
        for c in 0..OUTPUT {
            let mut a = self.by[c];
            for j in 0..RNN_HIDDEN {
                a += self.why[c * RNN_HIDDEN + j] * h[j];
            }
            y[c] = a;
        }
        let peak = y.iter().fold(f32::MIN, |m, v| m.max(*v));
        let mut z = 0f32;
        for v in y.iter_mut() {
            *v = (*v - peak).exp();
            z += *v;
        }
        for v in y.iter_mut() {
            *v /= z;
        }
        (h, y)
    }
}

impl Predictor for Recurrent {
    fn update(&mut self, obs: &Observation) {
        if let Some(pair) = self.last {
            let x = Self::onehot(pair);
            let (h, y) = self.forward(&x);
            // cross-entropy error against the observed move
            let mut err = y;
            err[obs.theirs.index()] -= 1.;
            // hidden gradient uses the pre-update output weights
            let mut dh = vec![0f32; RNN_HIDDEN];
            for j in 0..RNN_HIDDEN {
                let mut g = 0f32;
                for c in 0..OUTPUT {
                    g += self.why[c * RNN_HIDDEN + j] * err[c];
                }
                dh[j] = g * (1. - h[j] * h[j]);
            }
            for c in 0..OUTPUT {
                for j in 0..RNN_HIDDEN {
                    self.why[c * RNN_HIDDEN + j] -= RNN_RATE * err[c] * h[j];
                }
                self.by[c] -= RNN_RATE * err[c];
            }
            for j in 0..RNN_HIDDEN {
                for i in 0..INPUT {
                    self.wxh[j * INPUT + i] -= RNN_RATE * dh[j] * x[i];
                }
                for k in 0..RNN_HIDDEN {
                    self.whh[j * RNN_HIDDEN + k] -= RNN_RATE * dh[j] * self.hidden[k];
                }
                self.bh[j] -= RNN_RATE * dh[j];
            }
            self.hidden = h;
        }
        self.last = Some((obs.ours, obs.theirs));
        self.n += 1;
    }

    fn predict(&self) -> Option<Prediction> {
        let pair = self.last?;
        if self.n < 5 {
            return None;
        }
        let (_, y) = self.forward(&Self::onehot(pair));
        let dist = Dist::try_from(y).ok()?;
        let confidence = (dist.slack() * 1.5).min(1.) * (self.n as f32 / 40.).min(1.);
        Some(Prediction::new(dist, confidence, Source::Recurrent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_models_are_identical() {
        assert_eq!(Recurrent::default(), Recurrent::default());
    }

    #[test]
    fn silent_before_five_observations() {
        let mut model = Recurrent::default();
        for t in 0..4 {
            model.update(&Observation::new("x", t, Move::Rock, Move::Paper));
            assert!(model.predict().is_none());
        }
    }

    #[test]
    fn output_is_always_a_distribution() {
        let mut model = Recurrent::default();
        for t in 0..100 {
            model.update(&Observation::new("x", t, Move::from(t), Move::from(t * 2 + 1)));
            if let Some(p) = model.predict() {
                assert!(p.dist.valid());
            }
        }
    }

    #[test]
    fn gradient_steps_track_a_constant_opponent() {
        let mut model = Recurrent::default();
        for t in 0..300 {
            model.update(&Observation::new("x", t, Move::from(t), Move::Scissor));
        }
        let p = model.predict().expect("long history");
        assert_eq!(p.dist.mode(), Move::Scissor);
        assert!(p.dist[Move::Scissor] > 0.5);
    }

    #[test]
    fn weights_stay_finite() {
        let mut model = Recurrent::default();
        for t in 0..2000 {
            model.update(&Observation::new("x", t, Move::from(t * 7), Move::from(t * 5)));
        }
        assert!(model.wxh.iter().all(|w| w.is_finite()));
        assert!(model.whh.iter().all(|w| w.is_finite()));
        assert!(model.why.iter().all(|w| w.is_finite()));
    }
}
