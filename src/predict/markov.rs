use super::Prediction;
use super::Predictor;
use super::Source;
use crate::MARKOV_BASE_SUPPORT;
use crate::MARKOV_MAX_ORDER;
use crate::Z_CRITICAL;
use crate::combat::Move;
use crate::combat::Observation;
use crate::simplex::Dist;
use std::collections::VecDeque;

/// adaptive-order Markov model over the opponent's own move sequence.
///
/// transition tables are kept for orders 1..=4, each keyed by the last k
/// opponent moves (dense base-3 context index). a forecast comes from the
/// highest order that (a) has seen enough transitions overall and (b)
/// whose current-context modal transition rejects uniformity under a
/// one-sided z-test at p < .01. failing both, it falls through to lower
/// orders, then declines to answer.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Markov {
    tables: Vec<Vec<[f32; 3]>>,
    totals: Vec<f32>,
    recent: VecDeque<Move>,
}

impl Default for Markov {
    fn default() -> Self {
        Self {
            tables: (1..=MARKOV_MAX_ORDER)
                .map(|k| vec![[0.; 3]; 3usize.pow(k as u32)])
                .collect(),
            totals: vec![0.; MARKOV_MAX_ORDER],
            recent: VecDeque::with_capacity(MARKOV_MAX_ORDER),
        }
    }
}

impl Markov {
    /// dense index of the last k opponent moves, newest in the lowest trit
    fn context(&self, k: usize) -> Option<usize> {
        if self.recent.len() < k {
            return None;
        }
        Some(
            self.recent
                .iter()
                .rev()
                .take(k)
                .enumerate()
                .map(|(i, m)| m.index() * 3usize.pow(i as u32))
                .sum(),
        )
    }
    /// observations required before order k is consulted at all
    fn support(k: usize) -> f32 {
        (MARKOV_BASE_SUPPORT * 3usize.pow(k as u32 - 1)) as f32
    }
    /// one-sided z statistic of the modal transition against uniform
    fn zscore(row: &[f32; 3]) -> (f32, f32, usize) {
        let n = row.iter().sum::<f32>();
        let modal = row
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).expect("counts are finite"))
            .map(|(i, _)| i)
            .expect("row is nonempty");
        if n <= 0. {
            return (0., 0., modal);
        }
        let phat = row[modal] / n;
        let z = (phat - 1. / 3.) / ((2. / 9.) / n).sqrt();
        (z, phat, modal)
    }
}

impl Predictor for Markov {
    fn update(&mut self, obs: &Observation) {
        for k in 1..=MARKOV_MAX_ORDER {
            if let Some(ctx) = self.context(k) {
                self.tables[k - 1][ctx][obs.theirs.index()] += 1.;
                self.totals[k - 1] += 1.;
            }
        }
        self.recent.push_back(obs.theirs);
        while self.recent.len() > MARKOV_MAX_ORDER {
            self.recent.pop_front();
        }
    }

    fn predict(&self) -> Option<Prediction> {
        for k in (1..=MARKOV_MAX_ORDER).rev() {
            if self.totals[k - 1] < Self::support(k) {
                continue;
            }
            let Some(ctx) = self.context(k) else {
                continue;
            };
            let ref row = self.tables[k - 1][ctx];
            let (z, phat, _) = Self::zscore(row);
            if z > Z_CRITICAL {
                let n = row.iter().sum::<f32>();
                let dist = Dist::try_from(*row).ok()?;
                let confidence = (phat * (n / 25.).min(1.)).min(1.);
                return Some(Prediction::new(dist, confidence, Source::Markov));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(model: &mut Markov, theirs: impl IntoIterator<Item = Move>) {
        for (t, m) in theirs.into_iter().enumerate() {
            model.update(&Observation::new("x", t, Move::Rock, m));
        }
    }

    #[test]
    fn silent_without_history() {
        assert!(Markov::default().predict().is_none());
    }

    #[test]
    fn locks_onto_constant_opponent() {
        let mut model = Markov::default();
        feed(&mut model, std::iter::repeat(Move::Rock).take(40));
        let p = model.predict().expect("constant stream is significant");
        assert_eq!(p.dist.mode(), Move::Rock);
        assert!(p.dist[Move::Rock] > 0.9);
        assert!(p.confidence > 0.5);
    }

    #[test]
    fn learns_alternation_at_order_one() {
        let mut model = Markov::default();
        feed(
            &mut model,
            (0..60).map(|t| if t % 2 == 0 { Move::Rock } else { Move::Paper }),
        );
        // last move was paper, so rock comes next
        let p = model.predict().expect("alternation is significant");
        assert_eq!(p.dist.mode(), Move::Rock);
    }

    #[test]
    fn context_indexing_is_stable() {
        let mut model = Markov::default();
        feed(&mut model, [Move::Rock, Move::Paper, Move::Scissor]);
        assert_eq!(model.context(1), Some(Move::Scissor.index()));
        assert_eq!(
            model.context(2),
            Some(Move::Scissor.index() + 3 * Move::Paper.index())
        );
        assert_eq!(model.context(4), None);
    }
}
