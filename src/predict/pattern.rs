use super::Prediction;
use super::Predictor;
use super::Source;
use crate::KT_ALPHA;
use crate::TREE_DECAY;
use crate::TREE_DECAY_INTERVAL;
use crate::TREE_DEPTH;
use crate::combat::Move;
use crate::combat::Observation;
use crate::simplex::Dist;
use std::collections::VecDeque;

/// number of joint (ours, theirs) symbols
const SYMBOLS: usize = 9;
/// row offset of each context depth in the dense node table
const OFFSET: [usize; TREE_DEPTH + 1] = [0, 1, 1 + 9, 1 + 9 + 81];
/// total rows: one per context of depth 0..=TREE_DEPTH
const NODES: usize = 1 + 9 + 81 + 729;

fn symbol(ours: Move, theirs: Move) -> usize {
    ours.index() * 3 + theirs.index()
}

/// Krichevsky-Trofimov estimate of a count row
fn kt(row: &[f32; 3]) -> [f32; 3] {
    let n = row.iter().sum::<f32>();
    [
        (row[0] + KT_ALPHA) / (n + 3. * KT_ALPHA),
        (row[1] + KT_ALPHA) / (n + 3. * KT_ALPHA),
        (row[2] + KT_ALPHA) / (n + 3. * KT_ALPHA),
    ]
}

/// joint-pattern context tree. contexts are the most recent joint
/// (ours, theirs) pairs up to depth 3, stored dense; each node carries
/// KT-smoothed counts over the opponent's next move, decayed
/// periodically so stale behavior fades.
///
/// two query paths: the marginal forecast over all contexts, and a
/// response forecast conditioned on a specific planned own move, used
/// by the engine to evaluate each candidate's induced reply.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pattern {
    nodes: Vec<[f32; 3]>,
    /// opponent reply counts keyed by our move this turn
    react1: [[f32; 3]; 3],
    /// opponent reply counts keyed by (previous joint pair, our move this turn)
    react2: Vec<[f32; 3]>,
    recent: VecDeque<(Move, Move)>,
    updates: usize,
}

impl Default for Pattern {
    fn default() -> Self {
        Self {
            nodes: vec![[0.; 3]; NODES],
            react1: [[0.; 3]; 3],
            react2: vec![[0.; 3]; SYMBOLS * 3],
            recent: VecDeque::with_capacity(TREE_DEPTH),
            updates: 0,
        }
    }
}

impl Pattern {
    /// dense row index of the current depth-d context
    fn row(&self, d: usize) -> Option<usize> {
        if self.recent.len() < d {
            return None;
        }
        let ctx = self
            .recent
            .iter()
            .rev()
            .take(d)
            .enumerate()
            .map(|(i, (o, t))| symbol(*o, *t) * SYMBOLS.pow(i as u32))
            .sum::<usize>();
        Some(OFFSET[d] + ctx)
    }
    /// forecast of the opponent's reply if we play `planned` this turn,
    /// blending the pair-conditioned and unconditioned reply tables
    pub fn respond(&self, planned: Move) -> Option<Dist> {
        let ref broad = self.react1[planned.index()];
        let broad_n = broad.iter().sum::<f32>();
        if broad_n < 3. {
            return None;
        }
        let mut weights = [0f32; 3];
        let est = kt(broad);
        for i in 0..3 {
            weights[i] += est[i] * broad_n;
        }
        if let Some((o, t)) = self.recent.back() {
            let ref narrow = self.react2[symbol(*o, *t) * 3 + planned.index()];
            // the pair-conditioned row is more specific, so it counts double
            let n = narrow.iter().sum::<f32>() * 2.;
            let est = kt(narrow);
            for i in 0..3 {
                weights[i] += est[i] * n;
            }
        }
        Dist::try_from(weights).ok()
    }
    fn decay(&mut self) {
        for row in self.nodes.iter_mut() {
            for c in row.iter_mut() {
                *c *= TREE_DECAY;
            }
        }
        for row in self.react1.iter_mut().chain(self.react2.iter_mut()) {
            for c in row.iter_mut() {
                *c *= TREE_DECAY;
            }
        }
    }
}

impl Predictor for Pattern {
    fn update(&mut self, obs: &Observation) {
        for d in 0..=TREE_DEPTH {
            if let Some(row) = self.row(d) {
                self.nodes[row][obs.theirs.index()] += 1.;
            }
        }
        self.react1[obs.ours.index()][obs.theirs.index()] += 1.;
        if let Some((o, t)) = self.recent.back() {
            self.react2[symbol(*o, *t) * 3 + obs.ours.index()][obs.theirs.index()] += 1.;
        }
        self.recent.push_back((obs.ours, obs.theirs));
        while self.recent.len() > TREE_DEPTH {
            self.recent.pop_front();
        }
        self.updates += 1;
        if self.updates % TREE_DECAY_INTERVAL == 0 {
            self.decay();
        }
    }

    fn predict(&self) -> Option<Prediction> {
        let root_n = self.nodes[0].iter().sum::<f32>();
        if root_n < 5. {
            return None;
        }
        // deeper contexts dominate once populated
        let mut weights = [0f32; 3];
        let mut total = 0f32;
        let mut depth = 0usize;
        for d in 0..=TREE_DEPTH {
            let Some(row) = self.row(d) else {
                continue;
            };
            let ref counts = self.nodes[row];
            let n = counts.iter().sum::<f32>();
            if n <= 0. {
                continue;
            }
            let w = n * (d + 1) as f32;
            let est = kt(counts);
            for i in 0..3 {
                weights[i] += est[i] * w;
            }
            total += w;
            depth = d;
        }
        if total <= 0. {
            return None;
        }
        let dist = Dist::try_from(weights).ok()?;
        let peak = (dist[dist.mode()] - 1. / 3.).max(0.) * 1.5;
        let ramp = (root_n / 30.).min(1.);
        let reach = (depth + 1) as f32 / (TREE_DEPTH + 1) as f32;
        Some(Prediction::new(dist, peak * ramp * reach, Source::Pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_without_history() {
        assert!(Pattern::default().predict().is_none());
        assert!(Pattern::default().respond(Move::Rock).is_none());
    }

    #[test]
    fn learns_joint_reaction() {
        let mut model = Pattern::default();
        // opponent always answers our rock with paper, our paper with scissor
        for t in 0..60 {
            let ours = if t % 2 == 0 { Move::Rock } else { Move::Paper };
            let theirs = ours.counter();
            model.update(&Observation::new("x", t, ours, theirs));
        }
        let reply = model.respond(Move::Rock).expect("rock was played often");
        assert_eq!(reply.mode(), Move::Paper);
        assert!(reply[Move::Paper] > 0.7);
        let reply = model.respond(Move::Paper).expect("paper was played often");
        assert_eq!(reply.mode(), Move::Scissor);
    }

    #[test]
    fn marginal_tracks_bias() {
        let mut model = Pattern::default();
        for t in 0..40 {
            model.update(&Observation::new("x", t, Move::from(t), Move::Scissor));
        }
        let p = model.predict().expect("history is sufficient");
        assert_eq!(p.dist.mode(), Move::Scissor);
        assert!(p.confidence > 0.2);
    }

    #[test]
    fn decay_keeps_counts_finite() {
        let mut model = Pattern::default();
        for t in 0..1000 {
            model.update(&Observation::new("x", t, Move::from(t), Move::from(t + 1)));
        }
        for row in model.nodes.iter() {
            for c in row {
                assert!(c.is_finite());
                assert!(*c >= 0.);
            }
        }
    }
}
