use crate::Confidence;
use crate::LOOP_CYCLE_CONFIDENCE;
use crate::LOOP_LEVELK_CONFIDENCE;
use crate::LOOP_NASH_CONFIDENCE;
use crate::LOOP_NASH_SLACK;
use crate::LOOP_WINDOW;
use crate::combat::Move;
use crate::combat::Observation;
use crate::simplex::Dist;

/// chunk width when reading dominant-move drift inside the window
const STRIDE: usize = 5;
/// minimum rate for a cyclic or level-k signature
const SIGNATURE_RATE: f32 = 0.6;

/// mutual-adaptation signatures the engine can get trapped in when both
/// sides keep adjusting to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Loop {
    /// both sides have drifted to near-uniform play
    Nash,
    /// dominant moves cycle with a short period
    Oscillation,
    /// the opponent counters our counter one level deep
    LevelK,
}

impl std::fmt::Display for Loop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// a detected loop and the opponent distribution to play against
/// instead of the ensemble blend this turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    pub kind: Loop,
    pub target: Dist,
    pub confidence: Confidence,
}

impl Signal {
    /// inspect the trailing window for adaptation signatures. stability
    /// orders the answer: Nash convergence beats oscillation beats the
    /// chaotic level-k spiral.
    pub fn over(recent: &[Observation]) -> Option<Self> {
        let window = recent.len().min(LOOP_WINDOW);
        if window < LOOP_WINDOW / 2 {
            return None;
        }
        let recent = &recent[recent.len() - window..];
        Self::nash(recent)
            .or_else(|| Self::oscillation(recent))
            .or_else(|| Self::levelk(recent))
    }
    /// both marginals within slack of uniform, and the opponent's moves
    /// serially independent. a deterministic rotation has flat marginals
    /// too, but its transition rows are pointed, and that is adaptation,
    /// not equilibrium.
    fn nash(recent: &[Observation]) -> Option<Self> {
        let ours = Self::marginal(recent, |o| o.ours)?;
        let theirs = Self::marginal(recent, |o| o.theirs)?;
        if ours.slack() >= LOOP_NASH_SLACK || theirs.slack() >= LOOP_NASH_SLACK {
            return None;
        }
        let mut rows = [[0f32; 3]; 3];
        for w in recent.windows(2) {
            rows[w[0].theirs.index()][w[1].theirs.index()] += 1.;
        }
        for row in rows {
            if row.iter().sum::<f32>() < 3. {
                continue;
            }
            match Dist::try_from(row) {
                Ok(d) if d.slack() < 2. * LOOP_NASH_SLACK => {}
                _ => return None,
            }
        }
        Some(Self {
            kind: Loop::Nash,
            target: Dist::uniform(),
            confidence: LOOP_NASH_CONFIDENCE,
        })
    }
    /// dominant move rotates a consistent direction chunk-to-chunk;
    /// the answer jumps two steps ahead of the rotation
    fn oscillation(recent: &[Observation]) -> Option<Self> {
        let dominants = recent
            .chunks(STRIDE)
            .filter(|c| c.len() == STRIDE)
            .map(|c| {
                let mut counts = [0usize; 3];
                for o in c {
                    counts[o.theirs.index()] += 1;
                }
                Move::ALL
                    .into_iter()
                    .max_by_key(|m| counts[m.index()])
                    .expect("ALL is nonempty")
            })
            .collect::<Vec<_>>();
        if dominants.len() < 4 {
            return None;
        }
        for step in [Move::counter as fn(&Move) -> Move, Move::beats] {
            if dominants.windows(2).all(|w| w[1] == step(&w[0])) {
                let last = dominants.last().expect("nonempty by guard");
                let ahead = step(&step(last));
                return Some(Self {
                    kind: Loop::Oscillation,
                    target: Dist::pointed(ahead, 0.8),
                    confidence: LOOP_CYCLE_CONFIDENCE,
                });
            }
        }
        None
    }
    /// the opponent plays the counter of the counter of our previous
    /// move: they are simulating our best response. a near-constant
    /// opponent trivially satisfies the signature against constant play,
    /// so a flat-out biased marginal defers to the plain-bias models.
    fn levelk(recent: &[Observation]) -> Option<Self> {
        let theirs = Self::marginal(recent, |o| o.theirs)?;
        if theirs.slack() > 0.3 {
            return None;
        }
        let hits = recent
            .windows(2)
            .filter(|w| w[1].theirs == w[0].ours.counter().counter())
            .count();
        let n = recent.len() - 1;
        if n == 0 || (hits as f32 / n as f32) < SIGNATURE_RATE {
            return None;
        }
        let last = recent.last().expect("nonempty window");
        Some(Self {
            kind: Loop::LevelK,
            target: Dist::pointed(last.ours.counter().counter(), 0.8),
            confidence: LOOP_LEVELK_CONFIDENCE,
        })
    }
    fn marginal(recent: &[Observation], f: impl Fn(&Observation) -> Move) -> Option<Dist> {
        let mut counts = [0f32; 3];
        for o in recent {
            counts[f(o).index()] += 1.;
        }
        Dist::try_from(counts).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_windows_are_silent() {
        let recent = (0..5)
            .map(|t| Observation::new("x", t, Move::Rock, Move::Paper))
            .collect::<Vec<_>>();
        assert!(Signal::over(&recent).is_none());
    }

    #[test]
    fn mutual_uniform_play_reads_as_nash() {
        // an eulerian walk over all nine ordered move pairs keeps both the
        // marginals and the first-order transitions flat
        let walk = [
            Move::Rock,
            Move::Rock,
            Move::Paper,
            Move::Rock,
            Move::Scissor,
            Move::Paper,
            Move::Paper,
            Move::Scissor,
            Move::Scissor,
        ];
        let recent = (0..30)
            .map(|t| Observation::new("x", t, walk[(t + 4) % 9], walk[t % 9]))
            .collect::<Vec<_>>();
        let signal = Signal::over(&recent).expect("flat marginals and transitions");
        assert_eq!(signal.kind, Loop::Nash);
        assert_eq!(signal.target, Dist::uniform());
        assert!(signal.confidence >= 0.9);
    }

    #[test]
    fn deterministic_rotation_is_not_nash() {
        // flat marginals but pointed transition rows
        let recent = (0..30)
            .map(|t| Observation::new("x", t, Move::from(t), Move::from(t + 1)))
            .collect::<Vec<_>>();
        let signal = Signal::over(&recent);
        assert!(signal.map(|s| s.kind) != Some(Loop::Nash));
    }

    #[test]
    fn chunked_rotation_reads_as_oscillation() {
        // five-turn blocks of rock, then paper, then scissor, biased enough
        // that marginal slack stays high within the window
        let recent = (0..30)
            .map(|t| {
                let block = Move::from(t / STRIDE);
                Observation::new("x", t, Move::Rock, block)
            })
            .collect::<Vec<_>>();
        let signal = Signal::over(&recent).expect("rotating dominants");
        assert_eq!(signal.kind, Loop::Oscillation);
    }

    #[test]
    fn best_response_simulation_reads_as_levelk() {
        // our play is lumpy enough that neither marginal reads uniform,
        // while they keep simulating our best response one level deep
        let pattern = [
            Move::Rock,
            Move::Rock,
            Move::Rock,
            Move::Rock,
            Move::Paper,
            Move::Paper,
            Move::Paper,
            Move::Scissor,
            Move::Scissor,
        ];
        let mut recent = Vec::new();
        let mut prev = Move::Rock;
        for t in 0..30 {
            let ours = pattern[t % 9];
            let theirs = prev.counter().counter();
            recent.push(Observation::new("x", t, ours, theirs));
            prev = ours;
        }
        let signal = Signal::over(&recent).expect("level-k signature");
        assert_eq!(signal.kind, Loop::LevelK);
        assert_eq!(signal.target.mode(), prev.counter().counter());
    }
}
