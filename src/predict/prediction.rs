use crate::Confidence;
use crate::simplex::Dist;

/// which model (or meta path) produced a forecast or decision.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Source {
    Markov,
    Bayes,
    Pattern,
    Recurrent,
    Wsls,
    Hypothesis,
    Chain,
    Loop,
    Uniform,
}

impl Source {
    /// architectural prior weight in the ensemble blend
    pub fn prior(&self) -> f32 {
        match self {
            Self::Markov => crate::PRIOR_MARKOV,
            Self::Bayes => crate::PRIOR_BAYES,
            Self::Pattern => crate::PRIOR_TREE,
            Self::Recurrent => crate::PRIOR_RECURRENT,
            Self::Wsls => crate::PRIOR_WSLS,
            Self::Hypothesis => crate::PRIOR_HYPOTHESIS,
            Self::Chain => crate::PRIOR_CHAIN,
            Self::Loop | Self::Uniform => 1.0,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// one model's forecast of the opponent's next move. produced per
/// decision request and never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub dist: Dist,
    pub confidence: Confidence,
    pub source: Source,
}

impl Prediction {
    pub fn new(dist: Dist, confidence: Confidence, source: Source) -> Self {
        Self {
            dist,
            confidence: confidence.clamp(0., 1.),
            source,
        }
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<12} {} ({:.2})", self.source, self.dist, self.confidence)
    }
}
