/// per-opponent position in the turn cycle. the middle phases are
/// transient within one `decide` call; a profile at rest sits in Idle
/// or AwaitOutcome, and the cycle only ends with the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Gather,
    Blend,
    RiskAdjust,
    Select,
    AwaitOutcome,
    Update,
}

impl Phase {
    /// may a new decision start from here?
    pub fn ready(&self) -> bool {
        matches!(self, Self::Idle)
    }
    /// is the engine waiting on the real outcome?
    pub fn pending(&self) -> bool {
        matches!(self, Self::AwaitOutcome)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
