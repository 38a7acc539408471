use super::moves::Move;

/// the moves still playable this turn, as a bitmask over the three throws.
/// charge exhaustion removes a move; an empty mask never reaches the
/// engine (a turn with nothing to play is an episode-level concern).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MoveSet(u8);

impl MoveSet {
    pub fn all() -> Self {
        Self(0b111)
    }
    pub fn empty() -> Self {
        Self(0)
    }
    pub fn with(self, m: Move) -> Self {
        Self(self.0 | (1 << m.index()))
    }
    pub fn without(self, m: Move) -> Self {
        Self(self.0 & !(1 << m.index()))
    }
    pub fn contains(&self, m: Move) -> bool {
        self.0 & (1 << m.index()) != 0
    }
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        Move::ALL.into_iter().filter(|m| self.contains(*m))
    }
    /// availability implied by remaining per-move charges
    pub fn from_charges(charges: [u8; 3]) -> Self {
        Move::ALL
            .into_iter()
            .filter(|m| charges[m.index()] > 0)
            .fold(Self::empty(), Self::with)
    }
}

impl Default for MoveSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Move> for MoveSet {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl std::fmt::Display for MoveSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for m in self.iter() {
            write!(f, "{}", m)?;
        }
        Ok(())
    }
}
