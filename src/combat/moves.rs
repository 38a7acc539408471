use crate::Arbitrary;

/// one throw of the hand. dominance is cyclic:
/// rock > scissor > paper > rock.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Move {
    Rock,
    Paper,
    Scissor,
}

impl Move {
    pub const ALL: [Self; 3] = [Self::Rock, Self::Paper, Self::Scissor];

    /// the move this one defeats
    pub fn beats(&self) -> Self {
        match self {
            Self::Rock => Self::Scissor,
            Self::Paper => Self::Rock,
            Self::Scissor => Self::Paper,
        }
    }
    /// the move that defeats this one
    pub fn counter(&self) -> Self {
        match self {
            Self::Rock => Self::Paper,
            Self::Paper => Self::Scissor,
            Self::Scissor => Self::Rock,
        }
    }
    /// dense index for table lookups
    pub fn index(&self) -> usize {
        match self {
            Self::Rock => 0,
            Self::Paper => 1,
            Self::Scissor => 2,
        }
    }
}

impl From<usize> for Move {
    fn from(i: usize) -> Self {
        Self::ALL[i % 3]
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rock => write!(f, "R"),
            Self::Paper => write!(f, "P"),
            Self::Scissor => write!(f, "S"),
        }
    }
}

impl Arbitrary for Move {
    fn random() -> Self {
        use rand::prelude::IndexedRandom;
        let ref mut rng = rand::rng();
        Self::ALL.choose(rng).copied().expect("ALL is nonempty")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominance_is_cyclic() {
        for m in Move::ALL {
            assert_eq!(m.beats().counter(), m.counter().beats());
            assert_eq!(m.beats().beats().beats(), m);
            assert_eq!(m.counter().counter().counter(), m);
        }
    }

    #[test]
    fn counter_inverts_beats() {
        for m in Move::ALL {
            assert_eq!(m.beats().counter(), m);
            assert_eq!(m.counter().beats(), m);
        }
    }

    #[test]
    fn index_is_bijective() {
        for m in Move::ALL {
            assert_eq!(m, Move::from(m.index()));
        }
    }
}
