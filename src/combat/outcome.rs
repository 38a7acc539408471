use super::moves::Move;

/// result of one simultaneous round, always read
/// from our own perspective unless flipped.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    /// evaluate a round from the first player's perspective
    pub fn of(ours: Move, theirs: Move) -> Self {
        if ours == theirs {
            Self::Draw
        } else if ours.beats() == theirs {
            Self::Win
        } else {
            Self::Loss
        }
    }
    /// the same round seen from the other side
    pub fn flip(&self) -> Self {
        match self {
            Self::Win => Self::Loss,
            Self::Loss => Self::Win,
            Self::Draw => Self::Draw,
        }
    }
    pub fn index(&self) -> usize {
        match self {
            Self::Win => 0,
            Self::Loss => 1,
            Self::Draw => 2,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Win => write!(f, "W"),
            Self::Loss => write!(f, "L"),
            Self::Draw => write!(f, "D"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_is_antisymmetric() {
        for a in Move::ALL {
            for b in Move::ALL {
                assert_eq!(Outcome::of(a, b), Outcome::of(b, a).flip());
            }
        }
    }

    #[test]
    fn draws_on_diagonal() {
        for m in Move::ALL {
            assert_eq!(Outcome::of(m, m), Outcome::Draw);
        }
    }

    #[test]
    fn counter_always_wins() {
        for m in Move::ALL {
            assert_eq!(Outcome::of(m.counter(), m), Outcome::Win);
        }
    }
}
