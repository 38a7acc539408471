use super::density::Density;
use super::density::Support;
use crate::Arbitrary;
use crate::Entropy;
use crate::Probability;
use crate::SIMPLEX_TOLERANCE;
use crate::combat::Move;

impl Support for Move {}

/// probability vector over the simplex of moves. construction always
/// normalizes, so a held Dist is valid by definition: non-negative
/// everywhere and summing to one within tolerance. zero evidence
/// collapses to uniform.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Dist([Probability; 3]);

impl Dist {
    pub fn uniform() -> Self {
        Self([1. / 3.; 3])
    }
    /// all mass on one move, softened by a floor on the other two
    pub fn pointed(m: Move, mass: Probability) -> Self {
        let mass = mass.clamp(0., 1.);
        let rest = (1. - mass) / 2.;
        let mut p = [rest; 3];
        p[m.index()] = mass;
        Self(p)
    }
    /// the most probable move, ties resolved in Move::ALL order
    pub fn mode(&self) -> Move {
        Move::ALL
            .into_iter()
            .max_by(|a, b| {
                self.0[a.index()]
                    .partial_cmp(&self.0[b.index()])
                    .expect("probabilities are finite")
            })
            .expect("ALL is nonempty")
    }
    /// shannon entropy in nats; uniform maximizes at ln 3
    pub fn entropy(&self) -> Entropy {
        self.0
            .iter()
            .filter(|p| **p > 0.)
            .map(|p| -p * p.ln())
            .sum()
    }
    /// largest absolute deviation from the uniform distribution
    pub fn slack(&self) -> Probability {
        self.0
            .iter()
            .map(|p| (p - 1. / 3.).abs())
            .fold(0., Probability::max)
    }
    /// convex combination toward another distribution
    pub fn mix(&self, other: &Self, toward: Probability) -> Self {
        let t = toward.clamp(0., 1.);
        let mut p = [0.; 3];
        for i in 0..3 {
            p[i] = self.0[i] * (1. - t) + other.0[i] * t;
        }
        Self(p)
    }
    pub fn valid(&self) -> bool {
        self.0.iter().all(|p| *p >= 0. && p.is_finite())
            && (self.0.iter().sum::<Probability>() - 1.).abs() < SIMPLEX_TOLERANCE
    }
}

impl Default for Dist {
    fn default() -> Self {
        Self::uniform()
    }
}

/// weights normalize into a distribution; all-zero, negative, or
/// non-finite weights are not a distribution at all.
impl TryFrom<[Probability; 3]> for Dist {
    type Error = ();
    fn try_from(w: [Probability; 3]) -> Result<Self, Self::Error> {
        if w.iter().any(|x| !x.is_finite() || *x < 0.) {
            return Err(());
        }
        let sum = w.iter().sum::<Probability>();
        if sum <= 0. {
            return Err(());
        }
        Ok(Self([w[0] / sum, w[1] / sum, w[2] / sum]))
    }
}

impl std::ops::Index<Move> for Dist {
    type Output = Probability;
    fn index(&self, m: Move) -> &Self::Output {
        &self.0[m.index()]
    }
}

impl Density for Dist {
    type S = Move;
    fn density(&self, x: &Self::S) -> Probability {
        self.0[x.index()]
    }
    fn support(&self) -> impl Iterator<Item = &Self::S> {
        Move::ALL
            .iter()
            .filter(|m| self.0[m.index()] > 0.)
    }
}

impl std::fmt::Display for Dist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "R {:.2} P {:.2} S {:.2}",
            self.0[0], self.0[1], self.0[2]
        )
    }
}

impl Arbitrary for Dist {
    fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::rng();
        Self::try_from([rng.random(), rng.random(), rng.random()])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_valid() {
        assert!(Dist::uniform().valid());
        assert!(Dist::uniform().slack() < 1e-6);
    }

    #[test]
    fn random_is_valid() {
        for _ in 0..64 {
            assert!(Dist::random().valid());
        }
    }

    #[test]
    fn degenerate_weights_are_rejected() {
        assert!(Dist::try_from([0., 0., 0.]).is_err());
        assert!(Dist::try_from([1., -1., 1.]).is_err());
        assert!(Dist::try_from([f32::NAN, 1., 1.]).is_err());
    }

    #[test]
    fn pointed_concentrates() {
        let p = Dist::pointed(Move::Paper, 0.8);
        assert!(p.valid());
        assert_eq!(p.mode(), Move::Paper);
        assert!((p[Move::Paper] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn entropy_peaks_at_uniform() {
        let u = Dist::uniform().entropy();
        for _ in 0..32 {
            assert!(Dist::random().entropy() <= u + 1e-6);
        }
    }

    #[test]
    fn mix_interpolates() {
        let a = Dist::pointed(Move::Rock, 1.0);
        let b = Dist::pointed(Move::Paper, 1.0);
        let m = a.mix(&b, 0.5);
        assert!(m.valid());
        assert!((m[Move::Rock] - 0.5).abs() < 1e-6);
        assert!((m[Move::Paper] - 0.5).abs() < 1e-6);
    }
}
