use super::config::Config;
use crate::Confidence;
use crate::Turn;
use crate::combat::Move;
use crate::predict::Prediction;
use crate::predict::Source;
use crate::simplex::Dist;

/// the combined opponent forecast for one turn: a weighted sum of every
/// usable prediction, the blend's overall confidence, and its heaviest
/// contributor. with nothing usable the forecast is uniform at zero
/// confidence, which downstream reads as exploration-only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blend {
    pub forecast: Dist,
    pub confidence: Confidence,
    pub source: Source,
}

impl Blend {
    pub fn empty() -> Self {
        Self {
            forecast: Dist::uniform(),
            confidence: 0.,
            source: Source::Uniform,
        }
    }
    /// weight each prediction by its architectural prior and its own
    /// confidence; scale the whole blend's conviction by the sample and
    /// early-turn ramps so a young profile never sounds sure of itself
    pub fn over(predictions: &[Prediction], observed: usize, turn: Turn, config: &Config) -> Self {
        if predictions.is_empty() {
            return Self::empty();
        }
        let mut mass = [0f32; 3];
        let mut weight = 0f32;
        let mut conviction = 0f32;
        let mut heaviest = (0f32, Source::Uniform);
        for p in predictions {
            let w = p.source.prior() * p.confidence;
            if w <= 0. {
                continue;
            }
            for m in Move::ALL {
                mass[m.index()] += w * p.dist[m];
            }
            weight += w;
            conviction += w * p.confidence;
            if w > heaviest.0 {
                heaviest = (w, p.source);
            }
        }
        let Ok(forecast) = Dist::try_from(mass) else {
            return Self::empty();
        };
        let battles = (observed as f32 / config.min_battles_for_confidence.max(1) as f32).min(1.);
        let ramp = match config.early_ramp {
            0 => 1.,
            t => (turn as f32 / t as f32).min(1.),
        };
        // conviction is what the models claim; concentration is what
        // their agreement actually produced. a sharp consensus forecast
        // is trustworthy even while individual sample counts still ramp.
        let conviction = conviction / weight;
        let concentration = ((forecast[forecast.mode()] - 1. / 3.) * 1.5).clamp(0., 1.);
        Self {
            forecast,
            confidence: conviction.max(concentration) * battles * ramp,
            source: heaviest.1,
        }
    }
}

impl std::fmt::Display for Blend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.2}) via {}", self.forecast, self.confidence, self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_predictions_blend_to_uniform_at_zero() {
        let blend = Blend::over(&[], 100, 100, &Config::default());
        assert_eq!(blend.forecast, Dist::uniform());
        assert_eq!(blend.confidence, 0.);
    }

    #[test]
    fn agreement_concentrates_the_forecast() {
        let predictions = [
            Prediction::new(Dist::pointed(Move::Rock, 0.9), 0.8, Source::Markov),
            Prediction::new(Dist::pointed(Move::Rock, 0.8), 0.7, Source::Bayes),
        ];
        let blend = Blend::over(&predictions, 100, 100, &Config::default());
        assert_eq!(blend.forecast.mode(), Move::Rock);
        assert!(blend.forecast[Move::Rock] > 0.8);
        assert_eq!(blend.source, Source::Markov);
    }

    #[test]
    fn early_turns_suppress_conviction() {
        let predictions = [Prediction::new(
            Dist::pointed(Move::Rock, 0.9),
            0.9,
            Source::Markov,
        )];
        let config = Config::default();
        let early = Blend::over(&predictions, 2, 2, &config);
        let late = Blend::over(&predictions, 100, 100, &config);
        assert!(early.confidence < late.confidence);
        // the forecast itself is unaffected by the ramps
        assert_eq!(early.forecast, late.forecast);
    }

    #[test]
    fn zero_confidence_predictions_are_ignored() {
        let predictions = [
            Prediction::new(Dist::pointed(Move::Paper, 0.9), 0., Source::Markov),
            Prediction::new(Dist::pointed(Move::Rock, 0.9), 0.5, Source::Wsls),
        ];
        let blend = Blend::over(&predictions, 100, 100, &Config::default());
        assert_eq!(blend.forecast.mode(), Move::Rock);
        assert_eq!(blend.source, Source::Wsls);
    }
}
