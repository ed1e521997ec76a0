use serde::Serialize;

use crate::error::ConfigError;
use crate::models::ScoreType;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

pub const DEFAULT_THRESHOLD: f64 = 70.0;

/// Per-type weights for class averages. Always sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightConfig {
    exam: f64,
    quiz: f64,
    homework: f64,
}

impl WeightConfig {
    pub fn new(exam: f64, quiz: f64, homework: f64) -> Result<Self, ConfigError> {
        for (score_type, value) in [
            (ScoreType::Exam, exam),
            (ScoreType::Quiz, quiz),
            (ScoreType::Homework, homework),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { score_type, value });
            }
        }

        let sum = exam + quiz + homework;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightsDoNotSumToOne { sum });
        }

        Ok(Self {
            exam,
            quiz,
            homework,
        })
    }

    pub fn exam(&self) -> f64 {
        self.exam
    }

    pub fn quiz(&self) -> f64 {
        self.quiz
    }

    pub fn homework(&self) -> f64 {
        self.homework
    }

    pub fn weight_for(&self, score_type: ScoreType) -> f64 {
        match score_type {
            ScoreType::Exam => self.exam,
            ScoreType::Quiz => self.quiz,
            ScoreType::Homework => self.homework,
        }
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            exam: 0.5,
            quiz: 0.3,
            homework: 0.2,
        }
    }
}

/// Cutoff for threshold statistics. Always finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> Result<Self, ConfigError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(ConfigError::NonFiniteThreshold(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Settings {
    pub weights: WeightConfig,
    pub threshold: Threshold,
}

impl Settings {
    pub fn from_raw(
        exam: f64,
        quiz: f64,
        homework: f64,
        threshold: f64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            weights: WeightConfig::new(exam, quiz, homework)?,
            threshold: Threshold::new(threshold)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_are_valid() {
        let defaults = WeightConfig::default();
        let rebuilt = WeightConfig::new(0.5, 0.3, 0.2).unwrap();
        assert_eq!(defaults, rebuilt);
        assert_eq!(defaults.weight_for(ScoreType::Exam), 0.5);
        assert_eq!(defaults.weight_for(ScoreType::Quiz), 0.3);
        assert_eq!(defaults.weight_for(ScoreType::Homework), 0.2);
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let err = WeightConfig::new(0.5, 0.3, 0.3).unwrap_err();
        assert!(matches!(err, ConfigError::WeightsDoNotSumToOne { .. }));
    }

    #[test]
    fn rejects_negative_or_nan_weights() {
        assert!(matches!(
            WeightConfig::new(1.2, -0.2, 0.0),
            Err(ConfigError::InvalidWeight {
                score_type: ScoreType::Quiz,
                ..
            })
        ));
        assert!(matches!(
            WeightConfig::new(f64::NAN, 0.5, 0.5),
            Err(ConfigError::InvalidWeight {
                score_type: ScoreType::Exam,
                ..
            })
        ));
    }

    #[test]
    fn threshold_must_be_finite() {
        assert_eq!(Threshold::new(55.5).unwrap().value(), 55.5);
        assert!(Threshold::new(f64::NAN).is_err());
        assert!(Threshold::new(f64::INFINITY).is_err());
        assert_eq!(Threshold::default().value(), DEFAULT_THRESHOLD);
    }

    #[test]
    fn settings_surface_first_config_error() {
        let err = Settings::from_raw(0.5, 0.3, 0.2, f64::NEG_INFINITY).unwrap_err();
        assert!(matches!(err, ConfigError::NonFiniteThreshold(_)));
    }
}
