use thiserror::Error;

use crate::models::ScoreType;

/// Invalid weights or thresholds, rejected before any computation runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{score_type} weight must be a finite, non-negative number (got {value})")]
    InvalidWeight { score_type: ScoreType, value: f64 },

    #[error("weights must sum to 1.0 (got {sum})")]
    WeightsDoNotSumToOne { sum: f64 },

    #[error("threshold must be a finite number (got {0})")]
    NonFiniteThreshold(f64),
}
