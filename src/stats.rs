use tracing::debug;

use crate::config::Threshold;
use crate::math::mean;
use crate::models::{Aggregate, LearnerRecord, ThresholdStats};

/// Flat mean over all score types, unlike class averages.
pub fn record_average(record: &LearnerRecord) -> f64 {
    let scores: Vec<f64> = record.scores.iter().map(|entry| entry.score).collect();
    mean(&scores)
}

pub fn compute_statistics(
    records: &[LearnerRecord],
    threshold: Threshold,
    class_filter: Option<i64>,
) -> Aggregate<ThresholdStats> {
    let mut total_learners = 0usize;
    let mut above_threshold_count = 0usize;

    for record in records {
        if class_filter.is_some_and(|class_id| record.class_id != class_id) {
            continue;
        }

        total_learners += 1;
        if record_average(record) > threshold.value() {
            above_threshold_count += 1;
        }
    }

    if total_learners == 0 {
        debug!(?class_filter, "no records to compute statistics over");
        return Aggregate::NoData;
    }

    let stats = ThresholdStats {
        total_learners,
        above_threshold_count,
        above_threshold_percentage: above_threshold_count as f64 / total_learners as f64
            * 100.0,
    };
    debug!(
        ?class_filter,
        threshold = threshold.value(),
        total_learners,
        above_threshold_count,
        "computed threshold statistics"
    );
    Aggregate::Data(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScoreEntry, ScoreType};

    fn record(learner_id: i64, class_id: i64, scores: &[f64]) -> LearnerRecord {
        LearnerRecord {
            learner_id,
            class_id,
            scores: scores
                .iter()
                .map(|&score| ScoreEntry {
                    score_type: ScoreType::Quiz,
                    score,
                })
                .collect(),
        }
    }

    fn stats(result: Aggregate<ThresholdStats>) -> ThresholdStats {
        result.data().expect("expected statistics")
    }

    #[test]
    fn threshold_is_strictly_greater_than() {
        let records = vec![
            record(1, 10, &[70.0]),
            record(2, 10, &[60.0, 80.0]),
            record(3, 10, &[70.01]),
        ];

        let result = stats(compute_statistics(&records, Threshold::default(), None));
        assert_eq!(result.total_learners, 3);
        assert_eq!(result.above_threshold_count, 1);
        assert!((result.above_threshold_percentage - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn average_ignores_score_type_weights() {
        let record = LearnerRecord {
            learner_id: 1,
            class_id: 10,
            scores: vec![
                ScoreEntry {
                    score_type: ScoreType::Exam,
                    score: 100.0,
                },
                ScoreEntry {
                    score_type: ScoreType::Homework,
                    score: 40.0,
                },
                ScoreEntry {
                    score_type: ScoreType::Homework,
                    score: 40.0,
                },
            ],
        };
        assert!((record_average(&record) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn counts_each_enrollment_separately() {
        let records = vec![
            record(1, 10, &[90.0]),
            record(1, 11, &[50.0]),
            record(2, 10, &[95.0]),
        ];

        let result = stats(compute_statistics(&records, Threshold::default(), None));
        assert_eq!(result.total_learners, 3);
        assert_eq!(result.above_threshold_count, 2);
    }

    #[test]
    fn class_filter_applies_before_counting() {
        let records = vec![
            record(1, 10, &[90.0]),
            record(2, 11, &[50.0]),
            record(3, 11, &[75.0]),
        ];

        let result = stats(compute_statistics(&records, Threshold::default(), Some(11)));
        assert_eq!(result.total_learners, 2);
        assert_eq!(result.above_threshold_count, 1);
        assert!((result.above_threshold_percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn unmatched_filter_is_no_data() {
        let records = vec![record(1, 10, &[90.0])];
        let result = compute_statistics(&records, Threshold::default(), Some(99));
        assert!(result.is_no_data());
    }

    #[test]
    fn zero_percent_is_still_data() {
        let records = vec![record(1, 10, &[10.0])];
        let result = stats(compute_statistics(&records, Threshold::default(), Some(10)));
        assert_eq!(result.total_learners, 1);
        assert_eq!(result.above_threshold_count, 0);
        assert_eq!(result.above_threshold_percentage, 0.0);
    }

    #[test]
    fn record_without_scores_counts_but_never_passes() {
        let records = vec![record(1, 10, &[]), record(2, 10, &[88.0])];
        let result = stats(compute_statistics(&records, Threshold::default(), None));
        assert_eq!(result.total_learners, 2);
        assert_eq!(result.above_threshold_count, 1);
    }

    #[test]
    fn custom_threshold() {
        let records = vec![record(1, 10, &[55.0]), record(2, 10, &[45.0])];
        let threshold = Threshold::new(50.0).unwrap();
        let result = stats(compute_statistics(&records, threshold, None));
        assert_eq!(result.above_threshold_count, 1);
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let records = vec![record(1, 10, &[71.3, 68.2]), record(2, 10, &[90.1])];
        let first = stats(compute_statistics(&records, Threshold::default(), None));
        let second = stats(compute_statistics(&records, Threshold::default(), None));
        assert_eq!(first.total_learners, second.total_learners);
        assert_eq!(first.above_threshold_count, second.above_threshold_count);
        assert_eq!(
            first.above_threshold_percentage.to_bits(),
            second.above_threshold_percentage.to_bits()
        );
    }
}
