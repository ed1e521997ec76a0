use std::collections::HashMap;

use tracing::debug;

use crate::config::WeightConfig;
use crate::math::TypeBuckets;
use crate::models::{Aggregate, ClassAverage, LearnerRecord, ScoreType};

pub fn compute_class_averages(
    learner_id: i64,
    records: &[LearnerRecord],
    weights: &WeightConfig,
) -> Aggregate<Vec<ClassAverage>> {
    if records.is_empty() {
        debug!(learner_id, "no records for learner");
        return Aggregate::NoData;
    }

    let mut order: Vec<(i64, TypeBuckets)> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.class_id).or_insert_with(|| {
            order.push((record.class_id, TypeBuckets::default()));
            order.len() - 1
        });
        for entry in &record.scores {
            order[slot].1.push(entry);
        }
    }

    let averages: Vec<ClassAverage> = order
        .into_iter()
        .map(|(class_id, buckets)| ClassAverage {
            class_id,
            avg: weighted_average(&buckets, weights),
        })
        .collect();

    debug!(learner_id, classes = averages.len(), "computed class averages");
    Aggregate::Data(averages)
}

fn weighted_average(buckets: &TypeBuckets, weights: &WeightConfig) -> f64 {
    [ScoreType::Exam, ScoreType::Quiz, ScoreType::Homework]
        .into_iter()
        .map(|score_type| buckets.mean_of(score_type) * weights.weight_for(score_type))
        .sum()
}
