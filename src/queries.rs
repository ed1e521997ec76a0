use crate::averages::compute_class_averages;
use crate::config::{Threshold, WeightConfig};
use crate::models::{Aggregate, ClassAverage, ThresholdStats};
use crate::source::RecordSource;
use crate::stats::compute_statistics;

pub async fn learner_class_averages(
    source: &dyn RecordSource,
    learner_id: i64,
    weights: &WeightConfig,
) -> anyhow::Result<Aggregate<Vec<ClassAverage>>> {
    let records = source.find_by_learner(learner_id).await?;
    Ok(compute_class_averages(learner_id, &records, weights))
}

pub async fn overall_stats(
    source: &dyn RecordSource,
    threshold: Threshold,
) -> anyhow::Result<Aggregate<ThresholdStats>> {
    let records = source.find_all().await?;
    Ok(compute_statistics(&records, threshold, None))
}

pub async fn class_stats(
    source: &dyn RecordSource,
    class_id: i64,
    threshold: Threshold,
) -> anyhow::Result<Aggregate<ThresholdStats>> {
    let records = source.find_by_class(class_id).await?;
    Ok(compute_statistics(&records, threshold, Some(class_id)))
}
