use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::averages::compute_class_averages;
use crate::config::{Threshold, WeightConfig};
use crate::models::{Aggregate, LearnerRecord, ThresholdStats};
use crate::stats::compute_statistics;

#[derive(Debug, Clone)]
pub struct ClassSummary {
    pub class_id: i64,
    pub stats: ThresholdStats,
}

pub fn summarize_by_class(records: &[LearnerRecord], threshold: Threshold) -> Vec<ClassSummary> {
    let mut class_ids: Vec<i64> = records.iter().map(|record| record.class_id).collect();
    class_ids.sort_unstable();
    class_ids.dedup();

    class_ids
        .into_iter()
        .filter_map(|class_id| {
            compute_statistics(records, threshold, Some(class_id))
                .data()
                .map(|stats| ClassSummary { class_id, stats })
        })
        .collect()
}

fn format_average(avg: f64) -> String {
    if avg.is_nan() {
        "incomplete (missing score types)".to_string()
    } else {
        format!("{avg:.2}")
    }
}

pub fn build_report(
    class_filter: Option<i64>,
    threshold: Threshold,
    weights: &WeightConfig,
    generated_on: NaiveDate,
    records: &[LearnerRecord],
) -> String {
    let records: Vec<LearnerRecord> = records
        .iter()
        .filter(|record| class_filter.map_or(true, |class_id| record.class_id == class_id))
        .cloned()
        .collect();

    let mut output = String::new();
    let scope_label = class_filter
        .map(|class_id| format!("class {class_id}"))
        .unwrap_or_else(|| "all classes".to_string());

    let _ = writeln!(output, "# Grade Aggregate Report");
    let _ = writeln!(
        output,
        "Generated for {} on {} (threshold {:.1}; weights exam {:.2}, quiz {:.2}, homework {:.2})",
        scope_label,
        generated_on,
        threshold.value(),
        weights.exam(),
        weights.quiz(),
        weights.homework()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Threshold Summary");

    match compute_statistics(&records, threshold, class_filter) {
        Aggregate::NoData => {
            let _ = writeln!(output, "No grade records found.");
        }
        Aggregate::Data(stats) => {
            let _ = writeln!(
                output,
                "- {} of {} enrollments above {:.1} ({:.1}%)",
                stats.above_threshold_count,
                stats.total_learners,
                threshold.value(),
                stats.above_threshold_percentage
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Class Breakdown");

    let summaries = summarize_by_class(&records, threshold);
    if summaries.is_empty() {
        let _ = writeln!(output, "No classes with grade records.");
    } else {
        for summary in &summaries {
            let _ = writeln!(
                output,
                "- class {}: {} of {} above threshold ({:.1}%)",
                summary.class_id,
                summary.stats.above_threshold_count,
                summary.stats.total_learners,
                summary.stats.above_threshold_percentage
            );
        }
    }

    let mut by_learner: BTreeMap<i64, Vec<LearnerRecord>> = BTreeMap::new();
    for record in &records {
        by_learner
            .entry(record.learner_id)
            .or_default()
            .push(record.clone());
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Learner Class Averages");

    if by_learner.is_empty() {
        let _ = writeln!(output, "No learners with grade records.");
    } else {
        for (learner_id, learner_records) in &by_learner {
            let _ = writeln!(output, "- learner {learner_id}");
            let averages = compute_class_averages(*learner_id, learner_records, weights);
            if let Some(averages) = averages.data() {
                for average in averages {
                    let _ = writeln!(
                        output,
                        "  - class {}: {}",
                        average.class_id,
                        format_average(average.avg)
                    );
                }
            }
        }
    }

    output
}
