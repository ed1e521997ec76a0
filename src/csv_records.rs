use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::models::{LearnerRecord, ScoreEntry, ScoreType};

/// One score per CSV row: `learner_id,class_id,score_type,score`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRow {
    pub learner_id: i64,
    pub class_id: i64,
    pub score_type: String,
    pub score: f64,
}

pub fn read_rows(csv_path: &Path) -> anyhow::Result<Vec<ScoreRow>> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut rows = Vec::new();

    for (line, result) in reader.deserialize::<ScoreRow>().enumerate() {
        let row = result.with_context(|| format!("invalid score row {}", line + 1))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Groups rows into one record per (learner, class) enrollment, keeping the
/// first-seen enrollment order and the row order of scores.
pub fn records_from_rows(rows: Vec<ScoreRow>) -> anyhow::Result<Vec<LearnerRecord>> {
    let mut records: Vec<LearnerRecord> = Vec::new();
    let mut index: HashMap<(i64, i64), usize> = HashMap::new();

    for row in rows {
        let score_type: ScoreType = row.score_type.parse().with_context(|| {
            format!(
                "learner {} class {}: invalid score type",
                row.learner_id, row.class_id
            )
        })?;

        if !row.score.is_finite() {
            anyhow::bail!(
                "learner {} class {}: score must be a finite number (got {})",
                row.learner_id,
                row.class_id,
                row.score
            );
        }

        let slot = *index
            .entry((row.learner_id, row.class_id))
            .or_insert_with(|| {
                records.push(LearnerRecord {
                    learner_id: row.learner_id,
                    class_id: row.class_id,
                    scores: Vec::new(),
                });
                records.len() - 1
            });

        records[slot].scores.push(ScoreEntry {
            score_type,
            score: row.score,
        });
    }

    Ok(records)
}

pub fn read_records(csv_path: &Path) -> anyhow::Result<Vec<LearnerRecord>> {
    records_from_rows(read_rows(csv_path)?)
}
