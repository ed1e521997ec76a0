use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::csv_records;
use crate::models::{LearnerRecord, ScoreEntry, ScoreType};
use crate::source::RecordSource;

const SELECT_GRADES: &str = "SELECT learner_id, class_id, scores \
     FROM grade_aggregates.grades";

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    use ScoreType::{Exam, Homework, Quiz};

    let grades: Vec<(&str, i64, i64, Vec<(ScoreType, f64)>)> = vec![
        (
            "seed-001",
            1,
            101,
            vec![(Exam, 80.0), (Quiz, 90.0), (Homework, 100.0)],
        ),
        (
            "seed-002",
            1,
            102,
            vec![(Exam, 62.5), (Exam, 71.0), (Quiz, 58.0), (Homework, 90.0)],
        ),
        ("seed-003", 2, 101, vec![(Quiz, 74.0), (Homework, 66.0)]),
        (
            "seed-004",
            3,
            102,
            vec![(Exam, 91.0), (Quiz, 88.0), (Homework, 95.5)],
        ),
    ];

    for (source_key, learner_id, class_id, scores) in grades {
        let scores: Vec<ScoreEntry> = scores
            .into_iter()
            .map(|(score_type, score)| ScoreEntry { score_type, score })
            .collect();
        upsert_record(
            pool,
            source_key,
            &LearnerRecord {
                learner_id,
                class_id,
                scores,
            },
        )
        .await?;
    }

    Ok(())
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let records = csv_records::read_records(csv_path)?;
    let mut written = 0usize;

    for record in &records {
        let source_key = format!("import-{}-{}", record.learner_id, record.class_id);
        written += upsert_record(pool, &source_key, record).await? as usize;
    }

    info!(written, path = %csv_path.display(), "imported grade records");
    Ok(written)
}

async fn upsert_record(
    pool: &PgPool,
    source_key: &str,
    record: &LearnerRecord,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO grade_aggregates.grades
        (id, learner_id, class_id, scores, source_key)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (source_key) DO UPDATE
        SET learner_id = EXCLUDED.learner_id,
            class_id = EXCLUDED.class_id,
            scores = EXCLUDED.scores
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(record.learner_id)
    .bind(record.class_id)
    .bind(Json(&record.scores))
    .bind(source_key)
    .execute(pool)
    .await
    .with_context(|| format!("failed to write grade record {source_key}"))?;

    Ok(result.rows_affected())
}

fn record_from_row(row: PgRow) -> anyhow::Result<LearnerRecord> {
    let Json(scores): Json<Vec<ScoreEntry>> = row
        .try_get("scores")
        .context("grade row has malformed scores")?;

    Ok(LearnerRecord {
        learner_id: row.try_get("learner_id")?,
        class_id: row.try_get("class_id")?,
        scores,
    })
}

/// Postgres-backed record source.
#[derive(Clone)]
pub struct PgSource {
    pool: PgPool,
}

impl PgSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, filter: Option<(&str, i64)>) -> anyhow::Result<Vec<LearnerRecord>> {
        let mut query = String::from(SELECT_GRADES);
        if let Some((column, _)) = filter {
            query.push_str(&format!(" WHERE {column} = $1"));
        }
        query.push_str(" ORDER BY created_at, id");

        let mut rows = sqlx::query(&query);
        if let Some((_, value)) = filter {
            rows = rows.bind(value);
        }

        let records = rows
            .fetch_all(&self.pool)
            .await
            .context("failed to query grades")?;

        records.into_iter().map(record_from_row).collect()
    }
}

#[async_trait]
impl RecordSource for PgSource {
    #[instrument(skip(self))]
    async fn find_by_learner(&self, learner_id: i64) -> anyhow::Result<Vec<LearnerRecord>> {
        self.fetch(Some(("learner_id", learner_id))).await
    }

    #[instrument(skip(self))]
    async fn find_by_class(&self, class_id: i64) -> anyhow::Result<Vec<LearnerRecord>> {
        self.fetch(Some(("class_id", class_id))).await
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> anyhow::Result<Vec<LearnerRecord>> {
        self.fetch(None).await
    }
}
