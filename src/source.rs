use async_trait::async_trait;

use crate::models::LearnerRecord;

/// Read access to stored learner records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn find_by_learner(&self, learner_id: i64) -> anyhow::Result<Vec<LearnerRecord>>;

    async fn find_by_class(&self, class_id: i64) -> anyhow::Result<Vec<LearnerRecord>>;

    async fn find_all(&self) -> anyhow::Result<Vec<LearnerRecord>>;
}

/// Records held in memory, e.g. loaded from a CSV export.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<LearnerRecord>,
}

impl MemorySource {
    pub fn new(records: Vec<LearnerRecord>) -> Self {
        Self { records }
    }

    fn filtered(&self, keep: impl Fn(&LearnerRecord) -> bool) -> Vec<LearnerRecord> {
        self.records
            .iter()
            .filter(|record| keep(record))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn find_by_learner(&self, learner_id: i64) -> anyhow::Result<Vec<LearnerRecord>> {
        Ok(self.filtered(|record| record.learner_id == learner_id))
    }

    async fn find_by_class(&self, class_id: i64) -> anyhow::Result<Vec<LearnerRecord>> {
        Ok(self.filtered(|record| record.class_id == class_id))
    }

    async fn find_all(&self) -> anyhow::Result<Vec<LearnerRecord>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(learner_id: i64, class_id: i64) -> LearnerRecord {
        LearnerRecord {
            learner_id,
            class_id,
            scores: Vec::new(),
        }
    }

    #[tokio::test]
    async fn filters_by_learner_and_class() {
        let source = MemorySource::new(vec![record(1, 10), record(2, 10), record(1, 11)]);

        let by_learner = source.find_by_learner(1).await.unwrap();
        assert_eq!(by_learner, vec![record(1, 10), record(1, 11)]);

        let by_class = source.find_by_class(10).await.unwrap();
        assert_eq!(by_class, vec![record(1, 10), record(2, 10)]);

        assert_eq!(source.find_all().await.unwrap().len(), 3);
        assert!(source.find_by_class(99).await.unwrap().is_empty());
    }
}
