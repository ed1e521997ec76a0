use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreType {
    Exam,
    Quiz,
    Homework,
}

impl ScoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreType::Exam => "exam",
            ScoreType::Quiz => "quiz",
            ScoreType::Homework => "homework",
        }
    }
}

impl std::fmt::Display for ScoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScoreType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exam" => Ok(ScoreType::Exam),
            "quiz" => Ok(ScoreType::Quiz),
            "homework" => Ok(ScoreType::Homework),
            other => anyhow::bail!("unknown score type `{other}`"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(rename = "type")]
    pub score_type: ScoreType,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerRecord {
    pub learner_id: i64,
    pub class_id: i64,
    pub scores: Vec<ScoreEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassAverage {
    pub class_id: i64,
    pub avg: f64,
}

/// Counts are per record: a learner enrolled in two classes is counted twice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdStats {
    pub total_learners: usize,
    pub above_threshold_count: usize,
    pub above_threshold_percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Aggregate<T> {
    NoData,
    Data(T),
}

impl<T> Aggregate<T> {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Aggregate::NoData)
    }

    pub fn data(self) -> Option<T> {
        match self {
            Aggregate::NoData => None,
            Aggregate::Data(value) => Some(value),
        }
    }
}
