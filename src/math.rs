use crate::models::{ScoreEntry, ScoreType};

/// NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[derive(Debug, Default, Clone)]
pub struct TypeBuckets {
    pub exam: Vec<f64>,
    pub quiz: Vec<f64>,
    pub homework: Vec<f64>,
}

impl TypeBuckets {
    pub fn push(&mut self, entry: &ScoreEntry) {
        match entry.score_type {
            ScoreType::Exam => self.exam.push(entry.score),
            ScoreType::Quiz => self.quiz.push(entry.score),
            ScoreType::Homework => self.homework.push(entry.score),
        }
    }

    pub fn mean_of(&self, score_type: ScoreType) -> f64 {
        match score_type {
            ScoreType::Exam => mean(&self.exam),
            ScoreType::Quiz => mean(&self.quiz),
            ScoreType::Homework => mean(&self.homework),
        }
    }
}
