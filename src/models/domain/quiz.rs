use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::question::Question;

/// A quiz as the server reports it. `None` for the time limit or the attempt
/// cap means unlimited. Nested questions arrive in presentation order; when
/// the quiz shuffles, the server has already shuffled them.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub time_limit_seconds: Option<u32>,
    pub max_attempts: Option<u32>,
    #[serde(default)]
    pub shuffle_questions: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn time_limit_minutes(&self) -> Option<u32> {
        self.time_limit_seconds.map(|s| s / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_without_questions_field_parses_to_empty_list() {
        let json = r#"{
            "id": "quiz-1",
            "title": "Algebra",
            "description": "",
            "time_limit_seconds": 600,
            "max_attempts": null,
            "shuffle_questions": false
        }"#;

        let quiz: Quiz = serde_json::from_str(json).expect("quiz should deserialize");
        assert!(quiz.questions.is_empty());
        assert_eq!(quiz.time_limit_minutes(), Some(10));
        assert_eq!(quiz.max_attempts, None);
    }

    #[test]
    fn null_time_limit_means_unlimited() {
        let json = r#"{
            "id": "quiz-2",
            "title": "Untimed",
            "time_limit_seconds": null,
            "max_attempts": 3
        }"#;

        let quiz: Quiz = serde_json::from_str(json).expect("quiz should deserialize");
        assert_eq!(quiz.time_limit_seconds, None);
        assert_eq!(quiz.time_limit_minutes(), None);
        assert_eq!(quiz.max_attempts, Some(3));
    }
}
