use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::quiz::Quiz;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    InProgress,
    Finished,
}

/// One student's run through one quiz, as the server reports it. The nested
/// quiz carries the questions (and, once the attempt exists, their choices),
/// so the attempt snapshot is self-contained.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Attempt {
    pub id: String,
    pub quiz: Quiz,
    pub student: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub finish_time: Option<DateTime<Utc>>,
    pub status: AttemptStatus,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub total_correct: u32,
    #[serde(default)]
    pub total_wrong: u32,
    #[serde(default)]
    pub time_limit_seconds: Option<u32>,
    #[serde(default)]
    pub answers: Vec<AttemptAnswer>,
}

impl Attempt {
    pub fn is_finished(&self) -> bool {
        self.status == AttemptStatus::Finished
    }

    /// The stored answer for a question, if the student has submitted one.
    pub fn answer_for(&self, question_id: &str) -> Option<&AttemptAnswer> {
        self.answers.iter().find(|a| a.question == question_id)
    }
}

/// A stored answer. Exactly one of `selected_choice`/`short_answer_text` is
/// populated, depending on the question kind. The text helper fields are
/// filled in by the server for review screens.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttemptAnswer {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub selected_choice: Option<String>,
    #[serde(default)]
    pub short_answer_text: Option<String>,
    #[serde(default)]
    pub is_correct: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_choice_text: Option<String>,
}

/// Grading totals returned by the finish call.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FinishResult {
    pub score: f64,
    pub total_correct: u32,
    pub total_wrong: u32,
}
