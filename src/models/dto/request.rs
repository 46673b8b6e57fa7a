use once_cell::sync::Lazy;
use serde::Serialize;
use validator::Validate;

use crate::models::domain::question::QuestionKind;
use crate::models::domain::user::Role;

static USERNAME_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[a-zA-Z0-9_]+$")
        .expect("USERNAME_REGEX is a valid regex pattern")
});

#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 50),
        regex(
            path = *USERNAME_REGEX,
            message = "Username must be alphanumeric with underscores"
        )
    )]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6))]
    pub password: String,

    pub role: Role,
}

/// What the create-quiz form collects. The wire request is derived from it:
/// minutes become seconds, and the unlimited flag becomes a null cap.
#[derive(Debug, Clone, Validate)]
pub struct NewQuizForm {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    pub description: String,

    #[validate(range(min = 1))]
    pub time_limit_minutes: u32,

    /// `None` means unlimited attempts.
    pub max_attempts: Option<u32>,

    pub shuffle_questions: bool,
}

impl NewQuizForm {
    pub fn into_request(self) -> CreateQuizRequest {
        CreateQuizRequest {
            title: self.title,
            description: self.description,
            time_limit_seconds: Some(self.time_limit_minutes * 60),
            max_attempts: self.max_attempts,
            shuffle_questions: self.shuffle_questions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateQuizRequest {
    pub title: String,
    pub description: String,
    pub time_limit_seconds: Option<u32>,
    pub max_attempts: Option<u32>,
    pub shuffle_questions: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateQuestionRequest {
    pub quiz: String,
    pub text: String,
    #[serde(rename = "qtype")]
    pub kind: QuestionKind,
    pub points: u32,
    pub order: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateChoiceRequest {
    pub question: String,
    pub text: String,
    pub is_correct: bool,
    pub order: u32,
}

/// One answer submission. Exactly one of the two payload fields is set; the
/// attempt controller chooses which by matching on the question kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerSubmission {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_choice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_answer_text: Option<String>,
}
