use async_trait::async_trait;

use crate::errors::AppResult;
use crate::models::domain::{Attempt, Choice, Question, Quiz};
use crate::models::domain::attempt::{AttemptAnswer, FinishResult};
use crate::models::dto::{
    AnswerSubmission, CreateChoiceRequest, CreateQuestionRequest, CreateQuizRequest, LoginRequest,
    LoginResponse, RegisterRequest, TeacherQuizSummary,
};

/// The seam between the controllers and the quiz service. One method per
/// logical REST operation; implementations surface every failure as an
/// `AppError` and never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizApi: Send + Sync {
    // Auth
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse>;
    async fn register(&self, request: &RegisterRequest) -> AppResult<()>;

    // Student
    async fn assigned_quizzes(&self) -> AppResult<Vec<Quiz>>;
    async fn fetch_quiz(&self, quiz_id: &str) -> AppResult<Quiz>;
    async fn start_attempt(&self, quiz_id: &str) -> AppResult<Attempt>;
    async fn fetch_attempt(&self, attempt_id: &str) -> AppResult<Attempt>;
    async fn submit_answer(
        &self,
        attempt_id: &str,
        submission: &AnswerSubmission,
    ) -> AppResult<AttemptAnswer>;
    async fn finish_attempt(&self, attempt_id: &str) -> AppResult<FinishResult>;
    async fn review_wrong_answers(&self, attempt_id: &str) -> AppResult<Vec<AttemptAnswer>>;

    // Teacher
    async fn list_quizzes(&self) -> AppResult<Vec<Quiz>>;
    async fn create_quiz(&self, request: &CreateQuizRequest) -> AppResult<Quiz>;
    async fn delete_quiz(&self, quiz_id: &str) -> AppResult<()>;
    async fn teacher_quiz_summary(&self) -> AppResult<Vec<TeacherQuizSummary>>;
    async fn quiz_attempts(&self, quiz_id: &str) -> AppResult<Vec<Attempt>>;
    async fn questions_for_quiz(&self, quiz_id: &str) -> AppResult<Vec<Question>>;
    async fn create_question(&self, request: &CreateQuestionRequest) -> AppResult<Question>;
    async fn delete_question(&self, question_id: &str) -> AppResult<()>;
    async fn create_choice(&self, request: &CreateChoiceRequest) -> AppResult<Choice>;
}
