use std::sync::Arc;

use validator::Validate;

use crate::api::QuizApi;
use crate::errors::AppResult;
use crate::models::domain::{Attempt, Quiz};
use crate::models::dto::{NewQuizForm, TeacherQuizSummary};

/// Student-facing reads. An empty result is a legitimate empty state, not an
/// error; callers render "no data" for failures too (they log, not alert).
pub struct StudentDashboard {
    api: Arc<dyn QuizApi>,
}

impl StudentDashboard {
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self { api }
    }

    pub async fn assigned_quizzes(&self) -> AppResult<Vec<Quiz>> {
        self.api.assigned_quizzes().await
    }

    pub async fn quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.api.fetch_quiz(quiz_id).await
    }
}

/// Teacher-facing operations: quiz listing, per-quiz attempt summaries and
/// quiz CRUD. The create form is validated and converted here (minutes to
/// seconds, unlimited flag to a null cap) before hitting the wire.
pub struct TeacherDashboard {
    api: Arc<dyn QuizApi>,
}

impl TeacherDashboard {
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self { api }
    }

    pub async fn quizzes(&self) -> AppResult<Vec<Quiz>> {
        self.api.list_quizzes().await
    }

    pub async fn summary(&self) -> AppResult<Vec<TeacherQuizSummary>> {
        self.api.teacher_quiz_summary().await
    }

    pub async fn attempts(&self, quiz_id: &str) -> AppResult<Vec<Attempt>> {
        self.api.quiz_attempts(quiz_id).await
    }

    pub async fn create_quiz(&self, form: NewQuizForm) -> AppResult<Quiz> {
        form.validate()?;
        self.api.create_quiz(&form.into_request()).await
    }

    pub async fn delete_quiz(&self, quiz_id: &str) -> AppResult<()> {
        self.api.delete_quiz(quiz_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockQuizApi;
    use crate::errors::AppError;

    #[tokio::test]
    async fn empty_assigned_list_is_a_valid_empty_state() {
        let mut api = MockQuizApi::new();
        api.expect_assigned_quizzes().returning(|| Ok(vec![]));

        let dashboard = StudentDashboard::new(Arc::new(api));
        let quizzes = dashboard.assigned_quizzes().await.unwrap();
        assert!(quizzes.is_empty());
    }

    #[tokio::test]
    async fn create_quiz_converts_the_form_before_sending() {
        let mut api = MockQuizApi::new();
        api.expect_create_quiz()
            .withf(|request| {
                request.title == "Algebra"
                    && request.time_limit_seconds == Some(600)
                    && request.max_attempts.is_none()
            })
            .returning(|request| {
                Ok(Quiz {
                    id: "quiz-1".to_string(),
                    title: request.title.clone(),
                    description: request.description.clone(),
                    time_limit_seconds: request.time_limit_seconds,
                    max_attempts: request.max_attempts,
                    shuffle_questions: request.shuffle_questions,
                    created_at: None,
                    questions: vec![],
                })
            });

        let dashboard = TeacherDashboard::new(Arc::new(api));
        let quiz = dashboard
            .create_quiz(NewQuizForm {
                title: "Algebra".to_string(),
                description: String::new(),
                time_limit_minutes: 10,
                max_attempts: None,
                shuffle_questions: false,
            })
            .await
            .unwrap();

        assert_eq!(quiz.time_limit_seconds, Some(600));
        assert_eq!(quiz.max_attempts, None);
    }

    #[tokio::test]
    async fn invalid_quiz_form_never_reaches_the_api() {
        // No create_quiz expectation: a call would panic.
        let dashboard = TeacherDashboard::new(Arc::new(MockQuizApi::new()));
        let result = dashboard
            .create_quiz(NewQuizForm {
                title: String::new(),
                description: String::new(),
                time_limit_minutes: 0,
                max_attempts: Some(1),
                shuffle_questions: false,
            })
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
