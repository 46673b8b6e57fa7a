use std::sync::Arc;

use crate::api::QuizApi;
use crate::errors::{AppError, AppResult};
use crate::models::domain::attempt::{Attempt, AttemptAnswer, FinishResult};
use crate::models::domain::question::{Question, QuestionKind};
use crate::models::domain::quiz::Quiz;
use crate::models::dto::AnswerSubmission;

/// Lifecycle of one attempt. There is no way back out of `Finished`.
#[derive(Debug)]
pub enum AttemptPhase {
    NotStarted,
    InProgress {
        attempt: Attempt,
        /// Index of the question currently shown, always within
        /// `[0, question_count)` while questions exist.
        cursor: usize,
    },
    Finished {
        result: FinishResult,
        /// Wrong-answer review entries. `None` when the review fetch failed
        /// after a successful finish.
        review: Option<Vec<AttemptAnswer>>,
    },
}

/// Drives one student's run through one quiz: start, answer, navigate,
/// finish, review. Every mutation takes `&mut self`, so two submissions of
/// the same operation can never be in flight at once.
///
/// The server stays the source of truth: after every answer the attempt
/// snapshot is re-fetched rather than patched locally.
pub struct AttemptController {
    api: Arc<dyn QuizApi>,
    quiz: Quiz,
    phase: AttemptPhase,
}

impl AttemptController {
    pub fn new(api: Arc<dyn QuizApi>, quiz: Quiz) -> Self {
        Self {
            api,
            quiz,
            phase: AttemptPhase::NotStarted,
        }
    }

    pub fn phase(&self) -> &AttemptPhase {
        &self.phase
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// Questions in server order. The controller never re-orders; when the
    /// quiz shuffles, the server already did it.
    pub fn questions(&self) -> &[Question] {
        match &self.phase {
            AttemptPhase::InProgress { attempt, .. } => &attempt.quiz.questions,
            _ => &[],
        }
    }

    pub fn cursor(&self) -> usize {
        match &self.phase {
            AttemptPhase::InProgress { cursor, .. } => *cursor,
            _ => 0,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        match &self.phase {
            AttemptPhase::InProgress { attempt, cursor } => attempt.quiz.questions.get(*cursor),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&FinishResult> {
        match &self.phase {
            AttemptPhase::Finished { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn review(&self) -> Option<&[AttemptAnswer]> {
        match &self.phase {
            AttemptPhase::Finished { review, .. } => review.as_deref(),
            _ => None,
        }
    }

    /// Creates the attempt on the server, then re-fetches it for the
    /// canonical snapshot. On failure the controller stays in `NotStarted`
    /// and the caller shows the message on the pre-start screen.
    pub async fn start(&mut self) -> AppResult<()> {
        if !matches!(self.phase, AttemptPhase::NotStarted) {
            return Err(AppError::ValidationError(
                "Attempt has already been started".to_string(),
            ));
        }

        let created = self.api.start_attempt(&self.quiz.id).await.map_err(|err| {
            log::error!("Failed to start attempt for quiz {}: {}", self.quiz.id, err);
            err
        })?;

        // A failed snapshot fetch keeps the creation echo.
        let attempt = match self.api.fetch_attempt(&created.id).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::warn!("Could not refresh attempt {} after start: {}", created.id, err);
                created
            }
        };

        self.phase = AttemptPhase::InProgress { attempt, cursor: 0 };
        Ok(())
    }

    /// Submits a choice selection for the current question. Only valid for
    /// multiple-choice and true/false questions.
    pub async fn answer_choice(&mut self, choice_id: &str) -> AppResult<()> {
        let question = self.require_current_question()?;

        let submission = match question.kind {
            QuestionKind::MultipleChoice | QuestionKind::TrueFalse => AnswerSubmission {
                question: question.id.clone(),
                selected_choice: Some(choice_id.to_string()),
                short_answer_text: None,
            },
            QuestionKind::ShortAnswer => {
                return Err(AppError::ValidationError(
                    "Short answer questions take free text, not a choice".to_string(),
                ))
            }
        };

        self.submit_and_refetch(submission).await
    }

    /// Submits free text for the current question. Only valid for
    /// short-answer questions.
    pub async fn answer_text(&mut self, text: &str) -> AppResult<()> {
        let question = self.require_current_question()?;

        let submission = match question.kind {
            QuestionKind::ShortAnswer => AnswerSubmission {
                question: question.id.clone(),
                selected_choice: None,
                short_answer_text: Some(text.to_string()),
            },
            QuestionKind::MultipleChoice | QuestionKind::TrueFalse => {
                return Err(AppError::ValidationError(
                    "This question takes a choice selection, not free text".to_string(),
                ))
            }
        };

        self.submit_and_refetch(submission).await
    }

    /// Moves the cursor forward. Clamped: a no-op on the last question.
    /// Pure client-side; students may revisit and re-answer until finish.
    pub fn next(&mut self) {
        if let AttemptPhase::InProgress { attempt, cursor } = &mut self.phase {
            let count = attempt.quiz.questions.len();
            if count > 0 && *cursor < count - 1 {
                *cursor += 1;
            }
        }
    }

    /// Moves the cursor backward. Clamped: a no-op on the first question.
    pub fn previous(&mut self) {
        if let AttemptPhase::InProgress { cursor, .. } = &mut self.phase {
            if *cursor > 0 {
                *cursor -= 1;
            }
        }
    }

    /// Requests grading and closure, then the wrong-answer review. A failed
    /// finish leaves the attempt in progress; a failed review still enters
    /// `Finished`, just without review data.
    pub async fn finish(&mut self) -> AppResult<()> {
        let attempt_id = match &self.phase {
            AttemptPhase::InProgress { attempt, .. } => attempt.id.clone(),
            AttemptPhase::NotStarted => {
                return Err(AppError::ValidationError(
                    "No attempt in progress".to_string(),
                ))
            }
            AttemptPhase::Finished { .. } => {
                return Err(AppError::ValidationError(
                    "Attempt is already finished".to_string(),
                ))
            }
        };

        let result = self.api.finish_attempt(&attempt_id).await.map_err(|err| {
            log::error!("Failed to finish attempt {}: {}", attempt_id, err);
            err
        })?;

        let review = match self.api.review_wrong_answers(&attempt_id).await {
            Ok(entries) => Some(entries),
            Err(err) => {
                log::warn!(
                    "Attempt {} finished but review fetch failed: {}",
                    attempt_id,
                    err
                );
                None
            }
        };

        self.phase = AttemptPhase::Finished { result, review };
        Ok(())
    }

    fn require_current_question(&self) -> AppResult<&Question> {
        match &self.phase {
            AttemptPhase::InProgress { attempt, cursor } => {
                attempt.quiz.questions.get(*cursor).ok_or_else(|| {
                    AppError::ValidationError("This quiz has no questions".to_string())
                })
            }
            _ => Err(AppError::ValidationError(
                "No attempt in progress".to_string(),
            )),
        }
    }

    async fn submit_and_refetch(&mut self, submission: AnswerSubmission) -> AppResult<()> {
        let attempt_id = match &self.phase {
            AttemptPhase::InProgress { attempt, .. } => attempt.id.clone(),
            _ => {
                return Err(AppError::ValidationError(
                    "No attempt in progress".to_string(),
                ))
            }
        };

        // On any failure below, the attempt snapshot and the cursor are left
        // exactly as they were; the student retries manually.
        self.api
            .submit_answer(&attempt_id, &submission)
            .await
            .map_err(|err| {
                log::error!("Failed to submit answer on attempt {}: {}", attempt_id, err);
                err
            })?;

        let refreshed = self.api.fetch_attempt(&attempt_id).await.map_err(|err| {
            log::error!("Failed to refresh attempt {}: {}", attempt_id, err);
            err
        })?;

        if let AttemptPhase::InProgress { attempt, .. } = &mut self.phase {
            *attempt = refreshed;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockQuizApi;
    use crate::test_utils::fixtures;

    fn controller_with(api: MockQuizApi) -> AttemptController {
        AttemptController::new(Arc::new(api), fixtures::quiz_with_questions())
    }

    async fn started_controller(mut api: MockQuizApi) -> AttemptController {
        let quiz = fixtures::quiz_with_questions();
        let attempt = fixtures::attempt_for(&quiz);
        let snapshot = attempt.clone();
        api.expect_start_attempt()
            .returning(move |_| Ok(attempt.clone()));
        api.expect_fetch_attempt()
            .returning(move |_| Ok(snapshot.clone()));

        let mut controller = controller_with(api);
        controller.start().await.unwrap();
        controller
    }

    #[tokio::test]
    async fn start_failure_stays_not_started() {
        let mut api = MockQuizApi::new();
        api.expect_start_attempt().returning(|_| {
            Err(AppError::ValidationError(
                "Max attempts exceeded".to_string(),
            ))
        });

        let mut controller = controller_with(api);
        let result = controller.start().await;

        assert!(result.is_err());
        assert!(matches!(controller.phase(), AttemptPhase::NotStarted));
    }

    #[tokio::test]
    async fn start_twice_is_rejected() {
        let mut controller = started_controller(MockQuizApi::new()).await;
        assert!(controller.start().await.is_err());
    }

    #[tokio::test]
    async fn cursor_is_clamped_at_both_ends() {
        let mut controller = started_controller(MockQuizApi::new()).await;
        let count = controller.questions().len();
        assert!(count >= 2);

        controller.previous();
        assert_eq!(controller.cursor(), 0);

        for _ in 0..count + 5 {
            controller.next();
        }
        assert_eq!(controller.cursor(), count - 1);

        // Repeated next at the last index is idempotent.
        controller.next();
        assert_eq!(controller.cursor(), count - 1);
    }

    #[tokio::test]
    async fn answer_kind_mismatch_is_rejected_without_a_request() {
        // No submit_answer expectation is set: calling it would panic.
        let mut controller = started_controller(MockQuizApi::new()).await;

        // Question 0 is multiple choice; free text must be refused.
        assert!(controller.answer_text("four").await.is_err());

        // Move to the short answer question; a choice must be refused.
        while controller
            .current_question()
            .map(|q| q.kind != QuestionKind::ShortAnswer)
            .unwrap_or(false)
        {
            controller.next();
        }
        assert!(controller.answer_choice("c-1").await.is_err());
    }

    #[tokio::test]
    async fn failed_submission_leaves_attempt_and_cursor_unchanged() {
        let quiz = fixtures::quiz_with_questions();
        let attempt = fixtures::attempt_for(&quiz);
        let snapshot = attempt.clone();

        let mut api = MockQuizApi::new();
        api.expect_start_attempt()
            .returning(move |_| Ok(attempt.clone()));
        api.expect_fetch_attempt()
            .returning(move |_| Ok(snapshot.clone()));
        api.expect_submit_answer()
            .returning(|_, _| Err(AppError::Network("connection reset".to_string())));

        let mut controller = controller_with(api);
        controller.start().await.unwrap();
        controller.next();
        let cursor_before = controller.cursor();

        let question_id = controller.current_question().unwrap().id.clone();
        let choice_id = controller.current_question().unwrap().choices[0].id.clone();
        assert!(controller.answer_choice(&choice_id).await.is_err());

        assert_eq!(controller.cursor(), cursor_before);
        assert_eq!(controller.current_question().unwrap().id, question_id);
        assert!(matches!(controller.phase(), AttemptPhase::InProgress { .. }));
    }

    #[tokio::test]
    async fn finish_with_failing_review_still_finishes() {
        let quiz = fixtures::quiz_with_questions();
        let attempt = fixtures::attempt_for(&quiz);
        let snapshot = attempt.clone();

        let mut api = MockQuizApi::new();
        api.expect_start_attempt()
            .returning(move |_| Ok(attempt.clone()));
        api.expect_fetch_attempt()
            .returning(move |_| Ok(snapshot.clone()));
        api.expect_finish_attempt().returning(|_| {
            Ok(FinishResult {
                score: 0.0,
                total_correct: 0,
                total_wrong: 3,
            })
        });
        api.expect_review_wrong_answers()
            .returning(|_| Err(AppError::Network("connection reset".to_string())));

        let mut controller = controller_with(api);
        controller.start().await.unwrap();
        controller.finish().await.unwrap();

        assert!(controller.result().is_some());
        assert!(controller.review().is_none());
    }

    #[tokio::test]
    async fn finish_failure_stays_in_progress() {
        let quiz = fixtures::quiz_with_questions();
        let attempt = fixtures::attempt_for(&quiz);
        let snapshot = attempt.clone();

        let mut api = MockQuizApi::new();
        api.expect_start_attempt()
            .returning(move |_| Ok(attempt.clone()));
        api.expect_fetch_attempt()
            .returning(move |_| Ok(snapshot.clone()));
        api.expect_finish_attempt()
            .returning(|_| Err(AppError::ServerError("grading crashed".to_string())));

        let mut controller = controller_with(api);
        controller.start().await.unwrap();

        assert!(controller.finish().await.is_err());
        assert!(matches!(controller.phase(), AttemptPhase::InProgress { .. }));

        // And a finished controller refuses a second finish.
        let mut api = MockQuizApi::new();
        api.expect_finish_attempt().returning(|_| {
            Ok(FinishResult {
                score: 100.0,
                total_correct: 3,
                total_wrong: 0,
            })
        });
        api.expect_review_wrong_answers().returning(|_| Ok(vec![]));
        let mut controller = started_controller(api).await;
        controller.finish().await.unwrap();
        assert!(controller.finish().await.is_err());
    }
}
