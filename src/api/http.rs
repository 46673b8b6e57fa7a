use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;

use crate::api::gateway::QuizApi;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::domain::{Attempt, Choice, Question, Quiz};
use crate::models::domain::attempt::{AttemptAnswer, FinishResult};
use crate::models::dto::{
    AnswerSubmission, CreateChoiceRequest, CreateQuestionRequest, CreateQuizRequest, LoginRequest,
    LoginResponse, RegisterRequest, TeacherQuizSummary,
};
use crate::session::SessionStore;

/// reqwest-backed gateway. Attaches the bearer token from the session store
/// on everything except login/register; maps response statuses onto the
/// error taxonomy. No retry and no refresh-on-401.
pub struct HttpQuizApi {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl HttpQuizApi {
    pub fn new(config: &Config, session: Arc<SessionStore>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.access_token() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Pulls the server's `detail` message out of an error body when it is
    /// there; falls back to the raw body, then to the status reason.
    fn error_from_body(status: StatusCode, body: String) -> AppError {
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .unwrap_or(body);

        let detail = if detail.trim().is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            detail
        };

        AppError::from_status(status.as_u16(), detail)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| AppError::InternalError(format!("Failed to decode response: {}", e)))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Self::error_from_body(status, body))
        }
    }

    async fn expect_success(response: Response) -> AppResult<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Self::error_from_body(status, body))
        }
    }
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        let response = self
            .http
            .post(self.url("auth/login/"))
            .json(request)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn register(&self, request: &RegisterRequest) -> AppResult<()> {
        let response = self
            .http
            .post(self.url("auth/register/"))
            .json(request)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    async fn assigned_quizzes(&self) -> AppResult<Vec<Quiz>> {
        let request = self.http.get(self.url("student/quizzes/assigned/"));
        let response = self.authorize(request).send().await?;
        Self::parse(response).await
    }

    async fn fetch_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        let request = self.http.get(self.url(&format!("quizzes/{}/", quiz_id)));
        let response = self.authorize(request).send().await?;
        Self::parse(response).await
    }

    async fn start_attempt(&self, quiz_id: &str) -> AppResult<Attempt> {
        let request = self.http.post(self.url(&format!("quizzes/{}/start/", quiz_id)));
        let response = self.authorize(request).send().await?;
        Self::parse(response).await
    }

    async fn fetch_attempt(&self, attempt_id: &str) -> AppResult<Attempt> {
        let request = self.http.get(self.url(&format!("attempts/{}/", attempt_id)));
        let response = self.authorize(request).send().await?;
        Self::parse(response).await
    }

    async fn submit_answer(
        &self,
        attempt_id: &str,
        submission: &AnswerSubmission,
    ) -> AppResult<AttemptAnswer> {
        let request = self
            .http
            .post(self.url(&format!("attempts/{}/answer/", attempt_id)))
            .json(submission);
        let response = self.authorize(request).send().await?;
        Self::parse(response).await
    }

    async fn finish_attempt(&self, attempt_id: &str) -> AppResult<FinishResult> {
        let request = self
            .http
            .post(self.url(&format!("attempts/{}/finish/", attempt_id)));
        let response = self.authorize(request).send().await?;
        Self::parse(response).await
    }

    async fn review_wrong_answers(&self, attempt_id: &str) -> AppResult<Vec<AttemptAnswer>> {
        let request = self
            .http
            .get(self.url(&format!("attempts/{}/review/", attempt_id)));
        let response = self.authorize(request).send().await?;
        Self::parse(response).await
    }

    async fn list_quizzes(&self) -> AppResult<Vec<Quiz>> {
        let request = self.http.get(self.url("quizzes/"));
        let response = self.authorize(request).send().await?;
        Self::parse(response).await
    }

    async fn create_quiz(&self, request: &CreateQuizRequest) -> AppResult<Quiz> {
        let builder = self.http.post(self.url("quizzes/")).json(request);
        let response = self.authorize(builder).send().await?;
        Self::parse(response).await
    }

    async fn delete_quiz(&self, quiz_id: &str) -> AppResult<()> {
        let request = self.http.delete(self.url(&format!("quizzes/{}/", quiz_id)));
        let response = self.authorize(request).send().await?;
        Self::expect_success(response).await
    }

    async fn teacher_quiz_summary(&self) -> AppResult<Vec<TeacherQuizSummary>> {
        let request = self.http.get(self.url("teacher/quizzes/summary/"));
        let response = self.authorize(request).send().await?;
        Self::parse(response).await
    }

    async fn quiz_attempts(&self, quiz_id: &str) -> AppResult<Vec<Attempt>> {
        let request = self
            .http
            .get(self.url(&format!("teacher/quizzes/{}/attempts/", quiz_id)));
        let response = self.authorize(request).send().await?;
        Self::parse(response).await
    }

    async fn questions_for_quiz(&self, quiz_id: &str) -> AppResult<Vec<Question>> {
        let request = self
            .http
            .get(self.url("questions/"))
            .query(&[("quiz", quiz_id)]);
        let response = self.authorize(request).send().await?;
        Self::parse(response).await
    }

    async fn create_question(&self, request: &CreateQuestionRequest) -> AppResult<Question> {
        let builder = self.http.post(self.url("questions/")).json(request);
        let response = self.authorize(builder).send().await?;
        Self::parse(response).await
    }

    async fn delete_question(&self, question_id: &str) -> AppResult<()> {
        let request = self
            .http
            .delete(self.url(&format!("questions/{}/", question_id)));
        let response = self.authorize(request).send().await?;
        Self::expect_success(response).await
    }

    async fn create_choice(&self, request: &CreateChoiceRequest) -> AppResult<Choice> {
        let builder = self.http.post(self.url("choices/")).json(request);
        let response = self.authorize(builder).send().await?;
        Self::parse(response).await
    }
}
