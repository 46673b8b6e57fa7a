use std::sync::Arc;

use crate::{
    api::{HttpQuizApi, QuizApi},
    config::Config,
    errors::AppResult,
    models::domain::Quiz,
    services::{AttemptController, AuthService, QuestionWizard, StudentDashboard, TeacherDashboard},
    session::SessionStore,
};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub student: Arc<StudentDashboard>,
    pub teacher: Arc<TeacherDashboard>,
    pub session: Arc<SessionStore>,
    pub api: Arc<dyn QuizApi>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let session = Arc::new(SessionStore::open(config.session_file.clone()));

        let api: Arc<dyn QuizApi> = Arc::new(HttpQuizApi::new(&config, Arc::clone(&session))?);

        let auth = Arc::new(AuthService::new(Arc::clone(&api), Arc::clone(&session)));
        let student = Arc::new(StudentDashboard::new(Arc::clone(&api)));
        let teacher = Arc::new(TeacherDashboard::new(Arc::clone(&api)));

        Ok(Self {
            auth,
            student,
            teacher,
            session,
            api,
            config: Arc::new(config),
        })
    }

    /// One controller per attempt; the quiz is loaded before starting so the
    /// pre-start screen has something to show.
    pub fn attempt_controller(&self, quiz: Quiz) -> AttemptController {
        AttemptController::new(Arc::clone(&self.api), quiz)
    }

    /// One wizard per authoring session on a quiz.
    pub fn question_wizard(&self, quiz_id: &str) -> QuestionWizard {
        QuestionWizard::new(Arc::clone(&self.api), quiz_id)
    }
}
