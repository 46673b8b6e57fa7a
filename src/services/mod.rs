pub mod attempt_controller;
pub mod auth_service;
pub mod dashboard_service;
pub mod question_wizard;

pub use attempt_controller::{AttemptController, AttemptPhase};
pub use auth_service::AuthService;
pub use dashboard_service::{StudentDashboard, TeacherDashboard};
pub use question_wizard::{ChoiceEntry, CorrectChoicePolicy, QuestionWizard, WizardStep};
