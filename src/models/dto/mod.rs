pub mod request;
pub mod response;

pub use request::{
    AnswerSubmission, CreateChoiceRequest, CreateQuestionRequest, CreateQuizRequest, LoginRequest,
    NewQuizForm, RegisterRequest,
};
pub use response::{LoginResponse, TeacherQuizSummary};
