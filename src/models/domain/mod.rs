pub mod attempt;
pub mod question;
pub mod quiz;
pub mod user;

pub use attempt::{Attempt, AttemptAnswer, AttemptStatus};
pub use question::{Choice, Question, QuestionKind};
pub use quiz::Quiz;
pub use user::{Identity, Role};
