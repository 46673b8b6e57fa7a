use chrono::Utc;

use crate::models::domain::attempt::{Attempt, AttemptStatus};
use crate::models::domain::question::{Choice, Question, QuestionKind};
use crate::models::domain::quiz::Quiz;
