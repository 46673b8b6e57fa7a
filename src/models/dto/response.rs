use serde::{Deserialize, Serialize};

use crate::models::domain::user::Identity;

/// Login payload: the token pair plus the identity echoed by the server.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LoginResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
    pub user: Identity,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TeacherQuizSummary {
    pub quiz_id: String,
    pub title: String,
    pub attempts: u64,
}
