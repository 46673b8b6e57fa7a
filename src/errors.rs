use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Network(_) => "NETWORK",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::ServerError(_) => "SERVER_ERROR",
            AppError::Storage(_) => "STORAGE",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Maps an HTTP status plus the server's detail message onto the error
    /// taxonomy. 401 is the only authentication-specific case; every other
    /// 4xx carries the server's message as a validation failure.
    pub fn from_status(status: u16, detail: String) -> Self {
        match status {
            401 => AppError::Unauthorized(detail),
            403 => AppError::Forbidden(detail),
            404 => AppError::NotFound(detail),
            400..=499 => AppError::ValidationError(detail),
            _ => AppError::ServerError(detail),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
