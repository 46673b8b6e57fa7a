use std::sync::Arc;

use validator::Validate;

use crate::api::QuizApi;
use crate::errors::{AppError, AppResult};
use crate::models::domain::user::Identity;
use crate::models::dto::{LoginRequest, RegisterRequest};
use crate::session::{SessionStore, TokenBundle};

/// Login, registration and logout. The session store is only ever touched
/// here: established on a successful login, cleared on logout, and left
/// untouched by every failure path.
pub struct AuthService {
    api: Arc<dyn QuizApi>,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(api: Arc<dyn QuizApi>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// Exchanges credentials for a token bundle and installs the session.
    /// Every server-side failure surfaces as the same inline message; the
    /// actual cause goes to the log.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<Identity> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let response = self.api.login(&request).await.map_err(|err| {
            log::error!("Login failed for {}: {}", username, err);
            AppError::Unauthorized("Invalid credentials".to_string())
        })?;

        let identity = response.user.clone();
        self.session.establish(
            TokenBundle {
                access: response.access,
                refresh: response.refresh,
            },
            response.user,
        )?;

        log::info!("Logged in as {} ({})", identity.username, identity.role);
        Ok(identity)
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<()> {
        request.validate()?;

        self.api.register(&request).await.map_err(|err| {
            log::error!("Registration failed for {}: {}", request.username, err);
            AppError::ValidationError("Registration failed".to_string())
        })
    }

    /// Local only; the server keeps no session state worth revoking here.
    pub fn logout(&self) {
        self.session.clear();
        log::info!("Logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockQuizApi;
    use crate::models::domain::user::Role;
    use crate::models::dto::LoginResponse;
    use tempfile::TempDir;

    fn session_in(dir: &TempDir) -> Arc<SessionStore> {
        Arc::new(SessionStore::open(dir.path().join("auth_tokens.json")))
    }

    #[tokio::test]
    async fn failed_login_leaves_store_logged_out_with_inline_message() {
        let dir = TempDir::new().unwrap();
        let session = session_in(&dir);

        let mut api = MockQuizApi::new();
        api.expect_login()
            .returning(|_| Err(AppError::Unauthorized("No active account".to_string())));

        let auth = AuthService::new(Arc::new(api), Arc::clone(&session));
        let err = auth.login("alice", "wrong-password").await.unwrap_err();

        assert_eq!(err.to_string(), "Unauthorized: Invalid credentials");
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn successful_login_establishes_the_session() {
        let dir = TempDir::new().unwrap();
        let session = session_in(&dir);

        let mut api = MockQuizApi::new();
        api.expect_login().returning(|_| {
            Ok(LoginResponse {
                access: "header.payload.sig".to_string(),
                refresh: Some("refresh".to_string()),
                user: Identity {
                    id: "u-1".to_string(),
                    username: "alice".to_string(),
                    email: Some("alice@example.com".to_string()),
                    role: Role::Student,
                },
            })
        });

        let auth = AuthService::new(Arc::new(api), Arc::clone(&session));
        let identity = auth.login("alice", "secret1").await.unwrap();

        assert_eq!(identity.username, "alice");
        assert!(session.is_logged_in());
        assert_eq!(session.identity().unwrap().role, Role::Student);
    }

    #[tokio::test]
    async fn failed_registration_maps_to_inline_message() {
        let dir = TempDir::new().unwrap();
        let session = session_in(&dir);

        let mut api = MockQuizApi::new();
        api.expect_register()
            .returning(|_| Err(AppError::ValidationError("username taken".to_string())));

        let auth = AuthService::new(Arc::new(api), session);
        let err = auth
            .register(RegisterRequest {
                username: "alice_b".to_string(),
                email: "alice@example.com".to_string(),
                password: "secret1".to_string(),
                role: Role::Student,
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Validation error: Registration failed");
    }

    #[tokio::test]
    async fn invalid_registration_payload_never_reaches_the_api() {
        let dir = TempDir::new().unwrap();
        let session = session_in(&dir);

        // No register expectation: a call would panic.
        let auth = AuthService::new(Arc::new(MockQuizApi::new()), session);
        let result = auth
            .register(RegisterRequest {
                username: "x".to_string(),
                email: "not-an-email".to_string(),
                password: "123".to_string(),
                role: Role::Student,
            })
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn logout_clears_the_session() {
        let dir = TempDir::new().unwrap();
        let session = session_in(&dir);

        let mut api = MockQuizApi::new();
        api.expect_login().returning(|_| {
            Ok(LoginResponse {
                access: "header.payload.sig".to_string(),
                refresh: None,
                user: Identity {
                    id: "u-2".to_string(),
                    username: "bob".to_string(),
                    email: None,
                    role: Role::Teacher,
                },
            })
        });

        let auth = AuthService::new(Arc::new(api), Arc::clone(&session));
        auth.login("bob", "secret1").await.unwrap();
        assert!(session.is_logged_in());

        auth.logout();
        assert!(!session.is_logged_in());
    }
}
