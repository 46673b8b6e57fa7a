use crate::models::domain::user::{Identity, Role};
use crate::session::store::SessionStore;

/// Outcome of gating a page behind the session. `WrongRole` carries the
/// user's actual role so the caller can send them to that role's home.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Granted(Identity),
    LoginRequired,
    WrongRole(Role),
}

/// Gates navigation on session presence and, optionally, a required role.
/// Pure and synchronous; never touches the network.
pub fn guard(store: &SessionStore, required: Option<Role>) -> GuardDecision {
    let Some(identity) = store.identity() else {
        return GuardDecision::LoginRequired;
    };

    match required {
        Some(role) if identity.role != role => GuardDecision::WrongRole(identity.role),
        _ => GuardDecision::Granted(identity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::TokenBundle;
    use tempfile::TempDir;

    fn logged_in_store(dir: &TempDir, username: &str, role: Role) -> SessionStore {
        let store = SessionStore::open(dir.path().join("auth_tokens.json"));
        let identity = Identity {
            id: format!("id-{}", username),
            username: username.to_string(),
            email: None,
            role,
        };
        store
            .establish(
                TokenBundle {
                    access: "header.payload.sig".to_string(),
                    refresh: None,
                },
                identity,
            )
            .unwrap();
        store
    }

    #[test]
    fn test_no_session_requires_login() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path().join("auth_tokens.json"));

        assert_eq!(guard(&store, None), GuardDecision::LoginRequired);
        assert_eq!(
            guard(&store, Some(Role::Teacher)),
            GuardDecision::LoginRequired
        );
    }

    #[test]
    fn test_matching_role_is_granted() {
        let dir = TempDir::new().unwrap();
        let store = logged_in_store(&dir, "alice", Role::Student);

        match guard(&store, Some(Role::Student)) {
            GuardDecision::Granted(identity) => assert_eq!(identity.username, "alice"),
            other => panic!("Expected Granted, got {:?}", other),
        }
    }

    #[test]
    fn test_role_mismatch_reports_actual_role() {
        let dir = TempDir::new().unwrap();
        let store = logged_in_store(&dir, "bob", Role::Teacher);

        assert_eq!(
            guard(&store, Some(Role::Student)),
            GuardDecision::WrongRole(Role::Teacher)
        );
    }

    #[test]
    fn test_no_required_role_only_needs_a_session() {
        let dir = TempDir::new().unwrap();
        let store = logged_in_store(&dir, "bob", Role::Teacher);

        assert!(matches!(guard(&store, None), GuardDecision::Granted(_)));
    }
}
