use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::domain::user::{Identity, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id)
    pub username: String,
    pub role: Role,
    pub exp: usize, // Expiration time (as UTC timestamp)
    pub iat: usize, // Issued at (as UTC timestamp)
}

impl Claims {
    pub fn into_identity(self) -> Identity {
        Identity {
            id: self.sub,
            username: self.username,
            email: None,
            role: self.role,
        }
    }
}

/// Decodes the claims of an access token without verifying its signature.
/// The client holds no signing key; the server is the authority on token
/// validity. This is display-identity only, never an authorization check.
pub fn decode_unverified(token: &str) -> AppResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn sample_claims(role: Role) -> Claims {
        Claims {
            sub: "u-1".to_string(),
            username: "alice".to_string(),
            role,
            iat: 1_700_000_000,
            exp: 1_700_086_400,
        }
    }

    #[test]
    fn test_decode_unverified_ignores_signing_key() {
        let claims = sample_claims(Role::Student);
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"some-server-secret"),
        )
        .unwrap();

        let decoded = decode_unverified(&token).unwrap();
        assert_eq!(decoded.sub, "u-1");
        assert_eq!(decoded.username, "alice");
        assert_eq!(decoded.role, Role::Student);
    }

    #[test]
    fn test_decode_unverified_rejects_garbage() {
        let result = decode_unverified("not.a.token");
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_claims_into_identity() {
        let identity = sample_claims(Role::Teacher).into_identity();
        assert_eq!(identity.id, "u-1");
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.email, None);
        assert!(identity.is_teacher());
    }
}
