//! Bearer token verification.
//!
//! Tokens are HS256 JWTs minted by the identity layer in front of the
//! gateway. Verification here is purely cryptographic: signature and
//! expiry. Whether a live session exists for the token is a separate
//! question answered by the session store.

use std::collections::HashMap;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SessionError};

/// Claims carried by a verified token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The principal's username.
    pub sub: String,

    /// Expiry as a unix timestamp. Enforced during verification.
    pub exp: i64,

    /// Any additional claims the identity provider attached.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Validates token signatures and expiry against a shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a raw token string, yielding its claims.
    ///
    /// Malformed tokens, bad signatures and expired tokens all collapse
    /// into [`SessionError::InvalidToken`]; the distinction is logged at
    /// debug level but never surfaced to the caller.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(kind = ?e.kind(), "token verification failed");
                SessionError::InvalidToken
            })
    }
}

/// Extract the token from an `Authorization` header value.
///
/// Accepts only the `Bearer <token>` scheme; anything else is treated as
/// absent credentials.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let rest = header_value.strip_prefix("Bearer ")?;
    let token = rest.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::*;

    fn mint(secret: &str, sub: &str, exp: i64) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp,
            extra: HashMap::new(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn future_exp() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn verifies_valid_token() {
        let verifier = TokenVerifier::new("gateway-secret");
        let token = mint("gateway-secret", "dev", future_exp());
        let claims = verifier.verify(&token).unwrap();
        assert_eq!(claims.sub, "dev");
    }

    #[test]
    fn rejects_wrong_signature() {
        let verifier = TokenVerifier::new("gateway-secret");
        let token = mint("other-secret", "dev", future_exp());
        assert!(matches!(
            verifier.verify(&token),
            Err(SessionError::InvalidToken)
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let verifier = TokenVerifier::new("gateway-secret");
        let token = mint("gateway-secret", "dev", chrono::Utc::now().timestamp() - 600);
        assert!(matches!(
            verifier.verify(&token),
            Err(SessionError::InvalidToken)
        ));
    }

    #[test]
    fn rejects_garbage_token() {
        let verifier = TokenVerifier::new("gateway-secret");
        assert!(matches!(
            verifier.verify("not-a-jwt"),
            Err(SessionError::InvalidToken)
        ));
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc123"), None);
        assert_eq!(bearer_token("abc123"), None);
    }
}
