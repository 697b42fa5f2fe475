//! Bearer authentication for the relay gateway.
//!
//! Two independent checks make up authentication: cryptographic token
//! verification (signature + expiry) and session restoration from the
//! store. Both must pass for a request to carry an identity — a token
//! that verifies but has no live session (post-logout) is rejected, never
//! downgraded to anonymous.

pub mod error;
pub mod store;
pub mod token;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

pub use error::{Result, SessionError};
pub use store::{MemorySessionStore, Session, SessionConfig, SessionStore};
pub use token::{bearer_token, Claims, TokenVerifier};

/// The identity attached to an authenticated request.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub username: String,
    /// Session attributes merged with token claims; session wins on
    /// conflicts since it is the fresher source.
    pub claims: HashMap<String, serde_json::Value>,
}

/// Verifies tokens and restores sessions into request identities.
#[derive(Clone)]
pub struct Authenticator {
    verifier: TokenVerifier,
    store: Arc<dyn SessionStore>,
}

impl Authenticator {
    pub fn new(verifier: TokenVerifier, store: Arc<dyn SessionStore>) -> Self {
        Self { verifier, store }
    }

    /// Authenticate the value of an `Authorization` header, if any.
    ///
    /// Fails with [`SessionError::MissingCredentials`] when no bearer
    /// credential is present, [`SessionError::InvalidToken`] when it does
    /// not verify, and [`SessionError::NoSession`] when the token is valid
    /// but no live session exists for it.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Identity> {
        let token = authorization
            .and_then(bearer_token)
            .ok_or(SessionError::MissingCredentials)?;

        let claims = self.verifier.verify(token)?;

        let session = self
            .store
            .get(token)
            .await?
            .ok_or(SessionError::NoSession)?;

        let mut merged = claims.extra;
        merged.extend(session.claims);
        debug!(username = %session.username, "session restored");

        Ok(Identity {
            username: session.username,
            claims: merged,
        })
    }

    /// Revoke the session behind a bearer credential. Idempotent; invalid
    /// tokens are ignored since there is nothing to revoke.
    pub async fn revoke(&self, authorization: Option<&str>) -> Result<()> {
        if let Some(token) = authorization.and_then(bearer_token) {
            self.store.delete(token).await?;
        }
        Ok(())
    }
}
