//! Error types for the authorization system.
//!
//! Error messages must balance providing useful information for debugging
//! while not leaking policy details or credentials to callers. Detailed
//! context goes to the logs; external messages stay minimal.

use thiserror::Error;

/// Errors that can occur while talking to the policy engine.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// The policy engine could not be reached or failed to evaluate.
    ///
    /// The decision engine treats this as a denial (fail closed), but it
    /// stays distinct so the failure can be logged and alerted on.
    #[error("Policy engine failure: {0}")]
    EngineFailure(String),

    /// A resource or permission mutation was rejected by the engine.
    #[error("Policy mutation failed: {0}")]
    MutationFailed(String),
}

/// A specialized Result type for authorization operations.
pub type Result<T> = std::result::Result<T, AuthzError>;
