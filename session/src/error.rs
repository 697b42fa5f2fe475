use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    /// No `Authorization: Bearer` credential was presented.
    #[error("Missing bearer credentials")]
    MissingCredentials,

    /// The token is malformed, carries a bad signature, or has expired.
    /// The underlying detail is kept out of the message so the raw token
    /// never leaks into logs or responses.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token verified cryptographically but no live session exists for
    /// it (e.g. after logout). Hard failure, never a soft downgrade.
    #[error("No live session for token")]
    NoSession,

    #[error("Session store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
