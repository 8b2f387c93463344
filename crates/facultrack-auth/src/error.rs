//! Authentication error types.

use facultrack_core::error::FacultrackError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer credential")]
    MissingCredential,

    #[error("authorization header is not a bearer credential")]
    MalformedHeader,

    #[error("credential has expired")]
    TokenExpired,

    #[error("invalid credential: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for FacultrackError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredential
            | AuthError::MalformedHeader
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => FacultrackError::Unauthorized {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => FacultrackError::Crypto(msg),
        }
    }
}
