//! Facultrack Auth — reviewer credential issuance and the
//! authorization gate in front of administrative transitions.

pub mod config;
pub mod error;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use token::{CredentialClaims, ValidatedClaims, authorize};
