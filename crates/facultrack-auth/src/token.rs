//! HS256 reviewer credentials and the authorization gate.
//!
//! A credential is a JWT signed with the shared secret from
//! [`AuthConfig`]. It names the reviewer, their role and the department
//! they may act on. Expiry is checked against an explicit instant with
//! no leeway.

use chrono::{DateTime, Duration, Utc};
use facultrack_core::error::FacultrackResult;
use facultrack_core::models::identity::ReviewerRole;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// JWT claims embedded in every reviewer credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialClaims {
    /// Subject — reviewer login id.
    pub sub: String,
    pub role: ReviewerRole,
    /// Department the reviewer may act on; `None` covers every
    /// department.
    pub department: Option<String>,
    /// Issuer.
    pub iss: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Unique token ID (UUID string).
    pub jti: String,
}

impl CredentialClaims {
    /// Whether this credential may act on records of `department`.
    pub fn covers_department(&self, department: &str) -> bool {
        match &self.department {
            None => true,
            Some(scope) => scope.eq_ignore_ascii_case(department),
        }
    }
}

fn secret(config: &AuthConfig) -> Result<&[u8], AuthError> {
    if config.jwt_secret.is_empty() {
        return Err(AuthError::Crypto("JWT secret is not configured".into()));
    }
    Ok(config.jwt_secret.as_bytes())
}

/// Issue a signed credential valid from now for the configured lifetime.
pub fn issue_credential(
    identity: &str,
    role: ReviewerRole,
    department: Option<&str>,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    issue_credential_at(identity, role, department, config, Utc::now())
}

/// Issue a signed credential as if it had been issued at `issued_at`.
pub fn issue_credential_at(
    identity: &str,
    role: ReviewerRole,
    department: Option<&str>,
    config: &AuthConfig,
    issued_at: DateTime<Utc>,
) -> Result<String, AuthError> {
    let lifetime = i64::try_from(config.credential_lifetime_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| AuthError::Crypto("credential lifetime out of range".into()))?;
    let expires_at = issued_at
        .checked_add_signed(lifetime)
        .ok_or_else(|| AuthError::Crypto("credential expiry out of range".into()))?;
    let claims = CredentialClaims {
        sub: identity.to_string(),
        role,
        department: department.map(str::to_string),
        iss: config.jwt_issuer.clone(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let key = EncodingKey::from_secret(secret(config)?);
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode a credential, verifying signature and issuer, and reject it
/// if `exp` is at or before `now`.
pub fn decode_credential(
    token: &str,
    config: &AuthConfig,
    now: DateTime<Utc>,
) -> Result<CredentialClaims, AuthError> {
    let key = DecodingKey::from_secret(secret(config)?);

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);
    // Expiry is checked below against the caller's instant.
    validation.validate_exp = false;
    validation.leeway = 0;

    let claims = jsonwebtoken::decode::<CredentialClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::TokenInvalid(e.to_string()))?;

    if claims.exp <= now.timestamp() {
        return Err(AuthError::TokenExpired);
    }
    Ok(claims)
}

/// Validated credential claims — a newtype proving the token was
/// verified. Reviewer operations take this instead of a raw token.
#[derive(Debug, Clone)]
pub struct ValidatedClaims(CredentialClaims);

impl ValidatedClaims {
    pub fn claims(&self) -> &CredentialClaims {
        &self.0
    }

    pub fn identity(&self) -> &str {
        &self.0.sub
    }

    pub fn role(&self) -> ReviewerRole {
        self.0.role
    }
}

/// Validate a credential (signature, issuer, expiry) at `now`.
pub fn validate_credential_at(
    token: &str,
    config: &AuthConfig,
    now: DateTime<Utc>,
) -> Result<ValidatedClaims, AuthError> {
    decode_credential(token, config, now).map(ValidatedClaims)
}

/// Validate a credential against the current time.
pub fn validate_credential(token: &str, config: &AuthConfig) -> Result<ValidatedClaims, AuthError> {
    validate_credential_at(token, config, Utc::now())
}

/// Extract the token from an `Authorization: Bearer <token>` header
/// value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingCredential)?;
    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::MalformedHeader)?;
    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    Ok(token)
}

/// The authorization gate: turn an `Authorization` header value into
/// verified claims or an `Unauthorized` error.
///
/// Purely stateless — no database lookup is performed.
pub fn authorize(header: Option<&str>, config: &AuthConfig) -> FacultrackResult<ValidatedClaims> {
    let token = bearer_token(header)?;
    Ok(validate_credential(token, config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use facultrack_core::error::FacultrackError;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-please-rotate".into(),
            credential_lifetime_secs: 3600,
            jwt_issuer: "facultrack-test".into(),
        }
    }

    #[test]
    fn credential_roundtrip() {
        let config = test_config();
        let token =
            issue_credential("hod.cse", ReviewerRole::Supervisor, Some("CSE"), &config).unwrap();
        let claims = validate_credential(&token, &config).unwrap();

        assert_eq!(claims.identity(), "hod.cse");
        assert_eq!(claims.role(), ReviewerRole::Supervisor);
        assert_eq!(claims.claims().department.as_deref(), Some("CSE"));
        assert_eq!(claims.claims().iss, "facultrack-test");
        assert_eq!(claims.claims().exp - claims.claims().iat, 3600);
    }

    #[test]
    fn oversized_lifetime_is_an_error() {
        for secs in [u64::MAX, 10_000_000_000_000_000] {
            let config = AuthConfig {
                credential_lifetime_secs: secs,
                ..test_config()
            };
            let err = issue_credential("dean", ReviewerRole::Officer, None, &config).unwrap_err();
            assert!(matches!(err, AuthError::Crypto(_)), "lifetime {secs}: {err:?}");
        }
    }

    #[test]
    fn jti_is_unique() {
        let config = test_config();
        let t1 = issue_credential("dean", ReviewerRole::Officer, None, &config).unwrap();
        let t2 = issue_credential("dean", ReviewerRole::Officer, None, &config).unwrap();
        let c1 = validate_credential(&t1, &config).unwrap();
        let c2 = validate_credential(&t2, &config).unwrap();
        assert_ne!(c1.claims().jti, c2.claims().jti);
    }

    #[test]
    fn expired_credential_is_rejected() {
        let config = test_config();
        let issued = Utc::now() - Duration::hours(2);
        let token =
            issue_credential_at("hod.cse", ReviewerRole::Supervisor, None, &config, issued)
                .unwrap();

        let err = validate_credential(&token, &config).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn credential_is_rejected_at_exact_expiry_instant() {
        let config = test_config();
        let issued = Utc::now();
        let token =
            issue_credential_at("hod.cse", ReviewerRole::Supervisor, None, &config, issued)
                .unwrap();

        let just_before = issued + Duration::seconds(3599);
        let at_expiry = issued + Duration::seconds(3600);
        assert!(validate_credential_at(&token, &config, just_before).is_ok());
        assert!(matches!(
            validate_credential_at(&token, &config, at_expiry),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn expired_credential_rejected_even_with_foreign_signature() {
        let config = test_config();
        let other = AuthConfig {
            jwt_secret: "some-other-secret".into(),
            ..test_config()
        };
        let issued = Utc::now() - Duration::hours(2);
        let token =
            issue_credential_at("x", ReviewerRole::Officer, None, &other, issued).unwrap();

        let err: FacultrackError = validate_credential(&token, &config).unwrap_err().into();
        assert!(matches!(err, FacultrackError::Unauthorized { .. }));
    }

    #[test]
    fn bad_signature_is_rejected() {
        let config = test_config();
        let other = AuthConfig {
            jwt_secret: "some-other-secret".into(),
            ..test_config()
        };
        let token = issue_credential("x", ReviewerRole::Officer, None, &other).unwrap();
        assert!(matches!(
            validate_credential(&token, &config),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let config = test_config();
        let other = AuthConfig {
            jwt_issuer: "someone-else".into(),
            ..test_config()
        };
        let token = issue_credential("x", ReviewerRole::Officer, None, &other).unwrap();
        assert!(matches!(
            validate_credential(&token, &config),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(
            validate_credential("not.a.jwt", &test_config()),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let config = AuthConfig::default();
        assert!(matches!(
            issue_credential("x", ReviewerRole::Officer, None, &config),
            Err(AuthError::Crypto(_))
        ));
    }

    #[test]
    fn bearer_header_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc.def")).unwrap(), "abc.def");
        assert!(matches!(
            bearer_token(None),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            bearer_token(Some("Basic dXNlcjpwYXNz")),
            Err(AuthError::MalformedHeader)
        ));
        assert!(matches!(
            bearer_token(Some("Bearer   ")),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn gate_maps_failures_to_unauthorized() {
        let config = test_config();
        for header in [None, Some("Token abc"), Some("Bearer nope")] {
            let err = authorize(header, &config).unwrap_err();
            assert!(
                matches!(err, FacultrackError::Unauthorized { .. }),
                "{header:?}: {err:?}"
            );
        }
    }

    #[test]
    fn gate_accepts_valid_credential() {
        let config = test_config();
        let token = issue_credential("dean", ReviewerRole::Officer, None, &config).unwrap();
        let header = format!("Bearer {token}");
        let claims = authorize(Some(&header), &config).unwrap();
        assert_eq!(claims.identity(), "dean");
    }

    #[test]
    fn department_scope() {
        let config = test_config();
        let scoped = issue_credential("hod", ReviewerRole::Supervisor, Some("CSE"), &config)
            .and_then(|t| validate_credential(&t, &config))
            .unwrap();
        assert!(scoped.claims().covers_department("CSE"));
        assert!(scoped.claims().covers_department("cse"));
        assert!(!scoped.claims().covers_department("ECE"));

        let global = issue_credential("dean", ReviewerRole::Officer, None, &config)
            .and_then(|t| validate_credential(&t, &config))
            .unwrap();
        assert!(global.claims().covers_department("ECE"));
    }
}
