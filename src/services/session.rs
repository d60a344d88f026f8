//! Session identity verification.
//!
//! An authenticated account presents `Authorization: Bearer <jwt>` (HS256).
//! The verifier checks signature, `iss`, `aud`, `exp` (with leeway) and
//! promotes `sub` to the account `Uuid`.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
    #[error("invalid 'sub' (expected UUID)")]
    InvalidSubUuid,
}

#[derive(Debug, Clone, Deserialize)]
struct SessionClaims {
    sub: String,
}

/// Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct SessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for SessionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl SessionVerifier {
    pub fn new(secret: &str, issuer: &str, audience: &str, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.leeway = leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a bearer token and return the account id it names.
    pub fn verify(&self, token: &str) -> Result<Uuid, SessionError> {
        let data =
            jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;

        let sub = data.claims.sub.trim();
        if sub.is_empty() {
            return Err(SessionError::EmptyClaim("sub"));
        }

        Uuid::parse_str(sub).map_err(|_| SessionError::InvalidSubUuid)
    }
}
