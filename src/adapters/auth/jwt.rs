//! HS256 JWT session validator.
//!
//! Tokens carry the staff id in `sub` (older issuers use `userId`) and an
//! `exp` claim. Signature and expiry are validated; the staff id must be a
//! UUID.

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, StaffId};
use crate::ports::SessionValidator;

#[derive(Clone)]
pub struct JwtConfig {
    secret: SecretString,
    leeway_secs: u64,
}

impl JwtConfig {
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            leeway_secs: 0,
        }
    }

    /// Clock skew tolerated when checking `exp`.
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    #[serde(alias = "userId")]
    sub: String,

    exp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret.expose_secret().as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_secs;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key,
            validation,
        }
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                _ => {
                    tracing::warn!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            })?;
        let claims = token_data.claims;

        let staff_id: StaffId = claims.sub.parse().map_err(|_| {
            tracing::warn!("Invalid staff id in token: {}", claims.sub);
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(staff_id, claims.email))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}
