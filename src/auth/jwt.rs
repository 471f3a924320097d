use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::claims::Claims;
use crate::config::JwtConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, wrong algorithm, wrong issuer/audience or malformed.
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    Expired,
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// A freshly minted bearer token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

/// Signing and verification keys plus the claims policy, derived once from
/// [`JwtConfig`] at startup.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    header: Header,
    validation: Validation,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        let mut validation = Validation::new(cfg.algorithm);
        validation.set_audience(std::slice::from_ref(&cfg.audience));
        validation.set_issuer(std::slice::from_ref(&cfg.issuer));
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        // Expiry is checked against the caller-supplied clock in `validate`.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            header: Header::new(cfg.algorithm),
            validation,
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::minutes(cfg.ttl_minutes),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Claims carry whole seconds, so the issue instant is truncated first;
    /// the returned `expires_at` is exactly the `exp` claim.
    pub fn issue(&self, user_id: Uuid, now: OffsetDateTime) -> Result<IssuedToken, TokenError> {
        let now = now
            .replace_nanosecond(0)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&self.header, &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        debug!(user_id = %user_id, exp = claims.exp, "jwt signed");
        Ok(IssuedToken { token, expires_at })
    }

    pub fn issue_now(&self, user_id: Uuid) -> Result<IssuedToken, TokenError> {
        self.issue(user_id, OffsetDateTime::now_utc())
    }

    /// Returns the subject of a token that is authentic and unexpired at `now`.
    pub fn validate(&self, token: &str, now: OffsetDateTime) -> Result<Uuid, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            debug!(error = %e, "jwt rejected");
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::InvalidToken,
            }
        })?;
        if now.unix_timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims.sub)
    }

    pub fn validate_now(&self, token: &str) -> Result<Uuid, TokenError> {
        self.validate(token, OffsetDateTime::now_utc())
    }
}
