//!
//! # Token Service
//!
//! Issues and validates the signed, time-limited bearer tokens the API runs
//! on. Tokens are HS256 JWTs carrying the account email as subject plus an
//! intent marker separating short-lived access tokens from longer-lived
//! refresh tokens. The signing key and both TTLs are fixed at startup.
//!
//! Expiry is checked against an injectable clock rather than the library's
//! built-in wall-clock check, so tests can pin and advance time
//! deterministically. A token is accepted strictly before its expiry
//! instant and rejected from that instant on.

use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Time source. Defaults to `Utc::now`; swapped out in tests.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// What a token is allowed to be used for.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Authorizes ordinary requests.
    Access,
    /// Only mints new access tokens via [`TokenService::refresh`].
    Refresh,
}

/// Claims encoded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the account's email.
    pub sub: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
    /// Intent marker: access vs refresh.
    pub kind: TokenKind,
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Clock,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl_minutes: i64, refresh_ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::minutes(access_ttl_minutes),
            refresh_ttl: Duration::minutes(refresh_ttl_minutes),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replaces the time source. Issuance and expiry checks both use it.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn issue(&self, subject: &str, kind: TokenKind, ttl: Duration) -> Result<String, AppError> {
        let now = (self.clock)();
        let claims = Claims {
            sub: subject.to_owned(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            kind,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    pub fn issue_access_token(&self, subject: &str) -> Result<String, AppError> {
        self.issue(subject, TokenKind::Access, self.access_ttl)
    }

    pub fn issue_refresh_token(&self, subject: &str) -> Result<String, AppError> {
        self.issue(subject, TokenKind::Refresh, self.refresh_ttl)
    }

    /// Verifies signature and expiry and returns the claims.
    ///
    /// A malformed token, a bad signature, and an expired token are all the
    /// same [`AppError::Unauthorized`] to the caller.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against the injected clock below, not the
        // library's system clock.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)?.claims;

        if (self.clock)().timestamp() >= claims.exp {
            return Err(AppError::Unauthorized);
        }
        Ok(claims)
    }

    /// Exchanges a valid, non-expired refresh token for a fresh access token
    /// with the same subject. Access tokens are rejected here.
    pub fn refresh(&self, token: &str) -> Result<String, AppError> {
        let claims = self.decode(token)?;
        if claims.kind != TokenKind::Refresh {
            return Err(AppError::Unauthorized);
        }
        self.issue_access_token(&claims.sub)
    }
}
