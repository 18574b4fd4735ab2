//!
//! # Authentication Resolver
//!
//! Maps credentials to accounts. `resolve_bearer` turns a presented bearer
//! token into the account it belongs to; `login` turns an email/password
//! pair into a token set. Both collapse their failure modes into a single
//! error so callers cannot probe which check failed.

use crate::auth::password::verify_password;
use crate::auth::token::{TokenKind, TokenService};
use crate::auth::TokenResponse;
use crate::error::AppError;
use crate::models::User;
use crate::storage::UserStore;

/// Resolves an access token to the account it was issued for.
///
/// An invalid, expired, or refresh-intent token and a subject that no longer
/// exists are indistinguishable: all of them are `Unauthorized`.
pub async fn resolve_bearer(
    users: &dyn UserStore,
    tokens: &TokenService,
    token: &str,
) -> Result<User, AppError> {
    let claims = tokens.decode(token)?;
    if claims.kind != TokenKind::Access {
        return Err(AppError::Unauthorized);
    }
    users
        .find_by_email(&claims.sub)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Checks an email/password pair and issues an access/refresh token pair.
///
/// Unknown email and wrong password produce the same `BadCredentials`.
pub async fn login(
    users: &dyn UserStore,
    tokens: &TokenService,
    email: &str,
    password: &str,
) -> Result<TokenResponse, AppError> {
    let user = users
        .find_by_email(email)
        .await?
        .ok_or(AppError::BadCredentials)?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::BadCredentials);
    }

    let access_token = tokens.issue_access_token(&user.email)?;
    let refresh_token = tokens.issue_refresh_token(&user.email)?;
    Ok(TokenResponse::pair(access_token, refresh_token))
}

/// Exchanges a refresh token for a new access token, re-checking that the
/// subject still resolves to an account.
pub async fn refresh(
    users: &dyn UserStore,
    tokens: &TokenService,
    token: &str,
) -> Result<TokenResponse, AppError> {
    let claims = tokens.decode(token)?;
    if users.find_by_email(&claims.sub).await?.is_none() {
        return Err(AppError::Unauthorized);
    }
    let access_token = tokens.refresh(token)?;
    Ok(TokenResponse::access_only(access_token))
}
