use actix_web::{post, web, HttpRequest, HttpResponse, Responder};

use crate::auth::{bearer_token, resolver, LoginForm};
use crate::error::AppError;
use crate::state::AppState;

/// Exchange an email/password pair for a token set.
///
/// Accepts the OAuth2 password form: the `username` field carries the email.
#[post("/token")]
pub async fn access_token(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    let response = resolver::login(
        state.users.as_ref(),
        &state.tokens,
        &form.username,
        &form.password,
    )
    .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Exchange a refresh token (presented as the bearer credential) for a
/// fresh access token.
#[post("/refresh_token")]
pub async fn refresh_token(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let token = bearer_token(&req).ok_or(AppError::Unauthorized)?;
    let response = resolver::refresh(state.users.as_ref(), &state.tokens, &token).await?;
    Ok(HttpResponse::Ok().json(response))
}
