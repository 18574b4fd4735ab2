use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;

use crate::auth::resolver;
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.to_owned())
}

/// The authenticated account, resolved once at the request boundary.
///
/// Handlers that need the acting account take this extractor as an explicit
/// parameter; there is no ambient current-user state anywhere else. A
/// missing or unusable token fails with the uniform `Unauthorized` response
/// before the handler body runs.
#[derive(Debug)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let state = state
                .ok_or_else(|| AppError::Internal("application state not configured".into()))?;
            let token = token.ok_or(AppError::Unauthorized)?;
            let user =
                resolver::resolve_bearer(state.users.as_ref(), &state.tokens, &token).await?;
            Ok(CurrentUser(user))
        })
    }
}
