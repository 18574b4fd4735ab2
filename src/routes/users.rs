use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

use crate::auth::{assert_owner, hash_password, CurrentUser};
use crate::error::AppError;
use crate::models::{Pagination, UserInput, UserList, UserPublic};
use crate::state::AppState;
use crate::storage::{NewUser, UserStore, UserUpdate};

/// Guards the create/update uniqueness invariants up front so the caller
/// gets the precise message; username is checked before email. `except`
/// skips the caller's own row on updates.
async fn check_available(
    state: &AppState,
    input: &UserInput,
    except: Option<i32>,
) -> Result<(), AppError> {
    if let Some(existing) = state.users.find_by_username(&input.username).await? {
        if except != Some(existing.id) {
            return Err(AppError::Conflict("Username already exists.".into()));
        }
    }
    if let Some(existing) = state.users.find_by_email(&input.email).await? {
        if except != Some(existing.id) {
            return Err(AppError::Conflict("Email already exists.".into()));
        }
    }
    Ok(())
}

/// Register a new account. Open to anyone; the response is the public
/// projection, never the password in any form.
#[post("/")]
pub async fn create_user(
    state: web::Data<AppState>,
    input: web::Json<UserInput>,
) -> Result<impl Responder, AppError> {
    input.validate()?;
    check_available(&state, &input, None).await?;

    let user = state
        .users
        .insert(NewUser {
            username: input.username.clone(),
            email: input.email.clone(),
            password_hash: hash_password(&input.password)?,
        })
        .await?;

    Ok(HttpResponse::Created().json(UserPublic::from(user)))
}

/// List accounts in insertion order, windowed by `skip`/`limit`
/// (defaults 0/100).
#[get("/")]
pub async fn list_users(
    state: web::Data<AppState>,
    window: web::Query<Pagination>,
) -> Result<impl Responder, AppError> {
    let users = state.users.list(window.skip, window.limit).await?;
    Ok(HttpResponse::Ok().json(UserList {
        users: users.into_iter().map(UserPublic::from).collect(),
    }))
}

#[get("/{id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let user = state
        .users
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(HttpResponse::Ok().json(UserPublic::from(user)))
}

/// Full-replace update of the caller's own account. The password is
/// re-hashed; updating anyone else is forbidden.
#[put("/{id}")]
pub async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    input: web::Json<UserInput>,
    current: CurrentUser,
) -> Result<impl Responder, AppError> {
    input.validate()?;
    let user_id = path.into_inner();
    assert_owner(&current.0, user_id)?;
    check_available(&state, &input, Some(user_id)).await?;

    let user = state
        .users
        .update(
            user_id,
            UserUpdate {
                username: input.username.clone(),
                email: input.email.clone(),
                password_hash: hash_password(&input.password)?,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(UserPublic::from(user)))
}

/// Delete the caller's own account along with every to-do it owns.
#[delete("/{id}")]
pub async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    current: CurrentUser,
) -> Result<impl Responder, AppError> {
    let user_id = path.into_inner();
    assert_owner(&current.0, user_id)?;

    state.users.delete(user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted" })))
}
