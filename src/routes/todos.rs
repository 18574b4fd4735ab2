use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::{Todo, TodoInput, TodoList, TodoPatch, TodoPublic, TodoQuery};
use crate::state::AppState;
use crate::storage::TodoStore;

/// To-do items are reached exclusively through the caller's own scope: an
/// item that exists but belongs to someone else looks exactly like one that
/// does not exist.
fn task_not_found() -> AppError {
    AppError::NotFound("Task not found.".into())
}

/// List the caller's items, optionally filtered by title/description
/// substring and exact state, windowed by offset/limit.
#[get("/")]
pub async fn list_todos(
    state: web::Data<AppState>,
    query: web::Query<TodoQuery>,
    current: CurrentUser,
) -> Result<impl Responder, AppError> {
    let todos = state.todos.list(current.0.id, &query).await?;
    Ok(HttpResponse::Ok().json(TodoList {
        todos: todos.into_iter().map(TodoPublic::from).collect(),
    }))
}

#[post("/")]
pub async fn create_todo(
    state: web::Data<AppState>,
    input: web::Json<TodoInput>,
    current: CurrentUser,
) -> Result<impl Responder, AppError> {
    input.validate()?;

    let todo = state
        .todos
        .insert(Todo::new(input.into_inner(), current.0.id))
        .await?;
    Ok(HttpResponse::Ok().json(TodoPublic::from(todo)))
}

/// Partial update of one of the caller's items.
#[patch("/{id}")]
pub async fn patch_todo(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    patch: web::Json<TodoPatch>,
    current: CurrentUser,
) -> Result<impl Responder, AppError> {
    patch.validate()?;

    let mut todo = state
        .todos
        .find_for_user(current.0.id, path.into_inner())
        .await?
        .ok_or_else(task_not_found)?;

    todo.apply(patch.into_inner());
    let todo = state.todos.update(&todo).await?;
    Ok(HttpResponse::Ok().json(TodoPublic::from(todo)))
}

#[delete("/{id}")]
pub async fn delete_todo(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    current: CurrentUser,
) -> Result<impl Responder, AppError> {
    let deleted = state
        .todos
        .delete(current.0.id, path.into_inner())
        .await?;
    if !deleted {
        return Err(task_not_found());
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Task has been deleted successfully." })))
}
