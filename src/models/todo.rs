use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle state of a to-do item.
/// Corresponds to the `todo_state` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "todo_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TodoState {
    Draft,
    Doing,
    Done,
    Trash,
}

/// A to-do item. Every item belongs to exactly one account (`user_id`);
/// handlers only ever reach it through that account's store scope.
#[derive(Debug, Clone, FromRow)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub state: TodoState,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input payload for creating a to-do item.
#[derive(Debug, Deserialize, Validate)]
pub struct TodoInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 1000))]
    pub description: String,

    pub state: TodoState,
}

/// Partial update; unset fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
pub struct TodoPatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub state: Option<TodoState>,
}

/// Query parameters for listing to-dos: substring filters on title and
/// description, exact filter on state, plus an offset/limit window.
#[derive(Debug, Deserialize)]
pub struct TodoQuery {
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<TodoState>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// Public projection of a to-do item; the owner id stays internal.
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoPublic {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub state: TodoState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoPublic {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            state: todo.state,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoList {
    pub todos: Vec<TodoPublic>,
}

impl Todo {
    /// Builds a new item for `user_id` with a fresh id and timestamps.
    pub fn new(input: TodoInput, user_id: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            state: input.state,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the set fields of `patch` and bumps `updated_at`.
    pub fn apply(&mut self, patch: TodoPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(state) = patch.state {
            self.state = state;
        }
        self.updated_at = Utc::now();
    }
}
