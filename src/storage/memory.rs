use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Todo, TodoQuery, User};
use crate::storage::{NewUser, TodoStore, UserStore, UserUpdate};

/// In-process store holding users and to-dos behind a single lock, so an
/// account deletion and its cascade happen atomically just like a database
/// transaction would. Ids are handed out sequentially starting at 1.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    todos: Vec<Todo>,
    next_user_id: i32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store lock poisoned")
    }
}

fn check_unique(inner: &Inner, username: &str, email: &str, except: Option<i32>) -> Result<(), AppError> {
    let other = |u: &&User| except.map_or(true, |id| u.id != id);
    if inner.users.iter().filter(other).any(|u| u.username == username) {
        return Err(AppError::Conflict("Username already exists.".into()));
    }
    if inner.users.iter().filter(other).any(|u| u.email == email) {
        return Err(AppError::Conflict("Email already exists.".into()));
    }
    Ok(())
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut inner = self.locked();
        check_unique(&inner, &new_user.username, &new_user.email, None)?;

        inner.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.next_user_id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(self.locked().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.locked().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .locked()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>, AppError> {
        Ok(self
            .locked()
            .users
            .iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i32, update: UserUpdate) -> Result<User, AppError> {
        let mut inner = self.locked();
        check_unique(&inner, &update.username, &update.email, Some(id))?;

        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        user.username = update.username;
        user.email = update.email;
        user.password_hash = update.password_hash;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let mut inner = self.locked();
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        if inner.users.len() == before {
            return Err(AppError::NotFound("User not found".into()));
        }
        inner.todos.retain(|t| t.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert(&self, todo: Todo) -> Result<Todo, AppError> {
        self.locked().todos.push(todo.clone());
        Ok(todo)
    }

    async fn find_for_user(&self, user_id: i32, id: Uuid) -> Result<Option<Todo>, AppError> {
        Ok(self
            .locked()
            .todos
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    async fn list(&self, user_id: i32, query: &TodoQuery) -> Result<Vec<Todo>, AppError> {
        let inner = self.locked();
        let matches = inner
            .todos
            .iter()
            .filter(|t| t.user_id == user_id)
            .filter(|t| {
                query
                    .title
                    .as_deref()
                    .map_or(true, |title| t.title.contains(title))
            })
            .filter(|t| {
                query
                    .description
                    .as_deref()
                    .map_or(true, |description| t.description.contains(description))
            })
            .filter(|t| query.state.map_or(true, |state| t.state == state))
            .skip(query.offset.unwrap_or(0).max(0) as usize);

        let todos = match query.limit {
            Some(limit) => matches.take(limit.max(0) as usize).cloned().collect(),
            None => matches.cloned().collect(),
        };
        Ok(todos)
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, AppError> {
        let mut inner = self.locked();
        let slot = inner
            .todos
            .iter_mut()
            .find(|t| t.id == todo.id && t.user_id == todo.user_id)
            .ok_or_else(|| AppError::NotFound("Task not found.".into()))?;
        *slot = todo.clone();
        Ok(todo.clone())
    }

    async fn delete(&self, user_id: i32, id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.locked();
        let before = inner.todos.len();
        inner.todos.retain(|t| !(t.id == id && t.user_id == user_id));
        Ok(inner.todos.len() < before)
    }
}
