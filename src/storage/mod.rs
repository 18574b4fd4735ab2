//!
//! # Storage
//!
//! Explicit repository interface between handlers and persistence. Handlers
//! only ever talk to the [`UserStore`] and [`TodoStore`] traits; the
//! Postgres implementation backs the running server, the in-memory one
//! backs tests and demos. To-do access is scoped by owner at this boundary,
//! so an item belonging to someone else is simply not found.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Todo, TodoQuery, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Fields persisted when registering an account. The password is already
/// hashed by the time it reaches storage.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Full-replace update of an account's mutable fields.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new account. Fails with `Conflict` on a username or email
    /// collision, username reported first.
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Accounts in insertion order, windowed by `skip`/`limit`.
    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>, AppError>;

    async fn update(&self, id: i32, update: UserUpdate) -> Result<User, AppError>;

    /// Removes the account and, atomically with it, every to-do it owns.
    async fn delete(&self, id: i32) -> Result<(), AppError>;
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn insert(&self, todo: Todo) -> Result<Todo, AppError>;

    /// Looks up one item within `user_id`'s scope. Someone else's item and
    /// a nonexistent one are both `None`.
    async fn find_for_user(&self, user_id: i32, id: Uuid) -> Result<Option<Todo>, AppError>;

    async fn list(&self, user_id: i32, query: &TodoQuery) -> Result<Vec<Todo>, AppError>;

    async fn update(&self, todo: &Todo) -> Result<Todo, AppError>;

    /// Deletes within `user_id`'s scope; false if nothing matched.
    async fn delete(&self, user_id: i32, id: Uuid) -> Result<bool, AppError>;
}
