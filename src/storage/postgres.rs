use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Todo, TodoQuery, User};
use crate::storage::{NewUser, TodoStore, UserStore, UserUpdate};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";
const TODO_COLUMNS: &str = "id, title, description, state, user_id, created_at, updated_at";

/// Postgres-backed store. Uniqueness is ultimately enforced by the `users`
/// unique constraints (violations surface as `Conflict`), and account
/// deletion cascades to to-dos through the schema's foreign key, keeping
/// each mutation a single atomic statement.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password_hash) \
             VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY id OFFSET $1 LIMIT $2",
            USER_COLUMNS
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn update(&self, id: i32, update: UserUpdate) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET username = $1, email = $2, password_hash = $3, \
             updated_at = now() WHERE id = $4 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&update.username)
        .bind(&update.email)
        .bind(&update.password_hash)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        user.ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn insert(&self, todo: Todo) -> Result<Todo, AppError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (id, title, description, state, user_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(todo.id)
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.state)
        .bind(todo.user_id)
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn find_for_user(&self, user_id: i32, id: Uuid) -> Result<Option<Todo>, AppError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos WHERE id = $1 AND user_id = $2",
            TODO_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn list(&self, user_id: i32, query: &TodoQuery) -> Result<Vec<Todo>, AppError> {
        // Filters are appended dynamically; bind order below must match.
        let mut sql = format!(
            "SELECT {} FROM todos WHERE user_id = $1",
            TODO_COLUMNS
        );
        let mut param = 2;

        if query.title.is_some() {
            sql.push_str(&format!(" AND title LIKE ${}", param));
            param += 1;
        }
        if query.description.is_some() {
            sql.push_str(&format!(" AND description LIKE ${}", param));
            param += 1;
        }
        if query.state.is_some() {
            sql.push_str(&format!(" AND state = ${}", param));
            param += 1;
        }
        sql.push_str(" ORDER BY created_at");
        if query.offset.is_some() {
            sql.push_str(&format!(" OFFSET ${}", param));
            param += 1;
        }
        if query.limit.is_some() {
            sql.push_str(&format!(" LIMIT ${}", param));
        }

        let mut q = sqlx::query_as::<_, Todo>(&sql).bind(user_id);
        if let Some(title) = &query.title {
            q = q.bind(format!("%{}%", title));
        }
        if let Some(description) = &query.description {
            q = q.bind(format!("%{}%", description));
        }
        if let Some(state) = query.state {
            q = q.bind(state);
        }
        if let Some(offset) = query.offset {
            q = q.bind(offset);
        }
        if let Some(limit) = query.limit {
            q = q.bind(limit);
        }

        let todos = q.fetch_all(&self.pool).await?;
        Ok(todos)
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, AppError> {
        let updated = sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todos SET title = $1, description = $2, state = $3, updated_at = $4 \
             WHERE id = $5 AND user_id = $6 RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.state)
        .bind(todo.updated_at)
        .bind(todo.id)
        .bind(todo.user_id)
        .fetch_optional(&self.pool)
        .await?;
        updated.ok_or_else(|| AppError::NotFound("Task not found.".into()))
    }

    async fn delete(&self, user_id: i32, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
