use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenService;
use crate::storage::{MemoryStore, PgStore, TodoStore, UserStore};

/// Everything a handler needs, injected once at startup: the two store
/// handles and the token service. All of it is cheap to clone and immutable
/// after construction.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub todos: Arc<dyn TodoStore>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, todos: Arc<dyn TodoStore>, tokens: TokenService) -> Self {
        Self {
            users,
            todos,
            tokens,
        }
    }

    /// Production state backed by Postgres.
    pub fn postgres(pool: PgPool, tokens: TokenService) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            users: store.clone(),
            todos: store,
            tokens,
        }
    }

    /// Self-contained state for tests and local experiments.
    pub fn in_memory(tokens: TokenService) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            todos: store,
            tokens,
        }
    }
}
