#![doc = "The `taskzero` library crate."]
#![doc = ""]
#![doc = "Business logic for a JWT-authenticated user and to-do API: domain models,"]
#![doc = "password hashing and token handling, storage-backend traits with Postgres"]
#![doc = "and in-memory implementations, route handlers, and error handling."]
#![doc = "The binary (`main.rs`) wires these together into the running server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod storage;

pub use crate::error::AppError;
pub use crate::state::AppState;
