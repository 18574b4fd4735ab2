use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};

/// One-way hash of a plaintext password. A fresh salt is generated per call,
/// so the same plaintext yields a different digest each time.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(AppError::from)
}

/// True iff `password` hashes to `digest` under the salt embedded in it.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, AppError> {
    verify(password, digest).map_err(AppError::from)
}
