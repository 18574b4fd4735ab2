use crate::error::AppError;
use crate::models::User;

/// Ownership check applied before any mutating operation on an account or
/// its resources: only the account itself may proceed.
pub fn assert_owner(acting: &User, target_id: i32) -> Result<(), AppError> {
    if acting.id != target_id {
        return Err(AppError::Forbidden);
    }
    Ok(())
}
