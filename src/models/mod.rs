pub mod todo;
pub mod user;

pub use todo::{Todo, TodoInput, TodoList, TodoPatch, TodoPublic, TodoQuery, TodoState};
pub use user::{Pagination, User, UserInput, UserList, UserPublic};
