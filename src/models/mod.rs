pub mod task;
pub mod user;

pub use task::{
    Pagination, SortBy, SortOrder, Task, TaskInput, TaskPage, TaskQuery, TaskStatus, TaskUpdate,
};
pub use user::{PublicUser, User};
