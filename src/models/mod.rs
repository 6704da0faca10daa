pub mod item;
pub mod list;
pub mod user;

pub use item::{ItemInput, TodoItem, UpdateItemInput};
pub use list::{ListInput, TodoList, UpdateListInput};
pub use user::{NewUser, User};
