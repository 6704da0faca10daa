//! Storage abstraction for users, lists and items.
//!
//! Every list and item query is keyed by the acting user's id and resolves
//! ownership through the `users_lists` / `lists_items` join tables. The only
//! unscoped write is [`ItemRepository::create_item`]; callers must resolve the
//! parent list for the acting user first (see `TodoItemService::create`).
//!
//! Two backends are provided:
//!
//! | Backend       | Use                               |
//! |---------------|-----------------------------------|
//! | [`PgStore`]   | PostgreSQL via a `sqlx` pool      |
//! | [`MemoryStore`] | In-process tables for tests and demos |

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{
    ItemInput, ListInput, NewUser, TodoItem, TodoList, UpdateItemInput, UpdateListInput, User,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user and returns its id. A taken username is a `Validation` error.
    async fn create_user(&self, user: NewUser) -> Result<i32, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait ListRepository: Send + Sync {
    /// Inserts the list and its ownership row atomically.
    async fn create_list(&self, user_id: i32, list: ListInput) -> Result<i32, AppError>;

    /// Lists owned by `user_id`, ascending by id.
    async fn get_all_lists(&self, user_id: i32) -> Result<Vec<TodoList>, AppError>;

    /// `NotFound` if the list does not exist or belongs to another user.
    async fn get_list(&self, user_id: i32, list_id: i32) -> Result<TodoList, AppError>;

    async fn update_list(
        &self,
        user_id: i32,
        list_id: i32,
        input: UpdateListInput,
    ) -> Result<(), AppError>;

    /// Removes the list together with all of its items.
    async fn delete_list(&self, user_id: i32, list_id: i32) -> Result<(), AppError>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Inserts the item and links it to `list_id` atomically. Performs no ownership check.
    async fn create_item(&self, list_id: i32, item: ItemInput) -> Result<i32, AppError>;

    async fn get_all_items(&self, user_id: i32, list_id: i32) -> Result<Vec<TodoItem>, AppError>;

    async fn get_item(&self, user_id: i32, item_id: i32) -> Result<TodoItem, AppError>;

    async fn update_item(
        &self,
        user_id: i32,
        item_id: i32,
        input: UpdateItemInput,
    ) -> Result<(), AppError>;

    async fn delete_item(&self, user_id: i32, item_id: i32) -> Result<(), AppError>;
}

pub(crate) fn list_not_found() -> AppError {
    AppError::NotFound("list not found".into())
}

pub(crate) fn item_not_found() -> AppError {
    AppError::NotFound("item not found".into())
}

pub(crate) fn username_taken() -> AppError {
    AppError::Validation("username is already taken".into())
}
