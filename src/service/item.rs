use std::sync::Arc;

use validator::Validate;

use crate::error::AppError;
use crate::models::{ItemInput, TodoItem, UpdateItemInput};
use crate::repository::{ItemRepository, ListRepository};

/// Item operations. Ownership is indirect: item -> list -> user.
pub struct TodoItemService {
    repo: Arc<dyn ItemRepository>,
    lists: Arc<dyn ListRepository>,
}

impl TodoItemService {
    pub fn new(repo: Arc<dyn ItemRepository>, lists: Arc<dyn ListRepository>) -> Self {
        Self { repo, lists }
    }

    /// Creates an item under `list_id`.
    ///
    /// The list is resolved for `user_id` first; if that fails nothing is written.
    pub async fn create(&self, user_id: i32, list_id: i32, input: ItemInput) -> Result<i32, AppError> {
        input.validate()?;
        self.lists.get_list(user_id, list_id).await?;

        let id = self.repo.create_item(list_id, input).await?;
        log::info!("user {} created item {} in list {}", user_id, id, list_id);
        Ok(id)
    }

    pub async fn get_all(&self, user_id: i32, list_id: i32) -> Result<Vec<TodoItem>, AppError> {
        self.lists.get_list(user_id, list_id).await?;
        self.repo.get_all_items(user_id, list_id).await
    }

    pub async fn get_by_id(&self, user_id: i32, item_id: i32) -> Result<TodoItem, AppError> {
        self.repo.get_item(user_id, item_id).await
    }

    pub async fn update(
        &self,
        user_id: i32,
        item_id: i32,
        input: UpdateItemInput,
    ) -> Result<(), AppError> {
        if input.is_empty() {
            return Err(AppError::Validation("update structure has no values".into()));
        }
        input.validate()?;
        self.repo.update_item(user_id, item_id, input).await
    }

    pub async fn delete(&self, user_id: i32, item_id: i32) -> Result<(), AppError> {
        self.repo.delete_item(user_id, item_id).await?;
        log::info!("user {} deleted item {}", user_id, item_id);
        Ok(())
    }
}
