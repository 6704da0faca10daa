use std::sync::Arc;

use validator::Validate;

use crate::error::AppError;
use crate::models::{ListInput, TodoList, UpdateListInput};
use crate::repository::ListRepository;

/// List operations, always on behalf of an explicit, already-authenticated user.
pub struct TodoListService {
    repo: Arc<dyn ListRepository>,
}

impl TodoListService {
    pub fn new(repo: Arc<dyn ListRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, user_id: i32, input: ListInput) -> Result<i32, AppError> {
        input.validate()?;
        let id = self.repo.create_list(user_id, input).await?;
        log::info!("user {} created list {}", user_id, id);
        Ok(id)
    }

    pub async fn get_all(&self, user_id: i32) -> Result<Vec<TodoList>, AppError> {
        self.repo.get_all_lists(user_id).await
    }

    /// `NotFound` both when the list is missing and when another user owns it.
    pub async fn get_by_id(&self, user_id: i32, list_id: i32) -> Result<TodoList, AppError> {
        self.repo.get_list(user_id, list_id).await
    }

    pub async fn update(
        &self,
        user_id: i32,
        list_id: i32,
        input: UpdateListInput,
    ) -> Result<(), AppError> {
        if input.is_empty() {
            return Err(AppError::Validation("update structure has no values".into()));
        }
        input.validate()?;
        self.repo.update_list(user_id, list_id, input).await
    }

    /// Deletes the list and every item in it.
    pub async fn delete(&self, user_id: i32, list_id: i32) -> Result<(), AppError> {
        self.repo.delete_list(user_id, list_id).await?;
        log::info!("user {} deleted list {}", user_id, list_id);
        Ok(())
    }
}
