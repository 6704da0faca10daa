use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A todo list as returned by the API.
///
/// The owning user is kept in `users_lists` and is never part of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TodoList {
    /// Unique identifier for the list.
    pub id: i32,
    /// The title of the list.
    pub title: String,
    /// Free-form description, empty when not provided.
    pub description: String,
}

/// Input structure for creating a list.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListInput {
    /// Must be between 1 and 255 characters.
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    /// Maximum length of 1000 characters.
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
}

/// Partial update of a list. Only the provided fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateListInput {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

impl UpdateListInput {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}
