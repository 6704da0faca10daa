use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{
    item_not_found, list_not_found, username_taken, ItemRepository, ListRepository,
    UserRepository,
};
use crate::error::AppError;
use crate::models::{
    ItemInput, ListInput, NewUser, TodoItem, TodoList, UpdateItemInput, UpdateListInput, User,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    lists: BTreeMap<i32, TodoList>,
    /// (user_id, list_id)
    users_lists: Vec<(i32, i32)>,
    items: BTreeMap<i32, TodoItem>,
    /// (list_id, item_id)
    lists_items: Vec<(i32, i32)>,
    last_user_id: i32,
    last_list_id: i32,
    last_item_id: i32,
}

impl Tables {
    fn owns_list(&self, user_id: i32, list_id: i32) -> bool {
        self.users_lists.contains(&(user_id, list_id)) && self.lists.contains_key(&list_id)
    }

    /// The item's list, if that list is owned by `user_id`.
    fn owned_item_list(&self, user_id: i32, item_id: i32) -> Option<i32> {
        self.lists_items
            .iter()
            .find(|(_, item)| *item == item_id)
            .map(|(list, _)| *list)
            .filter(|list| self.owns_list(user_id, *list))
            .filter(|_| self.items.contains_key(&item_id))
    }

    fn remove_item(&mut self, item_id: i32) {
        self.items.remove(&item_id);
        self.lists_items.retain(|(_, item)| *item != item_id);
    }
}

/// In-process store mirroring the relational layout, including the join tables.
///
/// A single lock guards all tables, so every operation is atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.lock().await.users.len()
    }

    pub async fn list_count(&self) -> usize {
        self.tables.lock().await.lists.len()
    }

    /// Rows in the items table, whether or not they are still linked to a list.
    pub async fn item_count(&self) -> usize {
        self.tables.lock().await.items.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<i32, AppError> {
        let mut tables = self.tables.lock().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(username_taken());
        }

        tables.last_user_id += 1;
        let id = tables.last_user_id;
        tables.users.insert(
            id,
            User {
                id,
                name: user.name,
                username: user.username,
                password_hash: user.password_hash,
            },
        );
        Ok(id)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl ListRepository for MemoryStore {
    async fn create_list(&self, user_id: i32, list: ListInput) -> Result<i32, AppError> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&user_id) {
            return Err(AppError::Storage(format!(
                "users_lists: user {} does not exist",
                user_id
            )));
        }

        tables.last_list_id += 1;
        let id = tables.last_list_id;
        tables.lists.insert(
            id,
            TodoList {
                id,
                title: list.title,
                description: list.description,
            },
        );
        tables.users_lists.push((user_id, id));
        Ok(id)
    }

    async fn get_all_lists(&self, user_id: i32) -> Result<Vec<TodoList>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .lists
            .values()
            .filter(|list| tables.owns_list(user_id, list.id))
            .cloned()
            .collect())
    }

    async fn get_list(&self, user_id: i32, list_id: i32) -> Result<TodoList, AppError> {
        let tables = self.tables.lock().await;
        if !tables.owns_list(user_id, list_id) {
            return Err(list_not_found());
        }
        tables.lists.get(&list_id).cloned().ok_or_else(list_not_found)
    }

    async fn update_list(
        &self,
        user_id: i32,
        list_id: i32,
        input: UpdateListInput,
    ) -> Result<(), AppError> {
        let mut tables = self.tables.lock().await;
        if !tables.owns_list(user_id, list_id) {
            return Err(list_not_found());
        }
        let list = tables.lists.get_mut(&list_id).ok_or_else(list_not_found)?;
        if let Some(title) = input.title {
            list.title = title;
        }
        if let Some(description) = input.description {
            list.description = description;
        }
        Ok(())
    }

    async fn delete_list(&self, user_id: i32, list_id: i32) -> Result<(), AppError> {
        let mut tables = self.tables.lock().await;
        if !tables.owns_list(user_id, list_id) {
            return Err(list_not_found());
        }

        let children: Vec<i32> = tables
            .lists_items
            .iter()
            .filter(|(list, _)| *list == list_id)
            .map(|(_, item)| *item)
            .collect();
        for item_id in children {
            tables.remove_item(item_id);
        }
        tables.lists.remove(&list_id);
        tables.users_lists.retain(|(_, list)| *list != list_id);
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn create_item(&self, list_id: i32, item: ItemInput) -> Result<i32, AppError> {
        let mut tables = self.tables.lock().await;
        if !tables.lists.contains_key(&list_id) {
            return Err(AppError::Storage(format!(
                "lists_items: list {} does not exist",
                list_id
            )));
        }

        tables.last_item_id += 1;
        let id = tables.last_item_id;
        tables.items.insert(
            id,
            TodoItem {
                id,
                title: item.title,
                description: item.description,
                done: item.done,
            },
        );
        tables.lists_items.push((list_id, id));
        Ok(id)
    }

    async fn get_all_items(&self, user_id: i32, list_id: i32) -> Result<Vec<TodoItem>, AppError> {
        let tables = self.tables.lock().await;
        if !tables.owns_list(user_id, list_id) {
            return Ok(Vec::new());
        }
        Ok(tables
            .items
            .values()
            .filter(|item| tables.lists_items.contains(&(list_id, item.id)))
            .cloned()
            .collect())
    }

    async fn get_item(&self, user_id: i32, item_id: i32) -> Result<TodoItem, AppError> {
        let tables = self.tables.lock().await;
        tables
            .owned_item_list(user_id, item_id)
            .and_then(|_| tables.items.get(&item_id).cloned())
            .ok_or_else(item_not_found)
    }

    async fn update_item(
        &self,
        user_id: i32,
        item_id: i32,
        input: UpdateItemInput,
    ) -> Result<(), AppError> {
        let mut tables = self.tables.lock().await;
        if tables.owned_item_list(user_id, item_id).is_none() {
            return Err(item_not_found());
        }
        let item = tables.items.get_mut(&item_id).ok_or_else(item_not_found)?;
        if let Some(title) = input.title {
            item.title = title;
        }
        if let Some(description) = input.description {
            item.description = description;
        }
        if let Some(done) = input.done {
            item.done = done;
        }
        Ok(())
    }

    async fn delete_item(&self, user_id: i32, item_id: i32) -> Result<(), AppError> {
        let mut tables = self.tables.lock().await;
        if tables.owned_item_list(user_id, item_id).is_none() {
            return Err(item_not_found());
        }
        tables.remove_item(item_id);
        Ok(())
    }
}
