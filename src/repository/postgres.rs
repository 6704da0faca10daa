use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{
    item_not_found, list_not_found, username_taken, ItemRepository, ListRepository,
    UserRepository,
};
use crate::error::AppError;
use crate::models::{
    ItemInput, ListInput, NewUser, TodoItem, TodoList, UpdateItemInput, UpdateListInput, User,
};

/// PostgreSQL-backed store.
///
/// Each call checks a connection out of the pool for the duration of one query
/// or transaction; sqlx hands it back on drop, including on error paths.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<i32, AppError> {
        let result = sqlx::query_as::<_, (i32,)>(
            "INSERT INTO users (name, username, password_hash) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok((id,)) => Ok(id),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(username_taken()),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl ListRepository for PgStore {
    async fn create_list(&self, user_id: i32, list: ListInput) -> Result<i32, AppError> {
        let mut tx = self.pool.begin().await?;

        let (id,) = sqlx::query_as::<_, (i32,)>(
            "INSERT INTO todo_lists (title, description) VALUES ($1, $2) RETURNING id",
        )
        .bind(&list.title)
        .bind(&list.description)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO users_lists (user_id, list_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(id)
    }

    async fn get_all_lists(&self, user_id: i32) -> Result<Vec<TodoList>, AppError> {
        let lists = sqlx::query_as::<_, TodoList>(
            "SELECT tl.id, tl.title, tl.description FROM todo_lists tl \
             INNER JOIN users_lists ul ON tl.id = ul.list_id \
             WHERE ul.user_id = $1 ORDER BY tl.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lists)
    }

    async fn get_list(&self, user_id: i32, list_id: i32) -> Result<TodoList, AppError> {
        sqlx::query_as::<_, TodoList>(
            "SELECT tl.id, tl.title, tl.description FROM todo_lists tl \
             INNER JOIN users_lists ul ON tl.id = ul.list_id \
             WHERE ul.user_id = $1 AND ul.list_id = $2",
        )
        .bind(user_id)
        .bind(list_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(list_not_found)
    }

    async fn update_list(
        &self,
        user_id: i32,
        list_id: i32,
        input: UpdateListInput,
    ) -> Result<(), AppError> {
        // One statement: the ownership join and the field changes succeed or fail together.
        let result = sqlx::query(
            "UPDATE todo_lists tl SET \
                 title = COALESCE($1, tl.title), \
                 description = COALESCE($2, tl.description) \
             FROM users_lists ul \
             WHERE tl.id = ul.list_id AND ul.list_id = $3 AND ul.user_id = $4",
        )
        .bind(input.title)
        .bind(input.description)
        .bind(list_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(list_not_found());
        }
        Ok(())
    }

    async fn delete_list(&self, user_id: i32, list_id: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock the list first. A concurrent create_item then blocks on its
        // lists_items foreign key and fails once the list is gone, instead of
        // leaving an unlinked item behind.
        let owned = sqlx::query_as::<_, (i32,)>(
            "SELECT tl.id FROM todo_lists tl \
             INNER JOIN users_lists ul ON tl.id = ul.list_id \
             WHERE ul.user_id = $1 AND ul.list_id = $2 \
             FOR UPDATE OF tl",
        )
        .bind(user_id)
        .bind(list_id)
        .fetch_optional(&mut *tx)
        .await?;
        if owned.is_none() {
            return Err(list_not_found());
        }

        // lists_items rows go with their items via ON DELETE CASCADE.
        sqlx::query(
            "DELETE FROM todo_items ti USING lists_items li, users_lists ul \
             WHERE ti.id = li.item_id AND li.list_id = ul.list_id \
             AND ul.user_id = $1 AND ul.list_id = $2",
        )
        .bind(user_id)
        .bind(list_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            "DELETE FROM todo_lists tl USING users_lists ul \
             WHERE tl.id = ul.list_id AND ul.user_id = $1 AND ul.list_id = $2",
        )
        .bind(user_id)
        .bind(list_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls it back.
            return Err(list_not_found());
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for PgStore {
    async fn create_item(&self, list_id: i32, item: ItemInput) -> Result<i32, AppError> {
        let mut tx = self.pool.begin().await?;

        let (id,) = sqlx::query_as::<_, (i32,)>(
            "INSERT INTO todo_items (title, description, done) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.done)
        .fetch_one(&mut *tx)
        .await?;

        let linked = sqlx::query("INSERT INTO lists_items (list_id, item_id) VALUES ($1, $2)")
            .bind(list_id)
            .bind(id)
            .execute(&mut *tx)
            .await;
        match linked {
            Ok(_) => {}
            // The list was deleted after the caller resolved it.
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                return Err(list_not_found())
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;
        Ok(id)
    }

    async fn get_all_items(&self, user_id: i32, list_id: i32) -> Result<Vec<TodoItem>, AppError> {
        let items = sqlx::query_as::<_, TodoItem>(
            "SELECT ti.id, ti.title, ti.description, ti.done FROM todo_items ti \
             INNER JOIN lists_items li ON li.item_id = ti.id \
             INNER JOIN users_lists ul ON ul.list_id = li.list_id \
             WHERE li.list_id = $1 AND ul.user_id = $2 ORDER BY ti.id",
        )
        .bind(list_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn get_item(&self, user_id: i32, item_id: i32) -> Result<TodoItem, AppError> {
        sqlx::query_as::<_, TodoItem>(
            "SELECT ti.id, ti.title, ti.description, ti.done FROM todo_items ti \
             INNER JOIN lists_items li ON li.item_id = ti.id \
             INNER JOIN users_lists ul ON ul.list_id = li.list_id \
             WHERE ti.id = $1 AND ul.user_id = $2",
        )
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(item_not_found)
    }

    async fn update_item(
        &self,
        user_id: i32,
        item_id: i32,
        input: UpdateItemInput,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE todo_items ti SET \
                 title = COALESCE($1, ti.title), \
                 description = COALESCE($2, ti.description), \
                 done = COALESCE($3, ti.done) \
             FROM lists_items li, users_lists ul \
             WHERE ti.id = li.item_id AND li.list_id = ul.list_id \
             AND ul.user_id = $4 AND ti.id = $5",
        )
        .bind(input.title)
        .bind(input.description)
        .bind(input.done)
        .bind(user_id)
        .bind(item_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(item_not_found());
        }
        Ok(())
    }

    async fn delete_item(&self, user_id: i32, item_id: i32) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM todo_items ti USING lists_items li, users_lists ul \
             WHERE ti.id = li.item_id AND li.list_id = ul.list_id \
             AND ul.user_id = $1 AND ti.id = $2",
        )
        .bind(user_id)
        .bind(item_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(item_not_found());
        }
        Ok(())
    }
}
