//! Ownership-scoped CRUD over lists and items, plus the wiring that hands the
//! services to actix as app data.

pub mod item;
pub mod list;

use std::sync::Arc;

use actix_web::web;

pub use item::TodoItemService;
pub use list::TodoListService;

use crate::auth::{AuthService, TokenCodec};
use crate::error::AppError;
use crate::repository::{ItemRepository, ListRepository, UserRepository};

/// Everything a request handler can reach, built once at startup.
#[derive(Clone)]
pub struct Services {
    pub codec: web::Data<TokenCodec>,
    pub auth: web::Data<AuthService>,
    pub lists: web::Data<TodoListService>,
    pub items: web::Data<TodoItemService>,
}

impl Services {
    /// Builds all services on top of one store that implements every repository.
    pub fn new<S>(store: Arc<S>, codec: TokenCodec, hash_cost: u32) -> Result<Self, AppError>
    where
        S: UserRepository + ListRepository + ItemRepository + 'static,
    {
        let codec = Arc::new(codec);
        let users: Arc<dyn UserRepository> = store.clone();
        let lists: Arc<dyn ListRepository> = store.clone();
        let items: Arc<dyn ItemRepository> = store;

        Ok(Self {
            auth: web::Data::new(AuthService::new(users, codec.clone(), hash_cost)?),
            lists: web::Data::new(TodoListService::new(lists.clone())),
            items: web::Data::new(TodoItemService::new(items, lists)),
            codec: web::Data::from(codec),
        })
    }

    /// Registers the services as app data. Use with `App::configure`.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.codec.clone())
            .app_data(self.auth.clone())
            .app_data(self.lists.clone())
            .app_data(self.items.clone());
    }
}
