pub mod auth;
pub mod health;
pub mod items;
pub mod lists;

use actix_web::web;
use serde::{Deserialize, Serialize};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Body returned by create endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: i32,
}

/// Body returned by update and delete endpoints.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Malformed JSON bodies become `400 {"error": ...}` instead of actix's plain-text default.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| AppError::Validation("invalid id param".into()).into())
}

/// Mounts every route. Expects `Services::register` to have been applied to the same app.
///
/// `/health` and `/auth/*` are public; everything under `/api` goes through `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health::health)
        .service(
            web::scope("/auth")
                .service(auth::sign_up)
                .service(auth::sign_in),
        )
        .service(
            web::scope("/api")
                .wrap(AuthMiddleware)
                .service(
                    web::scope("/lists")
                        .service(lists::create_list)
                        .service(lists::get_all_lists)
                        .service(lists::get_list)
                        .service(lists::update_list)
                        .service(lists::delete_list)
                        .service(items::create_item)
                        .service(items::get_all_items),
                )
                .service(
                    web::scope("/items")
                        .service(items::get_item)
                        .service(items::update_item)
                        .service(items::delete_item),
                ),
        );
}
