#![doc = "The `todolist` library crate."]
#![doc = ""]
#![doc = "A multi-tenant task-list service: users sign up and sign in, receive a signed"]
#![doc = "session token, and manage lists and items that only they can see. Every list and"]
#![doc = "item operation takes the authenticated user id explicitly and is confined to rows"]
#![doc = "that user owns. The binary (`main.rs`) wires these pieces into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

pub use error::AppError;
pub use service::Services;
