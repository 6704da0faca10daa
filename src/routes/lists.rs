use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{ListInput, TodoList, UpdateListInput},
    routes::{IdResponse, StatusResponse},
    service::TodoListService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

/// Body of `GET /api/lists`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListsResponse {
    pub data: Vec<TodoList>,
}

/// Creates a list owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: `{"id": <list id>}`.
/// - `400 Bad Request`: Malformed body or invalid fields.
/// - `401 Unauthorized`: Missing or invalid bearer token.
#[post("")]
pub async fn create_list(
    user: AuthenticatedUserId,
    lists: web::Data<TodoListService>,
    list_data: web::Json<ListInput>,
) -> Result<impl Responder, AppError> {
    let id = lists.create(user.0, list_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(IdResponse { id }))
}

/// Returns all lists of the authenticated user, ascending by id.
#[get("")]
pub async fn get_all_lists(
    user: AuthenticatedUserId,
    lists: web::Data<TodoListService>,
) -> Result<impl Responder, AppError> {
    let data = lists.get_all(user.0).await?;
    Ok(HttpResponse::Ok().json(ListsResponse { data }))
}

/// Retrieves one list.
///
/// ## Responses:
/// - `200 OK`: The `TodoList`.
/// - `404 Not Found`: The list does not exist or is owned by another user.
#[get("/{id}")]
pub async fn get_list(
    user: AuthenticatedUserId,
    lists: web::Data<TodoListService>,
    list_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let list = lists.get_by_id(user.0, list_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(list))
}

/// Applies the provided fields to a list.
///
/// ## Responses:
/// - `200 OK`: `{"status": "ok"}`.
/// - `400 Bad Request`: No fields provided or invalid values.
/// - `404 Not Found`: The list does not exist or is owned by another user.
#[put("/{id}")]
pub async fn update_list(
    user: AuthenticatedUserId,
    lists: web::Data<TodoListService>,
    list_id: web::Path<i32>,
    list_data: web::Json<UpdateListInput>,
) -> Result<impl Responder, AppError> {
    lists
        .update(user.0, list_id.into_inner(), list_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(StatusResponse::ok()))
}

/// Deletes a list together with all of its items.
#[delete("/{id}")]
pub async fn delete_list(
    user: AuthenticatedUserId,
    lists: web::Data<TodoListService>,
    list_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    lists.delete(user.0, list_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(StatusResponse::ok()))
}
