use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{ItemInput, UpdateItemInput},
    routes::{IdResponse, StatusResponse},
    service::TodoItemService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

/// Creates an item in one of the authenticated user's lists.
///
/// Mounted under `/api/lists`.
///
/// ## Responses:
/// - `201 Created`: `{"id": <item id>}`.
/// - `400 Bad Request`: Malformed body or invalid fields.
/// - `404 Not Found`: The list does not exist or is owned by another user. No item is created.
#[post("/{id}/items")]
pub async fn create_item(
    user: AuthenticatedUserId,
    items: web::Data<TodoItemService>,
    list_id: web::Path<i32>,
    item_data: web::Json<ItemInput>,
) -> Result<impl Responder, AppError> {
    let id = items
        .create(user.0, list_id.into_inner(), item_data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(IdResponse { id }))
}

/// Returns the items of one list, ascending by id. Mounted under `/api/lists`.
#[get("/{id}/items")]
pub async fn get_all_items(
    user: AuthenticatedUserId,
    items: web::Data<TodoItemService>,
    list_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let list_items = items.get_all(user.0, list_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(list_items))
}

#[get("/{id}")]
pub async fn get_item(
    user: AuthenticatedUserId,
    items: web::Data<TodoItemService>,
    item_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let item = items.get_by_id(user.0, item_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(item))
}

#[put("/{id}")]
pub async fn update_item(
    user: AuthenticatedUserId,
    items: web::Data<TodoItemService>,
    item_id: web::Path<i32>,
    item_data: web::Json<UpdateItemInput>,
) -> Result<impl Responder, AppError> {
    items
        .update(user.0, item_id.into_inner(), item_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(StatusResponse::ok()))
}

#[delete("/{id}")]
pub async fn delete_item(
    user: AuthenticatedUserId,
    items: web::Data<TodoItemService>,
    item_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    items.delete(user.0, item_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(StatusResponse::ok()))
}
