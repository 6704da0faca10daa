use crate::{
    auth::{AuthService, SignInRequest, SignUpRequest, SignUpResponse, TokenResponse},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// ## Responses:
/// - `201 Created`: `{"id": <user id>}`.
/// - `400 Bad Request`: Malformed body, invalid fields, or a username that is already taken.
/// - `500 Internal Server Error`: Storage failure.
#[post("/sign-up")]
pub async fn sign_up(
    auth: web::Data<AuthService>,
    sign_up_data: web::Json<SignUpRequest>,
) -> Result<impl Responder, AppError> {
    let id = auth.create_user(sign_up_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(SignUpResponse { id }))
}

/// Sign in
///
/// Exchanges a username and password for a bearer token.
///
/// ## Responses:
/// - `200 OK`: `{"token": "..."}`.
/// - `400 Bad Request`: Malformed body or empty fields.
/// - `401 Unauthorized`: `{"error": "invalid credentials"}` for an unknown user or a wrong password alike.
#[post("/sign-in")]
pub async fn sign_in(
    auth: web::Data<AuthService>,
    sign_in_data: web::Json<SignInRequest>,
) -> Result<impl Responder, AppError> {
    sign_in_data.validate()?;

    let token = auth
        .generate_token(&sign_in_data.username, &sign_in_data.password)
        .await?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
