use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::TokenError;
use crate::error::AppError;

/// The authenticated caller's user id, as established by `AuthMiddleware`.
///
/// Handlers take this as a parameter and pass `.0` explicitly into the list and
/// item services. If the middleware did not run for the route the extractor
/// rejects the request with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUserId(pub i32);

impl FromRequest for AuthenticatedUserId {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUserId>().copied() {
            Some(user_id) => ready(Ok(user_id)),
            None => {
                log::error!("no authenticated user on {}; is AuthMiddleware applied?", req.path());
                ready(Err(AppError::Token(TokenError::MissingHeader).into()))
            }
        }
    }
}
