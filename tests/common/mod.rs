#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::{test, App};
use serde_json::json;
use todolist::auth::{SignUpResponse, TokenCodec, TokenResponse};
use todolist::repository::MemoryStore;
use todolist::routes;
use todolist::service::Services;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// A fresh in-memory store and the services built on top of it.
pub fn memory_services() -> (Arc<MemoryStore>, Services) {
    let store = Arc::new(MemoryStore::new());
    let codec = TokenCodec::new(TEST_SECRET, chrono::Duration::hours(12));
    let services = Services::new(store.clone(), codec, 4).expect("failed to build services");
    (store, services)
}

pub async fn init_app(
    services: Services,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .configure(|cfg| services.register(cfg))
            .configure(routes::config),
    )
    .await
}

pub struct TestUser {
    pub id: i32,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", self.token))
    }
}

pub async fn sign_up_and_sign_in(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    password: &str,
) -> TestUser {
    let req = test::TestRequest::post()
        .uri("/auth/sign-up")
        .set_json(json!({
            "name": username,
            "username": username,
            "password": password
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED, "sign-up of {} failed", username);
    let signed_up: SignUpResponse = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri("/auth/sign-in")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK, "sign-in of {} failed", username);
    let signed_in: TokenResponse = test::read_body_json(resp).await;

    TestUser {
        id: signed_up.id,
        token: signed_in.token,
    }
}

/// Calls a route that is expected to be rejected by `AuthMiddleware` and returns the status.
pub async fn rejected_status<S, B>(app: &S, req: actix_http::Request) -> StatusCode
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => panic!("expected rejection, got {}", resp.status()),
        Err(err) => err.error_response().status(),
    }
}
