//! Runs the same flows against a real database. Needs `DATABASE_URL`:
//!
//! ```sh
//! DATABASE_URL=postgres://... cargo test --test postgres -- --ignored
//! ```

mod common;

use std::sync::Arc;

use actix_web::{http::StatusCode, test, App};
use common::{sign_up_and_sign_in, TEST_SECRET};
use dotenv::dotenv;
use pretty_assertions::assert_eq;
use serde_json::json;
use todolist::auth::TokenCodec;
use todolist::models::{ItemInput, ListInput, NewUser, TodoItem};
use todolist::repository::{ItemRepository, ListRepository, PgStore, UserRepository};
use todolist::routes::{self, IdResponse};
use todolist::service::Services;

async fn pg_store() -> PgStore {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let store = PgStore::connect(&database_url, 5)
        .await
        .expect("Failed to connect to Postgres");
    store.migrate().await.expect("Failed to run migrations");
    store
}

async fn cleanup_user(store: &PgStore, username: &str) {
    // Removing the user only drops join rows, so items and lists go first.
    let _ = sqlx::query(
        "DELETE FROM todo_items WHERE id IN (
            SELECT li.item_id FROM lists_items li
            JOIN users_lists ul ON ul.list_id = li.list_id
            JOIN users u ON u.id = ul.user_id
            WHERE u.username = $1)",
    )
    .bind(username)
    .execute(store.pool())
    .await;
    let _ = sqlx::query(
        "DELETE FROM todo_lists WHERE id IN (
            SELECT ul.list_id FROM users_lists ul
            JOIN users u ON u.id = ul.user_id
            WHERE u.username = $1)",
    )
    .bind(username)
    .execute(store.pool())
    .await;
    let _ = sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(username)
        .execute(store.pool())
        .await;
}

#[actix_rt::test]
#[ignore]
async fn test_postgres_ownership_flow() {
    let store = pg_store().await;
    let (alice_name, bob_name) = ("pg_alice_flow", "pg_bob_flow");
    cleanup_user(&store, alice_name).await;
    cleanup_user(&store, bob_name).await;

    let codec = TokenCodec::new(TEST_SECRET, chrono::Duration::hours(12));
    let services = Services::new(Arc::new(store.clone()), codec, 4).expect("failed to build services");
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.register(cfg))
            .configure(routes::config),
    )
    .await;

    let alice = sign_up_and_sign_in(&app, alice_name, "password123").await;
    let bob = sign_up_and_sign_in(&app, bob_name, "password456").await;

    let req = test::TestRequest::post()
        .uri("/api/lists")
        .append_header(alice.bearer())
        .set_json(json!({ "title": "Groceries" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let list: IdResponse = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/lists/{}/items", list.id))
        .append_header(alice.bearer())
        .set_json(json!({ "title": "Milk" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let milk: IdResponse = test::read_body_json(resp).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/lists/{}/items", list.id))
        .append_header(alice.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    let items: Vec<TodoItem> = test::read_body_json(resp).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Milk");
    assert!(!items[0].done);

    let req = test::TestRequest::get()
        .uri(&format!("/api/items/{}", milk.id))
        .append_header(bob.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri(&format!("/api/items/{}", milk.id))
        .append_header(alice.bearer())
        .set_json(json!({ "done": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/lists/{}", list.id))
        .append_header(alice.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todo_items WHERE id = $1")
        .bind(milk.id)
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    cleanup_user(&store, alice_name).await;
    cleanup_user(&store, bob_name).await;
}

#[actix_rt::test]
#[ignore]
async fn test_postgres_duplicate_username() {
    let store = pg_store().await;
    let username = "pg_duplicate_user";
    cleanup_user(&store, username).await;

    let codec = TokenCodec::new(TEST_SECRET, chrono::Duration::hours(12));
    let services = Services::new(Arc::new(store.clone()), codec, 4).expect("failed to build services");
    let app = test::init_service(
        App::new()
            .configure(|cfg| services.register(cfg))
            .configure(routes::config),
    )
    .await;

    let payload = json!({ "name": "Dup", "username": username, "password": "password123" });
    let req = test::TestRequest::post()
        .uri("/auth/sign-up")
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/auth/sign-up")
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    cleanup_user(&store, username).await;
}

#[actix_rt::test]
#[ignore]
async fn test_postgres_delete_list_racing_create_item_leaves_no_orphans() {
    let store = pg_store().await;
    let username = "pg_race_user";
    cleanup_user(&store, username).await;

    let user_id = store
        .create_user(NewUser {
            name: "Race".to_string(),
            username: username.to_string(),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap();

    for round in 0..20 {
        let list_id = store
            .create_list(
                user_id,
                ListInput {
                    title: format!("race {}", round),
                    description: String::new(),
                },
            )
            .await
            .unwrap();

        let (created, deleted) = tokio::join!(
            store.create_item(
                list_id,
                ItemInput {
                    title: "late".to_string(),
                    description: String::new(),
                    done: false,
                },
            ),
            store.delete_list(user_id, list_id),
        );
        deleted.unwrap();
        if let Err(err) = created {
            assert!(matches!(err, todolist::AppError::NotFound(_)), "{:?}", err);
        }
    }

    let (orphans,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM todo_items ti \
         WHERE NOT EXISTS (SELECT 1 FROM lists_items li WHERE li.item_id = ti.id)",
    )
    .fetch_one(store.pool())
    .await
    .unwrap();
    assert_eq!(orphans, 0);

    cleanup_user(&store, username).await;
}
