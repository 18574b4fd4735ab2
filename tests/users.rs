use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App, Error};
use chrono::DateTime;
use pretty_assertions::assert_eq;
use serde_json::json;

use taskzero::auth::TokenService;
use taskzero::routes;
use taskzero::storage::TodoStore;
use taskzero::AppState;

fn test_state() -> AppState {
    AppState::in_memory(TokenService::new("test-secret", 30, 10080))
}

async fn register<S, B>(app: &S, username: &str, email: &str, password: &str) -> serde_json::Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/users/")
        .set_json(json!({ "username": username, "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED, "registration failed");
    test::read_body_json(resp).await
}

async fn login_token<S, B>(app: &S, email: &str, password: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/token")
        .set_form([("username", email), ("password", password)])
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK, "login failed");
    let body: serde_json::Value = test::read_body_json(resp).await;
    body["access_token"].as_str().unwrap().to_string()
}

#[actix_rt::test]
async fn test_create_user() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    let body = register(&app, "Test", "test@mail.com", "super_secret").await;

    assert_eq!(body["id"], 1);
    assert_eq!(body["username"], "Test");
    assert_eq!(body["email"], "test@mail.com");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
    assert!(DateTime::parse_from_rfc3339(body["created_at"].as_str().unwrap()).is_ok());
    assert!(DateTime::parse_from_rfc3339(body["updated_at"].as_str().unwrap()).is_ok());
}

#[actix_rt::test]
async fn test_create_user_already_exists() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    register(&app, "test", "test@mail.com", "super_secret").await;

    // Username collision reported first, even when both fields collide.
    let req = test::TestRequest::post()
        .uri("/users/")
        .set_json(json!({ "username": "test", "email": "test@mail.com", "password": "123456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "detail": "Username already exists." }));

    let req = test::TestRequest::post()
        .uri("/users/")
        .set_json(json!({ "username": "bob", "email": "test@mail.com", "password": "123456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "detail": "Email already exists." }));
}

#[actix_rt::test]
async fn test_create_user_validation() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    let cases = vec![
        (
            json!({ "username": "test", "email": "not-an-email", "password": "super_secret" }),
            "invalid email",
        ),
        (
            json!({ "username": "tu", "email": "test@mail.com", "password": "super_secret" }),
            "username too short",
        ),
        (
            json!({ "username": "test", "email": "test@mail.com", "password": "123" }),
            "password too short",
        ),
    ];

    for (payload, description) in cases {
        let req = test::TestRequest::post()
            .uri("/users/")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "case failed: {}",
            description
        );
    }
}

#[actix_rt::test]
async fn test_read_users_empty() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/users/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "users": [] }));
}

#[actix_rt::test]
async fn test_read_users_pagination() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    register(&app, "alice", "alice@mail.com", "super_secret").await;
    register(&app, "bob", "bob@mail.com", "super_secret").await;
    register(&app, "carol", "carol@mail.com", "super_secret").await;

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/users/").to_request()).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 3);
    // Insertion order.
    assert_eq!(users[0]["username"], "alice");
    assert_eq!(users[2]["username"], "carol");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/?skip=1&limit=1")
            .to_request(),
    )
    .await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "bob");
}

#[actix_rt::test]
async fn test_read_user() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    register(&app, "test", "test@mail.com", "super_secret").await;

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/users/1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["username"], "test");
    assert_eq!(body["email"], "test@mail.com");
}

#[actix_rt::test]
async fn test_read_user_not_found() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/users/10").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "detail": "User not found" }));
}

#[actix_rt::test]
async fn test_update_user() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    register(&app, "test", "test@mail.com", "super_secret").await;
    let token = login_token(&app, "test@mail.com", "super_secret").await;

    let req = test::TestRequest::put()
        .uri("/users/1")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({
            "username": "test2",
            "email": "test2@mail.com",
            "password": "new_super_secret_password"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["username"], "test2");
    assert_eq!(body["email"], "test2@mail.com");

    // The password was re-hashed: the new one logs in, the old one no longer does.
    login_token(&app, "test2@mail.com", "new_super_secret_password").await;
    let req = test::TestRequest::post()
        .uri("/auth/token")
        .set_form([("username", "test2@mail.com"), ("password", "super_secret")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_update_other_user_forbidden() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    register(&app, "test", "test@mail.com", "super_secret").await;
    register(&app, "other", "other@mail.com", "super_secret").await;
    let token = login_token(&app, "test@mail.com", "super_secret").await;

    let req = test::TestRequest::put()
        .uri("/users/2")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({
            "username": "hijacked",
            "email": "hijacked@mail.com",
            "password": "super_secret"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "detail": "Not enough permissions" }));
}

#[actix_rt::test]
async fn test_update_user_conflict() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    register(&app, "test", "test@mail.com", "super_secret").await;
    register(&app, "other", "other@mail.com", "super_secret").await;
    let token = login_token(&app, "test@mail.com", "super_secret").await;

    // Taking another account's username is a conflict...
    let req = test::TestRequest::put()
        .uri("/users/1")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({
            "username": "other",
            "email": "test@mail.com",
            "password": "super_secret"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "detail": "Username already exists." }));

    // ...while keeping your own is not.
    let req = test::TestRequest::put()
        .uri("/users/1")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({
            "username": "test",
            "email": "test@mail.com",
            "password": "super_secret"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_delete_user() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    register(&app, "test", "test@mail.com", "super_secret").await;
    let token = login_token(&app, "test@mail.com", "super_secret").await;

    let req = test::TestRequest::delete()
        .uri("/users/1")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "User deleted" }));

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/users/1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_delete_other_user_forbidden() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    register(&app, "test", "test@mail.com", "super_secret").await;
    register(&app, "other", "other@mail.com", "super_secret").await;
    let token = login_token(&app, "test@mail.com", "super_secret").await;

    let req = test::TestRequest::delete()
        .uri("/users/2")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "detail": "Not enough permissions" }));
}

#[actix_rt::test]
async fn test_delete_user_cascades_to_todos() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes::config),
    )
    .await;

    register(&app, "test", "test@mail.com", "super_secret").await;
    let token = login_token(&app, "test@mail.com", "super_secret").await;

    let req = test::TestRequest::post()
        .uri("/todos/")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({ "title": "Pack boxes", "description": "Moving day", "state": "draft" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri("/users/1")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The owned items went with the account.
    let leftovers = state
        .todos
        .list(
            1,
            &taskzero::models::TodoQuery {
                title: None,
                description: None,
                state: None,
                offset: None,
                limit: None,
            },
        )
        .await
        .unwrap();
    assert!(leftovers.is_empty());
}
