use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{ServerConfig, app};

async fn test_app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .password_cost(4)
        .build()
        .await
        .unwrap();
    app(engine, &ServerConfig::new("test-secret"))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["token"].as_str().unwrap().to_string()
}

async fn create_account(app: &Router, token: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/accounts",
        Some(token),
        Some(json!({ "name": name, "accountType": "CHECKING", "balance": "100.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_login_and_me() {
    let app = test_app().await;
    register(&app, "alice").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "usernameOrEmail": "alice@example.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], body["userId"]);
    assert_eq!(me["roles"], json!(["USER"]));
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = test_app().await;
    register(&app, "alice").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": "alice",
            "email": "another@example.com",
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = test_app().await;
    register(&app, "alice").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "usernameOrEmail": "alice", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username/email or password");
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = test_app().await;

    let (status, _) = send(&app, "GET", "/api/accounts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/accounts", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    for value in ["Basic YWxpY2U6cHc=", "Bearer", "Token abc"] {
        let request = Request::builder()
            .method("GET")
            .uri("/api/accounts")
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{value}");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "malformed authorization header");
    }
}

#[tokio::test]
async fn account_crud_over_http() {
    let app = test_app().await;
    let token = register(&app, "alice").await;
    let id = create_account(&app, &token, "Main").await;

    let (status, body) = send(&app, "GET", &format!("/api/accounts/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], "100.00");
    assert_eq!(body["currency"], "KRW");
    assert_eq!(body["isActive"], true);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/accounts/{id}/balance"),
        Some(&token),
        Some(json!({ "balance": "42.5" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], "42.50");

    let (status, body) = send(&app, "GET", "/api/accounts/type/CHECKING", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/api/accounts/inactive", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = send(&app, "DELETE", &format!("/api/accounts/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/accounts/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn other_users_records_are_not_found() {
    let app = test_app().await;
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let id = create_account(&app, &alice, "Alice only").await;

    let (status, _) = send(&app, "GET", &format!("/api/accounts/{id}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/api/accounts", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn validation_errors_are_unprocessable() {
    let app = test_app().await;
    let token = register(&app, "alice").await;
    let account = create_account(&app, &token, "Main").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(&token),
        Some(json!({
            "transactionDate": "2024-01-05",
            "description": "move",
            "amount": "10.00",
            "transactionType": "TRANSFER",
            "accountId": account,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn transactions_flow_over_http() {
    let app = test_app().await;
    let token = register(&app, "alice").await;
    let checking = create_account(&app, &token, "Checking").await;
    let savings = create_account(&app, &token, "Savings").await;

    let (status, category) = send(
        &app,
        "POST",
        "/api/categories",
        Some(&token),
        Some(json!({ "name": "Food", "transactionType": "EXPENSE" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(&token),
        Some(json!({
            "transactionDate": "2024-01-05",
            "description": "Lunch",
            "amount": "12.30",
            "transactionType": "EXPENSE",
            "categoryId": category_id,
            "accountId": checking,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(&token),
        Some(json!({
            "transactionDate": "2024-01-20",
            "description": "Save",
            "amount": "50",
            "transactionType": "TRANSFER",
            "accountId": checking,
            "targetAccountId": savings,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, all) = send(&app, "GET", "/api/transactions", Some(&token), None).await;
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["description"], "Save");
    assert_eq!(all[0]["amount"], "50.00");

    let (_, by_account) = send(
        &app,
        "GET",
        &format!("/api/transactions/account/{savings}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(by_account.as_array().unwrap().len(), 1);

    let (_, in_range) = send(
        &app,
        "GET",
        "/api/transactions/range?from=2024-01-01&to=2024-01-05",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(in_range.as_array().unwrap().len(), 1);

    let (_, expenses) = send(
        &app,
        "GET",
        "/api/transactions/type/EXPENSE",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(expenses.as_array().unwrap().len(), 1);

    // Balances are not touched by transactions.
    let (_, account) = send(
        &app,
        "GET",
        &format!("/api/accounts/{checking}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(account["balance"], "100.00");

    // The category is still referenced.
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/categories/{category_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn budgets_and_tags_over_http() {
    let app = test_app().await;
    let token = register(&app, "alice").await;

    let (_, category) = send(
        &app,
        "POST",
        "/api/categories",
        Some(&token),
        Some(json!({ "name": "Rent", "transactionType": "EXPENSE" })),
    )
    .await;
    let category_id = category["id"].as_str().unwrap().to_string();

    let (status, budget) = send(
        &app,
        "POST",
        "/api/budgets",
        Some(&token),
        Some(json!({
            "categoryId": category_id,
            "amount": "800",
            "periodType": "MONTHLY",
            "startDate": "2024-01-01",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{budget}");
    assert_eq!(budget["isActive"], true);

    let (_, current) = send(
        &app,
        "GET",
        "/api/budgets/current?date=2030-06-01",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(current.as_array().unwrap().len(), 1);

    let (_, monthly) = send(&app, "GET", "/api/budgets/period/MONTHLY", Some(&token), None).await;
    assert_eq!(monthly.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "POST",
        "/api/budgets",
        Some(&token),
        Some(json!({
            "categoryId": category_id,
            "amount": "800",
            "periodType": "MONTHLY",
            "startDate": "2024-02-01",
            "endDate": "2024-01-01",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        "/api/tags",
        Some(&token),
        Some(json!({ "name": "Trip" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        &app,
        "POST",
        "/api/tags",
        Some(&token),
        Some(json!({ "name": "TRIP" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
