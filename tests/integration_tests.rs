//! End-to-end tests for the user endpoints
//! Drives the fully wired router against an in-memory SQLite database

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

use user_management_api::config::DEFAULT_API_TOKEN;
use user_management_api::{Config, create_app};

mod fixtures {
    use serde_json::{Value, json};

    pub fn user(first_name: &str, email: &str) -> Value {
        json!({
            "firstName": first_name,
            "lastName": "Tester",
            "email": email,
            "department": "QA"
        })
    }
}

async fn create_test_server() -> TestServer {
    let app = create_app(Config::in_memory())
        .await
        .expect("Failed to create app");
    TestServer::new(app).expect("Failed to create test server")
}

async fn create_user(server: &TestServer, body: &Value) -> Value {
    let response = server
        .post("/api/users")
        .authorization_bearer(DEFAULT_API_TOKEN)
        .json(body)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_create_and_fetch_user() {
    let server = create_test_server().await;

    let response = server
        .post("/api/users")
        .authorization_bearer(DEFAULT_API_TOKEN)
        .json(&json!({
            "firstName": "  Ada ",
            "lastName": "Lovelace",
            "email": "Ada@Example.com",
            "department": "Engineering"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Value = response.json();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(
        response.header("location").to_str().unwrap(),
        format!("/api/users/{id}")
    );
    assert_eq!(created["firstName"], "Ada");
    assert_eq!(created["email"], "Ada@Example.com");

    let fetched = server
        .get(&format!("/api/users/{id}"))
        .authorization_bearer(DEFAULT_API_TOKEN)
        .await;
    assert_eq!(fetched.status_code(), StatusCode::OK);
    assert_eq!(fetched.json::<Value>(), created);
}

#[tokio::test]
async fn test_client_supplied_id_is_ignored() {
    let server = create_test_server().await;

    let mut body = fixtures::user("Ada", "ada@example.com");
    body["id"] = json!(999);
    let created = create_user(&server, &body).await;

    assert_ne!(created["id"], 999);
}

#[tokio::test]
async fn test_duplicate_email_on_create_conflicts() {
    let server = create_test_server().await;
    create_user(&server, &fixtures::user("Ada", "ada@example.com")).await;

    for email in ["ada@example.com", "ADA@EXAMPLE.COM", "Ada@example.com"] {
        let response = server
            .post("/api/users")
            .authorization_bearer(DEFAULT_API_TOKEN)
            .json(&fixtures::user("Copy", email))
            .await;

        assert_eq!(response.status_code(), StatusCode::CONFLICT, "{email}");
        let body: Value = response.json();
        assert_eq!(body["message"], "A user with this email already exists.");
    }
}

#[tokio::test]
async fn test_create_with_invalid_data_lists_errors() {
    let server = create_test_server().await;

    let response = server
        .post("/api/users")
        .authorization_bearer(DEFAULT_API_TOKEN)
        .json(&json!({ "firstName": "", "email": "nope" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid user data.");
    let errors: Vec<String> = serde_json::from_value(body["errors"].clone()).unwrap();
    assert!(errors.contains(&"firstName is required.".to_string()));
    assert!(errors.contains(&"lastName is required.".to_string()));
    assert!(errors.contains(&"department is required.".to_string()));
    assert!(errors.contains(&"email is not a valid email address.".to_string()));
}

#[tokio::test]
async fn test_update_to_other_users_email_conflicts() {
    let server = create_test_server().await;
    let ada = create_user(&server, &fixtures::user("Ada", "ada@example.com")).await;
    create_user(&server, &fixtures::user("Grace", "grace@example.com")).await;

    let response = server
        .put(&format!("/api/users/{}", ada["id"]))
        .authorization_bearer(DEFAULT_API_TOKEN)
        .json(&fixtures::user("Ada", "GRACE@example.com"))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_keeping_own_email_succeeds() {
    let server = create_test_server().await;
    let ada = create_user(&server, &fixtures::user("Ada", "ada@example.com")).await;
    let path = format!("/api/users/{}", ada["id"]);

    let mut replacement = fixtures::user("Augusta", "ADA@example.com");
    replacement["department"] = json!("Mathematics");
    let response = server
        .put(&path)
        .authorization_bearer(DEFAULT_API_TOKEN)
        .json(&replacement)
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let stored: Value = server
        .get(&path)
        .authorization_bearer(DEFAULT_API_TOKEN)
        .await
        .json();
    assert_eq!(stored["id"], ada["id"]);
    assert_eq!(stored["firstName"], "Augusta");
    assert_eq!(stored["email"], "ADA@example.com");
    assert_eq!(stored["department"], "Mathematics");
}

#[tokio::test]
async fn test_update_validates_before_lookup() {
    let server = create_test_server().await;

    let response = server
        .put("/api/users/12345")
        .authorization_bearer(DEFAULT_API_TOKEN)
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .put("/api/users/12345")
        .authorization_bearer(DEFAULT_API_TOKEN)
        .json(&fixtures::user("Ada", "ada@example.com"))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_users_are_not_found() {
    let server = create_test_server().await;

    let fetched = server
        .get("/api/users/404")
        .authorization_bearer(DEFAULT_API_TOKEN)
        .await;
    assert_eq!(fetched.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(fetched.json::<Value>()["code"], "NOT_FOUND");

    let deleted = server
        .delete("/api/users/404")
        .authorization_bearer(DEFAULT_API_TOKEN)
        .await;
    assert_eq!(deleted.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_removes_user() {
    let server = create_test_server().await;
    let ada = create_user(&server, &fixtures::user("Ada", "ada@example.com")).await;
    let path = format!("/api/users/{}", ada["id"]);

    let response = server
        .delete(&path)
        .authorization_bearer(DEFAULT_API_TOKEN)
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let again = server
        .delete(&path)
        .authorization_bearer(DEFAULT_API_TOKEN)
        .await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_pagination_is_capped() {
    let server = create_test_server().await;
    for i in 0..105 {
        create_user(
            &server,
            &fixtures::user(&format!("User{i}"), &format!("user{i}@example.com")),
        )
        .await;
    }

    let response = server
        .get("/api/users")
        .add_query_param("take", 1000)
        .authorization_bearer(DEFAULT_API_TOKEN)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.header("cache-control").to_str().unwrap(),
        "private, max-age=30"
    );
    assert_eq!(response.json::<Vec<Value>>().len(), 100);

    let default_page: Vec<Value> = server
        .get("/api/users")
        .authorization_bearer(DEFAULT_API_TOKEN)
        .await
        .json();
    assert_eq!(default_page.len(), 20);
    assert_eq!(default_page[0]["firstName"], "User0");

    let tail: Vec<Value> = server
        .get("/api/users")
        .add_query_param("skip", 100)
        .add_query_param("take", 50)
        .authorization_bearer(DEFAULT_API_TOKEN)
        .await
        .json();
    assert_eq!(tail.len(), 5);
    assert_eq!(tail[0]["firstName"], "User100");
}
