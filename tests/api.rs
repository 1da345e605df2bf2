//! End-to-end API tests driving the real route table against an isolated
//! file-backed store. Run with: cargo test --test api

use actix_web::{test, web, App};
use std::sync::Arc;
use std::time::SystemTime;
use tempfile::TempDir;

use studyhive::ai::AiService;
use studyhive::config::{AppConfig, AuthConfig, ServerConfig, StorageConfig};
use studyhive::handlers::AppState;
use studyhive::routes::configure_routes;
use studyhive::store::Store;

fn test_state(dir: &TempDir) -> web::Data<AppState> {
    let config = AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        storage: StorageConfig {
            data_dir: dir.path().to_path_buf(),
        },
        auth: Some(AuthConfig {
            jwt_secret: Some("test-secret-key-for-api-tests".to_string()),
        }),
        api_keys: None,
    };

    let store = Arc::new(Store::open(dir.path()).expect("store should open"));
    let ai = Arc::new(AiService::from_config(&config));

    web::Data::new(AppState {
        store,
        ai,
        config: Arc::new(config),
        start_time: SystemTime::now(),
    })
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(configure_routes),
        )
        .await
    };
}

// Registers a user and yields their token
macro_rules! register_user {
    ($app:expr, $username:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({
                "username": $username,
                "email": format!("{}@example.com", $username),
                "password": "secret123",
            }))
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), 201, "registration should succeed");

        let body: serde_json::Value = test::read_body_json(resp).await;
        body["token"].as_str().expect("token in response").to_string()
    }};
}

#[actix_rt::test]
async fn test_health_is_public() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_rt::test]
async fn test_protected_endpoints_require_token() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/stats").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::get()
        .uri("/api/search?q=python")
        .insert_header(("Authorization", "Bearer not-a-real-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_rt::test]
async fn test_registration_conflicts_and_login() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);

    register_user!(&app, "alice");

    // Same username again
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(serde_json::json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "secret123",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    // Wrong password
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({ "username": "alice", "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    // Correct login, by email
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({ "username": "alice@example.com", "password": "secret123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["username"], "alice");
}

#[actix_rt::test]
async fn test_add_search_and_empty_query() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);
    let token = register_user!(&app, "alice");
    let auth = ("Authorization", format!("Bearer {token}"));

    let req = test::TestRequest::post()
        .uri("/api/qa")
        .insert_header(auth.clone())
        .set_json(serde_json::json!({
            "question": "What is Python?",
            "answer": "A language",
            "category": "programming",
            "tags": ["python", "language"],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let req = test::TestRequest::get()
        .uri("/api/search?q=python")
        .insert_header(auth.clone())
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["question"], "What is Python?");

    let req = test::TestRequest::get()
        .uri("/api/search?q=java")
        .insert_header(auth.clone())
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 0);

    // Missing query parameter is rejected at the boundary
    let req = test::TestRequest::get()
        .uri("/api/search")
        .insert_header(auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // Empty question is rejected
    let req = test::TestRequest::post()
        .uri("/api/qa")
        .insert_header(auth)
        .set_json(serde_json::json!({ "question": "", "answer": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_reply_flow_with_helpful_votes_and_stats() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);
    let alice_token = register_user!(&app, "alice");
    let bob_token = register_user!(&app, "bob");
    let alice_auth = ("Authorization", format!("Bearer {alice_token}"));
    let bob_auth = ("Authorization", format!("Bearer {bob_token}"));

    let req = test::TestRequest::post()
        .uri("/api/qa")
        .insert_header(alice_auth.clone())
        .set_json(serde_json::json!({
            "question": "What is Python?",
            "answer": "A language",
            "category": "programming",
            "tags": ["python"],
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let qa_id = body["id"].as_str().unwrap().to_string();

    // Reply to an unknown Q&A is a 404
    let req = test::TestRequest::post()
        .uri("/api/replies")
        .insert_header(alice_auth.clone())
        .set_json(serde_json::json!({ "qa_id": "missing", "content": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::post()
        .uri("/api/replies")
        .insert_header(alice_auth.clone())
        .set_json(serde_json::json!({ "qa_id": qa_id, "content": "Great question" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["reply"]["helpful_votes"], 0);
    let reply_id = body["reply"]["id"].as_str().unwrap().to_string();

    // Bob marks the reply helpful, then withdraws the vote
    let req = test::TestRequest::post()
        .uri(&format!("/api/replies/{reply_id}/helpful"))
        .insert_header(bob_auth.clone())
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["helpful_votes"], 1);
    assert_eq!(body["is_helpful"], true);

    let req = test::TestRequest::post()
        .uri(&format!("/api/replies/{reply_id}/helpful"))
        .insert_header(bob_auth.clone())
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["helpful_votes"], 0);
    assert_eq!(body["is_helpful"], false);

    // Only the author may edit a reply
    let req = test::TestRequest::put()
        .uri(&format!("/api/replies/{reply_id}"))
        .insert_header(bob_auth.clone())
        .set_json(serde_json::json!({ "content": "hijacked" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let req = test::TestRequest::get()
        .uri("/api/stats")
        .insert_header(alice_auth.clone())
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_qa"], 1);
    assert_eq!(body["category_counts"]["programming"], 1);
    assert_eq!(body["reply_stats"]["total_replies"], 1);
    assert_eq!(body["user_stats"]["total_users"], 2);

    // The search view reflects the reply count
    let req = test::TestRequest::get()
        .uri("/api/search?q=python")
        .insert_header(alice_auth)
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["results"][0]["reply_count"], 1);
    assert_eq!(body["results"][0]["replies"][0]["content"], "Great question");
}

#[actix_rt::test]
async fn test_ai_ask_falls_back_without_provider_keys() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);
    let token = register_user!(&app, "alice");
    let auth = ("Authorization", format!("Bearer {token}"));

    let req = test::TestRequest::post()
        .uri("/api/ai/ask")
        .insert_header(auth.clone())
        .set_json(serde_json::json!({ "question": "파이썬 알고리즘이 뭐예요?" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["category"], "프로그래밍");
    assert_eq!(body["auto_classified"], true);
    assert!(body["answer"].as_str().unwrap().len() > 0);
    assert_eq!(body["tools"]["code_editor"], true);

    // Save the AI answer; with no explicit tags it carries the AI tag
    let req = test::TestRequest::post()
        .uri("/api/ai/save")
        .insert_header(auth.clone())
        .set_json(serde_json::json!({
            "question": "파이썬 알고리즘이 뭐예요?",
            "answer": body["answer"],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let saved: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(saved["category"], "프로그래밍");
    assert_eq!(saved["added_by"], "AI + alice");

    let req = test::TestRequest::get()
        .uri("/api/all")
        .insert_header(auth)
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["qa_pairs"][0]["tags"][0], "AI생성");
}
