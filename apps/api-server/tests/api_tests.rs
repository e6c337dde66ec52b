//! End-to-end HTTP tests against an in-memory SQLite database.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use actix_web::{App, HttpResponse, http::StatusCode, http::header, test, web};
use serde_json::{Value, json};
use uuid::Uuid;

use api_server::middleware::panic::CatchPanic;
use api_server::{AppConfig, AppState, build_app};
use board_core::ports::{AuthError, PasswordService, TokenService};
use board_infra::database::{DatabaseConfig, connect};
use board_infra::{JwtConfig, JwtTokenService};
use migration::{Migrator, MigratorTrait};

const SECRET: &str = "test-secret";

fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| {
        let value = match key {
            "DATABASE_URL" => "sqlite::memory:",
            "JWT_SECRET" => SECRET,
            "RUST_ENV" => "test",
            "ARGON2_MEMORY_KIB" => "1024",
            "ARGON2_ITERATIONS" => "1",
            "ARGON2_PARALLELISM" => "1",
            _ => return None,
        };
        Some(value.to_string())
    })
    .expect("test configuration is valid")
}

async fn test_state() -> web::Data<AppState> {
    let db = connect(&DatabaseConfig::sqlite_memory())
        .await
        .expect("sqlite connects");
    Migrator::up(&db, None).await.expect("migrations apply");

    web::Data::new(AppState::new(Arc::new(db), &test_config()).expect("state builds"))
}

/// Token signed with the server's secret but for an arbitrary subject or lifetime.
fn forged_token(user_id: Uuid, expiration_hours: i64) -> String {
    JwtTokenService::new(JwtConfig {
        secret: SECRET.to_string(),
        expiration_hours,
        ..JwtConfig::default()
    })
    .issue_token(user_id, "ghost")
    .expect("token signs")
}

macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

fn post_json(uri: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post().uri(uri).set_json(body)
}

fn with_token(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
}

fn register_body(username: &str, email: &str) -> Value {
    json!({ "username": username, "email": email, "password": "pw123456" })
}

fn login_body(email: &str, password: &str) -> Value {
    json!({ "email": email, "password": password })
}

#[actix_web::test]
async fn test_health_and_version() {
    let app = test::init_service(build_app(test_state().await, None)).await;

    let (status, body) = send!(app, test::TestRequest::get().uri("/health"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["environment"], "test");
    assert!(body["timestamp"].is_string());

    let (status, body) = send!(app, test::TestRequest::get().uri("/version"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["jwt_configured"], true);
    assert_eq!(body["api_key_present"], false);
}

#[actix_web::test]
async fn test_register_login_post_dashboard_scenario() {
    let app = test::init_service(build_app(test_state().await, None)).await;

    let (status, body) = send!(app, post_json("/api/register", register_body("alice", "a@x.com")));
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["user"].get("password").is_none());
    let alice_id = body["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = send!(app, post_json("/api/login", login_body("a@x.com", "pw123456")));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["id"], alice_id.as_str());
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send!(
        app,
        with_token(
            post_json("/api/posts", json!({ "title": "Hi", "content": "Hello" })),
            &token
        )
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Post created successfully");
    assert_eq!(body["post"]["title"], "Hi");
    assert_eq!(body["post"]["content"], "Hello");
    assert_eq!(body["post"]["user_id"], alice_id.as_str());

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/posts"));
    assert_eq!(status, StatusCode::OK);
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["username"], "alice");
    assert_eq!(posts[0]["title"], "Hi");

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/dashboard"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["totalUsers"], 1);
    assert_eq!(body["stats"]["totalPosts"], 1);
    let recent = body["stats"]["recentPosts"].as_array().unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0]["title"], "Hi");
    assert_eq!(recent[0]["username"], "alice");

    let (status, body) = send!(
        app,
        with_token(test::TestRequest::get().uri("/api/me"), &token)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "alice");
}

#[actix_web::test]
async fn test_duplicate_username_or_email_is_rejected() {
    let app = test::init_service(build_app(test_state().await, None)).await;

    let (status, _) = send!(app, post_json("/api/register", register_body("alice", "a@x.com")));
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send!(app, post_json("/api/register", register_body("alice2", "a@x.com")));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists");
    assert_eq!(body["status"], 400);

    let (status, body) = send!(app, post_json("/api/register", register_body("alice", "b@x.com")));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists");

    let (_, body) = send!(app, test::TestRequest::get().uri("/api/dashboard"));
    assert_eq!(body["stats"]["totalUsers"], 1);
}

#[actix_web::test]
async fn test_missing_fields_are_named() {
    let app = test::init_service(build_app(test_state().await, None)).await;

    let (status, body) = send!(app, post_json("/api/register", json!({ "username": "test" })));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields: email, password");

    let (status, body) = send!(
        app,
        post_json(
            "/api/register",
            json!({ "username": "  ", "email": "a@x.com", "password": "pw123456" })
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields: username");

    let (status, body) = send!(app, post_json("/api/login", json!({})));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields: email, password");

    let (_, body) = send!(app, test::TestRequest::get().uri("/api/dashboard"));
    assert_eq!(body["stats"]["totalUsers"], 0);
}

#[actix_web::test]
async fn test_overlong_username_is_rejected() {
    let app = test::init_service(build_app(test_state().await, None)).await;

    let (status, body) = send!(
        app,
        post_json("/api/register", register_body(&"a".repeat(51), "a@x.com"))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "username must be at most 50 characters");
}

#[actix_web::test]
async fn test_bad_credentials_are_indistinguishable() {
    let app = test::init_service(build_app(test_state().await, None)).await;
    send!(app, post_json("/api/register", register_body("alice", "a@x.com")));

    let (wrong_status, wrong_body) =
        send!(app, post_json("/api/login", login_body("a@x.com", "nope")));
    let (unknown_status, unknown_body) =
        send!(app, post_json("/api/login", login_body("nobody@x.com", "pw123456")));

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["message"], "Invalid credentials");
}

/// Counts verifications while delegating to the real hasher.
struct CountingPasswords {
    inner: Arc<dyn PasswordService>,
    verifications: Arc<AtomicUsize>,
}

impl PasswordService for CountingPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        self.inner.hash(password)
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(password, hash)
    }
}

#[actix_web::test]
async fn test_unknown_email_still_runs_a_password_check() {
    let verifications = Arc::new(AtomicUsize::new(0));
    let mut state = AppState::clone(test_state().await.get_ref());
    state.passwords = Arc::new(CountingPasswords {
        inner: Arc::clone(&state.passwords),
        verifications: Arc::clone(&verifications),
    });
    let app = test::init_service(build_app(web::Data::new(state), None)).await;

    let (status, _) = send!(app, post_json("/api/login", login_body("nobody@x.com", "pw123456")));

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(verifications.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn test_protected_routes_require_a_valid_token() {
    let app = test::init_service(build_app(test_state().await, None)).await;

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/users"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access token required");

    let (status, body) = send!(
        app,
        with_token(test::TestRequest::get().uri("/api/users"), "not-a-jwt")
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Invalid token");

    let expired = forged_token(Uuid::new_v4(), -1);
    let (status, body) = send!(
        app,
        with_token(test::TestRequest::get().uri("/api/users"), &expired)
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Invalid token");

    // No token is checked before the body.
    let (status, _) = send!(app, post_json("/api/posts", json!({ "title": "Hi" })));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = send!(app, test::TestRequest::get().uri("/api/posts"));
    assert!(body["posts"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_token_for_missing_user_cannot_post() {
    let app = test::init_service(build_app(test_state().await, None)).await;
    let token = forged_token(Uuid::new_v4(), 24);

    let (status, body) = send!(
        app,
        with_token(
            post_json("/api/posts", json!({ "title": "Hi", "content": "Hello" })),
            &token
        )
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Invalid token");

    let (status, _) = send!(
        app,
        with_token(test::TestRequest::get().uri("/api/me"), &token)
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = send!(app, test::TestRequest::get().uri("/api/dashboard"));
    assert_eq!(body["stats"]["totalPosts"], 0);
}

#[actix_web::test]
async fn test_post_author_comes_from_the_token() {
    let app = test::init_service(build_app(test_state().await, None)).await;

    send!(app, post_json("/api/register", register_body("alice", "a@x.com")));
    let (_, bob) = send!(app, post_json("/api/register", register_body("bob", "b@x.com")));
    let (_, login) = send!(app, post_json("/api/login", login_body("a@x.com", "pw123456")));
    let token = login["token"].as_str().unwrap();

    let (status, body) = send!(
        app,
        with_token(
            post_json(
                "/api/posts",
                json!({ "title": "Hi", "content": "Hello", "user_id": bob["user"]["id"] })
            ),
            token
        )
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["post"]["user_id"], login["user"]["id"]);
    assert_ne!(body["post"]["user_id"], bob["user"]["id"]);

    let (status, body) = send!(
        app,
        with_token(post_json("/api/posts", json!({ "title": "Hi" })), token)
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields: content");
}

#[actix_web::test]
async fn test_incomplete_post_is_not_stored() {
    let app = test::init_service(build_app(test_state().await, None)).await;

    send!(app, post_json("/api/register", register_body("alice", "a@x.com")));
    let (_, login) = send!(app, post_json("/api/login", login_body("a@x.com", "pw123456")));
    let token = login["token"].as_str().unwrap();

    let (status, _) = send!(
        app,
        with_token(post_json("/api/posts", json!({ "title": "Kept", "content": "x" })), token)
    );
    assert_eq!(status, StatusCode::CREATED);

    for (body, missing) in [
        (json!({ "content": "no title" }), "title"),
        (json!({ "title": "no content" }), "content"),
        (json!({ "title": "  ", "content": "" }), "title, content"),
    ] {
        let (status, body) = send!(app, with_token(post_json("/api/posts", body), token));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], format!("Missing required fields: {missing}"));
    }

    let (_, body) = send!(app, test::TestRequest::get().uri("/api/dashboard"));
    assert_eq!(body["stats"]["totalPosts"], 1);
    let (_, body) = send!(app, test::TestRequest::get().uri("/api/posts"));
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_users_listed_newest_first() {
    let app = test::init_service(build_app(test_state().await, None)).await;

    for (name, email) in [("alice", "a@x.com"), ("bob", "b@x.com"), ("carol", "c@x.com")] {
        send!(app, post_json("/api/register", register_body(name, email)));
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let (_, login) = send!(app, post_json("/api/login", login_body("a@x.com", "pw123456")));
    let token = login["token"].as_str().unwrap();

    let (status, body) = send!(
        app,
        with_token(test::TestRequest::get().uri("/api/users"), token)
    );
    assert_eq!(status, StatusCode::OK);

    let users = body["users"].as_array().unwrap();
    let names: Vec<&str> = users
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["carol", "bob", "alice"]);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));
}

#[actix_web::test]
async fn test_dashboard_shows_five_most_recent_posts() {
    let app = test::init_service(build_app(test_state().await, None)).await;

    send!(app, post_json("/api/register", register_body("alice", "a@x.com")));
    let (_, login) = send!(app, post_json("/api/login", login_body("a@x.com", "pw123456")));
    let token = login["token"].as_str().unwrap();

    for i in 1..=7 {
        let (status, _) = send!(
            app,
            with_token(
                post_json("/api/posts", json!({ "title": format!("Post {i}"), "content": "x" })),
                token
            )
        );
        assert_eq!(status, StatusCode::CREATED);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let (_, body) = send!(app, test::TestRequest::get().uri("/api/dashboard"));
    assert_eq!(body["stats"]["totalPosts"], 7);

    let titles: Vec<&str> = body["stats"]["recentPosts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Post 7", "Post 6", "Post 5", "Post 4", "Post 3"]);

    let (_, body) = send!(app, test::TestRequest::get().uri("/api/posts"));
    assert_eq!(body["posts"].as_array().unwrap().len(), 7);
    assert_eq!(body["posts"][0]["title"], "Post 7");
}

#[actix_web::test]
async fn test_unknown_routes_return_not_found() {
    let app = test::init_service(build_app(test_state().await, None)).await;

    for req in [
        test::TestRequest::get().uri("/nope"),
        test::TestRequest::get().uri("/api/nope"),
        test::TestRequest::delete().uri("/api/posts"),
        test::TestRequest::get().uri("/api/login"),
    ] {
        let (status, body) = send!(app, req);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Route not found");
        assert_eq!(body["status"], 404);
    }
}

#[actix_web::test]
async fn test_malformed_json_is_a_bad_request() {
    let app = test::init_service(build_app(test_state().await, None)).await;

    let req = test::TestRequest::post()
        .uri("/api/register")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"username\": ");
    let (status, body) = send!(app, req);

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[actix_web::test]
async fn test_preflight_and_response_headers() {
    let app = test::init_service(build_app(test_state().await, None)).await;

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/posts")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let headers = resp.headers();
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert!(
        headers
            .get("access-control-allow-headers")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("Authorization")
    );

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    let headers = resp.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert!(headers.contains_key("x-frame-options"));
    assert!(headers.contains_key("strict-transport-security"));
    assert!(headers.contains_key("x-request-id"));
}

async fn explode() -> HttpResponse {
    panic!("handler exploded")
}

#[actix_web::test]
async fn test_panicking_handler_becomes_internal_error() {
    let app = test::init_service(
        App::new()
            .wrap(CatchPanic)
            .route("/boom", web::get().to(explode)),
    )
    .await;

    let (status, body) = send!(app, test::TestRequest::get().uri("/boom"));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
}

#[cfg(feature = "rate-limit")]
#[actix_web::test]
async fn test_rate_limit_rejects_excess_requests() {
    use board_core::ports::RateLimiter;
    use board_infra::{InMemoryRateLimiter, RateLimitConfig};

    let limiter: Arc<dyn RateLimiter> = Arc::new(
        InMemoryRateLimiter::new(RateLimitConfig {
            max_requests: 2,
            window: Duration::from_secs(60),
        })
        .unwrap(),
    );
    let app = test::init_service(build_app(test_state().await, Some(limiter))).await;

    for _ in 0..2 {
        let (status, _) = send!(app, test::TestRequest::get().uri("/version"));
        assert_eq!(status, StatusCode::OK);
    }

    let resp = test::call_service(&app, test::TestRequest::get().uri("/version").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key("retry-after"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 429);
}
