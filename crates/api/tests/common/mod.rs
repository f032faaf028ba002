//! Shared test harness: app construction mirroring `main.rs`, a stub
//! publisher, request helpers, and user fixtures.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use cutroom_core::types::DbId;
use cutroom_db::models::user::NewUser;
use cutroom_db::repositories::UserRepo;

use cutroom_api::auth::jwt::{generate_access_token, JwtConfig};
use cutroom_api::auth::password::hash_password;
use cutroom_api::config::{ServerConfig, YouTubeConfig};
use cutroom_api::notifications::NotificationRelay;
use cutroom_api::publish::{
    PublishDispatcher, PublishError, PublishRequest, VideoPublisher,
};
use cutroom_api::routes;
use cutroom_api::state::AppState;
use cutroom_api::ws::WsManager;

/// Build a test `ServerConfig` with safe defaults and no environment reads.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        youtube: YouTubeConfig::default(),
    }
}

// ---------------------------------------------------------------------------
// Stub publisher
// ---------------------------------------------------------------------------

/// Publisher stub that records every call and returns a canned outcome.
pub struct StubPublisher {
    calls: AtomicUsize,
    /// `Ok(external id)` or a failure message.
    outcome: Result<String, String>,
}

impl StubPublisher {
    pub fn succeeding(external_id: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            outcome: Ok(external_id.to_string()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            outcome: Err(message.to_string()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoPublisher for StubPublisher {
    async fn publish(&self, _request: &PublishRequest) -> Result<String, PublishError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(id) => Ok(id.clone()),
            Err(message) => Err(PublishError::MalformedResponse(message.clone())),
        }
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build the full application router with all middleware, a stub publisher
/// that always succeeds, and a running notification relay.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_publisher(pool, StubPublisher::succeeding("yt-test")).0
}

/// Same as [`build_test_app`] but with an injected publisher; also returns
/// the dispatcher so tests can drive dispatches synchronously.
pub fn build_test_app_with_publisher(
    pool: PgPool,
    publisher: Arc<StubPublisher>,
) -> (Router, Arc<PublishDispatcher>) {
    let config = test_config();
    let ws_manager = Arc::new(WsManager::new());
    let event_bus = Arc::new(cutroom_events::EventBus::default());

    let relay = NotificationRelay::new(Arc::clone(&ws_manager));
    tokio::spawn(relay.run(event_bus.subscribe()));

    let dispatcher = Arc::new(PublishDispatcher::new(
        pool.clone(),
        publisher,
        Arc::clone(&event_bus),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config),
        ws_manager,
        event_bus,
        dispatcher: Arc::clone(&dispatcher),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    (app, dispatcher)
}

// ---------------------------------------------------------------------------
// User fixtures
// ---------------------------------------------------------------------------

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Create a user directly in the database and return its id.
pub async fn create_user(pool: &PgPool, email: &str, role: &str, creator_id: Option<DbId>) -> DbId {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    let user = UserRepo::create(
        pool,
        &NewUser {
            email: email.to_string(),
            password_hash: Some(hashed),
            role: role.to_string(),
            creator_id,
        },
    )
    .await
    .expect("user creation should succeed");
    user.id
}

/// Mint a valid access token for the given user without going through the
/// login endpoint.
pub fn token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt)
        .expect("token generation should succeed")
}

/// Give a creator stored publish credentials.
pub async fn connect_publish_credentials(pool: &PgPool, user_id: DbId) {
    UserRepo::update_publish_credentials(pool, user_id, "access-tok", "refresh-tok")
        .await
        .expect("credential update should succeed");
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}
