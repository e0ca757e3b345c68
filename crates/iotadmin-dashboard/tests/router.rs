//! Router tests. Most run against an unreachable backend, where everything
//! must render from local state or degrade to an inline error; the expired
//! token tests use an in-process backend that rejects every token.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing;
use axum::{Json, Router};
use iotadmin_client::SessionManager;
use iotadmin_core::{IotAdminConfig, Session, UserAccount};
use iotadmin_dashboard::{AppState, create_router};
use serde_json::json;
use tower::ServiceExt;

fn config() -> IotAdminConfig {
    config_for("http://127.0.0.1:9/api")
}

fn config_for(base_url: &str) -> IotAdminConfig {
    let mut config = IotAdminConfig::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_secs = 2;
    config
}

async fn state(logged_in: bool) -> AppState {
    state_with(config(), logged_in).await
}

async fn state_with(config: IotAdminConfig, logged_in: bool) -> AppState {
    let sessions = SessionManager::in_memory();
    if logged_in {
        sessions
            .save(&Session {
                token: "tok".into(),
                username: "admin".into(),
                full_name: "Ada Admin".into(),
                email: "admin@example.com".into(),
                user_id: "1".into(),
            })
            .await
            .unwrap();
    }
    AppState::new(config, sessions).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("HX-Request", "true")
        .body(Body::empty())
        .unwrap()
}

async fn body(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn user(id: i64, name: &str, username: &str, email: &str) -> UserAccount {
    UserAccount {
        id,
        name: Some(name.into()),
        username: username.into(),
        email: email.into(),
        status: true,
        created_at: Some("2025-03-01T10:00:00".into()),
        last_login: None,
    }
}

#[tokio::test]
async fn unauthenticated_page_redirects_to_login() {
    let app = create_router(state(false).await);
    let response = app.oneshot(get("/reports?page=2")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/login?redirect=%2Freports%3Fpage%3D2"
    );
}

#[tokio::test]
async fn unauthenticated_fragment_gets_hx_redirect() {
    let app = create_router(state(false).await);
    let request = Request::builder()
        .uri("/dashboard/metrics")
        .header("HX-Request", "true")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get("HX-Redirect")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("/login?redirect=")
    );
}

#[tokio::test]
async fn public_pages_render() {
    let state = state(false).await;

    let response = create_router(state.clone()).oneshot(get("/login")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body(response).await.contains("Iniciar sesión"));

    let response = create_router(state.clone()).oneshot(get("/register")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = create_router(state).oneshot(get("/healthz")).await.unwrap();
    assert_eq!(body(response).await, "ok");
}

#[tokio::test]
async fn root_goes_to_dashboard() {
    let app = create_router(state(true).await);
    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/dashboard");
}

#[tokio::test]
async fn info_page_shows_user() {
    let app = create_router(state(true).await);
    let response = app.oneshot(get("/info")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body(response).await;
    assert!(html.contains("Ada Admin"));
    assert!(html.contains("Motor"));
}

#[tokio::test]
async fn user_search_filters_cached_list() {
    let state = state(true).await;
    state
        .cache_users(vec![
            user(1, "Pepito Pérez", "pepito", "pepito@example.com"),
            user(2, "Ana Gómez", "ana", "ana@example.com"),
            user(3, "Luis Díaz", "luis", "luis@example.com"),
        ])
        .await;

    let app = create_router(state.clone());
    let response = app.oneshot(get("/users/table?q=pepito%40")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body(response).await;
    assert_eq!(html.matches("data-user-row").count(), 1);
    assert!(html.contains("pepito@example.com"));

    let app = create_router(state);
    let html = body(app.oneshot(get("/users/table?q=")).await.unwrap()).await;
    assert_eq!(html.matches("data-user-row").count(), 3);
}

#[tokio::test]
async fn dashboard_survives_unreachable_backend() {
    let app = create_router(state(true).await);
    let response = app.oneshot(get("/dashboard")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body(response).await;
    assert!(html.contains("No se pudo conectar con el servidor"));
    assert!(html.contains(r#"hx-get="/dashboard/metrics""#));
}

#[tokio::test]
async fn control_page_shows_history_error() {
    let app = create_router(state(true).await);
    let html = body(app.oneshot(get("/control")).await.unwrap()).await;

    assert!(html.contains("Error al cargar el historial."));
    assert!(html.contains(r#"id="device-led1""#));
}

#[tokio::test]
async fn invalid_control_pair_keeps_card() {
    let state = state(true).await;

    let response = create_router(state.clone())
        .oneshot(post("/control/led1/left"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("HX-Trigger").is_none());
    let html = body(response).await;
    assert!(html.contains(r#"id="device-led1""#));
    assert!(html.contains("OFF"));
    assert!(html.contains("data-toast"));

    let response = create_router(state)
        .oneshot(post("/control/toaster/on"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_clears_session() {
    let state = state(true).await;
    let request = Request::builder()
        .method("POST")
        .uri("/logout")
        .body(Body::empty())
        .unwrap();
    let response = create_router(state.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    assert!(!state.sessions().is_authenticated().await);
}

/// Backend whose metrics endpoint rejects the stored token.
async fn expired_token_backend() -> String {
    async fn rejected() -> Response {
        (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Token expirado"}))).into_response()
    }
    let app = Router::new().route("/api/logs/summary", routing::get(rejected));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

#[tokio::test]
async fn backend_401_during_page_redirects_to_login() {
    let url = expired_token_backend().await;
    let state = state_with(config_for(&url), true).await;

    let response = create_router(state.clone()).oneshot(get("/dashboard")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    assert!(!state.sessions().is_authenticated().await);
}

#[tokio::test]
async fn backend_401_during_fragment_sets_hx_redirect() {
    let url = expired_token_backend().await;
    let state = state_with(config_for(&url), true).await;
    let request = Request::builder()
        .uri("/dashboard/metrics")
        .header("HX-Request", "true")
        .body(Body::empty())
        .unwrap();

    let response = create_router(state.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("HX-Redirect").unwrap(), "/login");
    assert!(!state.sessions().is_authenticated().await);
}
