//! Integration tests against an in-process fake of the device backend.
//!
//! Run with: cargo test --package iotadmin-client --test backend

use axum::extract::{Form, Json, Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use iotadmin_client::{
    ApiClient, ApiError, DeviceController, LoginError, MemoryStorage, QueuedEffects, Route,
    SessionManager, SessionStorage,
};
use iotadmin_core::action::{ActionFilter, parse_date};
use iotadmin_core::config::api::ApiConfig;
use iotadmin_core::device::{ActionRequest, DeviceBoard, DeviceCommand, DeviceId};
use iotadmin_core::session::{SESSION_KEYS, Session};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const TOKEN: &str = "tok-123";

#[derive(Default)]
struct Backend {
    devices: Mutex<BTreeMap<u32, Value>>,
    action_queries: Mutex<Vec<String>>,
    pdf_queries: Mutex<Vec<String>>,
    /// Delay applied to `/devices/status` after the snapshot is taken.
    status_delay: Mutex<Option<Duration>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Token inválido"}))).into_response()
}

async fn login(Form(form): Form<HashMap<String, String>>) -> Response {
    match (form.get("username").map(String::as_str), form.get("password").map(String::as_str)) {
        (Some("admin"), Some("secret")) => Json(json!({
            "success": true,
            "access_token": TOKEN,
            "user": {"id": 1, "username": "admin", "name": "Admin Root", "email": "admin@example.com"}
        }))
        .into_response(),
        (Some("broken"), _) => Json(json!({"success": true})).into_response(),
        _ => unauthorized(),
    }
}

async fn device_status(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let names = ["LED1", "LED2", "Motor"];
    let list: Vec<Value> = backend
        .devices
        .lock()
        .unwrap()
        .iter()
        .map(|(id, status)| json!({"id": id, "name": names[(*id - 1) as usize], "status": status}))
        .collect();
    let delay = *backend.status_delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    Json(list).into_response()
}

async fn send_action(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(request): Json<ActionRequest>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let status = match request.value.as_str() {
        "ON" => json!(true),
        "OFF" => json!(false),
        other => json!(other),
    };
    backend.devices.lock().unwrap().insert(request.id_device, status);
    (StatusCode::CREATED, Json(json!({"message": "ok"}))).into_response()
}

async fn list_actions(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    backend.action_queries.lock().unwrap().push(query.unwrap_or_default());
    Json(json!([
        {"device": "LED1", "action": "LED_ON", "username": "admin", "timestamp": "2025-01-15T10:00:00Z"}
    ]))
    .into_response()
}

async fn export_pdf(State(backend): State<Arc<Backend>>, RawQuery(query): RawQuery) -> Response {
    backend.pdf_queries.lock().unwrap().push(query.unwrap_or_default());
    ([(header::CONTENT_TYPE, "application/pdf")], b"%PDF-1.4 fake".to_vec()).into_response()
}

async fn forbidden_user(Path(_id): Path<i64>) -> Response {
    (StatusCode::FORBIDDEN, Json(json!({"detail": "Solo administradores"}))).into_response()
}

async fn broken_summary() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "db down"}))).into_response()
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["username"] == "taken" {
        return (StatusCode::BAD_REQUEST, Json(json!({"detail": "El usuario ya existe"}))).into_response();
    }
    Json(json!({"message": "Usuario creado"})).into_response()
}

async fn spawn_backend() -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend::default());
    {
        let mut devices = backend.devices.lock().unwrap();
        devices.insert(1, json!(true));
        devices.insert(2, json!(true));
        devices.insert(3, json!("LEFT"));
    }

    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/devices/status", get(device_status))
        .route("/actions", get(list_actions).post(send_action))
        .route("/users/{id}", get(forbidden_user))
        .route("/logs/summary", get(broken_summary))
        .route("/reports/export-logs-pdf", get(export_pdf))
        .with_state(backend.clone());
    let app = Router::new().nest("/api", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), backend)
}

struct Harness {
    client: ApiClient,
    storage: Arc<MemoryStorage>,
    effects: Arc<QueuedEffects>,
}

fn harness(base_url: &str) -> Harness {
    let storage = Arc::new(MemoryStorage::default());
    let effects = Arc::new(QueuedEffects::new());
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 2,
    };
    let client = ApiClient::new(&config, SessionManager::new(storage.clone()), effects.clone()).unwrap();
    Harness {
        client,
        storage,
        effects,
    }
}

async fn logged_in(base_url: &str) -> Harness {
    let h = harness(base_url);
    h.client.auth().login("admin", "secret").await.unwrap();
    h
}

#[tokio::test]
async fn test_login_populates_exactly_five_keys() {
    let (url, _backend) = spawn_backend().await;
    let h = harness(&url);

    let session = h.client.auth().login("admin", "secret").await.unwrap();
    assert_eq!(session.token, TOKEN);
    assert_eq!(session.full_name, "Admin Root");

    let mut keys = h.storage.keys();
    keys.sort();
    let mut expected: Vec<String> = SESSION_KEYS.iter().map(|k| k.to_string()).collect();
    expected.sort();
    assert_eq!(keys, expected);
    assert_eq!(h.storage.get("userId").await.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_login_with_bad_credentials_stores_nothing() {
    let (url, _backend) = spawn_backend().await;
    let h = harness(&url);

    let err = h.client.auth().login("admin", "wrong").await.unwrap_err();
    assert_eq!(err, LoginError::BadCredentials);
    assert!(err.to_string().contains("incorrectos"));
    assert!(h.storage.keys().is_empty());
    // Login failures never trigger the session-expired redirect.
    assert_eq!(h.effects.take_navigation(), None);
}

#[tokio::test]
async fn test_login_validation_and_malformed_success() {
    let (url, _backend) = spawn_backend().await;
    let h = harness(&url);

    assert_eq!(h.client.auth().login("  ", "x").await.unwrap_err(), LoginError::MissingFields);
    assert_eq!(
        h.client.auth().login("broken", "x").await.unwrap_err(),
        LoginError::InvalidResponse
    );
    assert!(h.storage.keys().is_empty());
}

#[tokio::test]
async fn test_login_unreachable_backend() {
    // Nothing listens on port 9 in the test environment.
    let h = harness("http://127.0.0.1:9/api");
    assert_eq!(h.client.auth().login("admin", "secret").await.unwrap_err(), LoginError::Unreachable);
}

#[tokio::test]
async fn test_any_401_wipes_session_and_redirects() {
    let (url, _backend) = spawn_backend().await;
    let h = harness(&url);
    let stale = Session {
        token: "expired".into(),
        username: "admin".into(),
        full_name: "Admin Root".into(),
        email: "admin@example.com".into(),
        user_id: "1".into(),
    };
    h.client.sessions().save(&stale).await.unwrap();

    let err = h.client.devices().status().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(h.storage.keys().is_empty());
    assert_eq!(h.effects.take_navigation(), Some(Route::Login));
    assert!(!h.client.require_auth().await);
}

#[tokio::test]
async fn test_require_auth_tracks_token_presence() {
    let (url, _backend) = spawn_backend().await;
    let h = harness(&url);
    assert!(!h.client.require_auth().await);
    assert_eq!(h.effects.take_navigation(), Some(Route::Login));

    h.client.auth().login("admin", "secret").await.unwrap();
    assert!(h.client.require_auth().await);
    assert_eq!(h.effects.take_navigation(), None);

    h.client.logout().await.unwrap();
    assert!(!h.client.is_authenticated().await);
    assert_eq!(h.effects.take_navigation(), Some(Route::Login));
}

#[tokio::test]
async fn test_led_off_then_status_reads_off() {
    let (url, _backend) = spawn_backend().await;
    let h = logged_in(&url).await;
    let controller = DeviceController::new();

    let state = controller.send(&h.client, DeviceId::Led1, DeviceCommand::TurnOff).await.unwrap();
    assert_eq!(state.label(), "OFF");

    let mut board = DeviceBoard::default();
    board.merge_status(&h.client.devices().status().await.unwrap());
    assert_eq!(board.state(DeviceId::Led1).label(), "OFF");
}

#[tokio::test]
async fn test_motor_stop_then_status_reads_detenido() {
    let (url, _backend) = spawn_backend().await;
    let h = logged_in(&url).await;
    let controller = DeviceController::new();

    controller.refresh(&h.client).await.unwrap();
    assert_eq!(controller.snapshot().await.state(DeviceId::Motor).label(), "Giro Izquierda");

    controller.send(&h.client, DeviceId::Motor, DeviceCommand::Stop).await.unwrap();
    assert_eq!(controller.refresh(&h.client).await.unwrap(), Some(3));
    assert_eq!(controller.snapshot().await.state(DeviceId::Motor).label(), "Detenido");
}

#[tokio::test]
async fn test_command_supersedes_in_flight_poll() {
    let (url, backend) = spawn_backend().await;
    let h = logged_in(&url).await;
    let controller = DeviceController::new();

    controller.refresh(&h.client).await.unwrap();
    assert_eq!(controller.snapshot().await.state(DeviceId::Led1).label(), "ON");

    // The poll snapshots LED1 as ON, then answers late.
    *backend.status_delay.lock().unwrap() = Some(Duration::from_millis(500));
    let poll = controller.refresh(&h.client);
    let command = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        controller.send(&h.client, DeviceId::Led1, DeviceCommand::TurnOff).await
    };
    let (polled, sent) = tokio::join!(poll, command);

    assert_eq!(polled.unwrap(), None);
    assert_eq!(sent.unwrap().label(), "OFF");
    assert_eq!(controller.snapshot().await.state(DeviceId::Led1).label(), "OFF");
}

#[tokio::test]
async fn test_invalid_pair_never_reaches_backend() {
    let (url, backend) = spawn_backend().await;
    let h = logged_in(&url).await;

    let err = h.client.devices().send_action(DeviceId::Motor, DeviceCommand::TurnOn).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(backend.devices.lock().unwrap().get(&3), Some(&json!("LEFT")));
}

#[tokio::test]
async fn test_report_date_range_is_sent_inclusive() {
    let (url, backend) = spawn_backend().await;
    let h = logged_in(&url).await;
    let filter = ActionFilter {
        start_date: parse_date(Some("2025-01-01")).unwrap(),
        end_date: parse_date(Some("2025-01-31")).unwrap(),
        ..ActionFilter::default()
    };

    let rows = h.client.reports().events(&filter).await.unwrap();
    assert_eq!(rows.len(), 1);

    let queries = backend.action_queries.lock().unwrap().clone();
    let last = queries.last().unwrap();
    assert!(last.contains("start_date=2025-01-01"));
    assert!(last.contains("end_date=2025-01-31"));
    assert!(last.contains("limit=10"));
    assert!(last.contains("skip=0"));
}

#[tokio::test]
async fn test_pdf_export_returns_bytes_without_paging() {
    let (url, backend) = spawn_backend().await;
    let h = logged_in(&url).await;
    let filter = ActionFilter {
        device: Some(DeviceId::Motor),
        ..ActionFilter::default()
    };

    let pdf = h.client.reports().export_pdf(&filter).await.unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    let query = backend.pdf_queries.lock().unwrap().last().cloned().unwrap();
    assert_eq!(query, "device_id=3");
}

#[tokio::test]
async fn test_403_and_500_raise_alerts() {
    let (url, _backend) = spawn_backend().await;
    let h = logged_in(&url).await;

    let err = h.client.users().get(2).await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden { ref message } if message == "Solo administradores"));

    let err = h.client.dashboard().summary().await.unwrap_err();
    assert_eq!(err.status(), Some(500));

    assert_eq!(
        h.effects.drain_alerts(),
        vec![
            "No tienes permisos para realizar esta acción.".to_string(),
            "Error interno del servidor. Intente más tarde.".to_string(),
        ]
    );
    // Neither wipes the session.
    assert!(h.client.is_authenticated().await);
}

#[tokio::test]
async fn test_register_surfaces_backend_messages() {
    let (url, _backend) = spawn_backend().await;
    let h = harness(&url);
    let mut form = iotadmin_core::UserForm {
        full_name: "Nuevo Usuario".into(),
        username: "nuevo".into(),
        email: "nuevo@example.com".into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
        active: None,
    };
    assert_eq!(h.client.auth().register(&form).await.unwrap(), "Usuario creado");

    form.username = "taken".into();
    let err = h.client.auth().register(&form).await.unwrap_err();
    assert_eq!(err.user_message(), "El usuario ya existe");
}
