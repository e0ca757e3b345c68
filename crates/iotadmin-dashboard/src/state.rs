//! Dashboard application state.

use iotadmin_client::{ApiClient, DeviceController, LogEffects, QueuedEffects, SessionManager};
use iotadmin_core::{IotAdminConfig, UserAccount};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::DashboardError;

/// Shared application state for the dashboard.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: IotAdminConfig,
    client: ApiClient,
    /// Same session as `client`, but its effects only log. Background work
    /// must not consume redirects and alerts meant for a page request.
    background: ApiClient,
    /// Navigation and alerts raised by the client's interceptors.
    effects: Arc<QueuedEffects>,
    devices: DeviceController,
    /// Users from the last `/users` fetch; the search box filters this.
    users: RwLock<Vec<UserAccount>>,
}

impl AppState {
    /// Build the state around an existing session store.
    pub fn new(config: IotAdminConfig, sessions: SessionManager) -> Result<Self, DashboardError> {
        let effects = Arc::new(QueuedEffects::new());
        let background = ApiClient::new(&config.api, sessions.clone(), Arc::new(LogEffects))?;
        let client = ApiClient::new(&config.api, sessions, effects.clone())?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                client,
                background,
                effects,
                devices: DeviceController::new(),
                users: RwLock::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &IotAdminConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    /// Client for the background status poller.
    pub fn background_client(&self) -> &ApiClient {
        &self.inner.background
    }

    pub fn sessions(&self) -> &SessionManager {
        self.inner.client.sessions()
    }

    pub fn effects(&self) -> &QueuedEffects {
        &self.inner.effects
    }

    pub fn devices(&self) -> &DeviceController {
        &self.inner.devices
    }

    pub async fn cached_users(&self) -> Vec<UserAccount> {
        self.inner.users.read().await.clone()
    }

    pub async fn cache_users(&self, users: Vec<UserAccount>) {
        *self.inner.users.write().await = users;
    }
}
