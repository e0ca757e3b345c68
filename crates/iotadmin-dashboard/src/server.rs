//! Dashboard server implementation.

use crate::error::DashboardError;
use crate::routes;
use crate::state::AppState;
use iotadmin_client::SessionManager;
use iotadmin_core::IotAdminConfig;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// The dashboard server.
pub struct DashboardServer {
    state: AppState,
}

impl DashboardServer {
    /// Create a new dashboard server with the given configuration.
    pub fn new(config: IotAdminConfig, sessions: SessionManager) -> Result<Self, DashboardError> {
        Ok(Self {
            state: AppState::new(config, sessions)?,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Start the dashboard server and run until ctrl-c.
    pub async fn run(&self) -> Result<(), DashboardError> {
        let addr = self.state.config().dashboard.bind_addr();
        tracing::info!(
            address = %addr,
            backend = %self.state.client().base_url(),
            "Starting iotadmin dashboard"
        );

        let app = routes::create_router(self.state.clone());

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| DashboardError::StartupFailed(e.to_string()))?;

        let poller = spawn_status_poller(self.state.clone());

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DashboardError::StartupFailed(e.to_string()));

        poller.abort();
        tracing::info!("dashboard stopped");
        result
    }

    /// Get the configured listen port.
    pub fn listen_port(&self) -> u16 {
        self.state.config().dashboard.port
    }
}

/// Keep the device board in sync with the backend while someone is logged
/// in. A command sent mid-cycle invalidates the cycle, so a stale status
/// never overwrites it.
fn spawn_status_poller(state: AppState) -> JoinHandle<()> {
    let period = state.config().dashboard.control_poll();
    tokio::spawn(async move {
        let client = state.background_client();
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if !client.is_authenticated().await {
                continue;
            }
            // Failures are logged by the background client's effects; the
            // page queue is left for the request that owns it.
            match state.devices().refresh(client).await {
                Ok(Some(merged)) => tracing::trace!(merged, "background status poll"),
                Ok(None) => {}
                Err(e) => tracing::debug!(error = %e, "background status poll failed"),
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
    tracing::info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_creation() {
        let server = DashboardServer::new(IotAdminConfig::default(), SessionManager::in_memory()).unwrap();
        assert_eq!(server.listen_port(), 8080);
    }

    #[tokio::test]
    async fn poller_leaves_page_effects_alone() {
        use iotadmin_client::{Route, UiEffects};
        use iotadmin_core::Session;

        let mut config = IotAdminConfig::default();
        config.api.base_url = "http://127.0.0.1:9/api".to_string();
        config.api.timeout_secs = 1;
        config.dashboard.control_poll_secs = 1;
        let sessions = SessionManager::in_memory();
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
        let state = AppState::new(config, sessions).unwrap();

        // What a handler hitting a 401 and a 500 leaves behind.
        state.effects().navigate(Route::Login);
        state.effects().alert("server down");

        let poller = spawn_status_poller(state.clone());
        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        poller.abort();

        assert_eq!(state.effects().take_navigation(), Some(Route::Login));
        assert_eq!(state.effects().drain_alerts(), vec!["server down".to_string()]);
    }
}
