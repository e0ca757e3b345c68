//! Dashboard configuration.
//!
//! This module defines configuration for the admin dashboard web UI.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Host to bind the dashboard to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Refresh interval of the metrics page, in seconds.
    #[serde(default = "default_dashboard_poll_secs")]
    pub dashboard_poll_secs: u64,

    /// Refresh interval of the control page and device status poller, in seconds.
    #[serde(default = "default_control_poll_secs")]
    pub control_poll_secs: u64,

    /// Rows requested by the control page's event history.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            dashboard_poll_secs: default_dashboard_poll_secs(),
            control_poll_secs: default_control_poll_secs(),
            history_limit: default_history_limit(),
        }
    }
}

impl DashboardConfig {
    /// `host:port` bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn dashboard_poll(&self) -> Duration {
        Duration::from_secs(self.dashboard_poll_secs)
    }

    pub fn control_poll(&self) -> Duration {
        Duration::from_secs(self.control_poll_secs)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_dashboard_poll_secs() -> u64 {
    60
}

fn default_control_poll_secs() -> u64 {
    30
}

fn default_history_limit() -> u32 {
    10
}
