//! `/devices` and `/actions` endpoints.

use crate::client::ApiClient;
use crate::error::ApiError;
use iotadmin_core::action::{ActionFilter, ActionLogEntry};
use iotadmin_core::device::{ActionRequest, DeviceCommand, DeviceId, DeviceStatusRecord};
use serde::Deserialize;
use serde_json::Value;

/// `/devices/status` returns a bare array on current backends and a
/// `{devices: [...]}` envelope on older ones.
#[derive(Deserialize)]
#[serde(untagged)]
enum StatusPayload {
    List(Vec<DeviceStatusRecord>),
    Wrapped { devices: Vec<DeviceStatusRecord> },
}

pub struct DevicesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DevicesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Current state of every device as reported by the backend.
    pub async fn status(&self) -> Result<Vec<DeviceStatusRecord>, ApiError> {
        let payload: StatusPayload = self.client.get("/devices/status").await?;
        Ok(match payload {
            StatusPayload::List(records) | StatusPayload::Wrapped { devices: records } => records,
        })
    }

    /// Send a command. Invalid device/command pairs fail before any request.
    pub async fn send_action(&self, device: DeviceId, command: DeviceCommand) -> Result<Value, ApiError> {
        let request = ActionRequest::for_command(device, command)?;
        tracing::info!(%device, action = %request.action, "sending device command");
        self.client.post("/actions", &request).await
    }

    /// Most recent `limit` actions.
    pub async fn history(&self, limit: u32) -> Result<Vec<ActionLogEntry>, ApiError> {
        self.client
            .get_with_query("/actions", &ActionFilter::latest(limit).to_query())
            .await
    }
}
