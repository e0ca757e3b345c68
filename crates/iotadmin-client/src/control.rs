//! Device board kept in sync with the backend.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::poll::PollCycles;
use iotadmin_core::device::{DeviceBoard, DeviceCommand, DeviceId, DeviceState};
use tokio::sync::RwLock;

/// Last known device states plus the poll cycles that refresh them.
///
/// Commands update the board only after the backend accepts them, and
/// advance the cycle so a poll already in flight cannot overwrite the new
/// state with an older one.
#[derive(Debug, Default)]
pub struct DeviceController {
    board: RwLock<DeviceBoard>,
    cycles: PollCycles,
}

impl DeviceController {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> DeviceBoard {
        self.board.read().await.clone()
    }

    pub fn cycles(&self) -> &PollCycles {
        &self.cycles
    }

    /// Send a command and, on success, apply its transition.
    pub async fn send(
        &self,
        client: &ApiClient,
        device: DeviceId,
        command: DeviceCommand,
    ) -> Result<DeviceState, ApiError> {
        // Validate before sending.
        self.board.read().await.state(device).transition(device, command)?;

        client.devices().send_action(device, command).await?;

        let mut board = self.board.write().await;
        self.cycles.invalidate();
        let state = board.apply(device, command)?;
        tracing::info!(%device, %command, state = %state, "device state updated");
        Ok(state)
    }

    /// One poll cycle. Returns `Ok(None)` when a newer cycle or a command
    /// superseded this one and its result was dropped.
    pub async fn refresh(&self, client: &ApiClient) -> Result<Option<usize>, ApiError> {
        let mut token = self.cycles.begin();
        let Some(result) = token.run(client.devices().status()).await else {
            tracing::debug!(generation = token.generation(), "status poll superseded");
            return Ok(None);
        };
        let records = result?;

        let mut board = self.board.write().await;
        if !token.is_current() {
            tracing::debug!(generation = token.generation(), "status poll superseded");
            return Ok(None);
        }
        let merged = board.merge_status(&records);
        tracing::debug!(merged, "device status refreshed");
        Ok(Some(merged))
    }
}
