//! Error types for the core crate.

use crate::device::{DeviceCommand, DeviceId};
use thiserror::Error;

/// Errors raised before any request leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Device name did not match LED1, LED2 or Motor.
    #[error("unknown device '{0}'")]
    UnknownDevice(String),

    /// Command name did not match any known command.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// The command exists but does not apply to this device.
    #[error("command '{command}' is not valid for {device}")]
    InvalidCommand {
        device: DeviceId,
        command: DeviceCommand,
    },

    /// Form validation failed; the message is user-facing.
    #[error("{0}")]
    Validation(String),

    /// Date filter was not `YYYY-MM-DD`.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}
