//! # iotadmin-core
//!
//! Configuration and domain types shared by the iotadmin crates: the user
//! session, the three controllable devices and their state machine, action
//! log entries and report filters, user accounts with form validation, and
//! the dashboard metrics payloads.

pub mod action;
pub mod config;
pub mod device;
pub mod error;
pub mod metrics;
pub mod session;
pub mod user;

pub use action::{ActionFilter, ActionLogEntry, PageInfo};
pub use config::IotAdminConfig;
pub use device::{ActionRequest, DeviceBoard, DeviceCommand, DeviceId, DeviceState, DeviceStatusRecord};
pub use error::CoreError;
pub use session::{CurrentUser, Session};
pub use user::{FormMode, UserAccount, UserForm, UserPayload};
