//! # iotadmin-client
//!
//! Talks to the device backend's REST API.
//!
//! - [`ApiClient`]: one configured `reqwest` client with a request
//!   interceptor (bearer token) and a response interceptor that classifies
//!   failures and drives [`UiEffects`]
//! - endpoint groups: [`ApiClient::auth`], [`ApiClient::devices`],
//!   [`ApiClient::users`], [`ApiClient::dashboard`], [`ApiClient::reports`]
//! - [`SessionManager`] over a pluggable [`SessionStorage`]
//! - [`PollCycles`] for cancelling superseded refreshes

pub mod auth;
pub mod client;
pub mod control;
pub mod dashboard;
pub mod devices;
pub mod effects;
pub mod error;
pub mod poll;
pub mod reports;
pub mod session;
pub mod storage;
pub mod users;

pub use auth::LoginError;
pub use client::ApiClient;
pub use control::DeviceController;
pub use dashboard::DashboardData;
pub use effects::{LogEffects, QueuedEffects, Route, UiEffects};
pub use error::{ApiError, StorageError};
pub use poll::{CycleToken, PollCycles};
pub use session::SessionManager;
pub use storage::{FileStorage, MemoryStorage, SessionStorage, create_storage};
