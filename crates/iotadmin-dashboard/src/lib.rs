//! # iotadmin-dashboard
//!
//! Admin web dashboard for the device backend.
//!
//! This crate provides a server-rendered UI for:
//! - Login and self-registration
//! - Metrics dashboard (KPIs and charts, refreshed on a timer)
//! - Device control (two LEDs and a stepper motor) with live status
//! - Action reports with filters, pagination and PDF export
//! - User management
//!
//! ## Tech Stack
//!
//! - Axum for HTTP server
//! - HTMX + Alpine.js for interactivity (minimal JS)
//! - Chart.js for charts, configured server-side
//! - Tailwind CSS for styling

pub mod auth;
pub mod charts;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod routes;
pub mod server;
pub mod state;
pub mod templates;

pub use error::DashboardError;
pub use routes::create_router;
pub use server::DashboardServer;
pub use state::AppState;
