//! Side effects the client triggers outside of returning a value.
//!
//! A browser front-end would navigate and pop alerts; here the host (the
//! dashboard, the CLI, a test) decides what "navigate" and "alert" mean.

use std::sync::Mutex;

pub const MSG_FORBIDDEN: &str = "No tienes permisos para realizar esta acción.";
pub const MSG_SERVER_ERROR: &str = "Error interno del servidor. Intente más tarde.";
pub const MSG_UNREACHABLE: &str = "No se pudo conectar con el servidor. Verifique su conexión.";

/// Places the client can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
        }
    }
}

/// Host hooks for navigation and user alerts.
pub trait UiEffects: Send + Sync {
    fn navigate(&self, route: Route);
    fn alert(&self, message: &str);
}

/// Effects that only log. Used by the CLI, where errors are printed anyway.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEffects;

impl UiEffects for LogEffects {
    fn navigate(&self, route: Route) {
        tracing::info!(route = route.path(), "navigation requested");
    }

    fn alert(&self, message: &str) {
        tracing::warn!(%message, "alert");
    }
}

/// Queues effects until the host drains them.
///
/// The dashboard turns a queued navigation into a redirect and queued alerts
/// into toasts on the next rendered page.
#[derive(Debug, Default)]
pub struct QueuedEffects {
    navigation: Mutex<Option<Route>>,
    alerts: Mutex<Vec<String>>,
}

impl QueuedEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending navigation, if any.
    pub fn take_navigation(&self) -> Option<Route> {
        self.navigation.lock().ok().and_then(|mut n| n.take())
    }

    /// Take all pending alerts, oldest first.
    pub fn drain_alerts(&self) -> Vec<String> {
        self.alerts
            .lock()
            .map(|mut a| std::mem::take(&mut *a))
            .unwrap_or_default()
    }
}

impl UiEffects for QueuedEffects {
    fn navigate(&self, route: Route) {
        if let Ok(mut n) = self.navigation.lock() {
            *n = Some(route);
        }
    }

    fn alert(&self, message: &str) {
        if let Ok(mut a) = self.alerts.lock() {
            a.push(message.to_string());
        }
    }
}
