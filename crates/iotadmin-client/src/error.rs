//! Error types for the client crate.

use iotadmin_core::CoreError;
use serde_json::Value;
use thiserror::Error;

/// Fallback when an error body carries neither `message` nor `detail`.
pub const DEFAULT_ERROR_MESSAGE: &str = "Error en el servidor";

/// Errors of the session storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// A failed backend call, classified by what the UI should do about it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401: the session was wiped and the user sent to the login page.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// 403.
    #[error("forbidden: {message}")]
    Forbidden { message: String },

    /// 404.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Any 5xx.
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Any other non-2xx status.
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// The request went out but no response came back.
    #[error("no response from server: {0}")]
    Network(String),

    /// A 2xx response whose body did not match the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    Request(String),

    /// Client-side validation failed; nothing was sent.
    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Build the error for a non-2xx status.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ApiError::Unauthorized { message },
            403 => ApiError::Forbidden { message },
            404 => ApiError::NotFound { message },
            500..=599 => ApiError::Server { status, message },
            _ => ApiError::Status { status, message },
        }
    }

    /// HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Server { status, .. } | ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Text suitable for an inline error row or toast.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized { .. } => "Sesión expirada. Inicie sesión de nuevo.".to_string(),
            ApiError::Forbidden { .. } => crate::effects::MSG_FORBIDDEN.to_string(),
            ApiError::Server { .. } => crate::effects::MSG_SERVER_ERROR.to_string(),
            ApiError::Network(_) => crate::effects::MSG_UNREACHABLE.to_string(),
            ApiError::NotFound { message } | ApiError::Status { message, .. } => message.clone(),
            ApiError::Validation(e) => e.to_string(),
            ApiError::Decode(_) => "Respuesta del servidor inválida.".to_string(),
            ApiError::Request(_) | ApiError::Storage(_) => "Error al procesar la solicitud.".to_string(),
        }
    }
}

/// Pull the user-facing message out of an error body: `message`, then
/// `detail`, then a fixed fallback. FastAPI validation errors put a list in
/// `detail`; the first entry's `msg` is used.
pub fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return DEFAULT_ERROR_MESSAGE.to_string();
    };
    for key in ["message", "detail"] {
        match value.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return s.clone(),
            Some(Value::Array(items)) => {
                if let Some(msg) = items.first().and_then(|i| i.get("msg")).and_then(Value::as_str) {
                    return msg.to_string();
                }
            }
            _ => {}
        }
    }
    DEFAULT_ERROR_MESSAGE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_prefers_message_over_detail() {
        assert_eq!(error_message(r#"{"message":"a","detail":"b"}"#), "a");
        assert_eq!(error_message(r#"{"detail":"b"}"#), "b");
        assert_eq!(error_message("<html>"), DEFAULT_ERROR_MESSAGE);
        assert_eq!(error_message(r#"{"detail":[{"msg":"field required"}]}"#), "field required");
    }

    #[test]
    fn classify_statuses() {
        assert!(ApiError::from_status(401, String::new()).is_unauthorized());
        assert!(matches!(ApiError::from_status(403, String::new()), ApiError::Forbidden { .. }));
        assert!(matches!(ApiError::from_status(502, String::new()), ApiError::Server { status: 502, .. }));
        assert!(matches!(ApiError::from_status(422, String::new()), ApiError::Status { status: 422, .. }));
        assert_eq!(ApiError::Network("x".into()).status(), None);
    }
}
