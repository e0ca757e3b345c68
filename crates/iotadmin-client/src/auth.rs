//! Login and registration.

use crate::client::ApiClient;
use crate::error::{ApiError, error_message};
use iotadmin_core::user::{FormMode, UserForm};
use iotadmin_core::Session;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Why a login attempt failed. `Display` is the message shown on the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Por favor, complete ambos campos.")]
    MissingFields,

    #[error("Usuario o contraseña incorrectos.")]
    BadCredentials,

    #[error("Datos de inicio de sesión inválidos.")]
    BadRequest,

    #[error("Error en el servidor. Intente más tarde.")]
    Server,

    #[error("Error: {0}")]
    Other(String),

    #[error("No se pudo conectar con el servidor. Verifique su conexión.")]
    Unreachable,

    #[error("Respuesta del servidor inválida.")]
    InvalidResponse,

    #[error("No se pudo guardar la sesión: {0}")]
    Storage(String),
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<LoginUser>,
}

#[derive(Debug, Deserialize)]
struct LoginUser {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl LoginResponse {
    fn into_session(self, typed_username: &str) -> Option<Session> {
        if !self.success {
            return None;
        }
        let token = self.access_token.filter(|t| !t.is_empty())?;
        let user = self.user?;
        let user_id = match user.id {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        Some(Session {
            token,
            username: user.username.unwrap_or_else(|| typed_username.to_string()),
            full_name: user.name.unwrap_or_default(),
            email: user.email.unwrap_or_default(),
            user_id,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct RegisterResponse {
    #[serde(default)]
    message: Option<String>,
}

/// `/auth/*` endpoints.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token and persist the session.
    ///
    /// Goes around the response interceptor: a 401 here means bad
    /// credentials, not an expired session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, LoginError> {
        let username = username.trim();
        if username.is_empty() || password.trim().is_empty() {
            return Err(LoginError::MissingFields);
        }

        let url = self.client.url("/auth/login");
        tracing::debug!(%url, username, "login attempt");
        let response = self
            .client
            .http()
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "login request got no response");
                LoginError::Unreachable
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|_| LoginError::InvalidResponse)?;
        if !status.is_success() {
            tracing::warn!(username, status = status.as_u16(), "login rejected");
            return Err(match status.as_u16() {
                401 => LoginError::BadCredentials,
                400 => LoginError::BadRequest,
                500 => LoginError::Server,
                _ => LoginError::Other(error_message(&body)),
            });
        }

        let session = serde_json::from_str::<LoginResponse>(&body)
            .ok()
            .and_then(|r| r.into_session(username))
            .ok_or_else(|| {
                tracing::error!(%body, "login succeeded with an unexpected body");
                LoginError::InvalidResponse
            })?;

        self.client
            .sessions()
            .save(&session)
            .await
            .map_err(|e| LoginError::Storage(e.to_string()))?;
        tracing::info!(username = %session.username, user_id = %session.user_id, "logged in");
        Ok(session)
    }

    /// Create an account. Returns the backend's confirmation message.
    pub async fn register(&self, form: &UserForm) -> Result<String, ApiError> {
        let payload = form.validate(FormMode::Create)?;
        let response: RegisterResponse = self.client.post("/auth/register", &payload).await?;
        tracing::info!(username = %payload.username, "account registered");
        Ok(response
            .message
            .unwrap_or_else(|| "Usuario registrado correctamente.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_response_requires_success_and_token() {
        let ok: LoginResponse = serde_json::from_value(json!({
            "success": true,
            "access_token": "abc",
            "user": {"id": 7, "username": "admin", "name": "Admin", "email": "a@b.co"}
        }))
        .unwrap();
        let session = ok.into_session("admin").unwrap();
        assert_eq!(session.user_id, "7");
        assert_eq!(session.full_name, "Admin");

        let failed: LoginResponse =
            serde_json::from_value(json!({"success": false, "access_token": "abc", "user": {}})).unwrap();
        assert!(failed.into_session("admin").is_none());

        let no_user: LoginResponse =
            serde_json::from_value(json!({"success": true, "access_token": "abc"})).unwrap();
        assert!(no_user.into_session("admin").is_none());
    }

    #[test]
    fn messages() {
        assert!(LoginError::BadCredentials.to_string().contains("incorrectos"));
        assert_eq!(LoginError::Other("boom".into()).to_string(), "Error: boom");
    }
}
