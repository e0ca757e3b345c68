//! The configured HTTP client and its interceptors.

use crate::auth::AuthApi;
use crate::dashboard::DashboardApi;
use crate::devices::DevicesApi;
use crate::effects::{MSG_FORBIDDEN, MSG_SERVER_ERROR, MSG_UNREACHABLE, Route, UiEffects};
use crate::error::{ApiError, error_message};
use crate::reports::ReportsApi;
use crate::session::SessionManager;
use crate::users::UsersApi;
use iotadmin_core::config::api::ApiConfig;
use reqwest::{Method, RequestBuilder, Response, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Query parameters as produced by the core filters.
pub type Query<'a> = &'a [(&'a str, String)];

/// HTTP client for the device backend.
///
/// Every call goes through the same request interceptor (bearer token) and
/// response interceptor (status classification and UI effects).
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    sessions: SessionManager,
    effects: Arc<dyn UiEffects>,
}

impl ApiClient {
    pub fn new(
        config: &ApiConfig,
        sessions: SessionManager,
        effects: Arc<dyn UiEffects>,
    ) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sessions,
            effects,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn effects(&self) -> &Arc<dyn UiEffects> {
        &self.effects
    }

    /// Absolute URL for an API path such as `/devices/status`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // -------------------------------------------------------------------------
    // Domain groups
    // -------------------------------------------------------------------------

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn devices(&self) -> DevicesApi<'_> {
        DevicesApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub fn dashboard(&self) -> DashboardApi<'_> {
        DashboardApi::new(self)
    }

    pub fn reports(&self) -> ReportsApi<'_> {
        ReportsApi::new(self)
    }

    // -------------------------------------------------------------------------
    // Session helpers
    // -------------------------------------------------------------------------

    pub async fn is_authenticated(&self) -> bool {
        self.sessions.is_authenticated().await
    }

    /// Route guard. Returns false, and sends the user to the login page,
    /// when no token is stored. Callers stop on false.
    pub async fn require_auth(&self) -> bool {
        if self.sessions.is_authenticated().await {
            return true;
        }
        tracing::debug!("no session token, redirecting to login");
        self.effects.navigate(Route::Login);
        false
    }

    /// Forget the session and go to the login page.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.sessions.clear().await?;
        tracing::info!("session cleared");
        self.effects.navigate(Route::Login);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Verbs
    // -------------------------------------------------------------------------

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with_query(path, &[]).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
    ) -> Result<T, ApiError> {
        let response = self.send::<()>(Method::GET, path, query, None).await?;
        decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, &[], Some(body)).await?;
        decode(response).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::PATCH, path, &[], Some(body)).await?;
        decode(response).await
    }

    /// DELETE; any response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send::<()>(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    /// GET a binary payload such as a PDF.
    pub async fn get_bytes(&self, path: &str, query: Query<'_>) -> Result<Vec<u8>, ApiError> {
        let response = self.send::<()>(Method::GET, path, query, None).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        tracing::debug!(path, size = bytes.len(), "binary payload received");
        Ok(bytes.to_vec())
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        query: Query<'_>,
        body: Option<&B>,
    ) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let mut builder = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let payload = match body {
            Some(body) => {
                let value = serde_json::to_value(body).map_err(|e| ApiError::Request(e.to_string()))?;
                builder = builder.json(&value);
                Some(value)
            }
            None => None,
        };
        let builder = self.intercept_request(builder).await;
        tracing::debug!(
            %method,
            %url,
            query = ?query,
            payload = ?payload,
            "sending request"
        );
        let result = builder.send().await;
        self.intercept_response(&method, &url, result).await
    }

    /// Attach the bearer token when a session exists.
    async fn intercept_request(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.sessions.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Classify a failed exchange and trigger the matching UI effect.
    async fn intercept_response(
        &self,
        method: &Method,
        url: &str,
        result: reqwest::Result<Response>,
    ) -> Result<Response, ApiError> {
        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_builder() => {
                tracing::error!(%method, url, error = %e, "request could not be built");
                return Err(ApiError::Request(e.to_string()));
            }
            Err(e) => {
                tracing::error!(%method, url, error = %e, "no response from server");
                self.effects.alert(MSG_UNREACHABLE);
                return Err(ApiError::Network(e.to_string()));
            }
        };

        let status = response.status();
        if status.is_success() {
            tracing::debug!(%method, url, status = status.as_u16(), "response received");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body);
        let error = ApiError::from_status(status.as_u16(), message);

        match &error {
            ApiError::Unauthorized { .. } => {
                tracing::warn!(%method, url, "session rejected, clearing and redirecting to login");
                if let Err(e) = self.sessions.clear().await {
                    tracing::error!(error = %e, "failed to clear session");
                }
                self.effects.navigate(Route::Login);
            }
            ApiError::Forbidden { .. } => {
                tracing::warn!(%method, url, "access denied");
                self.effects.alert(MSG_FORBIDDEN);
            }
            ApiError::NotFound { message } => {
                tracing::error!(%method, url, %message, "resource not found");
            }
            ApiError::Server { status, message } => {
                tracing::error!(%method, url, status, %message, "server error");
                self.effects.alert(MSG_SERVER_ERROR);
            }
            _ => {
                tracing::error!(%method, url, status = status.as_u16(), %body, "request failed");
            }
        }
        Err(error)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let url = response.url().to_string();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    tracing::trace!(%url, body = %String::from_utf8_lossy(&bytes), "response payload");
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(format!("{url}: {e}")))
}
