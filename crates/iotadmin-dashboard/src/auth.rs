//! Authentication for the dashboard.
//!
//! The session lives in the client's session store, not in a cookie: the
//! dashboard is a single-operator console in front of one backend account.

use axum::{
    Form,
    extract::{Query, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use iotadmin_core::user::UserForm;
use serde::Deserialize;

use crate::pages;
use crate::state::AppState;

/// Paths reachable without a session.
const PUBLIC_PATHS: [&str; 3] = ["/login", "/register", "/healthz"];

/// Guard every non-public route, then turn navigation requested by the API
/// client during the handler (a backend 401, a logout) into a redirect.
pub async fn auth_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let htmx = is_htmx(request.headers());

    if !PUBLIC_PATHS.contains(&path.as_str()) && !state.client().require_auth().await {
        // The guard queued a Login navigation; answer with our own redirect.
        state.effects().take_navigation();
        let redirect_to = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let target = format!("/login?redirect={}", urlencoding::encode(redirect_to));
        return redirect(&target, htmx);
    }

    let response = next.run(request).await;

    match state.effects().take_navigation() {
        Some(route) => {
            tracing::debug!(%path, route = route.path(), "client requested navigation");
            redirect(route.path(), htmx)
        }
        None => response,
    }
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.get("HX-Request").is_some_and(|v| v == "true")
}

/// Plain redirect, or `HX-Redirect` so HTMX replaces the whole page instead
/// of swapping the login form into a fragment.
fn redirect(target: &str, htmx: bool) -> Response {
    if htmx {
        match HeaderValue::from_str(target) {
            Ok(value) => {
                let mut response = StatusCode::OK.into_response();
                response.headers_mut().insert("HX-Redirect", value);
                response
            }
            Err(_) => Redirect::to("/login").into_response(),
        }
    } else {
        Redirect::to(target).into_response()
    }
}

/// Login page query parameters
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub redirect: Option<String>,
}

/// Login form data
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub redirect: Option<String>,
}

/// Only same-site paths are followed after login.
fn safe_redirect(redirect: Option<String>) -> String {
    redirect
        .filter(|r| r.starts_with('/') && !r.starts_with("//"))
        .unwrap_or_else(|| "/dashboard".to_string())
}

/// Handler for the login page (GET)
pub async fn login_page(State(state): State<AppState>, Query(query): Query<LoginQuery>) -> Response {
    if state.client().is_authenticated().await {
        return Redirect::to(&safe_redirect(query.redirect)).into_response();
    }
    Html(pages::login_page(query.redirect.as_deref(), None, "")).into_response()
}

/// Handler for login form submission (POST)
pub async fn login_submit(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match state.client().auth().login(&form.username, &form.password).await {
        Ok(session) => {
            tracing::info!(username = %session.username, "dashboard login");
            Redirect::to(&safe_redirect(form.redirect)).into_response()
        }
        Err(e) => {
            let page = pages::login_page(form.redirect.as_deref(), Some(&e.to_string()), &form.username);
            (StatusCode::UNAUTHORIZED, Html(page)).into_response()
        }
    }
}

/// Handler for the registration page (GET)
pub async fn register_page() -> Html<String> {
    Html(pages::register_page(&UserForm::default(), None, None))
}

/// Handler for registration form submission (POST)
pub async fn register_submit(State(state): State<AppState>, Form(form): Form<UserForm>) -> Response {
    let result = state.client().auth().register(&form).await;
    // Registration errors are shown on the form, not as toasts.
    state.effects().drain_alerts();
    match result {
        Ok(message) => Html(pages::register_page(&UserForm::default(), None, Some(&message))).into_response(),
        Err(e) => {
            let page = pages::register_page(&form, Some(&e.user_message()), None);
            (StatusCode::BAD_REQUEST, Html(page)).into_response()
        }
    }
}

/// Handler for logout (POST). The middleware turns the queued navigation
/// into the redirect.
pub async fn logout(State(state): State<AppState>) -> Response {
    if let Err(e) = state.client().logout().await {
        tracing::error!(error = %e, "failed to clear session");
    }
    Redirect::to("/login").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_target_must_be_local() {
        assert_eq!(safe_redirect(Some("/reports?page=2".into())), "/reports?page=2");
        assert_eq!(safe_redirect(Some("https://evil.example".into())), "/dashboard");
        assert_eq!(safe_redirect(Some("//evil.example".into())), "/dashboard");
        assert_eq!(safe_redirect(None), "/dashboard");
    }

    #[test]
    fn htmx_redirect_uses_header() {
        let response = redirect("/login", true);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("HX-Redirect").unwrap(), "/login");

        let response = redirect("/login", false);
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
}
