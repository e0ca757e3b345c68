//! Request handlers for the dashboard.

use axum::{
    Form,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Local;
use iotadmin_client::{ApiError, UiEffects};
use iotadmin_core::action::{ActionFilter, PAGE_SIZES, parse_date};
use iotadmin_core::user::filter_users;
use iotadmin_core::{CoreError, DeviceCommand, DeviceId, FormMode, UserAccount, UserForm};
use serde::Deserialize;

use crate::error::DashboardError;
use crate::pages;
use crate::state::AppState;
use crate::templates::{Chrome, Nav, error_banner, success_banner, toast_stack};

const HISTORY_ERROR: &str = "Error al cargar el historial.";

/// Chrome for a full page. Built after the page's data so alerts raised
/// while loading it are shown.
async fn chrome(state: &AppState, active: Nav) -> Chrome {
    let user_name = state
        .sessions()
        .current_user()
        .await
        .map(|u| u.display_name().to_string())
        .unwrap_or_default();
    Chrome {
        title: active.label().to_string(),
        active,
        user_name,
        alerts: state.effects().drain_alerts(),
    }
}

/// Fragment followed by any pending alerts as out-of-band toasts.
fn with_toasts(state: &AppState, html: String) -> Html<String> {
    let toasts = toast_stack(&state.effects().drain_alerts(), true);
    Html(html + &toasts)
}

pub async fn home() -> Redirect {
    Redirect::to("/dashboard")
}

pub async fn healthz() -> &'static str {
    "ok"
}

// =============================================================================
// Dashboard
// =============================================================================

pub async fn dashboard(State(state): State<AppState>) -> Html<String> {
    let data = state.client().dashboard().load_all().await;
    let metrics = pages::metrics_fragment(&data);
    let chrome = chrome(&state, Nav::Dashboard).await;
    Html(pages::dashboard_page(
        &chrome,
        state.config().dashboard.dashboard_poll_secs,
        &metrics,
    ))
}

pub async fn dashboard_metrics(State(state): State<AppState>) -> Html<String> {
    let data = state.client().dashboard().load_all().await;
    with_toasts(&state, pages::metrics_fragment(&data))
}

pub async fn info(State(state): State<AppState>) -> Html<String> {
    let chrome = chrome(&state, Nav::Info).await;
    Html(pages::info_page(&chrome))
}

// =============================================================================
// Control
// =============================================================================

async fn load_history(state: &AppState) -> Result<Vec<iotadmin_core::ActionLogEntry>, String> {
    state
        .client()
        .devices()
        .history(state.config().dashboard.history_limit)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "history fetch failed");
            HISTORY_ERROR.to_string()
        })
}

async fn refresh_board(state: &AppState) {
    if let Err(e) = state.devices().refresh(state.client()).await {
        tracing::warn!(error = %e, "device status refresh failed");
    }
}

pub async fn control(State(state): State<AppState>) -> Html<String> {
    let ((), history) = tokio::join!(refresh_board(&state), load_history(&state));
    let board = state.devices().snapshot().await;
    let events = pages::events_rows(&history);
    let chrome = chrome(&state, Nav::Control).await;
    Html(pages::control_page(
        &chrome,
        state.config().dashboard.control_poll_secs,
        &board,
        &events,
    ))
}

pub async fn control_board(State(state): State<AppState>) -> Html<String> {
    refresh_board(&state).await;
    let board = state.devices().snapshot().await;
    with_toasts(&state, pages::board_fragment(&board))
}

pub async fn control_events(State(state): State<AppState>) -> Html<String> {
    let rows = pages::events_rows(&load_history(&state).await);
    with_toasts(&state, rows)
}

/// Send one command. Answers with the device's card: updated on success,
/// unchanged plus a toast on failure.
pub async fn control_command(
    State(state): State<AppState>,
    Path((device, command)): Path<(String, String)>,
) -> Result<Response, DashboardError> {
    let device: DeviceId = device
        .parse()
        .map_err(|e: CoreError| DashboardError::InvalidRequest(e.to_string()))?;
    let command: DeviceCommand = command
        .parse()
        .map_err(|e: CoreError| DashboardError::InvalidRequest(e.to_string()))?;

    match state.devices().send(state.client(), device, command).await {
        Ok(new_state) => {
            let card = pages::device_card(device, new_state);
            Ok(([("HX-Trigger", "device-updated")], with_toasts(&state, card)).into_response())
        }
        Err(e) => {
            tracing::warn!(%device, %command, error = %e, "command failed");
            if !matches!(e, ApiError::Forbidden { .. } | ApiError::Server { .. } | ApiError::Network(_)) {
                // The interceptor only alerts for these; surface the rest too.
                state.effects().alert(&e.user_message());
            }
            let current = state.devices().snapshot().await.state(device);
            Ok(with_toasts(&state, pages::device_card(device, current)).into_response())
        }
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Raw reports filter as submitted by the form. Empty fields mean "any".
#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
}

impl ReportParams {
    pub fn to_filter(&self) -> Result<ActionFilter, CoreError> {
        let non_empty = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        let limit = non_empty(&self.limit)
            .and_then(|l| l.parse::<u32>().ok())
            .filter(|l| PAGE_SIZES.contains(l))
            .unwrap_or(PAGE_SIZES[0]);
        let page = non_empty(&self.page)
            .and_then(|p| p.parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let device = non_empty(&self.device).map(|d| d.parse::<DeviceId>()).transpose()?;
        Ok(ActionFilter {
            limit,
            page,
            start_date: parse_date(self.start_date.as_deref())?,
            end_date: parse_date(self.end_date.as_deref())?,
            action: non_empty(&self.action),
            device,
        })
    }
}

async fn load_report(state: &AppState, params: &ReportParams) -> (ActionFilter, String) {
    let filter = match params.to_filter() {
        Ok(filter) => filter,
        Err(e) => {
            let filter = ActionFilter::default();
            let html = pages::report_results(&filter, &Err(e.to_string()));
            return (filter, html);
        }
    };
    let result = state
        .client()
        .reports()
        .events(&filter)
        .await
        .map_err(|e| e.user_message());
    let html = pages::report_results(&filter, &result);
    (filter, html)
}

pub async fn reports(State(state): State<AppState>, Query(params): Query<ReportParams>) -> Html<String> {
    let (filter, results) = load_report(&state, &params).await;
    let chrome = chrome(&state, Nav::Reports).await;
    Html(pages::reports_page(&chrome, &filter, Local::now().date_naive(), &results))
}

pub async fn reports_events(State(state): State<AppState>, Query(params): Query<ReportParams>) -> Html<String> {
    let (_, results) = load_report(&state, &params).await;
    with_toasts(&state, results)
}

/// Download the PDF export with the current filters and no paging.
pub async fn reports_pdf(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Response, DashboardError> {
    let filter = params
        .to_filter()
        .map_err(|e| DashboardError::InvalidRequest(e.to_string()))?;
    let bytes = state.client().reports().export_pdf(&filter).await?;
    let filename = format!("reporte-{}.pdf", Local::now().format("%Y%m%d-%H%M%S"));
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        bytes,
    )
        .into_response())
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

async fn reload_users(state: &AppState) -> Result<Vec<UserAccount>, ApiError> {
    let users = state.client().users().list().await?;
    state.cache_users(users.clone()).await;
    Ok(users)
}

fn render_users(result: &Result<Vec<UserAccount>, ApiError>, query: &str) -> String {
    match result {
        Ok(users) => pages::users_table(&filter_users(users, query), None),
        Err(e) => pages::users_table(&[], Some(&e.user_message())),
    }
}

pub async fn users(State(state): State<AppState>) -> Html<String> {
    let table = render_users(&reload_users(&state).await, "");
    let chrome = chrome(&state, Nav::Users).await;
    Html(pages::users_page(&chrome, &table))
}

/// Search box target. Filters the cached list; fetches only when empty.
pub async fn users_table(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Html<String> {
    let cached = state.cached_users().await;
    let result = if cached.is_empty() {
        reload_users(&state).await
    } else {
        Ok(cached)
    };
    with_toasts(&state, render_users(&result, &params.q))
}

pub async fn users_new() -> Html<String> {
    Html(pages::user_form_modal(FormMode::Create, None, &UserForm::default(), None))
}

pub async fn users_edit(State(state): State<AppState>, Path(id): Path<i64>) -> Html<String> {
    match state.client().users().get(id).await {
        Ok(user) => Html(pages::user_form_modal(
            FormMode::Edit,
            Some(id),
            &UserForm::from_account(&user),
            None,
        )),
        Err(e) => with_toasts(&state, pages::user_form_modal(
            FormMode::Edit,
            Some(id),
            &UserForm::default(),
            Some(&e.user_message()),
        )),
    }
}

/// Re-render the modal with an error in place of the table.
fn form_error(state: &AppState, mode: FormMode, id: Option<i64>, form: &UserForm, message: &str) -> Response {
    let modal = pages::user_form_modal(mode, id, form, Some(message));
    (
        [("HX-Retarget", "#user-modal"), ("HX-Reswap", "innerHTML")],
        with_toasts(state, modal),
    )
        .into_response()
}

/// Refreshed table, a confirmation and an emptied modal.
async fn users_saved(state: &AppState, message: &str) -> Response {
    let table = render_users(&reload_users(state).await, "");
    let html = format!(
        r#"{banner}{table}<div id="user-modal" hx-swap-oob="true"></div>"#,
        banner = success_banner(message),
    );
    with_toasts(state, html).into_response()
}

async fn save_user(state: &AppState, mode: FormMode, id: Option<i64>, form: UserForm) -> Response {
    let payload = match form.validate(mode) {
        Ok(payload) => payload,
        Err(e) => return form_error(state, mode, id, &form, &e.to_string()),
    };
    let result = match id {
        Some(id) => state.client().users().update(id, &payload).await,
        None => state.client().users().create(&payload).await,
    };
    match result {
        Ok(_) => {
            tracing::info!(username = %payload.username, ?mode, "user saved");
            let message = match mode {
                FormMode::Create => "Usuario creado correctamente.",
                FormMode::Edit => "Usuario actualizado correctamente.",
            };
            users_saved(state, message).await
        }
        Err(e) => form_error(state, mode, id, &form, &e.user_message()),
    }
}

pub async fn users_create(State(state): State<AppState>, Form(form): Form<UserForm>) -> Response {
    save_user(&state, FormMode::Create, None, form).await
}

pub async fn users_update(State(state): State<AppState>, Path(id): Path<i64>, Form(form): Form<UserForm>) -> Response {
    save_user(&state, FormMode::Edit, Some(id), form).await
}

pub async fn users_delete(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.client().users().delete(id).await {
        Ok(()) => {
            tracing::info!(user_id = id, "user deleted");
            users_saved(&state, "Usuario eliminado correctamente.").await
        }
        Err(e) => {
            let table = render_users(&Ok(state.cached_users().await), "");
            let html = format!("{}{table}", error_banner(&e.user_message()));
            (StatusCode::OK, with_toasts(&state, html)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn report_params_default_to_first_page() {
        let filter = ReportParams::default().to_filter().unwrap();
        assert_eq!(filter, ActionFilter::default());
    }

    #[test]
    fn report_params_parse_fields() {
        let params = ReportParams {
            limit: Some("25".into()),
            page: Some("3".into()),
            start_date: Some("2025-01-01".into()),
            end_date: Some("".into()),
            action: Some("".into()),
            device: Some("motor".into()),
        };
        let filter = params.to_filter().unwrap();
        assert_eq!(filter.limit, 25);
        assert_eq!(filter.page, 3);
        assert_eq!(filter.start_date, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(filter.end_date, None);
        assert_eq!(filter.action, None);
        assert_eq!(filter.device, Some(DeviceId::Motor));
    }

    #[test]
    fn unknown_page_size_falls_back() {
        let params = ReportParams { limit: Some("7".into()), ..ReportParams::default() };
        assert_eq!(params.to_filter().unwrap().limit, 10);
    }

    #[test]
    fn bad_date_is_rejected() {
        let params = ReportParams { start_date: Some("01/02/2025".into()), ..ReportParams::default() };
        assert!(params.to_filter().is_err());
    }
}
