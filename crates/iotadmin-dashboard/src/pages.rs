//! Page templates for dashboard views.

use crate::charts;
use crate::templates::{
    Chrome, badge, bare_layout, card, empty_state, error_banner, html_escape, input, layout,
    message_row, page_header, select, stats_card, success_banner, table,
};
use chrono::NaiveDate;
use iotadmin_client::{ApiError, DashboardData};
use iotadmin_core::action::{ActionFilter, ActionLogEntry, PAGE_SIZES, PageInfo};
use iotadmin_core::device::{ActionRequest, DeviceBoard, DeviceCommand, DeviceId, DeviceState};
use iotadmin_core::metrics::{Series, UserShare};
use iotadmin_core::user::{FormMode, UserAccount, UserForm};

// =============================================================================
// Login / Register
// =============================================================================

pub fn login_page(redirect: Option<&str>, error: Option<&str>, username: &str) -> String {
    let error_html = error.map(error_banner).unwrap_or_default();
    let redirect_input = redirect
        .map(|r| format!(r#"<input type="hidden" name="redirect" value="{}">"#, html_escape(r)))
        .unwrap_or_default();

    let content = format!(
        r##"<div class="text-center mb-6">
            <h2 class="text-xl font-semibold text-gray-900">Iniciar sesión</h2>
            <p class="text-gray-500 mt-1">Ingrese sus credenciales para continuar</p>
        </div>
        {error_html}
        <form method="POST" action="/login" class="space-y-5">
            {redirect_input}
            {username_input}
            {password_input}
            <button type="submit"
                class="w-full py-3 px-4 bg-indigo-600 hover:bg-indigo-700 text-white font-medium rounded-lg shadow-lg transition">
                <i class="fas fa-right-to-bracket"></i> Ingresar
            </button>
        </form>
        <p class="mt-6 text-center text-sm text-gray-500">
            ¿No tiene cuenta? <a href="/register" class="text-indigo-600 hover:underline">Regístrese</a>
        </p>"##,
        username_input = input("username", "Usuario", "text", username, "Ingrese su usuario"),
        password_input = input("password", "Contraseña", "password", "", "Ingrese su contraseña"),
    );
    bare_layout("Iniciar sesión", &content)
}

pub fn register_page(form: &UserForm, error: Option<&str>, success: Option<&str>) -> String {
    let banner = match (error, success) {
        (Some(e), _) => error_banner(e),
        (None, Some(s)) => success_banner(s),
        _ => String::new(),
    };
    let content = format!(
        r##"<div class="text-center mb-6">
            <h2 class="text-xl font-semibold text-gray-900">Crear cuenta</h2>
        </div>
        {banner}
        <form method="POST" action="/register" class="space-y-4">
            {full_name}
            {username}
            {email}
            {password}
            {confirm}
            <button type="submit"
                class="w-full py-3 px-4 bg-indigo-600 hover:bg-indigo-700 text-white font-medium rounded-lg transition">
                Registrarse
            </button>
        </form>
        <p class="mt-6 text-center text-sm text-gray-500">
            ¿Ya tiene cuenta? <a href="/login" class="text-indigo-600 hover:underline">Inicie sesión</a>
        </p>"##,
        full_name = input("full_name", "Nombre completo", "text", &form.full_name, ""),
        username = input("username", "Usuario", "text", &form.username, ""),
        email = input("email", "Correo electrónico", "email", &form.email, ""),
        password = input("password", "Contraseña", "password", "", ""),
        confirm = input("confirm_password", "Confirmar contraseña", "password", "", ""),
    );
    bare_layout("Registro", &content)
}

// =============================================================================
// Dashboard
// =============================================================================

pub fn dashboard_page(chrome: &Chrome, poll_secs: u64, metrics_html: &str) -> String {
    let content = format!(
        r##"{header}
        <div id="metrics" hx-get="/dashboard/metrics" hx-trigger="every {poll_secs}s" hx-swap="innerHTML">
            {metrics_html}
        </div>"##,
        header = page_header("Dashboard", "Resumen de actividad de los dispositivos"),
    );
    layout(chrome, &content)
}

/// KPIs, charts and legends. Each block renders its own error in place.
pub fn metrics_fragment(data: &DashboardData) -> String {
    let kpis = match &data.summary {
        Ok(s) => format!(
            r##"<div class="grid grid-cols-1 md:grid-cols-3 lg:grid-cols-6 gap-4 mb-8">
                {status}{leds}{moves}{right}{left}{stops}
            </div>"##,
            status = stats_card("Estado", or_dash(&s.status), "power-off", "indigo"),
            leds = stats_card("LED encendidos", &s.led_on_total.to_string(), "lightbulb", "yellow"),
            moves = stats_card("Movimientos", or_dash(&s.movements), "arrows-spin", "blue"),
            right = stats_card("Giros derecha", &s.right_turns.to_string(), "rotate-right", "green"),
            left = stats_card("Giros izquierda", &s.left_turns.to_string(), "rotate-left", "purple"),
            stops = stats_card("Detenidos", &s.stops.to_string(), "circle-stop", "red"),
        ),
        Err(e) => error_banner(&e.user_message()),
    };

    let events = chart_block("events-by-device", "Eventos por dispositivo", &data.events_by_device, |s| {
        (charts::events_by_device(s), format!(
            r#"<p class="text-sm text-gray-500 mb-2">Total: {}</p>"#,
            s.total
        ))
    });
    let users = card("Registro por usuario", &match &data.registration_by_user {
        Ok(list) => registration_bars(list),
        Err(e) => error_banner(&e.user_message()),
    });
    let motor = chart_block("motor-direction", "Dirección del motor", &data.motor_direction, |s| {
        (charts::donut(s), legend(s))
    });
    let leds = chart_block("leds-usage", "LEDs encendidos", &data.leds_usage, |s| {
        (charts::donut(s), legend(s))
    });
    let hourly = match &data.usage_by_hour {
        Ok(points) => chart_canvas("usage-by-hour", &charts::usage_by_hour(points), ""),
        Err(e) => error_banner(&e.user_message()),
    };

    format!(
        r##"{kpis}
        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6 mb-6">
            {events}
            {users}
        </div>
        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6 mb-6">
            {motor}
            {leds}
        </div>
        {hourly_card}"##,
        hourly_card = card("Uso de LED por horas", &hourly),
    )
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

fn chart_block<F>(id: &str, title: &str, result: &Result<Series, ApiError>, build: F) -> String
where
    F: Fn(&Series) -> (serde_json::Value, String),
{
    let body = match result {
        Ok(series) if series.data.is_empty() => empty_state("chart-simple", "Sin datos", "No hay registros todavía."),
        Ok(series) => {
            let (config, extra) = build(series);
            chart_canvas(id, &config, &extra)
        }
        Err(e) => error_banner(&e.user_message()),
    };
    card(title, &body)
}

fn chart_canvas(id: &str, config: &serde_json::Value, extra: &str) -> String {
    format!(
        r##"<div class="h-64"><canvas id="{id}"></canvas></div>
        {extra}
        <script>
            (function() {{
                window.iotCharts = window.iotCharts || {{}};
                if (window.iotCharts['{id}']) {{ window.iotCharts['{id}'].destroy(); }}
                var el = document.getElementById('{id}');
                if (el && typeof Chart !== 'undefined') {{
                    window.iotCharts['{id}'] = new Chart(el.getContext('2d'), {config});
                }}
            }})();
        </script>"##,
        config = charts::embed(config),
    )
}

fn registration_bars(list: &[UserShare]) -> String {
    if list.is_empty() {
        return empty_state("users", "Sin datos", "Ningún usuario ha registrado acciones.");
    }
    let rows: String = list
        .iter()
        .map(|item| {
            let percent = item.percent.clamp(0.0, 100.0);
            format!(
                r##"<div>
                    <div class="flex justify-between text-sm mb-1">
                        <span class="font-medium text-gray-800">{user}</span>
                        <span class="text-indigo-600 font-semibold">{percent}% ({count})</span>
                    </div>
                    <div class="w-full bg-gray-200 rounded-full h-2">
                        <div class="h-2 rounded-full bg-indigo-600" style="width: {percent}%"></div>
                    </div>
                </div>"##,
                user = html_escape(&item.user),
                count = item.count,
            )
        })
        .collect();
    format!(r#"<div class="space-y-4">{rows}</div>"#)
}

fn legend(series: &Series) -> String {
    let items: String = series
        .data
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                r##"<div class="flex justify-between items-center text-sm text-gray-700">
                    <div class="flex items-center space-x-2">
                        <span class="w-3 h-3 rounded-full" style="background-color: {color};"></span>
                        <span>{label}</span>
                    </div>
                    <span class="font-semibold">{count} ({percent}%)</span>
                </div>"##,
                color = html_escape(&series.color(i)),
                label = html_escape(&p.label),
                count = p.count,
                percent = series.percent(i),
            )
        })
        .collect();
    let total = if series.total > 0 {
        series.total
    } else {
        series.data.iter().map(|p| p.count).sum()
    };
    format!(
        r##"<p class="text-center text-sm font-semibold my-3">Total: {total}</p>
        <div class="space-y-2">{items}</div>"##
    )
}

// =============================================================================
// Control
// =============================================================================

pub fn control_page(chrome: &Chrome, poll_secs: u64, board: &DeviceBoard, events_html: &str) -> String {
    let content = format!(
        r##"{header}
        <div id="device-board" hx-get="/control/board" hx-trigger="every {poll_secs}s" hx-swap="innerHTML">
            {board}
        </div>
        <div class="mt-8">
            {history}
        </div>"##,
        header = page_header("Control", "Encienda los LEDs y gobierne el motor paso a paso"),
        board = board_fragment(board),
        history = card(
            "Historial de eventos",
            &format!(
                r##"<p class="text-sm text-gray-500 mb-4">Total: <span id="total-events">-</span></p>
                {table}"##,
                table = history_table(events_html, poll_secs),
            )
        ),
    );
    layout(chrome, &content)
}

fn history_table(rows_html: &str, poll_secs: u64) -> String {
    format!(
        r##"<div class="overflow-x-auto">
            <table class="min-w-full divide-y divide-gray-200">
                <thead class="bg-gray-50">
                    <tr>
                        <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">Dispositivo</th>
                        <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">Acción</th>
                        <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">Usuario</th>
                        <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase">Fecha</th>
                    </tr>
                </thead>
                <tbody id="events-table-body" class="bg-white divide-y divide-gray-200"
                       hx-get="/control/events" hx-trigger="every {poll_secs}s, device-updated from:body" hx-swap="innerHTML">
                    {rows_html}
                </tbody>
            </table>
        </div>"##
    )
}

/// The three device cards.
pub fn board_fragment(board: &DeviceBoard) -> String {
    let cards: String = board.iter().map(|(d, s)| device_card(d, s)).collect();
    format!(r#"<div class="grid grid-cols-1 md:grid-cols-3 gap-6">{cards}</div>"#)
}

/// One device card. Its buttons are disabled while a command is in flight.
pub fn device_card(device: DeviceId, state: DeviceState) -> String {
    let slug = device.slug();
    let (dot, text, border) = status_style(state);
    let buttons: String = device
        .commands()
        .iter()
        .map(|cmd| {
            format!(
                r##"<button type="button" class="{color} text-white px-3 py-2 rounded-lg text-sm font-medium transition disabled:opacity-50"
                        hx-post="/control/{slug}/{cmd}" hx-target="#device-{slug}" hx-swap="outerHTML"
                        hx-disabled-elt="#device-{slug} button">{label}</button>"##,
                color = command_color(*cmd),
                cmd = cmd.slug(),
                label = cmd.label(),
            )
        })
        .collect();
    format!(
        r##"<div id="device-{slug}" class="bg-white rounded-xl shadow-sm border border-gray-200 p-6">
            <div class="flex items-center justify-between mb-6">
                <h3 class="text-lg font-semibold text-gray-900">{label}</h3>
                <div class="flex items-center space-x-2 p-1 px-3 rounded-full border {border}">
                    <span class="w-2 h-2 rounded-full {dot}"></span>
                    <span data-state class="text-xs font-medium {text}">{state}</span>
                </div>
            </div>
            <div class="flex gap-2 flex-wrap">{buttons}</div>
        </div>"##,
        label = device.label(),
        state = state.label(),
    )
}

fn status_style(state: DeviceState) -> (&'static str, &'static str, &'static str) {
    match state {
        DeviceState::Led(_) if state.is_active() => ("bg-green-500", "text-green-600", "border-green-300 bg-green-50"),
        DeviceState::Led(_) => ("bg-red-500", "text-red-600", "border-red-300 bg-red-50"),
        DeviceState::Motor(_) if state.is_active() => ("bg-blue-500", "text-blue-600", "border-blue-300 bg-blue-50"),
        DeviceState::Motor(_) => ("bg-gray-500", "text-gray-600", "border-gray-300 bg-gray-50"),
    }
}

fn command_color(cmd: DeviceCommand) -> &'static str {
    match cmd {
        DeviceCommand::TurnOn => "bg-green-500 hover:bg-green-600",
        DeviceCommand::TurnOff | DeviceCommand::Stop => "bg-red-500 hover:bg-red-600",
        DeviceCommand::TurnLeft | DeviceCommand::TurnRight => "bg-indigo-600 hover:bg-indigo-700",
    }
}

/// History rows plus an out-of-band update of the total counter.
pub fn events_rows(result: &Result<Vec<ActionLogEntry>, String>) -> String {
    match result {
        Ok(events) if events.is_empty() => format!(
            r#"{}<span id="total-events" hx-swap-oob="true">0</span>"#,
            message_row(4, "No hay eventos registrados.", false)
        ),
        Ok(events) => {
            let rows: String = events
                .iter()
                .map(|e| {
                    format!(
                        r##"<tr data-event-row>
                            <td class="px-6 py-4 whitespace-nowrap text-sm font-medium text-gray-900">{}</td>
                            <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-500">{}</td>
                            <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-500">{}</td>
                            <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-500">{}</td>
                        </tr>"##,
                        html_escape(&e.device_label()),
                        html_escape(&e.action),
                        html_escape(e.username.as_deref().unwrap_or("N/A")),
                        html_escape(&e.timestamp_label()),
                    )
                })
                .collect();
            format!(r#"{rows}<span id="total-events" hx-swap-oob="true">{}</span>"#, events.len())
        }
        Err(message) => message_row(4, message, true),
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Action codes offered by the reports filter.
fn action_options(selected: Option<&str>) -> Vec<(String, String, bool)> {
    let mut options = vec![(String::new(), "Todas".to_string(), selected.is_none())];
    for device in DeviceId::ALL {
        for cmd in device.commands() {
            if let Ok(request) = ActionRequest::for_command(device, *cmd) {
                if options.iter().any(|(v, _, _)| *v == request.action) {
                    continue;
                }
                let is_selected = selected == Some(request.action.as_str());
                let label = format!("{} ({})", request.action, cmd.label());
                options.push((request.action, label, is_selected));
            }
        }
    }
    options
}

fn device_options(selected: Option<DeviceId>) -> Vec<(String, String, bool)> {
    std::iter::once((String::new(), "Todos".to_string(), selected.is_none()))
        .chain(DeviceId::ALL.iter().map(|d| {
            (d.slug().to_string(), d.label().to_string(), selected == Some(*d))
        }))
        .collect()
}

pub fn reports_page(chrome: &Chrome, filter: &ActionFilter, today: NaiveDate, results_html: &str) -> String {
    let limit_options: Vec<(String, String, bool)> = PAGE_SIZES
        .iter()
        .map(|n| (n.to_string(), n.to_string(), *n == filter.limit))
        .collect();
    let date_value = |d: Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
    let max = today.format("%Y-%m-%d");

    let content = format!(
        r##"{header}
        <form id="report-filters" hx-get="/reports/events" hx-target="#report-results" hx-swap="innerHTML"
              class="bg-white rounded-xl shadow-sm border border-gray-200 p-6 mb-6 grid grid-cols-1 md:grid-cols-5 gap-4 items-end">
            {limit}
            <div class="space-y-1">
                <label for="start_date" class="block text-sm font-medium text-gray-700">Fecha inicial</label>
                <input type="date" name="start_date" id="start_date" value="{start}" max="{max}"
                       class="w-full px-4 py-2 border border-gray-300 rounded-lg">
            </div>
            <div class="space-y-1">
                <label for="end_date" class="block text-sm font-medium text-gray-700">Fecha final</label>
                <input type="date" name="end_date" id="end_date" value="{end}" max="{max}"
                       class="w-full px-4 py-2 border border-gray-300 rounded-lg">
            </div>
            {action}
            {device}
            <div class="md:col-span-5 flex gap-3 justify-end">
                <button type="submit" class="bg-indigo-600 hover:bg-indigo-700 text-white px-4 py-2 rounded-lg font-medium">
                    <i class="fas fa-filter"></i> Filtrar
                </button>
                <button type="button" class="bg-gray-800 hover:bg-gray-900 text-white px-4 py-2 rounded-lg font-medium"
                        onclick="window.location = '/reports/pdf?' + new URLSearchParams(new FormData(document.getElementById('report-filters'))).toString()">
                    <i class="fas fa-file-pdf"></i> Exportar PDF
                </button>
            </div>
        </form>
        <div id="report-results">{results_html}</div>"##,
        header = page_header("Reportes", "Historial de acciones sobre los dispositivos"),
        limit = select("limit", "Registros por página", &limit_options),
        start = date_value(filter.start_date),
        end = date_value(filter.end_date),
        action = select("action", "Acción", &action_options(filter.action.as_deref())),
        device = select("device", "Dispositivo", &device_options(filter.device)),
    );
    layout(chrome, &content)
}

/// Results table with pagination controls that keep the current filters.
pub fn report_results(filter: &ActionFilter, result: &Result<Vec<ActionLogEntry>, String>) -> String {
    let entries = match result {
        Ok(entries) => entries,
        Err(message) => return error_banner(message),
    };
    if entries.is_empty() {
        return empty_state("magnifying-glass", "Sin resultados", "No hay registros para los filtros seleccionados.");
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                html_escape(&e.device_label()),
                html_escape(&e.action),
                html_escape(e.username.as_deref().unwrap_or("N/A")),
                html_escape(&e.timestamp_label()),
            ]
        })
        .collect();
    let info = PageInfo {
        page: filter.page,
        limit: filter.limit,
        rows: entries.len(),
    };
    let last_row = info.first_row() + entries.len() as u64 - 1;

    let nav_button = |enabled: bool, page: u32, label: &str| {
        if enabled {
            format!(
                r##"<button type="button" class="px-3 py-1 rounded-lg bg-gray-200 hover:bg-gray-300"
                        hx-get="/reports/events?{query}" hx-target="#report-results">{label}</button>"##,
                query = html_escape(&filter_query(filter, page)),
            )
        } else {
            format!(r##"<button type="button" disabled class="px-3 py-1 rounded-lg bg-gray-100 text-gray-400">{label}</button>"##)
        }
    };

    format!(
        r##"<div class="bg-white rounded-xl shadow-sm border border-gray-200">
            {table}
            <div class="flex items-center justify-between px-6 py-4 border-t border-gray-200 text-sm text-gray-600">
                <span>Mostrando {first}-{last_row} (página {page}) · Total: {total}</span>
                <div class="flex gap-2">{prev}{next}</div>
            </div>
        </div>"##,
        table = table(&["Dispositivo", "Acción", "Usuario", "Fecha"], &rows, "data-report-row"),
        first = info.first_row(),
        page = info.page,
        total = entries.len(),
        prev = nav_button(info.has_prev(), info.page.saturating_sub(1), "Anterior"),
        next = nav_button(info.has_next(), info.page + 1, "Siguiente"),
    )
}

/// Query string reproducing `filter` at `page`.
pub fn filter_query(filter: &ActionFilter, page: u32) -> String {
    let mut params = vec![("limit", filter.limit.to_string()), ("page", page.to_string())];
    if let Some(d) = filter.start_date {
        params.push(("start_date", d.format("%Y-%m-%d").to_string()));
    }
    if let Some(d) = filter.end_date {
        params.push(("end_date", d.format("%Y-%m-%d").to_string()));
    }
    if let Some(a) = &filter.action {
        params.push(("action", a.clone()));
    }
    if let Some(d) = filter.device {
        params.push(("device", d.slug().to_string()));
    }
    params
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

// =============================================================================
// Users
// =============================================================================

pub fn users_page(chrome: &Chrome, table_html: &str) -> String {
    let content = format!(
        r##"{header}
        <div class="flex items-center justify-between gap-4 mb-6">
            <div class="relative flex-1 max-w-md">
                <i class="fas fa-magnifying-glass absolute left-3 top-3 text-gray-400"></i>
                <input type="search" name="q" placeholder="Buscar por nombre, usuario o correo"
                       hx-get="/users/table" hx-trigger="keyup changed delay:300ms, search" hx-target="#users-table"
                       class="w-full pl-10 pr-4 py-2 border border-gray-300 rounded-lg">
            </div>
            <button type="button" hx-get="/users/new" hx-target="#user-modal" hx-swap="innerHTML"
                    class="bg-indigo-600 hover:bg-indigo-700 text-white px-4 py-2 rounded-lg font-medium">
                <i class="fas fa-plus"></i> Nuevo usuario
            </button>
        </div>
        <div id="users-table" class="bg-white rounded-xl shadow-sm border border-gray-200">{table_html}</div>
        <div id="user-modal"></div>"##,
        header = page_header("Usuarios", "Administración de cuentas"),
    );
    layout(chrome, &content)
}

/// Users table; `users` is already filtered.
pub fn users_table(users: &[&UserAccount], error: Option<&str>) -> String {
    if let Some(message) = error {
        return error_banner(message);
    }
    if users.is_empty() {
        return empty_state("users", "Sin usuarios", "Ningún usuario coincide con la búsqueda.");
    }
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            let status = if u.status {
                badge(u.status_label(), "green")
            } else {
                badge(u.status_label(), "red")
            };
            let actions = format!(
                r##"<div class="flex gap-2">
                    <button type="button" hx-get="/users/{id}/edit" hx-target="#user-modal" hx-swap="innerHTML"
                            class="p-2 text-gray-400 hover:text-indigo-600" title="Editar"><i class="fas fa-pen"></i></button>
                    <button type="button" hx-post="/users/{id}/delete" hx-target="#users-table" hx-swap="innerHTML"
                            hx-confirm="¿Eliminar al usuario {name}? Esta acción no se puede deshacer."
                            class="p-2 text-gray-400 hover:text-red-600" title="Eliminar"><i class="fas fa-trash"></i></button>
                </div>"##,
                id = u.id,
                name = html_escape(&u.username),
            );
            vec![
                html_escape(u.display_name()),
                html_escape(&u.username),
                html_escape(&u.email),
                status,
                html_escape(&u.created_label()),
                html_escape(&u.last_login_label()),
                actions,
            ]
        })
        .collect();
    table(
        &["Nombre", "Usuario", "Correo", "Estado", "Creado", "Último acceso", ""],
        &rows,
        "data-user-row",
    )
}

/// Create/edit modal. The edit form leaves passwords blank and shows the
/// active checkbox.
pub fn user_form_modal(mode: FormMode, id: Option<i64>, form: &UserForm, error: Option<&str>) -> String {
    let (title, action, password_hint) = match (mode, id) {
        (FormMode::Edit, Some(id)) => ("Editar usuario", format!("/users/{id}"), "Dejar en blanco para no cambiarla"),
        _ => ("Nuevo usuario", "/users".to_string(), ""),
    };
    let active = if mode == FormMode::Edit {
        let checked = if form.active.is_some() { "checked" } else { "" };
        format!(
            r##"<label class="flex items-center gap-2 text-sm text-gray-700">
                <input type="checkbox" name="active" value="on" {checked} class="rounded border-gray-300"> Activo
            </label>"##
        )
    } else {
        String::new()
    };
    let error_html = error.map(error_banner).unwrap_or_default();

    format!(
        r##"<div class="fixed inset-0 z-50 flex items-center justify-center bg-black/50" x-data="{{ open: true }}" x-show="open">
            <div class="bg-white rounded-xl shadow-xl p-6 w-full max-w-lg">
                <h3 class="text-lg font-semibold text-gray-900 mb-4">{title}</h3>
                {error_html}
                <form hx-post="{action}" hx-target="#users-table" hx-swap="innerHTML" class="space-y-4">
                    {full_name}
                    {username}
                    {email}
                    {password}
                    {confirm}
                    {active}
                    <div class="flex justify-end gap-3 pt-2">
                        <button type="button" @click="open = false; $el.closest('#user-modal').innerHTML = ''"
                                class="px-4 py-2 rounded-lg bg-gray-200 hover:bg-gray-300 text-gray-700">Cancelar</button>
                        <button type="submit" class="px-4 py-2 rounded-lg bg-indigo-600 hover:bg-indigo-700 text-white">Guardar</button>
                    </div>
                </form>
            </div>
        </div>"##,
        full_name = input("full_name", "Nombre completo", "text", &form.full_name, ""),
        username = input("username", "Usuario", "text", &form.username, ""),
        email = input("email", "Correo electrónico", "email", &form.email, ""),
        password = input("password", "Contraseña", "password", "", password_hint),
        confirm = input("confirm_password", "Confirmar contraseña", "password", "", password_hint),
    )
}

// =============================================================================
// Info
// =============================================================================

pub fn info_page(chrome: &Chrome) -> String {
    let project = card(
        "Proyecto",
        r##"<p class="text-gray-700">
            Sistema de control remoto para dos LEDs y un motor paso a paso conectados a un ESP32.
            Cada acción queda registrada con su usuario y fecha, y puede consultarse desde los
            reportes o exportarse en PDF.
        </p>"##,
    );
    let stack = card(
        "Arquitectura",
        r##"<ul class="space-y-2 text-gray-700">
            <li><i class="fas fa-microchip text-indigo-500 w-5"></i> ESP32 con LEDs y motor paso a paso</li>
            <li><i class="fas fa-server text-indigo-500 w-5"></i> API REST con autenticación por token</li>
            <li><i class="fas fa-display text-indigo-500 w-5"></i> Panel de administración web</li>
        </ul>"##,
    );
    let devices: String = DeviceId::ALL
        .iter()
        .map(|d| {
            let commands: Vec<&str> = d.commands().iter().map(|c| c.label()).collect();
            format!(
                r##"<div class="flex justify-between p-3 bg-gray-50 rounded-lg">
                    <span class="font-medium text-gray-800">{}</span>
                    <span class="text-sm text-gray-500">{}</span>
                </div>"##,
                d.label(),
                commands.join(", ")
            )
        })
        .collect();

    let content = format!(
        r##"{header}
        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
            {project}
            {stack}
        </div>
        <div class="mt-6">{devices_card}</div>"##,
        header = page_header("Información", "Acerca del sistema"),
        devices_card = card("Dispositivos", &format!(r#"<div class="space-y-2">{devices}</div>"#)),
    );
    layout(chrome, &content)
}
