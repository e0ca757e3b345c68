//! HTML templates for the dashboard.
//!
//! Uses a simple template approach with Tailwind CSS, HTMX and Alpine.js.

/// Sidebar entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Dashboard,
    Info,
    Control,
    Users,
    Reports,
}

impl Nav {
    pub const ALL: [Nav; 5] = [Nav::Dashboard, Nav::Info, Nav::Control, Nav::Users, Nav::Reports];

    pub fn path(self) -> &'static str {
        match self {
            Nav::Dashboard => "/dashboard",
            Nav::Info => "/info",
            Nav::Control => "/control",
            Nav::Users => "/users",
            Nav::Reports => "/reports",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Nav::Dashboard => "Dashboard",
            Nav::Info => "Información",
            Nav::Control => "Control",
            Nav::Users => "Usuarios",
            Nav::Reports => "Reportes",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Nav::Dashboard => "chart-line",
            Nav::Info => "circle-info",
            Nav::Control => "sliders",
            Nav::Users => "users",
            Nav::Reports => "file-lines",
        }
    }
}

/// What the shared chrome needs besides the page body.
#[derive(Debug, Clone)]
pub struct Chrome {
    pub title: String,
    pub active: Nav,
    pub user_name: String,
    pub alerts: Vec<String>,
}

/// Base HTML document: head, scripts and an empty body wrapper.
fn document(title: &str, body_attrs: &str, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - IoT Admin</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script defer src="https://unpkg.com/alpinejs@3.x.x/dist/cdn.min.js"></script>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">
    <style>
        [x-cloak] {{ display: none !important; }}
        .htmx-indicator {{ display: none; }}
        .htmx-request .htmx-indicator {{ display: inline-block; }}
        .htmx-request.htmx-indicator {{ display: inline-block; }}
    </style>
</head>
<body {body_attrs}>
{body}
    <script>
        document.body.addEventListener('htmx:afterSwap', function(evt) {{
            if (typeof Alpine !== 'undefined') {{
                Alpine.initTree(evt.detail.target);
            }}
        }});
        document.body.addEventListener('htmx:afterSettle', function() {{
            document.querySelectorAll('#toast-stack [data-toast]').forEach(function(t) {{
                setTimeout(function() {{ t.remove(); }}, 5000);
            }});
        }});
    </script>
</body>
</html>"##
    )
}

/// Authenticated page: sidebar, topbar, toasts and the logout modal.
pub fn layout(chrome: &Chrome, content: &str) -> String {
    let body = format!(
        r##"    {SIDEBAR}
    <div class="ml-64 min-h-screen flex flex-col">
        {TOPBAR}
        <main class="flex-1 p-6 lg:p-8">
            <div class="max-w-7xl mx-auto">
                {content}
            </div>
        </main>
    </div>
    {TOASTS}
    {LOGOUT}"##,
        SIDEBAR = sidebar(chrome.active),
        TOPBAR = topbar(&chrome.user_name),
        TOASTS = toast_stack(&chrome.alerts, false),
        LOGOUT = logout_modal(),
    );
    document(
        &html_escape(&chrome.title),
        r#"class="bg-gray-50 min-h-screen" x-data="{ logoutOpen: false }""#,
        &body,
    )
}

/// Centered card page without chrome (login, register).
pub fn bare_layout(title: &str, content: &str) -> String {
    let body = format!(
        r##"    <div class="w-full max-w-md">
        <div class="text-center mb-8">
            <div class="inline-flex items-center justify-center w-14 h-14 bg-white/10 rounded-2xl mb-4">
                <i class="fas fa-microchip text-white text-2xl"></i>
            </div>
            <h1 class="text-2xl font-bold text-white">IoT Admin</h1>
            <p class="text-indigo-200">Control de LEDs y motor paso a paso</p>
        </div>
        <div class="bg-white rounded-2xl shadow-2xl p-8">
            {content}
        </div>
    </div>"##
    );
    document(
        title,
        r#"class="bg-gradient-to-br from-indigo-600 via-indigo-700 to-indigo-900 min-h-screen flex items-center justify-center p-4""#,
        &body,
    )
}

fn sidebar(active: Nav) -> String {
    let links: String = Nav::ALL
        .iter()
        .map(|nav| {
            let state = if *nav == active {
                "bg-indigo-50 text-indigo-600 font-semibold"
            } else {
                "text-gray-700 hover:bg-gray-100"
            };
            format!(
                r##"<a href="{path}" class="flex items-center gap-3 p-3 rounded-lg transition {state}">
                    <i class="fas fa-{icon} w-5"></i>
                    <span>{label}</span>
                </a>"##,
                path = nav.path(),
                icon = nav.icon(),
                label = nav.label(),
            )
        })
        .collect();

    format!(
        r##"<aside class="fixed left-0 top-0 h-screen w-64 bg-white border-r border-gray-200 flex flex-col justify-between">
        <div>
            <div class="flex items-center gap-2 p-6 font-bold text-lg">
                <div class="bg-indigo-600 p-2 rounded-lg">
                    <i class="fas fa-chart-column text-white"></i>
                </div>
                <span class="text-gray-900">Motor paso a paso</span>
            </div>
            <nav class="flex flex-col gap-1 mt-4 px-2">
                {links}
            </nav>
        </div>
        <div class="p-4">
            <button type="button" @click="logoutOpen = true"
                    class="flex items-center justify-center gap-2 bg-indigo-600 text-white px-4 py-3 rounded-lg w-full font-medium hover:bg-indigo-700 transition shadow-md">
                <i class="fas fa-right-from-bracket"></i>
                <span>Cerrar Sesión</span>
            </button>
        </div>
    </aside>"##
    )
}

fn topbar(user_name: &str) -> String {
    let name = if user_name.is_empty() { "Usuario" } else { user_name };
    format!(
        r##"<header class="sticky top-0 z-10 w-full bg-white shadow-sm border-b border-gray-100">
            <div class="flex justify-end items-center h-16 px-6" x-data="{{ menuOpen: false }}">
                <div class="relative">
                    <button type="button" @click="menuOpen = !menuOpen" @click.outside="menuOpen = false"
                            class="flex items-center gap-3 p-2 rounded-full hover:bg-gray-50 transition">
                        <span class="w-9 h-9 rounded-full bg-indigo-100 text-indigo-600 flex items-center justify-center">
                            <i class="fas fa-user"></i>
                        </span>
                        <span id="topbar-user" class="text-gray-800 font-medium text-sm">{name}</span>
                        <i class="fas fa-chevron-down text-xs text-gray-500"></i>
                    </button>
                    <div x-show="menuOpen" x-cloak
                         class="absolute right-0 mt-2 w-48 bg-white rounded-xl shadow-lg ring-1 ring-black/5 z-50">
                        <button type="button" @click="logoutOpen = true; menuOpen = false"
                                class="w-full flex items-center gap-2 px-4 py-2 text-sm text-red-600 hover:bg-red-50">
                            <i class="fas fa-right-from-bracket"></i>
                            <span>Cerrar sesión</span>
                        </button>
                    </div>
                </div>
            </div>
        </header>"##,
        name = html_escape(name),
    )
}

fn logout_modal() -> &'static str {
    r##"<div x-show="logoutOpen" x-cloak class="fixed inset-0 z-50 flex items-center justify-center bg-black/50">
        <div class="bg-white rounded-xl shadow-xl p-6 w-full max-w-sm" @click.outside="logoutOpen = false">
            <h3 class="text-lg font-semibold text-gray-900">Cerrar sesión</h3>
            <p class="mt-2 text-sm text-gray-600">¿Está seguro de que desea cerrar sesión?</p>
            <form method="POST" action="/logout" class="mt-6 flex justify-end gap-3">
                <button type="button" @click="logoutOpen = false"
                        class="px-4 py-2 rounded-lg bg-gray-200 hover:bg-gray-300 text-gray-700">Cancelar</button>
                <button type="submit" class="px-4 py-2 rounded-lg bg-red-600 hover:bg-red-700 text-white">Cerrar sesión</button>
            </form>
        </div>
    </div>"##
}

/// Toast container. With `oob` set it is appended to the page's existing
/// container from an HTMX fragment response.
pub fn toast_stack(messages: &[String], oob: bool) -> String {
    let toasts: String = messages
        .iter()
        .map(|m| {
            format!(
                r##"<div data-toast class="bg-red-500 text-white px-6 py-3 rounded-lg shadow-lg">{}</div>"##,
                html_escape(m)
            )
        })
        .collect();
    if oob {
        if toasts.is_empty() {
            return String::new();
        }
        format!(r##"<div id="toast-stack" hx-swap-oob="beforeend">{toasts}</div>"##)
    } else {
        format!(r##"<div id="toast-stack" class="fixed bottom-4 right-4 z-50 space-y-2">{toasts}</div>"##)
    }
}

/// Page heading with an optional subtitle.
pub fn page_header(title: &str, subtitle: &str) -> String {
    format!(
        r##"<div class="mb-8">
            <h1 class="text-3xl font-bold text-gray-900">{title}</h1>
            <p class="mt-2 text-gray-600">{subtitle}</p>
        </div>"##
    )
}

/// Card component.
pub fn card(title: &str, content: &str) -> String {
    format!(
        r##"<div class="bg-white rounded-xl shadow-sm border border-gray-200 overflow-hidden">
            <div class="px-6 py-4 border-b border-gray-200">
                <h3 class="text-lg font-semibold text-gray-900">{title}</h3>
            </div>
            <div class="p-6">
                {content}
            </div>
        </div>"##
    )
}

/// Stats card component.
pub fn stats_card(title: &str, value: &str, icon: &str, color: &str) -> String {
    format!(
        r##"<div class="bg-white rounded-xl shadow-sm border border-gray-200 p-6">
            <div class="flex items-center justify-between">
                <div>
                    <p class="text-sm text-gray-500">{title}</p>
                    <p class="text-2xl font-bold text-gray-900 mt-1">{value}</p>
                </div>
                <div class="w-12 h-12 rounded-full bg-{color}-100 flex items-center justify-center">
                    <i class="fas fa-{icon} text-{color}-500 text-xl"></i>
                </div>
            </div>
        </div>"##,
        value = html_escape(value),
    )
}

/// Input field component.
pub fn input(name: &str, label: &str, input_type: &str, value: &str, placeholder: &str) -> String {
    format!(
        r##"<div class="space-y-1">
            <label for="{name}" class="block text-sm font-medium text-gray-700">{label}</label>
            <input type="{input_type}" name="{name}" id="{name}" value="{value}" placeholder="{placeholder}"
                   class="w-full px-4 py-2 border border-gray-300 rounded-lg bg-white text-gray-900 focus:ring-2 focus:ring-indigo-500 focus:border-indigo-500">
        </div>"##,
        value = html_escape(value),
    )
}

/// Select field component.
pub fn select(name: &str, label: &str, options: &[(String, String, bool)]) -> String {
    let options_html: String = options
        .iter()
        .map(|(value, text, selected)| {
            let selected = if *selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{selected}>{}</option>"#,
                html_escape(value),
                html_escape(text)
            )
        })
        .collect();

    format!(
        r##"<div class="space-y-1">
            <label for="{name}" class="block text-sm font-medium text-gray-700">{label}</label>
            <select name="{name}" id="{name}"
                    class="w-full px-4 py-2 border border-gray-300 rounded-lg bg-white text-gray-900 focus:ring-2 focus:ring-indigo-500 focus:border-indigo-500">
                {options_html}
            </select>
        </div>"##
    )
}

/// Badge component.
pub fn badge(text: &str, color: &str) -> String {
    format!(
        r##"<span class="inline-flex items-center px-2.5 py-0.5 rounded-full text-xs font-medium bg-{color}-100 text-{color}-800">{text}</span>"##,
        text = html_escape(text),
    )
}

/// Table component. Cells are inserted as-is; escape them first.
pub fn table(headers: &[&str], rows: &[Vec<String>], row_attr: &str) -> String {
    let headers_html: String = headers
        .iter()
        .map(|h| format!(r#"<th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">{h}</th>"#))
        .collect();

    let rows_html: String = rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|cell| format!(r#"<td class="px-6 py-4 whitespace-nowrap text-sm text-gray-900">{cell}</td>"#))
                .collect();
            format!(r#"<tr {row_attr} class="hover:bg-gray-50">{cells}</tr>"#)
        })
        .collect();

    format!(
        r##"<div class="overflow-x-auto">
            <table class="min-w-full divide-y divide-gray-200">
                <thead class="bg-gray-50">
                    <tr>{headers_html}</tr>
                </thead>
                <tbody class="bg-white divide-y divide-gray-200">
                    {rows_html}
                </tbody>
            </table>
        </div>"##
    )
}

/// Single full-width message row for a table that failed to load or is empty.
pub fn message_row(colspan: usize, message: &str, is_error: bool) -> String {
    let color = if is_error { "text-red-500" } else { "text-gray-500" };
    format!(
        r##"<tr><td colspan="{colspan}" class="px-6 py-4 text-sm {color} text-center">{}</td></tr>"##,
        html_escape(message)
    )
}

/// Inline error banner.
pub fn error_banner(message: &str) -> String {
    format!(
        r##"<div class="mb-4 p-4 bg-red-50 border border-red-200 rounded-lg flex items-center gap-3">
            <i class="fas fa-circle-exclamation text-red-500"></i>
            <span class="text-red-700">{}</span>
        </div>"##,
        html_escape(message)
    )
}

/// Inline success banner.
pub fn success_banner(message: &str) -> String {
    format!(
        r##"<div class="mb-4 p-4 bg-green-50 border border-green-200 rounded-lg flex items-center gap-3">
            <i class="fas fa-circle-check text-green-500"></i>
            <span class="text-green-700">{}</span>
        </div>"##,
        html_escape(message)
    )
}

/// Empty state component.
pub fn empty_state(icon: &str, title: &str, description: &str) -> String {
    format!(
        r##"<div class="text-center py-12">
            <i class="fas fa-{icon} text-4xl text-gray-400 mb-4"></i>
            <h3 class="text-lg font-medium text-gray-900">{title}</h3>
            <p class="mt-1 text-gray-500">{}</p>
        </div>"##,
        html_escape(description)
    )
}

/// Simple HTML escape function
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_marks_active_link_and_escapes_user() {
        let chrome = Chrome {
            title: "Control".into(),
            active: Nav::Control,
            user_name: "<Ana>".into(),
            alerts: vec!["No tienes permisos para realizar esta acción.".into()],
        };
        let html = layout(&chrome, "<p>body</p>");
        assert!(html.contains(r#"href="/control" class="flex items-center gap-3 p-3 rounded-lg transition bg-indigo-50"#));
        assert!(html.contains("&lt;Ana&gt;"));
        assert!(html.contains("No tienes permisos"));
        assert!(html.contains(r#"action="/logout""#));
    }

    #[test]
    fn oob_toasts_skip_when_empty() {
        assert!(toast_stack(&[], true).is_empty());
        assert!(toast_stack(&["x".into()], true).contains("hx-swap-oob"));
    }
}
