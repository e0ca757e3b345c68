//! CLI command implementations.

pub mod devices;
pub mod metrics;
pub mod reports;
pub mod serve;
pub mod session;
pub mod users;

use anyhow::{Context, bail};
use iotadmin_client::{ApiClient, LogEffects, SessionManager, create_storage};
use iotadmin_core::IotAdminConfig;
use std::sync::Arc;

/// API client over the configured session store. Navigation and alerts
/// from the interceptors only go to the log; errors are returned anyway.
pub async fn connect(config: &IotAdminConfig) -> anyhow::Result<ApiClient> {
    let storage = create_storage(&config.session)
        .await
        .with_context(|| format!("opening session store {}", config.session.path.display()))?;
    let client = ApiClient::new(&config.api, SessionManager::new(storage), Arc::new(LogEffects))?;
    Ok(client)
}

/// `connect` plus the route guard.
pub async fn connect_authenticated(config: &IotAdminConfig) -> anyhow::Result<ApiClient> {
    let client = connect(config).await?;
    if !client.require_auth().await {
        bail!("not logged in, run `iotadmin login <username>` first");
    }
    Ok(client)
}

/// Left-aligned text table.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.to_vec())];
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push(line(rule.iter().map(String::as_str).collect()));
    for row in rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}
