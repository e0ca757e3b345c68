//! Action log commands.
//!
//! `iotadmin logs` - Latest events.
//! `iotadmin report` - Filtered, paged report or PDF export.

use super::{connect_authenticated, render_table};
use anyhow::Context;
use iotadmin_core::action::{ActionFilter, ActionLogEntry, PageInfo, parse_date};
use iotadmin_core::{DeviceId, IotAdminConfig};
use std::path::PathBuf;

/// Report filters as given on the command line.
#[derive(Debug, Clone)]
pub struct ReportArgs {
    pub limit: u32,
    pub page: u32,
    pub from: Option<String>,
    pub to: Option<String>,
    pub action: Option<String>,
    pub device: Option<DeviceId>,
}

impl ReportArgs {
    pub fn to_filter(&self) -> anyhow::Result<ActionFilter> {
        Ok(ActionFilter {
            limit: self.limit,
            page: self.page.max(1),
            start_date: parse_date(self.from.as_deref())?,
            end_date: parse_date(self.to.as_deref())?,
            action: self.action.as_ref().map(|a| a.trim().to_uppercase()).filter(|a| !a.is_empty()),
            device: self.device,
        })
    }
}

pub fn render_entries(entries: &[ActionLogEntry]) -> String {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                e.device_label(),
                e.action.clone(),
                e.username.clone().unwrap_or_else(|| "N/A".to_string()),
                e.timestamp_label(),
            ]
        })
        .collect();
    render_table(&["Dispositivo", "Acción", "Usuario", "Fecha"], &rows)
}

pub async fn logs(config: &IotAdminConfig, limit: u32) -> anyhow::Result<()> {
    let client = connect_authenticated(config).await?;
    let entries = client.devices().history(limit).await?;
    if entries.is_empty() {
        println!("No hay eventos registrados.");
    } else {
        println!("{}", render_entries(&entries));
        println!("\nTotal: {}", entries.len());
    }
    Ok(())
}

pub async fn report(config: &IotAdminConfig, args: ReportArgs, pdf: Option<PathBuf>) -> anyhow::Result<()> {
    let filter = args.to_filter()?;
    let client = connect_authenticated(config).await?;

    if let Some(path) = pdf {
        let bytes = client.reports().export_pdf(&filter).await?;
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        println!("✔ Reporte PDF guardado en {} ({} bytes)", path.display(), bytes.len());
        return Ok(());
    }

    let entries = client.reports().events(&filter).await?;
    if entries.is_empty() {
        println!("No hay registros para los filtros seleccionados.");
        return Ok(());
    }
    let info = PageInfo {
        page: filter.page,
        limit: filter.limit,
        rows: entries.len(),
    };
    println!("{}", render_entries(&entries));
    println!(
        "\nRegistros {}-{} (página {}){}",
        info.first_row(),
        info.first_row() + entries.len() as u64 - 1,
        info.page,
        if info.has_next() {
            format!(", siguiente: --page {}", info.page + 1)
        } else {
            String::new()
        }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn args() -> ReportArgs {
        ReportArgs {
            limit: 25,
            page: 0,
            from: Some("2025-01-01".into()),
            to: Some("2025-01-31".into()),
            action: Some(" led_on ".into()),
            device: None,
        }
    }

    #[test]
    fn args_become_filter() {
        let filter = args().to_filter().unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.start_date, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(filter.end_date, NaiveDate::from_ymd_opt(2025, 1, 31));
        assert_eq!(filter.action.as_deref(), Some("LED_ON"));
    }

    #[test]
    fn bad_date_is_an_error() {
        let mut bad = args();
        bad.from = Some("31/01/2025".into());
        assert!(bad.to_filter().is_err());
    }
}
