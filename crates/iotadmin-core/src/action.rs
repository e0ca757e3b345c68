//! Action log entries and the report filter used to query them.

use crate::device::DeviceId;
use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page sizes offered by the reports page.
pub const PAGE_SIZES: [u32; 4] = [10, 25, 50, 100];

/// A recorded device command. Read-only on the client side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireLogEntry")]
pub struct ActionLogEntry {
    pub device: String,
    pub action: String,
    pub username: Option<String>,
    pub timestamp: String,
}

/// Log entry as the backend may send it. Older endpoints use Spanish keys,
/// and some rows carry more than one name for the same field; the English
/// key wins, then the report names, then the control names.
#[derive(Deserialize)]
struct WireLogEntry {
    device: Option<Value>,
    dispositivo: Option<Value>,
    id_device: Option<Value>,
    action: Option<String>,
    evento: Option<String>,
    valor: Option<String>,
    username: Option<String>,
    usuario: Option<String>,
    timestamp: Option<String>,
    fecha: Option<String>,
    created_at: Option<String>,
}

impl TryFrom<WireLogEntry> for ActionLogEntry {
    type Error = String;

    fn try_from(wire: WireLogEntry) -> Result<Self, Self::Error> {
        let device = wire
            .device
            .or(wire.dispositivo)
            .or(wire.id_device)
            .ok_or("missing field `device`")?;
        Ok(Self {
            device: string_or_number(device)?,
            action: wire
                .action
                .or(wire.evento)
                .or(wire.valor)
                .ok_or("missing field `action`")?,
            username: wire.username.or(wire.usuario),
            timestamp: wire
                .timestamp
                .or(wire.fecha)
                .or(wire.created_at)
                .ok_or("missing field `timestamp`")?,
        })
    }
}

impl ActionLogEntry {
    /// Device label, resolving numeric backend ids.
    pub fn device_label(&self) -> String {
        self.device
            .parse::<DeviceId>()
            .map(|d| d.label().to_string())
            .unwrap_or_else(|_| self.device.clone())
    }

    /// `dd/mm/YYYY HH:MM` when the timestamp parses, the raw string otherwise.
    pub fn timestamp_label(&self) -> String {
        parse_timestamp(&self.timestamp)
            .map(|ts| ts.format("%d/%m/%Y %H:%M").to_string())
            .unwrap_or_else(|| self.timestamp.clone())
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn string_or_number(value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(format!("expected string or number, got {other}")),
    }
}

/// Filters of the reports page and the control page's history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFilter {
    pub limit: u32,
    /// 1-based page number.
    pub page: u32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub action: Option<String>,
    pub device: Option<DeviceId>,
}

impl Default for ActionFilter {
    fn default() -> Self {
        Self {
            limit: PAGE_SIZES[0],
            page: 1,
            start_date: None,
            end_date: None,
            action: None,
            device: None,
        }
    }
}

impl ActionFilter {
    /// Latest `limit` entries, no filters.
    pub fn latest(limit: u32) -> Self {
        Self { limit, ..Self::default() }
    }

    pub fn skip(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Reject inverted ranges and dates in the future.
    pub fn validate(&self, today: NaiveDate) -> Result<(), CoreError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && start > end
        {
            return Err(CoreError::Validation(
                "La fecha inicial no puede ser posterior a la fecha final.".to_string(),
            ));
        }
        if self.start_date.is_some_and(|d| d > today) || self.end_date.is_some_and(|d| d > today) {
            return Err(CoreError::Validation(
                "Las fechas no pueden ser posteriores a hoy.".to_string(),
            ));
        }
        if self.limit == 0 {
            return Err(CoreError::Validation("El tamaño de página debe ser mayor que 0.".to_string()));
        }
        Ok(())
    }

    /// Query parameters for `GET /actions`. Both date bounds are inclusive
    /// and sent as `YYYY-MM-DD`.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("limit", self.limit.to_string()), ("skip", self.skip().to_string())];
        if let Some(start) = self.start_date {
            params.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            params.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(action) = self.action.as_deref().filter(|a| !a.is_empty()) {
            params.push(("action", action.to_string()));
        }
        if let Some(device) = self.device {
            params.push(("device_id", device.backend_id().to_string()));
        }
        params
    }

    /// Parameters for the PDF export: the same filters without paging.
    pub fn to_export_query(&self) -> Vec<(&'static str, String)> {
        self.to_query()
            .into_iter()
            .filter(|(k, _)| *k != "limit" && *k != "skip")
            .collect()
    }
}

/// Parse an optional `YYYY-MM-DD` form value; empty means "no bound".
pub fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, CoreError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| CoreError::InvalidDate(s.to_string())),
    }
}

/// Pagination state derived from a page of results. The backend returns
/// plain arrays, so a full page means there may be another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub rows: usize,
}

impl PageInfo {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.rows as u64 >= u64::from(self.limit) && self.limit > 0
    }

    /// 1-based index of the first row on this page.
    pub fn first_row(&self) -> u64 {
        if self.rows == 0 {
            0
        } else {
            u64::from(self.page.saturating_sub(1)) * u64::from(self.limit) + 1
        }
    }
}
