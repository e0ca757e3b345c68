//! Aggregate metrics shown on the dashboard page.
//!
//! The backend computes everything; these types only describe the payloads
//! of the six `/logs/*` endpoints and a few presentation helpers.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Fallback colours for series points the backend sends without one.
pub const PALETTE: [&str; 6] = ["#4F46E5", "#34D399", "#EF4444", "#FBBF24", "#10B981", "#1F2937"];

/// `GET /logs/summary`: the KPI strip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, alias = "ledTotalEncendidos", alias = "led_total_on")]
    pub led_on_total: u64,
    #[serde(default, alias = "movimientosGeneral", deserialize_with = "lenient_string")]
    pub movements: String,
    #[serde(default, alias = "girosDerecha")]
    pub right_turns: u64,
    #[serde(default, alias = "girosIzquierda")]
    pub left_turns: u64,
    #[serde(default, alias = "girosDetenidos")]
    pub stops: u64,
}

/// One labelled count in a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub count: u64,
    #[serde(default)]
    pub color: Option<String>,
}

/// `events-by-device`, `motor-direction` and `leds-usage` payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub data: Vec<SeriesPoint>,
}

impl Series {
    /// Colour of point `index`, falling back to the palette.
    pub fn color(&self, index: usize) -> String {
        self.data
            .get(index)
            .and_then(|p| p.color.clone())
            .unwrap_or_else(|| PALETTE[index % PALETTE.len()].to_string())
    }

    /// Share of `total` for point `index`, one decimal.
    pub fn percent(&self, index: usize) -> f64 {
        let total = if self.total > 0 {
            self.total
        } else {
            self.data.iter().map(|p| p.count).sum()
        };
        match self.data.get(index) {
            Some(p) if total > 0 => ((p.count as f64 / total as f64) * 1000.0).round() / 10.0,
            _ => 0.0,
        }
    }
}

/// `registration-by-user`: who issued how many actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserShare {
    #[serde(alias = "username")]
    pub user: String,
    pub count: u64,
    #[serde(default)]
    pub percent: f64,
}

/// `usage-by-hour`: one point per hour of day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourPoint {
    #[serde(deserialize_with = "hour_of_day")]
    pub hour: u8,
    #[serde(alias = "count", alias = "minutes")]
    pub value: u64,
}

/// Spread points over 24 slots; hours without data are zero.
pub fn hourly_slots(points: &[HourPoint]) -> [u64; 24] {
    let mut slots = [0u64; 24];
    for p in points {
        if let Some(slot) = slots.get_mut(usize::from(p.hour)) {
            *slot += p.value;
        }
    }
    slots
}

/// `"00:00"` .. `"23:00"`.
pub fn hour_labels() -> Vec<String> {
    (0..24).map(|h| format!("{h:02}:00")).collect()
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn hour_of_day<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let hour = match &value {
        Value::Number(n) => n.as_u64(),
        // "07:00" or "7"
        Value::String(s) => s.split(':').next().and_then(|h| h.trim().parse().ok()),
        _ => None,
    };
    hour.filter(|h| *h < 24)
        .map(|h| h as u8)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid hour {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_accepts_both_spellings() {
        let a: MetricsSummary = serde_json::from_value(json!({
            "status": "ON", "ledTotalEncendidos": 728, "movimientosGeneral": "64 / 70",
            "girosDerecha": 10, "girosIzquierda": 11, "girosDetenidos": 12
        }))
        .unwrap();
        let b: MetricsSummary = serde_json::from_value(json!({
            "status": true, "led_on_total": 728, "movements": 64,
            "right_turns": 10, "left_turns": 11, "stops": 12
        }))
        .unwrap();
        assert_eq!(a.led_on_total, b.led_on_total);
        assert_eq!(a.movements, "64 / 70");
        assert_eq!(b.movements, "64");
        assert_eq!(b.status, "true");
    }

    #[test]
    fn series_percent_and_colors() {
        let s: Series = serde_json::from_value(json!({
            "total": 0,
            "data": [{"label": "Derecha", "count": 1}, {"label": "Izquierda", "count": 3, "color": "#000000"}]
        }))
        .unwrap();
        assert_eq!(s.percent(0), 25.0);
        assert_eq!(s.percent(1), 75.0);
        assert_eq!(s.percent(5), 0.0);
        assert_eq!(s.color(0), PALETTE[0]);
        assert_eq!(s.color(1), "#000000");
    }

    #[test]
    fn hourly_slots_fill_gaps() {
        let points: Vec<HourPoint> = serde_json::from_value(json!([
            {"hour": "07:00", "value": 5},
            {"hour": 23, "count": 2}
        ]))
        .unwrap();
        let slots = hourly_slots(&points);
        assert_eq!(slots[7], 5);
        assert_eq!(slots[23], 2);
        assert_eq!(slots.iter().sum::<u64>(), 7);
        assert_eq!(hour_labels()[9], "09:00");
    }

    #[test]
    fn out_of_range_hour_rejected() {
        let r: Result<HourPoint, _> = serde_json::from_value(json!({"hour": 24, "value": 1}));
        assert!(r.is_err());
    }
}
