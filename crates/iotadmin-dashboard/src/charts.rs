//! Chart.js configurations, built server-side and embedded as JSON.

use iotadmin_core::metrics::{HourPoint, Series, hour_labels, hourly_slots};
use serde_json::{Value, json};

const PRIMARY: &str = "#4F46E5";
const PRIMARY_FILL: &str = "rgba(79, 70, 229, 0.2)";
const BAR_COLORS: [&str; 2] = ["#1F2937", "#6366F1"];

/// Bar chart of events per device.
pub fn events_by_device(series: &Series) -> Value {
    json!({
        "type": "bar",
        "data": {
            "labels": series.data.iter().map(|p| p.label.as_str()).collect::<Vec<_>>(),
            "datasets": [{
                "label": "Eventos",
                "data": series.data.iter().map(|p| p.count).collect::<Vec<_>>(),
                "backgroundColor": BAR_COLORS,
                "borderRadius": 4
            }]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": { "legend": { "display": false } },
            "scales": {
                "x": { "grid": { "display": false } },
                "y": { "beginAtZero": true }
            }
        }
    })
}

/// Donut chart; colours fall back to the palette when the backend omits them.
pub fn donut(series: &Series) -> Value {
    let colors: Vec<String> = (0..series.data.len()).map(|i| series.color(i)).collect();
    json!({
        "type": "doughnut",
        "data": {
            "labels": series.data.iter().map(|p| p.label.as_str()).collect::<Vec<_>>(),
            "datasets": [{
                "data": series.data.iter().map(|p| p.count).collect::<Vec<_>>(),
                "backgroundColor": colors,
                "hoverOffset": 4
            }]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "cutout": "80%",
            "plugins": { "legend": { "display": false } }
        }
    })
}

/// Area chart over the 24 hours of the day.
pub fn usage_by_hour(points: &[HourPoint]) -> Value {
    json!({
        "type": "line",
        "data": {
            "labels": hour_labels(),
            "datasets": [{
                "label": "Uso (minutos)",
                "data": hourly_slots(points).to_vec(),
                "borderColor": PRIMARY,
                "backgroundColor": PRIMARY_FILL,
                "fill": true,
                "tension": 0.3,
                "pointRadius": 0
            }]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": { "legend": { "display": false } },
            "scales": {
                "x": { "grid": { "display": false } },
                "y": { "beginAtZero": true }
            }
        }
    })
}

/// JSON safe to embed inside a `<script>` element.
pub fn embed(config: &Value) -> String {
    config.to_string().replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use iotadmin_core::metrics::SeriesPoint;

    fn series() -> Series {
        Series {
            total: 94,
            data: vec![
                SeriesPoint { label: "Giros Derecha".into(), count: 35, color: Some("#4F46E5".into()) },
                SeriesPoint { label: "Giros Izquierda".into(), count: 59, color: None },
            ],
        }
    }

    #[test]
    fn donut_fills_missing_colors() {
        let config = donut(&series());
        let colors = &config["data"]["datasets"][0]["backgroundColor"];
        assert_eq!(colors[0], "#4F46E5");
        assert!(colors[1].as_str().unwrap().starts_with('#'));
        assert_eq!(config["options"]["cutout"], "80%");
    }

    #[test]
    fn hourly_chart_has_24_points() {
        let config = usage_by_hour(&[HourPoint { hour: 7, value: 12 }]);
        let data = config["data"]["datasets"][0]["data"].as_array().unwrap();
        assert_eq!(data.len(), 24);
        assert_eq!(data[7], 12);
    }

    #[test]
    fn embed_breaks_script_close() {
        let value = json!({"label": "</script>"});
        assert!(!embed(&value).contains("</script>"));
    }
}
