//! `iotadmin metrics` - Print the dashboard metrics.

use super::{connect_authenticated, render_table};
use iotadmin_client::{ApiError, DashboardData};
use iotadmin_core::IotAdminConfig;
use iotadmin_core::metrics::{Series, hourly_slots};
use serde_json::{Value, json};

fn to_json<T: serde::Serialize>(result: &Result<T, ApiError>) -> Value {
    match result {
        Ok(value) => serde_json::to_value(value).unwrap_or(Value::Null),
        Err(e) => json!({ "error": e.user_message() }),
    }
}

pub fn data_to_json(data: &DashboardData) -> Value {
    json!({
        "summary": to_json(&data.summary),
        "events_by_device": to_json(&data.events_by_device),
        "registration_by_user": to_json(&data.registration_by_user),
        "motor_direction": to_json(&data.motor_direction),
        "leds_usage": to_json(&data.leds_usage),
        "usage_by_hour": to_json(&data.usage_by_hour),
    })
}

fn series_section(title: &str, result: &Result<Series, ApiError>) -> String {
    let body = match result {
        Ok(series) => {
            let rows: Vec<Vec<String>> = series
                .data
                .iter()
                .enumerate()
                .map(|(i, p)| vec![p.label.clone(), p.count.to_string(), format!("{}%", series.percent(i))])
                .collect();
            render_table(&["", "Total", "%"], &rows)
        }
        Err(e) => format!("✘ {}", e.user_message()),
    };
    format!("== {title} ==\n{body}")
}

pub fn render(data: &DashboardData) -> String {
    let mut sections = Vec::new();

    sections.push(match &data.summary {
        Ok(s) => format!(
            "== Resumen ==\nEstado: {}\nLED encendidos: {}\nMovimientos: {}\nGiros derecha: {}  izquierda: {}  detenidos: {}",
            s.status, s.led_on_total, s.movements, s.right_turns, s.left_turns, s.stops
        ),
        Err(e) => format!("== Resumen ==\n✘ {}", e.user_message()),
    });
    sections.push(series_section("Eventos por dispositivo", &data.events_by_device));
    sections.push(match &data.registration_by_user {
        Ok(list) => {
            let rows: Vec<Vec<String>> = list
                .iter()
                .map(|u| vec![u.user.clone(), u.count.to_string(), format!("{}%", u.percent)])
                .collect();
            format!("== Registro por usuario ==\n{}", render_table(&["Usuario", "Total", "%"], &rows))
        }
        Err(e) => format!("== Registro por usuario ==\n✘ {}", e.user_message()),
    });
    sections.push(series_section("Dirección del motor", &data.motor_direction));
    sections.push(series_section("LEDs encendidos", &data.leds_usage));
    sections.push(match &data.usage_by_hour {
        Ok(points) => {
            let rows: Vec<Vec<String>> = hourly_slots(points)
                .iter()
                .enumerate()
                .filter(|(_, minutes)| **minutes > 0)
                .map(|(hour, minutes)| vec![format!("{hour:02}:00"), minutes.to_string()])
                .collect();
            format!("== Uso por horas (minutos) ==\n{}", render_table(&["Hora", "Uso"], &rows))
        }
        Err(e) => format!("== Uso por horas (minutos) ==\n✘ {}", e.user_message()),
    });

    sections.join("\n\n")
}

pub async fn show(config: &IotAdminConfig, as_json: bool) -> anyhow::Result<()> {
    let client = connect_authenticated(config).await?;
    let data = client.dashboard().load_all().await;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&data_to_json(&data))?);
    } else {
        println!("{}", render(&data));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iotadmin_core::metrics::{HourPoint, MetricsSummary};

    fn data() -> DashboardData {
        DashboardData {
            summary: Ok(MetricsSummary {
                status: "Giro Derecha".into(),
                led_on_total: 12,
                ..MetricsSummary::default()
            }),
            events_by_device: Ok(Series::default()),
            registration_by_user: Err(ApiError::Network("refused".into())),
            motor_direction: Ok(Series::default()),
            leds_usage: Ok(Series::default()),
            usage_by_hour: Ok(vec![HourPoint { hour: 9, value: 30 }]),
        }
    }

    #[test]
    fn failed_sections_do_not_hide_the_rest() {
        let text = render(&data());
        assert!(text.contains("LED encendidos: 12"));
        assert!(text.contains("No se pudo conectar"));
        assert!(text.contains("09:00"));
    }

    #[test]
    fn json_marks_errors() {
        let value = data_to_json(&data());
        assert_eq!(value["summary"]["led_on_total"], 12);
        assert!(value["registration_by_user"]["error"].is_string());
    }
}
