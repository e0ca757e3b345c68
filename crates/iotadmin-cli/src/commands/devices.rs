//! Device commands.
//!
//! `iotadmin devices` - Print the state of every device.
//! `iotadmin control` - Send one command.
//! `iotadmin watch` - Follow the state until ctrl-c.

use super::{connect_authenticated, render_table};
use iotadmin_client::DeviceController;
use iotadmin_core::{DeviceBoard, DeviceCommand, DeviceId, IotAdminConfig};
use std::time::Duration;

pub fn render_board(board: &DeviceBoard) -> String {
    let rows: Vec<Vec<String>> = board
        .iter()
        .map(|(device, state)| vec![device.label().to_string(), state.label().to_string()])
        .collect();
    render_table(&["Dispositivo", "Estado"], &rows)
}

pub async fn status(config: &IotAdminConfig) -> anyhow::Result<()> {
    let client = connect_authenticated(config).await?;
    let records = client.devices().status().await?;

    let mut board = DeviceBoard::default();
    let merged = board.merge_status(&records);
    if merged < records.len() {
        tracing::warn!(
            received = records.len(),
            merged,
            "some status records did not match a known device"
        );
    }
    println!("{}", render_board(&board));
    Ok(())
}

pub async fn control(config: &IotAdminConfig, device: DeviceId, command: DeviceCommand) -> anyhow::Result<()> {
    let client = connect_authenticated(config).await?;
    let controller = DeviceController::new();
    let state = controller.send(&client, device, command).await?;
    println!("✔ {device}: {state}");
    Ok(())
}

pub async fn watch(config: &IotAdminConfig, interval: Option<u64>) -> anyhow::Result<()> {
    let client = connect_authenticated(config).await?;
    let period = interval
        .filter(|s| *s > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.dashboard.control_poll());
    let controller = DeviceController::new();
    let mut ticker = tokio::time::interval(period);
    let mut last: Option<DeviceBoard> = None;

    println!("Consultando cada {}s, ctrl-c para salir.", period.as_secs());
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }

        match controller.refresh(&client).await {
            Ok(Some(_)) => {
                let board = controller.snapshot().await;
                if last.as_ref() != Some(&board) {
                    println!("\n[{}]", chrono::Local::now().format("%H:%M:%S"));
                    println!("{}", render_board(&board));
                    last = Some(board);
                }
            }
            Ok(None) => {}
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => eprintln!("✘ {}", e.user_message()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_lists_all_devices() {
        let mut board = DeviceBoard::default();
        board.apply(DeviceId::Led2, DeviceCommand::TurnOn).unwrap();
        let text = render_board(&board);
        assert!(text.contains("Led 1"));
        assert!(text.contains("Motor"));
        assert!(text.lines().any(|l| l.starts_with("Led 2") && l.ends_with("ON")));
    }
}
