use clap::{Parser, Subcommand};
use iotadmin_core::{DeviceCommand, DeviceId, IotAdminConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "iotadmin", version, about = "Admin console for the LED and stepper motor backend")]
struct Cli {
    /// Configuration file. Missing file means defaults.
    #[arg(long, short, global = true, default_value = "iotadmin.yaml", env = "IOTADMIN_CONFIG")]
    config: PathBuf,

    /// Log filter, e.g. "info" or "iotadmin_client=debug".
    #[arg(long, global = true, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Backend base URL, overriding the config file.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the web dashboard.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },

    /// Log in and store the session.
    Login {
        username: String,
        /// Read from stdin when omitted.
        #[arg(long, env = "IOTADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session.
    Logout,

    /// Show the logged-in user.
    Whoami,

    /// Current state of the LEDs and the motor.
    Devices,

    /// Send a command to a device, e.g. `control led1 on` or `control motor left`.
    Control {
        device: DeviceId,
        command: DeviceCommand,
    },

    /// Latest device events.
    Logs {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// Filtered action report, or its PDF export.
    Report {
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// First day, YYYY-MM-DD (inclusive).
        #[arg(long)]
        from: Option<String>,
        /// Last day, YYYY-MM-DD (inclusive).
        #[arg(long)]
        to: Option<String>,
        /// Action code, e.g. LED_ON or MOTOR_STOP.
        #[arg(long)]
        action: Option<String>,
        #[arg(long)]
        device: Option<DeviceId>,
        /// Write the PDF export here instead of printing a page.
        #[arg(long)]
        pdf: Option<PathBuf>,
    },

    /// User management.
    Users {
        #[command(subcommand)]
        cmd: UsersCommand,
    },

    /// Dashboard metrics.
    Metrics {
        /// Print raw JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Poll device status and print changes until ctrl-c.
    Watch {
        /// Seconds between polls; defaults to the control page interval.
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List users, optionally filtered by name, username or email.
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Create a user.
    Create {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "IOTADMIN_NEW_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Update fields of a user. Omitted fields keep their value.
    Update {
        id: i64,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a user.
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = IotAdminConfig::load_or_default(&cli.config)?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
        config.validate()?;
    }
    tracing::debug!(config = %cli.config.display(), backend = %config.api.base_url, "configuration loaded");

    match cli.cmd {
        Command::Serve { host, port } => commands::serve::run(config, host, port).await?,
        Command::Login { username, password } => {
            commands::session::login(&config, &username, password).await?
        }
        Command::Logout => commands::session::logout(&config).await?,
        Command::Whoami => commands::session::whoami(&config).await?,
        Command::Devices => commands::devices::status(&config).await?,
        Command::Control { device, command } => commands::devices::control(&config, device, command).await?,
        Command::Logs { limit } => commands::reports::logs(&config, limit).await?,
        Command::Report {
            limit,
            page,
            from,
            to,
            action,
            device,
            pdf,
        } => {
            let params = commands::reports::ReportArgs {
                limit,
                page,
                from,
                to,
                action,
                device,
            };
            commands::reports::report(&config, params, pdf).await?
        }
        Command::Users { cmd } => commands::users::run(&config, cmd).await?,
        Command::Metrics { json } => commands::metrics::show(&config, json).await?,
        Command::Watch { interval } => commands::devices::watch(&config, interval).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn control_parses_device_and_command() {
        let cli = Cli::try_parse_from(["iotadmin", "control", "LED1", "off"]).unwrap();
        match cli.cmd {
            Command::Control { device, command } => {
                assert_eq!(device, DeviceId::Led1);
                assert_eq!(command, DeviceCommand::TurnOff);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["iotadmin", "control", "toaster", "on"]).is_err());
    }

    #[test]
    fn report_dates_are_optional() {
        let cli = Cli::try_parse_from(["iotadmin", "report", "--from", "2025-01-01", "--device", "motor"]).unwrap();
        match cli.cmd {
            Command::Report { from, to, device, .. } => {
                assert_eq!(from.as_deref(), Some("2025-01-01"));
                assert!(to.is_none());
                assert_eq!(device, Some(DeviceId::Motor));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
