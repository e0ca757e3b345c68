//! `iotadmin serve` - Start the web dashboard.

use iotadmin_client::{SessionManager, create_storage};
use iotadmin_core::IotAdminConfig;
use iotadmin_dashboard::DashboardServer;

pub async fn run(mut config: IotAdminConfig, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.dashboard.host = host;
    }
    if let Some(port) = port {
        config.dashboard.port = port;
    }

    let storage = create_storage(&config.session).await?;
    let server = DashboardServer::new(config, SessionManager::new(storage))?;
    println!("✔ Dashboard listening on http://{}", server.state().config().dashboard.bind_addr());
    server.run().await?;
    Ok(())
}
