//! Session commands.
//!
//! `iotadmin login` - Exchange credentials for a token.
//! `iotadmin logout` - Forget the stored session.
//! `iotadmin whoami` - Show who is logged in.

use super::connect;
use anyhow::Context;
use iotadmin_core::IotAdminConfig;
use std::io::{self, BufRead, Write};

fn read_password() -> anyhow::Result<String> {
    print!("Contraseña: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("reading password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn login(config: &IotAdminConfig, username: &str, password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    let client = connect(config).await?;
    let session = client.auth().login(username, &password).await?;

    let name = if session.full_name.is_empty() { &session.username } else { &session.full_name };
    println!("✔ Sesión iniciada como {name} (id {})", session.user_id);
    Ok(())
}

pub async fn logout(config: &IotAdminConfig) -> anyhow::Result<()> {
    let client = connect(config).await?;
    client.logout().await?;
    println!("✔ Sesión cerrada");
    Ok(())
}

pub async fn whoami(config: &IotAdminConfig) -> anyhow::Result<()> {
    let client = connect(config).await?;
    match client.sessions().session().await {
        Some(session) => {
            println!("Usuario:  {}", session.username);
            if !session.full_name.is_empty() {
                println!("Nombre:   {}", session.full_name);
            }
            if !session.email.is_empty() {
                println!("Correo:   {}", session.email);
            }
            println!("ID:       {}", session.user_id);
        }
        None => println!("No hay sesión iniciada."),
    }
    Ok(())
}
