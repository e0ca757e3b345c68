//! `iotadmin users` - List, create, update and delete accounts.

use super::{connect_authenticated, render_table};
use crate::UsersCommand;
use iotadmin_core::user::filter_users;
use iotadmin_core::{FormMode, IotAdminConfig, UserAccount, UserForm};

pub fn render_users(users: &[&UserAccount]) -> String {
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.id.to_string(),
                u.display_name().to_string(),
                u.username.clone(),
                u.email.clone(),
                u.status_label().to_string(),
                u.created_label(),
                u.last_login_label(),
            ]
        })
        .collect();
    render_table(
        &["ID", "Nombre", "Usuario", "Correo", "Estado", "Creado", "Último acceso"],
        &rows,
    )
}

/// Edit form for `user` with the given fields replaced. A new password is
/// confirmed with itself; the CLI has no second prompt.
pub fn edit_form(
    user: &UserAccount,
    full_name: Option<String>,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
    active: Option<bool>,
) -> UserForm {
    let mut form = UserForm::from_account(user);
    if let Some(v) = full_name {
        form.full_name = v;
    }
    if let Some(v) = username {
        form.username = v;
    }
    if let Some(v) = email {
        form.email = v;
    }
    if let Some(v) = password {
        form.confirm_password = v.clone();
        form.password = v;
    }
    if let Some(active) = active {
        form.active = active.then(|| "on".to_string());
    }
    form
}

pub async fn run(config: &IotAdminConfig, cmd: UsersCommand) -> anyhow::Result<()> {
    let client = connect_authenticated(config).await?;

    match cmd {
        UsersCommand::List { search } => {
            let users = client.users().list().await?;
            let shown = filter_users(&users, search.as_deref().unwrap_or(""));
            if shown.is_empty() {
                println!("Ningún usuario coincide con la búsqueda.");
            } else {
                println!("{}", render_users(&shown));
                println!("\nTotal: {}", shown.len());
            }
        }
        UsersCommand::Create {
            full_name,
            username,
            email,
            password,
        } => {
            let form = UserForm {
                full_name,
                username,
                email,
                confirm_password: password.clone(),
                password,
                active: None,
            };
            let payload = form.validate(FormMode::Create)?;
            client.users().create(&payload).await?;
            println!("✔ Usuario {} creado", payload.username);
        }
        UsersCommand::Update {
            id,
            full_name,
            username,
            email,
            password,
            active,
        } => {
            let current = client.users().get(id).await?;
            let form = edit_form(&current, full_name, username, email, password, active);
            let payload = form.validate(FormMode::Edit)?;
            client.users().update(id, &payload).await?;
            println!("✔ Usuario {} actualizado", payload.username);
        }
        UsersCommand::Delete { id } => {
            client.users().delete(id).await?;
            println!("✔ Usuario {id} eliminado");
        }
    }
    Ok(())
}
