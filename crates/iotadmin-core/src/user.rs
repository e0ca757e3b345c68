//! User accounts, the create/edit form and client-side search.

use crate::error::CoreError;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Minimum password length accepted by the forms.
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// A user account as returned by `/users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: i64,
    #[serde(default, alias = "full_name")]
    pub name: Option<String>,
    pub username: String,
    pub email: String,
    #[serde(default = "default_status", alias = "is_active")]
    pub status: bool,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, alias = "lastLogin")]
    pub last_login: Option<String>,
}

fn default_status() -> bool {
    true
}

impl UserAccount {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }

    pub fn status_label(&self) -> &'static str {
        if self.status { "Activo" } else { "Inactivo" }
    }

    pub fn created_label(&self) -> String {
        self.created_at.as_deref().map(date_label).unwrap_or_else(|| "-".to_string())
    }

    pub fn last_login_label(&self) -> String {
        self.last_login.as_deref().map(date_label).unwrap_or_else(|| "Nunca".to_string())
    }

    /// Case-insensitive substring match on name, username and email.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [self.display_name(), self.username.as_str(), self.email.as_str()]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// `dd/mm/YYYY` from the date part of an ISO timestamp.
fn date_label(raw: &str) -> String {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Filter the per-page user cache.
pub fn filter_users<'a>(users: &'a [UserAccount], query: &str) -> Vec<&'a UserAccount> {
    users.iter().filter(|u| u.matches(query)).collect()
}

/// Whether the form creates a new account or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Raw values of the user create/edit form (also used by registration).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    /// Checkbox: present when checked.
    #[serde(default)]
    pub active: Option<String>,
}

/// JSON body for `POST /users`, `PATCH /users/{id}` and `/auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPayload {
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub status: bool,
}

impl UserForm {
    /// Pre-fill from an existing account for editing. Passwords are never loaded.
    pub fn from_account(user: &UserAccount) -> Self {
        Self {
            full_name: user.name.clone().unwrap_or_default(),
            username: user.username.clone(),
            email: user.email.clone(),
            password: String::new(),
            confirm_password: String::new(),
            active: user.status.then(|| "on".to_string()),
        }
    }

    /// Validate and build the request body. Nothing is sent when this fails.
    pub fn validate(&self, mode: FormMode) -> Result<UserPayload, CoreError> {
        let full_name = self.full_name.trim();
        let username = self.username.trim();
        let email = self.email.trim();
        let password = self.password.trim();
        let confirm = self.confirm_password.trim();

        if full_name.is_empty() || username.is_empty() || email.is_empty() {
            return Err(CoreError::Validation(
                "Por favor, complete todos los campos obligatorios.".to_string(),
            ));
        }
        if !EMAIL_RE.is_match(email) {
            return Err(CoreError::Validation("El correo electrónico no es válido.".to_string()));
        }

        let password = match mode {
            FormMode::Create => {
                if password != confirm {
                    return Err(CoreError::Validation("Las contraseñas no coinciden.".to_string()));
                }
                Some(password)
            }
            FormMode::Edit if password.is_empty() && confirm.is_empty() => None,
            FormMode::Edit => {
                if password != confirm {
                    return Err(CoreError::Validation(
                        "Las nuevas contraseñas no coinciden.".to_string(),
                    ));
                }
                Some(password)
            }
        };
        if let Some(p) = password
            && p.chars().count() < MIN_PASSWORD_LEN
        {
            return Err(CoreError::Validation(format!(
                "La contraseña debe tener al menos {MIN_PASSWORD_LEN} caracteres."
            )));
        }

        Ok(UserPayload {
            name: full_name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password: password.map(str::to_string),
            // New accounts always start active; the checkbox only exists on edit.
            status: mode == FormMode::Create || self.active.is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn users() -> Vec<UserAccount> {
        serde_json::from_value(json!([
            {"id": 1, "name": "Pepito Alberto Flores", "username": "pepitof", "email": "pepito@email.com", "status": true, "created_at": "2024-02-12T10:00:00", "last_login": "2024-03-13T08:00:00"},
            {"id": 2, "full_name": "Ana María Gómez", "username": "anag", "email": "ana@email.com", "is_active": false, "created_at": "2024-03-13"},
            {"id": 3, "name": "Carlos Andrés Díaz", "username": "carlitos", "email": "carlos@email.com"}
        ]))
        .unwrap()
    }

    fn form(password: &str, confirm: &str) -> UserForm {
        UserForm {
            full_name: "Ana María Gómez".into(),
            username: "anag".into(),
            email: "ana@email.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
            active: Some("on".into()),
        }
    }

    #[test]
    fn search_by_email_substring_matches_one() {
        let all = users();
        assert_eq!(filter_users(&all, "pepito@").len(), 1);
        assert_eq!(filter_users(&all, "CARLOS").len(), 1);
        assert_eq!(filter_users(&all, "email.com").len(), 3);
        assert_eq!(filter_users(&all, "  ").len(), 3);
    }

    #[test]
    fn labels() {
        let all = users();
        assert_eq!(all[0].created_label(), "12/02/2024");
        assert_eq!(all[1].last_login_label(), "Nunca");
        assert_eq!(all[1].status_label(), "Inactivo");
        assert_eq!(all[2].status_label(), "Activo");
    }

    #[test]
    fn create_requires_matching_passwords() {
        let err = form("secret1", "secret2").validate(FormMode::Create).unwrap_err();
        assert_eq!(err.to_string(), "Las contraseñas no coinciden.");
    }

    #[test]
    fn create_enforces_min_length() {
        let err = form("abc", "abc").validate(FormMode::Create).unwrap_err();
        assert!(err.to_string().contains("al menos 6"));
    }

    #[test]
    fn create_rejects_bad_email() {
        let mut f = form("secret1", "secret1");
        f.email = "ana.email.com".into();
        assert!(f.validate(FormMode::Create).is_err());
    }

    #[test]
    fn edit_without_password_omits_it() {
        let payload = form("", "").validate(FormMode::Edit).unwrap();
        assert_eq!(payload.password, None);
        let body = serde_json::to_value(&payload).unwrap();
        assert!(body.get("password").is_none());
    }

    #[test]
    fn edit_with_mismatched_password() {
        let err = form("secret1", "other12").validate(FormMode::Edit).unwrap_err();
        assert_eq!(err.to_string(), "Las nuevas contraseñas no coinciden.");
    }

    #[test]
    fn edit_unchecked_deactivates() {
        let mut f = form("", "");
        f.active = None;
        assert!(!f.validate(FormMode::Edit).unwrap().status);
    }
}
