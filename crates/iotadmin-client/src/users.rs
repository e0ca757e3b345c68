//! `/users` CRUD.

use crate::client::ApiClient;
use crate::error::ApiError;
use iotadmin_core::user::{UserAccount, UserPayload};
use serde_json::Value;

pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<UserAccount>, ApiError> {
        self.client.get("/users").await
    }

    pub async fn get(&self, id: i64) -> Result<UserAccount, ApiError> {
        self.client.get(&format!("/users/{id}")).await
    }

    pub async fn create(&self, payload: &UserPayload) -> Result<Value, ApiError> {
        let created = self.client.post("/users", payload).await?;
        tracing::info!(username = %payload.username, "user created");
        Ok(created)
    }

    pub async fn update(&self, id: i64, payload: &UserPayload) -> Result<Value, ApiError> {
        let updated = self.client.patch(&format!("/users/{id}"), payload).await?;
        tracing::info!(user_id = id, "user updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/users/{id}")).await?;
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }
}
