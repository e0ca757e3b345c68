//! Filtered action history and the PDF export.

use crate::client::ApiClient;
use crate::error::ApiError;
use iotadmin_core::action::{ActionFilter, ActionLogEntry};

pub struct ReportsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ReportsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// One page of actions matching `filter`. Rejected filters never reach
    /// the backend.
    pub async fn events(&self, filter: &ActionFilter) -> Result<Vec<ActionLogEntry>, ApiError> {
        filter.validate(today())?;
        self.client.get_with_query("/actions", &filter.to_query()).await
    }

    /// PDF of every action matching `filter`, ignoring paging.
    pub async fn export_pdf(&self, filter: &ActionFilter) -> Result<Vec<u8>, ApiError> {
        filter.validate(today())?;
        self.client
            .get_bytes("/reports/export-logs-pdf", &filter.to_export_query())
            .await
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
