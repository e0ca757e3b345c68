//! The six `/logs/*` metrics endpoints.

use crate::client::ApiClient;
use crate::error::ApiError;
use iotadmin_core::metrics::{HourPoint, MetricsSummary, Series, UserShare};

/// Every dashboard payload; each fetch fails independently.
#[derive(Debug)]
pub struct DashboardData {
    pub summary: Result<MetricsSummary, ApiError>,
    pub events_by_device: Result<Series, ApiError>,
    pub registration_by_user: Result<Vec<UserShare>, ApiError>,
    pub motor_direction: Result<Series, ApiError>,
    pub leds_usage: Result<Series, ApiError>,
    pub usage_by_hour: Result<Vec<HourPoint>, ApiError>,
}

pub struct DashboardApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DashboardApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn summary(&self) -> Result<MetricsSummary, ApiError> {
        self.client.get("/logs/summary").await
    }

    pub async fn events_by_device(&self) -> Result<Series, ApiError> {
        self.client.get("/logs/events-by-device").await
    }

    pub async fn registration_by_user(&self) -> Result<Vec<UserShare>, ApiError> {
        self.client.get("/logs/registration-by-user").await
    }

    pub async fn motor_direction(&self) -> Result<Series, ApiError> {
        self.client.get("/logs/motor-direction").await
    }

    pub async fn leds_usage(&self) -> Result<Series, ApiError> {
        self.client.get("/logs/leds-usage").await
    }

    pub async fn usage_by_hour(&self) -> Result<Vec<HourPoint>, ApiError> {
        self.client.get("/logs/usage-by-hour").await
    }

    /// Fetch all six concurrently.
    pub async fn load_all(&self) -> DashboardData {
        let (summary, events_by_device, registration_by_user, motor_direction, leds_usage, usage_by_hour) = tokio::join!(
            self.summary(),
            self.events_by_device(),
            self.registration_by_user(),
            self.motor_direction(),
            self.leds_usage(),
            self.usage_by_hour(),
        );
        DashboardData {
            summary,
            events_by_device,
            registration_by_user,
            motor_direction,
            leds_usage,
            usage_by_hour,
        }
    }
}
