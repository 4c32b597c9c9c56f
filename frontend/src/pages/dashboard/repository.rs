use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::rc::Rc;

use crate::api::{ApiClient, ApiError};

use super::utils::{build_dashboard, DashboardView};

#[derive(Clone)]
pub struct DashboardRepository {
    client: Rc<ApiClient>,
}

impl DashboardRepository {
    pub fn new(api: ApiClient) -> Self {
        Self {
            client: Rc::new(api),
        }
    }

    /// Loads profile, bookings and stats together; the first failure wins.
    pub async fn load(&self, now: DateTime<Utc>, tz: Tz) -> Result<DashboardView, ApiError> {
        let (profile, bookings, stats) = futures::join!(
            self.client.get_profile(),
            self.client.list_bookings(),
            self.client.get_stats()
        );
        let profile = profile?;
        let bookings = bookings?;
        let stats = stats?;
        Ok(build_dashboard(
            profile.first(),
            &bookings.results,
            &stats,
            now,
            tz,
        ))
    }
}
