use chrono::NaiveDate;
use chrono_tz::Tz;
use std::rc::Rc;

use crate::api::{ApiClient, ApiError, Booking, Id, MentorProfile};

use super::utils::BookingForm;

#[derive(Clone)]
pub struct BookRepository {
    client: Rc<ApiClient>,
}

impl BookRepository {
    pub fn new(api: ApiClient) -> Self {
        Self {
            client: Rc::new(api),
        }
    }

    pub async fn load_mentor(&self, mentor_id: Id) -> Result<MentorProfile, ApiError> {
        self.client.get_mentor(mentor_id).await
    }

    /// Validates the form locally before anything is sent.
    pub async fn submit(
        &self,
        mentor_id: Id,
        form: &BookingForm,
        tz: Tz,
        today: NaiveDate,
    ) -> Result<Booking, ApiError> {
        let request = form
            .to_request(mentor_id, tz, today)
            .map_err(ApiError::validation)?;
        self.client.create_booking(&request).await
    }
}
