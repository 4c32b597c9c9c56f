use std::rc::Rc;

use crate::api::{ApiClient, ApiError, Booking, BookingAction, Id};

use super::utils::BookingLists;

#[derive(Clone)]
pub struct BookingsRepository {
    client: Rc<ApiClient>,
}

impl BookingsRepository {
    pub fn new(api: ApiClient) -> Self {
        Self {
            client: Rc::new(api),
        }
    }

    pub async fn load(&self) -> Result<BookingLists, ApiError> {
        let (upcoming, past) = futures::join!(
            self.client.upcoming_bookings(),
            self.client.past_bookings()
        );
        Ok(BookingLists {
            upcoming: upcoming?.into_items(),
            past: past?.into_items(),
        })
    }

    pub async fn perform(&self, id: Id, action: BookingAction) -> Result<Booking, ApiError> {
        self.client.transition_booking(id, action).await
    }
}
