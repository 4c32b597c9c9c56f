use super::{
    client::{ApiClient, ApiRequest},
    error::ApiError,
    types::{Booking, BookingAction, CreateBookingRequest, Id, ListResponse},
};

impl ApiClient {
    pub async fn list_bookings(&self) -> Result<ListResponse<Booking>, ApiError> {
        self.fetch_list("/bookings/").await
    }

    pub async fn upcoming_bookings(&self) -> Result<ListResponse<Booking>, ApiError> {
        self.fetch_list("/bookings/upcoming/").await
    }

    pub async fn past_bookings(&self) -> Result<ListResponse<Booking>, ApiError> {
        self.fetch_list("/bookings/past/").await
    }

    pub async fn create_booking(&self, request: &CreateBookingRequest) -> Result<Booking, ApiError> {
        self.execute(ApiRequest::post("/bookings/").json(request)?)
            .await
    }

    pub async fn update_booking(
        &self,
        id: Id,
        request: &CreateBookingRequest,
    ) -> Result<Booking, ApiError> {
        self.execute(ApiRequest::put(format!("/bookings/{}/", id)).json(request)?)
            .await
    }

    pub async fn get_booking(&self, id: Id) -> Result<Booking, ApiError> {
        self.execute(ApiRequest::get(format!("/bookings/{}/", id)))
            .await
    }

    /// Asks the server for a status transition and returns its view of the booking.
    pub async fn transition_booking(
        &self,
        id: Id,
        action: BookingAction,
    ) -> Result<Booking, ApiError> {
        let booking: Booking = self
            .execute(ApiRequest::post(format!(
                "/bookings/{}/{}/",
                id,
                action.path()
            )))
            .await?;
        log::info!(
            "booking {} {} -> {}",
            id,
            action.path(),
            booking.status.as_str()
        );
        Ok(booking)
    }

    pub async fn accept_booking(&self, id: Id) -> Result<Booking, ApiError> {
        self.transition_booking(id, BookingAction::Accept).await
    }

    pub async fn decline_booking(&self, id: Id) -> Result<Booking, ApiError> {
        self.transition_booking(id, BookingAction::Decline).await
    }

    pub async fn complete_booking(&self, id: Id) -> Result<Booking, ApiError> {
        self.transition_booking(id, BookingAction::Complete).await
    }

    pub async fn cancel_booking(&self, id: Id) -> Result<Booking, ApiError> {
        self.transition_booking(id, BookingAction::Cancel).await
    }
}
