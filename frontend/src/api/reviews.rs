use serde_json::Value;

use super::{
    client::{with_query, ApiClient, ApiRequest},
    error::ApiError,
    types::{Id, ListResponse, Review, ReviewRequest},
};

impl ApiClient {
    pub async fn mentor_reviews(&self, mentor_id: Id) -> Result<ListResponse<Review>, ApiError> {
        self.fetch_list(with_query("/reviews/", &[("mentor", mentor_id.to_string())]))
            .await
    }

    pub async fn create_review(&self, request: &ReviewRequest) -> Result<Review, ApiError> {
        request.validate().map_err(ApiError::validation)?;
        self.execute(ApiRequest::post("/reviews/").json(request)?)
            .await
    }

    pub async fn update_review(&self, id: Id, request: &ReviewRequest) -> Result<Review, ApiError> {
        request.validate().map_err(ApiError::validation)?;
        self.execute(ApiRequest::put(format!("/reviews/{}/", id)).json(request)?)
            .await
    }

    pub async fn delete_review(&self, id: Id) -> Result<(), ApiError> {
        let _: Value = self
            .execute(ApiRequest::delete(format!("/reviews/{}/", id)))
            .await?;
        Ok(())
    }
}
