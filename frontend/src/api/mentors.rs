use super::{
    client::{with_query, ApiClient, ApiRequest},
    error::ApiError,
    types::{Expertise, Id, ListResponse, MentorProfile, MentorQuery},
};

impl ApiClient {
    pub async fn list_mentors(
        &self,
        query: &MentorQuery,
    ) -> Result<ListResponse<MentorProfile>, ApiError> {
        self.fetch_list(with_query("/mentors/", &query.pairs())).await
    }

    pub async fn get_mentor(&self, id: Id) -> Result<MentorProfile, ApiError> {
        self.execute(ApiRequest::get(format!("/mentors/{}/", id))).await
    }

    pub async fn list_expertise(&self) -> Result<ListResponse<Expertise>, ApiError> {
        self.fetch_list("/mentors/expertise/").await
    }

    pub async fn search_mentors(
        &self,
        term: &str,
        filters: &MentorQuery,
    ) -> Result<ListResponse<MentorProfile>, ApiError> {
        let query = MentorQuery {
            search: Some(term.to_string()),
            ..filters.clone()
        };
        self.list_mentors(&query).await
    }
}
