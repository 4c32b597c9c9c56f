use serde_json::Value;

use super::{
    client::{empty_on_not_found, ApiClient, ApiRequest, FormField},
    error::ApiError,
    types::{ListResponse, ProfileUpdate, UserProfile, UserStats},
};

pub const PROFILES_PATH: &str = "/users/profiles/";
pub const PROFILE_ME_PATH: &str = "/users/profiles/me/";
pub const STATS_PATH: &str = "/users/profiles/stats/";

impl ApiClient {
    /// The caller's profile as a one-element list, empty when none exists yet.
    pub async fn get_profile(&self) -> Result<ListResponse<UserProfile>, ApiError> {
        let profile = self
            .execute::<UserProfile>(ApiRequest::get(PROFILE_ME_PATH))
            .await
            .map(|profile| ListResponse::from_items(vec![profile]));
        empty_on_not_found(profile)
    }

    /// Patches the caller's profile, creating it when the server has none.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        match self.patch_existing_profile(update).await {
            Err(error) if error.is_not_found() => {
                log::info!("no profile yet, creating one");
                self.execute(profile_request(ApiRequest::post(PROFILES_PATH), update)?)
                    .await
            }
            other => other,
        }
    }

    async fn patch_existing_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        let current: UserProfile = self.execute(ApiRequest::get(PROFILE_ME_PATH)).await?;
        let endpoint = format!("{}{}/", PROFILES_PATH, current.id);
        self.execute(profile_request(ApiRequest::patch(endpoint), update)?)
            .await
    }

    pub async fn get_stats(&self) -> Result<UserStats, ApiError> {
        match self.execute(ApiRequest::get(STATS_PATH)).await {
            Err(error) if error.is_not_found() => {
                log::warn!("stats endpoint not available, returning defaults");
                Ok(UserStats::default())
            }
            other => other,
        }
    }
}

fn profile_request(request: ApiRequest, update: &ProfileUpdate) -> Result<ApiRequest, ApiError> {
    match &update.profile_picture {
        Some(file) => {
            let mut fields = text_fields(update)?;
            fields.push(("profile_picture".to_string(), FormField::File(file.clone())));
            Ok(request.multipart(fields))
        }
        None => request.json(update),
    }
}

fn text_fields(update: &ProfileUpdate) -> Result<Vec<(String, FormField)>, ApiError> {
    let value = serde_json::to_value(update)
        .map_err(|e| ApiError::validation(format!("Failed to encode profile: {}", e)))?;
    let Value::Object(map) = value else {
        return Ok(Vec::new());
    };
    Ok(map
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, FormField::Text(text))
        })
        .collect())
}
