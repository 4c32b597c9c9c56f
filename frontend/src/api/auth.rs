use serde_json::{json, Value};

use super::{
    client::{decode, ApiClient, ApiRequest},
    error::ApiError,
    types::{LoginRequest, RefreshRequest, RefreshResponse, RegisterRequest, RegisterResponse, TokenPair},
};

pub const TOKEN_PATH: &str = "/token/";
pub const REFRESH_PATH: &str = "/token/refresh/";
pub const VERIFY_PATH: &str = "/token/verify/";
pub const REGISTER_PATH: &str = "/users/register/";

impl ApiClient {
    pub async fn login(&self, request: LoginRequest) -> Result<TokenPair, ApiError> {
        let tokens: TokenPair = self
            .execute_with_retry(ApiRequest::post(TOKEN_PATH).json(&request)?, false)
            .await?;
        self.session().store_tokens(&tokens)?;
        log::info!("logged in as {}", request.username);
        Ok(tokens)
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let response: RegisterResponse = self
            .execute(ApiRequest::post(REGISTER_PATH).json(&request)?)
            .await?;
        if let Some(tokens) = response.tokens() {
            self.session().store_tokens(&tokens)?;
        }
        log::info!("registered {}", request.username);
        Ok(response)
    }

    /// Exchanges the stored refresh token for a new access token. Never retried.
    pub async fn refresh_token(&self) -> Result<RefreshResponse, ApiError> {
        let refresh = self
            .session()
            .refresh_token()
            .ok_or_else(|| ApiError::validation("No refresh token available"))?;
        log::info!("refreshing access token");
        let request = ApiRequest::post(REFRESH_PATH).json(&RefreshRequest { refresh })?;
        let response: RefreshResponse = decode(self.send_once(&request).await?)?;
        self.session().store_access_token(&response.access)?;
        if let Some(rotated) = &response.refresh {
            self.session().store_refresh_token(rotated)?;
        }
        Ok(response)
    }

    /// Checks the stored access token as-is; a rejection never triggers a refresh.
    pub async fn verify_token(&self) -> Result<Value, ApiError> {
        let token = self
            .session()
            .access_token()
            .ok_or_else(|| ApiError::validation("No access token"))?;
        self.execute_with_retry(
            ApiRequest::post(VERIFY_PATH).json(&json!({ "token": token }))?,
            false,
        )
        .await
    }

    pub fn logout(&self) {
        self.session().clear();
        log::info!("logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }
}
