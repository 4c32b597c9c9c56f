use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    multipart::{Form, Part},
    Client, Method,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::rc::Rc;

use crate::{
    api::{
        error::ApiError,
        types::{FileUpload, ListResponse},
    },
    config,
    state::session::Session,
    utils::navigation::{Navigator, WindowNavigator},
};

/// Refresh-and-retry cycles allowed per request after an authentication failure.
pub const MAX_AUTH_RETRIES: u8 = 1;

const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    Text(String),
    File(FileUpload),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Vec<(String, FormField)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: String,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::validation(format!("Failed to encode request: {}", e)))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn multipart(mut self, fields: Vec<(String, FormField)>) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self.body, RequestBody::Multipart(_))
    }
}

pub fn with_query(endpoint: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return endpoint.to_string();
    }
    let query = pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, utf8_percent_encode(value, QUERY_VALUE)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", endpoint, query)
}

/// Status and body of a response, the body read exactly once.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn into_result(self) -> Result<Value, ApiError> {
        if !self.is_success() {
            return Err(ApiError::from_response(self.status, &self.body));
        }
        if self.status == 204 || self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body)
            .map_err(|e| ApiError::parse(format!("Failed to parse response: {}", e)))
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Option<String>,
    session: Session,
    navigator: Rc<dyn Navigator>,
    #[cfg(test)]
    responder: Option<Rc<dyn TestResponder>>,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: None,
            session: Session::default(),
            navigator: Rc::new(WindowNavigator),
            #[cfg(test)]
            responder: None,
        }
    }

    pub fn new_with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Self::new()
        }
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn with_navigator(mut self, navigator: Rc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) async fn resolved_base_url(&self) -> String {
        if let Some(base) = &self.base_url {
            base.clone()
        } else {
            config::await_api_base_url().await
        }
    }

    fn request_headers(&self, body: &RequestBody) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.session.access_token() {
            headers.insert(
                AUTHORIZATION,
                format!("Bearer {}", token)
                    .parse()
                    .map_err(|_| ApiError::validation("Invalid token format"))?,
            );
        }
        if !matches!(body, RequestBody::Multipart(_)) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        Ok(headers)
    }

    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.execute_with_retry(request, true).await
    }

    pub async fn execute_with_retry<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        allow_retry: bool,
    ) -> Result<T, ApiError> {
        let value = self.execute_value(&request, allow_retry).await?;
        decode(value)
    }

    /// Sends `request`; on an authentication failure refreshes the access token
    /// and re-sends, at most `MAX_AUTH_RETRIES` times. A failed refresh, or any
    /// failure of the re-sent request, expires the session.
    async fn execute_value(&self, request: &ApiRequest, allow_retry: bool) -> Result<Value, ApiError> {
        let budget = if allow_retry { MAX_AUTH_RETRIES } else { 0 };
        let mut refreshes = 0u8;
        loop {
            let error = match self.send_once(request).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };
            if refreshes > 0 {
                log::warn!(
                    "{} {} failed after token refresh: {}",
                    request.method,
                    request.endpoint,
                    error
                );
                return Err(self.expire_session());
            }
            if !error.is_auth_failure() || refreshes >= budget {
                return Err(error);
            }
            if self.session.refresh_token().is_none() {
                return Err(error);
            }
            if let Err(refresh_error) = self.refresh_token().await {
                log::warn!("token refresh failed: {}", refresh_error);
                return Err(self.expire_session());
            }
            refreshes += 1;
        }
    }

    pub(crate) async fn send_once(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        self.send(request).await?.into_result()
    }

    fn expire_session(&self) -> ApiError {
        self.session.clear();
        self.navigator.redirect_to_login();
        ApiError::session_expired()
    }

    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        let url = format!("{}{}", self.resolved_base_url().await, request.endpoint);
        let headers = self.request_headers(&request.body)?;
        let response = self.dispatch(request, url, headers).await?;
        log::debug!(
            "{} {} -> {}",
            request.method,
            request.endpoint,
            response.status
        );
        Ok(response)
    }

    #[cfg(not(test))]
    async fn dispatch(
        &self,
        request: &ApiRequest,
        url: String,
        headers: HeaderMap,
    ) -> Result<RawResponse, ApiError> {
        self.dispatch_http(request, url, headers).await
    }

    #[cfg(test)]
    async fn dispatch(
        &self,
        request: &ApiRequest,
        url: String,
        headers: HeaderMap,
    ) -> Result<RawResponse, ApiError> {
        match &self.responder {
            Some(responder) => {
                let recorded = RecordedRequest::capture(request, &url, headers)?;
                let response = responder.respond(&recorded)?;
                Ok(RawResponse {
                    status: response.status,
                    body: response.body,
                })
            }
            None => self.dispatch_http(request, url, headers).await,
        }
    }

    async fn dispatch_http(
        &self,
        request: &ApiRequest,
        url: String,
        headers: HeaderMap,
    ) -> Result<RawResponse, ApiError> {
        let builder = self
            .client
            .request(request.method.clone(), url)
            .headers(headers);
        let builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(fields) => builder.multipart(build_form(fields)?),
        };
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::request_failed(format!("Failed to read response: {}", e)))?;
        Ok(RawResponse { status, body })
    }

    /// GET a list endpoint; a not-found answer is an empty list.
    pub(crate) async fn fetch_list<T: DeserializeOwned>(
        &self,
        endpoint: impl Into<String>,
    ) -> Result<ListResponse<T>, ApiError> {
        empty_on_not_found(self.execute(ApiRequest::get(endpoint)).await)
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::parse(format!("Failed to parse response: {}", e)))
}

pub fn empty_on_not_found<T>(
    result: Result<ListResponse<T>, ApiError>,
) -> Result<ListResponse<T>, ApiError> {
    match result {
        Err(error) if error.is_not_found() => {
            log::debug!("list endpoint not found, treating as empty: {}", error);
            Ok(ListResponse::empty())
        }
        other => other,
    }
}

fn build_form(fields: &[(String, FormField)]) -> Result<Form, ApiError> {
    fields
        .iter()
        .try_fold(Form::new(), |form, (name, field)| match field {
            FormField::Text(value) => Ok(form.text(name.clone(), value.clone())),
            FormField::File(file) => {
                let part = Part::bytes(file.bytes.clone())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.mime_type)
                    .map_err(|e| ApiError::validation(format!("Invalid file type: {}", e)))?;
                Ok(form.part(name.clone(), part))
            }
        })
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

#[cfg(test)]
impl RecordedRequest {
    fn capture(request: &ApiRequest, url: &str, headers: HeaderMap) -> Result<Self, ApiError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| ApiError::request_failed(format!("Invalid url {}: {}", url, e)))?;
        Ok(Self {
            method: request.method.clone(),
            path: parsed.path().to_string(),
            query: parsed.query().map(str::to_string),
            headers,
            body: request.body.clone(),
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
}

#[cfg(test)]
impl MockResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[cfg(test)]
pub trait TestResponder {
    fn respond(&self, request: &RecordedRequest) -> Result<MockResponse, ApiError>;
}

#[cfg(test)]
impl ApiClient {
    pub fn with_test_responder(mut self, responder: Rc<dyn TestResponder>) -> Self {
        self.responder = Some(responder);
        self
    }
}
