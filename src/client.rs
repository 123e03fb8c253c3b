use core::fmt;

use reqwest::{Method, RequestBuilder, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};
use tracing_error::SpanTrace;
use url::Url;

use crate::config::{ApiKey, Config};
use crate::endpoints::ClockifyEndpoint;
use crate::entities::{
    tag::{self, TagDto},
    time_entry::{self, TimeEntryDto, TimeEntryRequest, UpdateTimeEntryRequest},
    user::{self, CurrentUserDto},
    workspace::{self, WorkspaceDto, WorkspaceRequest},
};
use crate::error::{ApiError, Error, ErrorBody, Result};
use crate::response::ApiResponse;

const HEADER_API_KEY: &str = "X-Api-Key";

/// This is the client that is used for interacting with the Clockify API. It
/// injects the API key into every request and maps every response into an
/// [`ApiResponse`].
///
/// Cloning is cheap: clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
}

impl Client {
    /// Creates a client for the public Clockify API.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(Config::new(ApiKey::new(api_key))?)
    }

    /// Creates a client from `CAPI_KEY` (and optionally `CLOCKIFY_BASE_URL`).
    pub fn from_env() -> Result<Self> {
        Self::with_config(Config::from_env()?)
    }

    #[instrument(skip(config), fields(base_url = %config.base_url))]
    pub fn with_config(config: Config) -> Result<Self> {
        let mut key = header::HeaderValue::from_str(config.api_key.secret())
            .map_err(|_| Error::InvalidApiKey)?;
        key.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(HEADER_API_KEY, key);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(Error::HttpClient)?;

        trace!("built clockify client");
        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint_url(&self, endpoint: &ClockifyEndpoint) -> Result<Url> {
        endpoint.to_url_with_base(&self.base_url)
    }

    fn build_request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Perform an authenticated `GET` request against the API.
    #[instrument(skip(self, query), fields(url = %url))]
    pub(crate) async fn get<R: DeserializeOwned, Q: Serialize + fmt::Debug + ?Sized>(
        &self,
        url: Url,
        query: &Q,
    ) -> ApiResponse<R> {
        trace!(?query, "making GET request");
        let request = self.build_request(Method::GET, url.clone()).query(query);
        Self::send(request, &url).await
    }

    /// Perform an authenticated `POST` request against the API.
    #[instrument(skip(self, data), fields(url = %url))]
    pub(crate) async fn post<R: DeserializeOwned, T: Serialize + ?Sized>(
        &self,
        url: Url,
        data: &T,
    ) -> ApiResponse<R> {
        trace!(json = ?serde_json::to_string(data).ok(), "making POST request");
        let request = self.build_request(Method::POST, url.clone()).json(data);
        Self::send(request, &url).await
    }

    /// Perform an authenticated `PUT` request against the API.
    #[instrument(skip(self, data), fields(url = %url))]
    pub(crate) async fn put<R: DeserializeOwned, T: Serialize + ?Sized>(
        &self,
        url: Url,
        data: &T,
    ) -> ApiResponse<R> {
        trace!(json = ?serde_json::to_string(data).ok(), "making PUT request");
        let request = self.build_request(Method::PUT, url.clone()).json(data);
        Self::send(request, &url).await
    }

    /// Perform an authenticated `DELETE` request against the API. Any 2xx is
    /// a success and the body, if any, is ignored. `entity` names the deleted
    /// resource in failures.
    #[instrument(skip(self), fields(url = %url))]
    pub(crate) async fn delete(&self, url: Url, entity: &str) -> ApiResponse<()> {
        trace!("making DELETE request");
        let response = match self.build_request(Method::DELETE, url.clone()).send().await {
            Ok(response) => response,
            Err(source) => return Self::transport_failure(source, &url),
        };

        let status = response.status();
        if status.is_success() {
            debug!(%status, "DELETE succeeded");
            return ApiResponse::Success {
                status_code: status,
                data: (),
            };
        }
        Self::handle_response_for(response, entity.to_string()).await
    }

    async fn send<R: DeserializeOwned>(request: RequestBuilder, url: &Url) -> ApiResponse<R> {
        match request.send().await {
            Ok(response) => Self::handle_response(response).await,
            Err(source) => Self::transport_failure(source, url),
        }
    }

    fn transport_failure<R>(source: reqwest::Error, url: &Url) -> ApiResponse<R> {
        error!("Request to {} failed: {:?}", url, source);
        ApiResponse::Failure(ApiError::Transport {
            source,
            url: url.to_string(),
            span_trace: SpanTrace::capture(),
        })
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ApiResponse<T> {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown")
            .trim_end_matches('>')
            .to_string();
        Self::handle_response_for(response, entity_type).await
    }

    #[instrument(skip(response))]
    async fn handle_response_for<T: DeserializeOwned>(
        response: reqwest::Response,
        entity_type: String,
    ) -> ApiResponse<T> {
        let status = response.status();
        let url = response.url().to_string();

        debug!(
            "Response from {}: status={}, entity_type={}",
            url, status, entity_type
        );

        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .map(std::time::Duration::from_secs);

        let text = match response.text().await {
            Ok(text) => text,
            Err(source) => {
                error!("Failed to read response body from {}: {:?}", url, source);
                return ApiResponse::Failure(ApiError::Transport {
                    source,
                    url,
                    span_trace: SpanTrace::capture(),
                });
            }
        };
        debug!("Response body size: {} bytes", text.len());
        trace!("Response text:\n{}", text);

        if status.is_success() {
            return match serde_json::from_str(&text) {
                Ok(data) => ApiResponse::Success {
                    status_code: status,
                    data,
                },
                Err(source) => {
                    error!(
                        "Deserialization error: {}, near position: {} - \
                         response text around that position: {}",
                        source,
                        source.column(),
                        text.chars()
                            .skip(source.column().saturating_sub(30))
                            .take(100)
                            .collect::<String>()
                    );
                    ApiResponse::Failure(ApiError::Deserialization {
                        source,
                        entity: entity_type,
                        url,
                        status_code: status,
                        response_body: Some(text),
                        span_trace: SpanTrace::capture(),
                    })
                }
            };
        }

        let response_body = (!text.is_empty()).then_some(text);
        let failure = match status {
            StatusCode::NOT_FOUND => ApiError::NotFound {
                entity: entity_type,
                url,
                status_code: status,
                response_body,
                span_trace: SpanTrace::capture(),
            },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized {
                url,
                status_code: status,
                response_body,
                span_trace: SpanTrace::capture(),
            },
            StatusCode::TOO_MANY_REQUESTS => {
                warn!(
                    "Rate limit exceeded for {}: retry_after={:?}",
                    url, retry_after
                );
                ApiError::RateLimitExceeded {
                    retry_after,
                    url,
                    status_code: status,
                    response_body,
                    span_trace: SpanTrace::capture(),
                }
            }
            _ => ApiError::Api {
                body: response_body
                    .as_deref()
                    .and_then(|text| serde_json::from_str::<ErrorBody>(text).ok()),
                url,
                status_code: status,
                response_body,
                span_trace: SpanTrace::capture(),
            },
        };
        error!("API error: {}", failure);
        ApiResponse::Failure(failure)
    }

    /// Access the time entries API
    #[must_use]
    pub fn time_entries(&self) -> TimeEntriesApi<'_> {
        TimeEntriesApi { client: self }
    }

    /// Access the tags API
    #[must_use]
    pub fn tags(&self) -> TagsApi<'_> {
        TagsApi { client: self }
    }

    /// Access the workspaces API
    #[must_use]
    pub fn workspaces(&self) -> WorkspacesApi<'_> {
        WorkspacesApi { client: self }
    }

    /// Access the users API
    #[must_use]
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi { client: self }
    }
}

/// API handler for Time Entry endpoints
///
/// Write operations validate their request first and return `Err` without
/// sending anything when a required field is missing.
#[derive(Debug)]
pub struct TimeEntriesApi<'a> {
    client: &'a Client,
}

impl TimeEntriesApi<'_> {
    /// Create a new time entry
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        workspace_id: &str,
        request: &TimeEntryRequest,
    ) -> Result<ApiResponse<TimeEntryDto>> {
        time_entry::create(self.client, workspace_id, request).await
    }

    /// Retrieve a single time entry by ID
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        workspace_id: &str,
        time_entry_id: &str,
    ) -> Result<ApiResponse<TimeEntryDto>> {
        time_entry::get(self.client, workspace_id, time_entry_id).await
    }

    /// Update a time entry
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        workspace_id: &str,
        time_entry_id: &str,
        request: &UpdateTimeEntryRequest,
    ) -> Result<ApiResponse<TimeEntryDto>> {
        time_entry::update(self.client, workspace_id, time_entry_id, request).await
    }

    /// Delete a time entry
    #[instrument(skip(self))]
    pub async fn delete(&self, workspace_id: &str, time_entry_id: &str) -> Result<ApiResponse<()>> {
        time_entry::delete(self.client, workspace_id, time_entry_id).await
    }

    /// List every time entry of a user in the workspace
    #[instrument(skip(self))]
    pub async fn find_all_for_user(
        &self,
        workspace_id: &str,
        user_id: &str,
    ) -> Result<ApiResponse<Vec<TimeEntryDto>>> {
        self.find_all_for_user_with(workspace_id, user_id, &time_entry::ListParameters::default())
            .await
    }

    /// List the time entries of a user with filters
    #[instrument(skip(self, parameters))]
    pub async fn find_all_for_user_with(
        &self,
        workspace_id: &str,
        user_id: &str,
        parameters: &time_entry::ListParameters,
    ) -> Result<ApiResponse<Vec<TimeEntryDto>>> {
        time_entry::find_all_for_user(self.client, workspace_id, user_id, parameters).await
    }
}

/// API handler for Tag endpoints
#[derive(Debug)]
pub struct TagsApi<'a> {
    client: &'a Client,
}

impl TagsApi<'_> {
    /// Retrieve every tag of a workspace
    #[instrument(skip(self))]
    pub async fn find_all(&self, workspace_id: &str) -> Result<ApiResponse<Vec<TagDto>>> {
        self.find_all_with(workspace_id, &tag::ListParameters::default())
            .await
    }

    /// Retrieve the tags of a workspace with filters
    #[instrument(skip(self, parameters))]
    pub async fn find_all_with(
        &self,
        workspace_id: &str,
        parameters: &tag::ListParameters,
    ) -> Result<ApiResponse<Vec<TagDto>>> {
        tag::find_all(self.client, workspace_id, parameters).await
    }
}

/// API handler for Workspace endpoints
#[derive(Debug)]
pub struct WorkspacesApi<'a> {
    client: &'a Client,
}

impl WorkspacesApi<'_> {
    #[instrument(skip(self))]
    pub async fn create(&self, request: &WorkspaceRequest) -> Result<ApiResponse<WorkspaceDto>> {
        workspace::create(self.client, request).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<ApiResponse<Vec<WorkspaceDto>>> {
        workspace::list(self.client).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, workspace_id: &str) -> Result<ApiResponse<()>> {
        workspace::delete(self.client, workspace_id).await
    }
}

/// API handler for User endpoints
#[derive(Debug)]
pub struct UsersApi<'a> {
    client: &'a Client,
}

impl UsersApi<'_> {
    /// Retrieve the user owning the API key
    #[instrument(skip(self))]
    pub async fn current(&self) -> Result<ApiResponse<CurrentUserDto>> {
        user::current(self.client).await
    }
}
