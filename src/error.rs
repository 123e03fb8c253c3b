use std::fmt;
use std::time::Duration;

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;
use tracing_error::SpanTrace;

/// Error body returned by the Clockify API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "Clockify API Error ({code}): {message}"),
            (None, Some(message)) => write!(f, "Clockify API Error: {message}"),
            (Some(code), None) => write!(f, "Clockify API Error ({code})"),
            (None, None) => write!(f, "Clockify API Error"),
        }
    }
}

#[allow(clippy::ref_option)]
fn describe_body(body: &Option<ErrorBody>) -> String {
    body.as_ref()
        .map_or_else(|| "no error body".to_string(), ToString::to_string)
}

/// Local errors, raised before anything is sent over the network.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// A required field on a write request was not set.
    #[error("Argument cannot be null. (Parameter '{parameter}')")]
    #[diagnostic(
        code(clockify_rs::invalid_argument),
        help("Set `{parameter}` on the request before submitting it")
    )]
    InvalidArgument {
        parameter: &'static str,
        span_trace: SpanTrace,
    },

    #[error("endpoint could not be parsed as a URL")]
    #[diagnostic(
        code(clockify_rs::invalid_endpoint),
        help("Check the configured base URL and the identifiers passed to the call")
    )]
    InvalidEndpoint,

    #[error("API key contains characters that are not valid in a header")]
    #[diagnostic(
        code(clockify_rs::invalid_api_key),
        help("Copy the API key again from your Clockify profile settings")
    )]
    InvalidApiKey,

    #[error("no API key found in the `{0}` environment variable")]
    #[diagnostic(
        code(clockify_rs::missing_api_key),
        help("Export your Clockify API key before creating the client")
    )]
    MissingApiKey(&'static str),

    #[error("error building HTTP client: {0:?}")]
    #[diagnostic(code(clockify_rs::http_client))]
    HttpClient(#[source] reqwest::Error),
}

impl Error {
    /// Builds an [`Error::InvalidArgument`] for the named request field.
    #[must_use]
    pub fn invalid_argument(parameter: &'static str) -> Self {
        Self::InvalidArgument {
            parameter,
            span_trace: SpanTrace::capture(),
        }
    }

    /// Name of the offending parameter, for [`Error::InvalidArgument`].
    #[must_use]
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { parameter, .. } => Some(*parameter),
            _ => None,
        }
    }

    #[must_use]
    pub fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            Self::InvalidArgument { span_trace, .. } => Some(span_trace),
            _ => None,
        }
    }
}

/// Failures reported by (or on the way to) the Clockify service.
///
/// These never surface as `Err` from an operation; they are carried in
/// [`ApiResponse::Failure`](crate::response::ApiResponse::Failure).
#[derive(Debug, Error, Diagnostic)]
pub enum ApiError {
    #[error("error making request: {source:?}")]
    #[diagnostic(
        code(clockify_rs::request_error),
        help("Check your network connection and Clockify API availability")
    )]
    Transport {
        #[source]
        source: reqwest::Error,
        url: String,
        span_trace: SpanTrace,
    },

    #[error("object not found: {entity} (url: {url})")]
    #[diagnostic(
        code(clockify_rs::not_found),
        help("Verify that the {entity} exists and that you have permission to access it")
    )]
    NotFound {
        entity: String,
        url: String,
        status_code: reqwest::StatusCode,
        response_body: Option<String>,
        span_trace: SpanTrace,
    },

    #[error("unauthorized ({status_code}) for {url}")]
    #[diagnostic(
        code(clockify_rs::unauthorized),
        help("Check the API key and that it belongs to a member of the workspace")
    )]
    Unauthorized {
        url: String,
        status_code: reqwest::StatusCode,
        response_body: Option<String>,
        span_trace: SpanTrace,
    },

    #[error("rate limit exceeded: retry after {retry_after:?}")]
    #[diagnostic(
        code(clockify_rs::rate_limit_exceeded),
        help("The Clockify API rate limit has been exceeded. Wait before issuing more requests.")
    )]
    RateLimitExceeded {
        retry_after: Option<Duration>,
        url: String,
        status_code: reqwest::StatusCode,
        response_body: Option<String>,
        span_trace: SpanTrace,
    },

    #[error("request rejected with {status_code}: {}", describe_body(.body))]
    #[diagnostic(
        code(clockify_rs::api_error),
        help("Review the error message returned by the Clockify API")
    )]
    Api {
        url: String,
        status_code: reqwest::StatusCode,
        body: Option<ErrorBody>,
        response_body: Option<String>,
        span_trace: SpanTrace,
    },

    #[error("error decoding {entity} response: {source:?}")]
    #[diagnostic(
        code(clockify_rs::deserialization_error),
        help("The API returned data in an unexpected format")
    )]
    Deserialization {
        #[source]
        source: serde_json::Error,
        entity: String,
        url: String,
        status_code: reqwest::StatusCode,
        response_body: Option<String>,
        span_trace: SpanTrace,
    },
}

impl ApiError {
    /// HTTP status of the failed response, if one was received.
    #[must_use]
    pub fn status_code(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Transport { source, .. } => source.status(),
            Self::NotFound { status_code, .. }
            | Self::Unauthorized { status_code, .. }
            | Self::RateLimitExceeded { status_code, .. }
            | Self::Api { status_code, .. }
            | Self::Deserialization { status_code, .. } => Some(*status_code),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. }
            | Self::NotFound { url, .. }
            | Self::Unauthorized { url, .. }
            | Self::RateLimitExceeded { url, .. }
            | Self::Api { url, .. }
            | Self::Deserialization { url, .. } => url,
        }
    }

    /// Raw response body, when the service sent one.
    #[must_use]
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Transport { .. } => None,
            Self::NotFound { response_body, .. }
            | Self::Unauthorized { response_body, .. }
            | Self::RateLimitExceeded { response_body, .. }
            | Self::Api { response_body, .. }
            | Self::Deserialization { response_body, .. } => response_body.as_deref(),
        }
    }

    #[must_use]
    pub fn span_trace(&self) -> &SpanTrace {
        match self {
            Self::Transport { span_trace, .. }
            | Self::NotFound { span_trace, .. }
            | Self::Unauthorized { span_trace, .. }
            | Self::RateLimitExceeded { span_trace, .. }
            | Self::Api { span_trace, .. }
            | Self::Deserialization { span_trace, .. } => span_trace,
        }
    }
}

/// Type alias for results from this crate.
///
/// Only local failures end up here. Remote failures are reported through
/// [`ApiResponse`](crate::response::ApiResponse).
pub type Result<O> = std::result::Result<O, Error>;
