//! The uniform envelope returned by every remote operation.

use reqwest::StatusCode;

use crate::error::ApiError;

/// Outcome of a call against the Clockify API.
///
/// A remote failure (non-2xx status, network fault, undecodable body) is a
/// `Failure` rather than an `Err`, so callers inspect the envelope instead of
/// propagating. Local validation failures never reach this type.
#[derive(Debug)]
#[must_use]
pub enum ApiResponse<T> {
    Success { status_code: StatusCode, data: T },
    Failure(ApiError),
}

impl<T> ApiResponse<T> {
    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The decoded payload, only present on success.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure(_) => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ApiError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(error) => Some(error),
        }
    }

    /// Status code of the response, if the service answered at all.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Success { status_code, .. } => Some(*status_code),
            Self::Failure(error) => error.status_code(),
        }
    }

    /// Converts the envelope into a plain `Result`, for callers that want `?`.
    pub fn into_result(self) -> std::result::Result<T, ApiError> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure(error) => Err(error),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ApiResponse<U> {
        match self {
            Self::Success { status_code, data } => ApiResponse::Success {
                status_code,
                data: f(data),
            },
            Self::Failure(error) => ApiResponse::Failure(error),
        }
    }
}

impl<T> From<ApiError> for ApiResponse<T> {
    fn from(error: ApiError) -> Self {
        Self::Failure(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_error::SpanTrace;

    fn not_found() -> ApiError {
        ApiError::NotFound {
            entity: "TimeEntryDto".to_string(),
            url: "https://api.clockify.me/api/v1/workspaces/ws/time-entries/te".to_string(),
            status_code: StatusCode::NOT_FOUND,
            response_body: None,
            span_trace: SpanTrace::capture(),
        }
    }

    #[test]
    fn success_exposes_data() {
        let response = ApiResponse::Success {
            status_code: StatusCode::CREATED,
            data: 7,
        };
        assert!(response.is_successful());
        assert_eq!(response.data(), Some(&7));
        assert_eq!(response.status_code(), Some(StatusCode::CREATED));
        assert!(response.failure().is_none());
        assert_eq!(response.map(|n| n * 2).into_data(), Some(14));
    }

    #[test]
    fn failure_has_no_data() {
        let response: ApiResponse<u32> = not_found().into();
        assert!(!response.is_successful());
        assert!(response.data().is_none());
        assert_eq!(response.status_code(), Some(StatusCode::NOT_FOUND));
        assert!(matches!(
            response.into_result(),
            Err(ApiError::NotFound { .. })
        ));
    }
}
