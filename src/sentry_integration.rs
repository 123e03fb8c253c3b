//! Sentry integration for clockify-rs errors.
//!
//! This module is only available when the `sentry` feature is enabled. It
//! turns both local errors and remote failures into Sentry breadcrumbs, and
//! extracts extra context from remote failures.
//!
//! Set up tracing with `ErrorLayer` so the captured span traces are populated:
//!
//! ```ignore
//! use tracing_subscriber::prelude::*;
//! use tracing_error::ErrorLayer;
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(ErrorLayer::default())
//!     .with(sentry::integrations::tracing::layer())
//!     .init();
//! ```

use std::collections::BTreeMap;

use sentry_core::{Breadcrumb, protocol::Value};

use crate::error::{ApiError, Error};

const MAX_BODY_PREVIEW: usize = 500;

fn breadcrumb(category: &str, message: String, data: BTreeMap<String, Value>) -> Breadcrumb {
    Breadcrumb {
        ty: "error".to_string(),
        category: Some(category.to_string()),
        message: Some(message),
        data,
        level: sentry_core::Level::Error,
        ..Default::default()
    }
}

impl<'a> From<&'a Error> for Breadcrumb {
    fn from(error: &'a Error) -> Self {
        let mut data = BTreeMap::new();
        let category = match error {
            Error::InvalidArgument { parameter, .. } => {
                data.insert("parameter".to_string(), Value::from(*parameter));
                "clockify.validation"
            }
            Error::InvalidEndpoint
            | Error::InvalidApiKey
            | Error::MissingApiKey(_)
            | Error::HttpClient(_) => "clockify.config",
        };
        breadcrumb(category, error.to_string(), data)
    }
}

impl<'a> From<&'a ApiError> for Breadcrumb {
    fn from(error: &'a ApiError) -> Self {
        let mut data = BTreeMap::new();
        data.insert("url".to_string(), Value::from(error.url().to_string()));
        if let Some(status) = error.status_code() {
            data.insert("status_code".to_string(), Value::from(status.as_u16()));
        }

        let category = match error {
            ApiError::Transport { .. } => "http.request",
            ApiError::NotFound { entity, .. } => {
                data.insert("entity".to_string(), Value::from(entity.clone()));
                "http.response"
            }
            ApiError::Deserialization { entity, .. } => {
                data.insert("entity".to_string(), Value::from(entity.clone()));
                "http.response"
            }
            ApiError::Unauthorized { .. } => "auth",
            ApiError::RateLimitExceeded { retry_after, .. } => {
                if let Some(retry) = retry_after {
                    data.insert("retry_after_secs".to_string(), Value::from(retry.as_secs()));
                }
                "clockify.rate_limit"
            }
            ApiError::Api { body, .. } => {
                if let Some(code) = body.as_ref().and_then(|body| body.code) {
                    data.insert("error_code".to_string(), Value::from(code));
                }
                "clockify.api"
            }
        };
        breadcrumb(category, error.to_string(), data)
    }
}

/// Extracts Sentry extra context from a remote failure.
///
/// ```ignore
/// if let Some(failure) = response.failure() {
///     sentry::configure_scope(|scope| {
///         for (key, value) in failure_to_sentry_context(failure) {
///             scope.set_extra(&key, value);
///         }
///     });
/// }
/// ```
pub fn failure_to_sentry_context(error: &ApiError) -> BTreeMap<String, Value> {
    let mut context = BTreeMap::new();

    context.insert(
        "clockify.span_trace".to_string(),
        Value::from(format!("{}", error.span_trace())),
    );
    context.insert("clockify.url".to_string(), Value::from(error.url().to_string()));

    if let Some(status) = error.status_code() {
        context.insert(
            "clockify.status_code".to_string(),
            Value::from(status.as_u16()),
        );
    }

    if let Some(body) = error.response_body() {
        let truncated = if body.len() > MAX_BODY_PREVIEW {
            let cut = (0..=MAX_BODY_PREVIEW)
                .rev()
                .find(|i| body.is_char_boundary(*i))
                .unwrap_or(0);
            format!("{}...", &body[..cut])
        } else {
            body.to_string()
        };
        context.insert("clockify.response_body".to_string(), Value::from(truncated));
    }

    if let ApiError::Api {
        body: Some(body), ..
    } = error
        && let Some(message) = &body.message
    {
        context.insert("clockify.message".to_string(), Value::from(message.clone()));
    }

    context
}
