use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{
    Client,
    endpoints::ClockifyEndpoint,
    error::Result,
    response::ApiResponse,
    utils::{
        date_format::{clockify_datetime_format, clockify_datetime_format_option},
        duration::parse_iso8601_duration,
        serde_helpers::{empty_string_as_none, null_as_default},
    },
    validation::{Validate, missing},
};

/// Value of a workspace custom field attached to a new time entry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldValue {
    pub custom_field_id: String,
    pub value: String,
}

/// Payload for creating a time entry. `start` is required.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryRequest {
    #[serde(
        with = "clockify_datetime_format_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<OffsetDateTime>,
    #[serde(
        with = "clockify_datetime_format_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Vec<CustomFieldValue>>,
}

impl TimeEntryRequest {
    /// A request starting at `start` with every optional field unset.
    #[must_use]
    pub fn starting_at(start: OffsetDateTime) -> Self {
        Self {
            start: Some(start),
            ..Self::default()
        }
    }
}

impl Validate for TimeEntryRequest {
    fn violations(&self) -> Vec<&'static str> {
        missing([("Start", self.start.is_some())])
    }
}

/// Payload for updating a time entry. Both `start` and `billable` are
/// required; the service replaces the entry with what is sent.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimeEntryRequest {
    #[serde(
        with = "clockify_datetime_format_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
    #[serde(
        with = "clockify_datetime_format_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<String>>,
}

impl Validate for UpdateTimeEntryRequest {
    fn violations(&self) -> Vec<&'static str> {
        missing([
            ("Start", self.start.is_some()),
            ("Billable", self.billable.is_some()),
        ])
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    #[serde(with = "clockify_datetime_format")]
    pub start: OffsetDateTime,
    /// `None` while the timer is still running.
    #[serde(default, with = "clockify_datetime_format_option")]
    pub end: Option<OffsetDateTime>,
    /// ISO-8601 duration as reported by the service, e.g. `PT1H30M`.
    #[serde(default)]
    pub duration: Option<String>,
}

impl TimeInterval {
    /// The reported duration, decoded. `None` for running entries.
    pub fn parsed_duration(&self) -> Option<std::result::Result<Duration, String>> {
        self.duration.as_deref().map(parse_iso8601_duration)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.end.is_none()
    }
}

/// A time entry as stored by Clockify.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryDto {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub tag_ids: Option<Vec<String>>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub billable: bool,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub task_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub project_id: Option<String>,
    pub time_interval: TimeInterval,
    pub workspace_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_locked: bool,
}

/// Filters for listing a user's time entries.
#[derive(Debug, Serialize, Default, Clone)]
pub struct ListParameters {
    /// Entries whose description contains this text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Entries starting at or after this instant
    #[serde(
        with = "clockify_datetime_format_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<OffsetDateTime>,

    /// Entries starting at or before this instant
    #[serde(
        with = "clockify_datetime_format_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<OffsetDateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,

    /// Comma separated tag identifiers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    /// Only the running entry
    #[serde(rename = "in-progress", skip_serializing_if = "Option::is_none")]
    pub in_progress: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    #[serde(rename = "page-size", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// Create a time entry in a workspace.
pub async fn create(
    client: &Client,
    workspace_id: &str,
    request: &TimeEntryRequest,
) -> Result<ApiResponse<TimeEntryDto>> {
    request.validate()?;
    let url = client.endpoint_url(&ClockifyEndpoint::TimeEntries {
        workspace_id: workspace_id.to_string(),
    })?;
    Ok(client.post(url, request).await)
}

/// Retrieve a single time entry.
pub async fn get(
    client: &Client,
    workspace_id: &str,
    time_entry_id: &str,
) -> Result<ApiResponse<TimeEntryDto>> {
    let url = client.endpoint_url(&ClockifyEndpoint::TimeEntry {
        workspace_id: workspace_id.to_string(),
        time_entry_id: time_entry_id.to_string(),
    })?;
    Ok(client.get(url, &()).await)
}

/// Replace a time entry with the content of `request`.
pub async fn update(
    client: &Client,
    workspace_id: &str,
    time_entry_id: &str,
    request: &UpdateTimeEntryRequest,
) -> Result<ApiResponse<TimeEntryDto>> {
    request.validate()?;
    let url = client.endpoint_url(&ClockifyEndpoint::TimeEntry {
        workspace_id: workspace_id.to_string(),
        time_entry_id: time_entry_id.to_string(),
    })?;
    Ok(client.put(url, request).await)
}

pub async fn delete(
    client: &Client,
    workspace_id: &str,
    time_entry_id: &str,
) -> Result<ApiResponse<()>> {
    let url = client.endpoint_url(&ClockifyEndpoint::TimeEntry {
        workspace_id: workspace_id.to_string(),
        time_entry_id: time_entry_id.to_string(),
    })?;
    Ok(client.delete(url, "TimeEntryDto").await)
}

/// List the time entries of `user_id` in a workspace.
pub async fn find_all_for_user(
    client: &Client,
    workspace_id: &str,
    user_id: &str,
    parameters: &ListParameters,
) -> Result<ApiResponse<Vec<TimeEntryDto>>> {
    let url = client.endpoint_url(&ClockifyEndpoint::UserTimeEntries {
        workspace_id: workspace_id.to_string(),
        user_id: user_id.to_string(),
    })?;
    Ok(client.get(url, parameters).await)
}
