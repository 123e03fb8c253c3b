use serde::{Deserialize, Serialize};

use crate::{Client, endpoints::ClockifyEndpoint, error::Result, response::ApiResponse};

#[derive(Clone, Debug, Default, Serialize)]
pub struct WorkspaceRequest {
    pub name: String,
}

impl WorkspaceRequest {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Amount in the smallest currency unit (cents), as Clockify stores it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HourlyRate {
    pub amount: i64,
    pub currency: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub hourly_rate: Option<HourlyRate>,
}

pub async fn create(
    client: &Client,
    request: &WorkspaceRequest,
) -> Result<ApiResponse<WorkspaceDto>> {
    let url = client.endpoint_url(&ClockifyEndpoint::Workspaces)?;
    Ok(client.post(url, request).await)
}

/// Retrieve every workspace the current user belongs to.
pub async fn list(client: &Client) -> Result<ApiResponse<Vec<WorkspaceDto>>> {
    let url = client.endpoint_url(&ClockifyEndpoint::Workspaces)?;
    Ok(client.get(url, &()).await)
}

pub async fn delete(client: &Client, workspace_id: &str) -> Result<ApiResponse<()>> {
    let url = client.endpoint_url(&ClockifyEndpoint::Workspace(workspace_id.to_string()))?;
    Ok(client.delete(url, "WorkspaceDto").await)
}
