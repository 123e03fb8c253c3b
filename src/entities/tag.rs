use serde::{Deserialize, Serialize};

use crate::{Client, endpoints::ClockifyEndpoint, error::Result, response::ApiResponse};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TagDto {
    pub id: String,
    pub name: String,
    pub workspace_id: String,
    #[serde(default)]
    pub archived: bool,
}

/// Filters for listing the tags of a workspace.
#[derive(Debug, Serialize, Default, Clone)]
pub struct ListParameters {
    /// Tags whose name contains this text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    #[serde(rename = "page-size", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// Retrieve the tags of a workspace.
pub async fn find_all(
    client: &Client,
    workspace_id: &str,
    parameters: &ListParameters,
) -> Result<ApiResponse<Vec<TagDto>>> {
    let url = client.endpoint_url(&ClockifyEndpoint::Tags {
        workspace_id: workspace_id.to_string(),
    })?;
    Ok(client.get(url, parameters).await)
}
