use serde::{Deserialize, Serialize};

use crate::{Client, endpoints::ClockifyEndpoint, error::Result, response::ApiResponse};

/// The user owning the API key.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserDto {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub active_workspace: Option<String>,
    #[serde(default)]
    pub default_workspace: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

pub async fn current(client: &Client) -> Result<ApiResponse<CurrentUserDto>> {
    let url = client.endpoint_url(&ClockifyEndpoint::CurrentUser)?;
    Ok(client.get(url, &()).await)
}
