use std::fmt;
use url::Url;

use crate::error::{Error, Result};

pub const BASE_URL: &str = "https://api.clockify.me/api/v1/";

/// A typed representation of Clockify API endpoints.
///
/// Every time-entry and tag endpoint is scoped to a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockifyEndpoint {
    Workspaces,
    Workspace(String),
    TimeEntries {
        workspace_id: String,
    },
    TimeEntry {
        workspace_id: String,
        time_entry_id: String,
    },
    UserTimeEntries {
        workspace_id: String,
        user_id: String,
    },
    Tags {
        workspace_id: String,
    },
    /// The user owning the API key.
    CurrentUser,
}

impl ClockifyEndpoint {
    fn path_segments(&self) -> Vec<&str> {
        match self {
            Self::Workspaces => vec!["workspaces"],
            Self::Workspace(id) => vec!["workspaces", id.as_str()],
            Self::TimeEntries { workspace_id } => {
                vec!["workspaces", workspace_id.as_str(), "time-entries"]
            }
            Self::TimeEntry {
                workspace_id,
                time_entry_id,
            } => vec![
                "workspaces",
                workspace_id.as_str(),
                "time-entries",
                time_entry_id.as_str(),
            ],
            Self::UserTimeEntries {
                workspace_id,
                user_id,
            } => vec![
                "workspaces",
                workspace_id.as_str(),
                "user",
                user_id.as_str(),
                "time-entries",
            ],
            Self::Tags { workspace_id } => vec!["workspaces", workspace_id.as_str(), "tags"],
            Self::CurrentUser => vec!["user"],
        }
    }

    /// Converts the endpoint to a URL below `base`.
    ///
    /// Identifiers are percent-encoded as single path segments, so an
    /// identifier can never escape its position in the path.
    pub fn to_url_with_base(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| Error::InvalidEndpoint)?;
            segments.pop_if_empty();
            for segment in self.path_segments() {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    /// Converts the endpoint to a URL below the public Clockify API.
    pub fn to_url(&self) -> Result<Url> {
        let base = Url::parse(BASE_URL).map_err(|_| Error::InvalidEndpoint)?;
        self.to_url_with_base(&base)
    }
}

impl fmt::Display for ClockifyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_url() {
            Ok(url) => write!(f, "{url}"),
            Err(_) => write!(f, "Invalid endpoint"),
        }
    }
}

// Allow conversion from ClockifyEndpoint to a Url
impl TryFrom<ClockifyEndpoint> for Url {
    type Error = Error;

    fn try_from(endpoint: ClockifyEndpoint) -> Result<Self> {
        endpoint.to_url()
    }
}
