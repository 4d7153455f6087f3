//! Request and response shapes of the remote control-plane API.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use aps_core::tags::TagMap;

/// Status code reported for any remote entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    Creating,
    Active,
    Updating,
    Deleting,
    CreationFailed,
    UpdateFailed,
}

impl StatusCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Creating => "CREATING",
            StatusCode::Active => "ACTIVE",
            StatusCode::Updating => "UPDATING",
            StatusCode::Deleting => "DELETING",
            StatusCode::CreationFailed => "CREATION_FAILED",
            StatusCode::UpdateFailed => "UPDATE_FAILED",
        }
    }

    /// Statuses from which the entity will not reach `ACTIVE` on its own.
    pub fn is_failed(&self) -> bool {
        matches!(self, StatusCode::CreationFailed | StatusCode::UpdateFailed)
    }
}

impl Display for StatusCode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceStatus {
    pub code: StatusCode,
    pub reason: Option<String>,
}

impl ResourceStatus {
    pub fn new(code: StatusCode) -> Self {
        Self { code, reason: None }
    }

    pub fn failed(code: StatusCode, reason: &str) -> Self {
        Self {
            code,
            reason: Some(reason.to_string()),
        }
    }

    pub fn reason(&self) -> &str {
        self.reason.as_deref().unwrap_or_default()
    }
}

// --- Workspaces ---

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateWorkspaceInput {
    pub alias: Option<String>,
    pub tags: TagMap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateWorkspaceOutput {
    pub arn: String,
    pub workspace_id: String,
    pub status: ResourceStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceDescription {
    pub arn: String,
    pub workspace_id: String,
    pub alias: Option<String>,
    pub prometheus_endpoint: Option<String>,
    pub status: ResourceStatus,
    pub tags: TagMap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateWorkspaceAliasInput {
    pub workspace_id: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceSummary {
    pub arn: String,
    pub workspace_id: String,
    pub alias: Option<String>,
    pub status: ResourceStatus,
    pub tags: TagMap,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListWorkspacesOutput {
    pub workspaces: Vec<WorkspaceSummary>,
    pub next_token: Option<String>,
}

// --- Alert manager definitions ---

#[derive(Debug, Clone, PartialEq)]
pub struct AlertManagerDefinitionDescription {
    pub data: Vec<u8>,
    pub status: ResourceStatus,
}

// --- Logging configurations ---

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfigurationDescription {
    pub log_group_arn: Option<String>,
    pub status: ResourceStatus,
}

// --- Rule groups namespaces ---

#[derive(Debug, Clone, PartialEq)]
pub struct CreateRuleGroupsNamespaceInput {
    pub workspace_id: String,
    pub name: String,
    pub data: Vec<u8>,
    pub tags: TagMap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleGroupsNamespaceDescription {
    pub arn: String,
    pub name: String,
    pub data: Vec<u8>,
    pub status: ResourceStatus,
    pub tags: TagMap,
}
