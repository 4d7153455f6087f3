//! Resource descriptions exchanged with the caller.

use serde::{Deserialize, Serialize};

use aps_core::tags::{tags_to_map, Tag, TagMap};

/// A resource description addressed by its ARN once it exists.
pub trait ResourceModel: Clone {
    fn arn(&self) -> Option<&str>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoggingConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_group_arn: Option<String>,
}

impl LoggingConfiguration {
    pub fn new(log_group_arn: &str) -> Self {
        Self {
            log_group_arn: Some(log_group_arn.to_string()),
        }
    }
}

/// A workspace together with its optional attached configurations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkspaceModel {
    /// Set once the workspace exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    /// Read-only, derived from the ARN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Read-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prometheus_endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_manager_definition: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging_configuration: Option<LoggingConfiguration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl WorkspaceModel {
    pub fn with_arn(arn: &str) -> Self {
        Self {
            arn: Some(arn.to_string()),
            ..Default::default()
        }
    }

    pub fn tag_map(&self) -> TagMap {
        tags_to_map(&self.tags)
    }

    /// Alert manager payload, if it carries anything besides whitespace.
    pub fn alert_manager_payload(&self) -> Option<&str> {
        self.alert_manager_definition
            .as_deref()
            .filter(|data| !data.trim().is_empty())
    }

    /// Log group the logging configuration points at, trimmed; `None` when
    /// absent or blank.
    pub fn log_group_arn(&self) -> Option<&str> {
        self.logging_configuration
            .as_ref()
            .and_then(|config| config.log_group_arn.as_deref())
            .map(str::trim)
            .filter(|arn| !arn.is_empty())
    }
}

impl ResourceModel for WorkspaceModel {
    fn arn(&self) -> Option<&str> {
        self.arn.as_deref()
    }
}

/// A rule-groups namespace attached to a workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleGroupsNamespaceModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// ARN of the owning workspace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,

    /// Rules file contents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl RuleGroupsNamespaceModel {
    pub fn with_arn(arn: &str) -> Self {
        Self {
            arn: Some(arn.to_string()),
            ..Default::default()
        }
    }

    pub fn tag_map(&self) -> TagMap {
        tags_to_map(&self.tags)
    }
}

impl ResourceModel for RuleGroupsNamespaceModel {
    fn arn(&self) -> Option<&str> {
        self.arn.as_deref()
    }
}
