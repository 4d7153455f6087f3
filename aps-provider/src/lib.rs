//! Remote control-plane API boundary.
//!
//! This library defines the request/response contract the orchestrator relies
//! on for every sub-resource kind. Implementations talk to the managed
//! Prometheus control plane; the orchestrator never sees transport details,
//! only typed outputs or a [`ServiceError`] carrying the provider's error code.

pub mod error;
pub mod types;

// When the `test-helpers` feature is enabled, include the scripted mock service.
#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;

pub use error::{ServiceError, ServiceResult};
pub use types::*;

use aps_core::tags::TagMap;

/// The core trait for the remote API.
///
/// Every call is synchronous and issues exactly one request. Mutations start
/// asynchronous work on the remote side; completion is observed by polling
/// the matching `describe_*` call.
pub trait ApsService {
    // --- Workspaces ---

    fn create_workspace(&self, input: CreateWorkspaceInput) -> ServiceResult<CreateWorkspaceOutput>;

    fn describe_workspace(&self, workspace_id: &str) -> ServiceResult<WorkspaceDescription>;

    fn update_workspace_alias(&self, input: UpdateWorkspaceAliasInput) -> ServiceResult<()>;

    fn delete_workspace(&self, workspace_id: &str) -> ServiceResult<()>;

    /// One page of workspaces; `next_token` is the token returned by the
    /// previous page.
    fn list_workspaces(&self, next_token: Option<&str>) -> ServiceResult<ListWorkspacesOutput>;

    // --- Tagging (any resource ARN) ---

    fn tag_resource(&self, resource_arn: &str, tags: TagMap) -> ServiceResult<()>;

    fn untag_resource(&self, resource_arn: &str, tag_keys: Vec<String>) -> ServiceResult<()>;

    // --- Alert manager definitions ---

    fn create_alert_manager_definition(
        &self,
        workspace_id: &str,
        data: &[u8],
    ) -> ServiceResult<ResourceStatus>;

    fn describe_alert_manager_definition(
        &self,
        workspace_id: &str,
    ) -> ServiceResult<AlertManagerDefinitionDescription>;

    fn put_alert_manager_definition(
        &self,
        workspace_id: &str,
        data: &[u8],
    ) -> ServiceResult<ResourceStatus>;

    fn delete_alert_manager_definition(&self, workspace_id: &str) -> ServiceResult<()>;

    // --- Logging configurations ---

    fn create_logging_configuration(
        &self,
        workspace_id: &str,
        log_group_arn: &str,
    ) -> ServiceResult<ResourceStatus>;

    fn describe_logging_configuration(
        &self,
        workspace_id: &str,
    ) -> ServiceResult<LoggingConfigurationDescription>;

    fn update_logging_configuration(
        &self,
        workspace_id: &str,
        log_group_arn: &str,
    ) -> ServiceResult<ResourceStatus>;

    fn delete_logging_configuration(&self, workspace_id: &str) -> ServiceResult<()>;

    // --- Rule groups namespaces ---

    fn create_rule_groups_namespace(
        &self,
        input: CreateRuleGroupsNamespaceInput,
    ) -> ServiceResult<RuleGroupsNamespaceDescription>;

    fn describe_rule_groups_namespace(
        &self,
        workspace_id: &str,
        name: &str,
    ) -> ServiceResult<RuleGroupsNamespaceDescription>;

    fn put_rule_groups_namespace(
        &self,
        workspace_id: &str,
        name: &str,
        data: &[u8],
    ) -> ServiceResult<ResourceStatus>;

    fn delete_rule_groups_namespace(&self, workspace_id: &str, name: &str) -> ServiceResult<()>;
}

impl<T: ApsService + ?Sized> ApsService for &T {
    fn create_workspace(
        &self,
        input: CreateWorkspaceInput,
    ) -> ServiceResult<CreateWorkspaceOutput> {
        (**self).create_workspace(input)
    }

    fn describe_workspace(&self, workspace_id: &str) -> ServiceResult<WorkspaceDescription> {
        (**self).describe_workspace(workspace_id)
    }

    fn update_workspace_alias(&self, input: UpdateWorkspaceAliasInput) -> ServiceResult<()> {
        (**self).update_workspace_alias(input)
    }

    fn delete_workspace(&self, workspace_id: &str) -> ServiceResult<()> {
        (**self).delete_workspace(workspace_id)
    }

    fn list_workspaces(&self, next_token: Option<&str>) -> ServiceResult<ListWorkspacesOutput> {
        (**self).list_workspaces(next_token)
    }

    fn tag_resource(&self, resource_arn: &str, tags: TagMap) -> ServiceResult<()> {
        (**self).tag_resource(resource_arn, tags)
    }

    fn untag_resource(&self, resource_arn: &str, tag_keys: Vec<String>) -> ServiceResult<()> {
        (**self).untag_resource(resource_arn, tag_keys)
    }

    fn create_alert_manager_definition(
        &self,
        workspace_id: &str,
        data: &[u8],
    ) -> ServiceResult<ResourceStatus> {
        (**self).create_alert_manager_definition(workspace_id, data)
    }

    fn describe_alert_manager_definition(
        &self,
        workspace_id: &str,
    ) -> ServiceResult<AlertManagerDefinitionDescription> {
        (**self).describe_alert_manager_definition(workspace_id)
    }

    fn put_alert_manager_definition(
        &self,
        workspace_id: &str,
        data: &[u8],
    ) -> ServiceResult<ResourceStatus> {
        (**self).put_alert_manager_definition(workspace_id, data)
    }

    fn delete_alert_manager_definition(&self, workspace_id: &str) -> ServiceResult<()> {
        (**self).delete_alert_manager_definition(workspace_id)
    }

    fn create_logging_configuration(
        &self,
        workspace_id: &str,
        log_group_arn: &str,
    ) -> ServiceResult<ResourceStatus> {
        (**self).create_logging_configuration(workspace_id, log_group_arn)
    }

    fn describe_logging_configuration(
        &self,
        workspace_id: &str,
    ) -> ServiceResult<LoggingConfigurationDescription> {
        (**self).describe_logging_configuration(workspace_id)
    }

    fn update_logging_configuration(
        &self,
        workspace_id: &str,
        log_group_arn: &str,
    ) -> ServiceResult<ResourceStatus> {
        (**self).update_logging_configuration(workspace_id, log_group_arn)
    }

    fn delete_logging_configuration(&self, workspace_id: &str) -> ServiceResult<()> {
        (**self).delete_logging_configuration(workspace_id)
    }

    fn create_rule_groups_namespace(
        &self,
        input: CreateRuleGroupsNamespaceInput,
    ) -> ServiceResult<RuleGroupsNamespaceDescription> {
        (**self).create_rule_groups_namespace(input)
    }

    fn describe_rule_groups_namespace(
        &self,
        workspace_id: &str,
        name: &str,
    ) -> ServiceResult<RuleGroupsNamespaceDescription> {
        (**self).describe_rule_groups_namespace(workspace_id, name)
    }

    fn put_rule_groups_namespace(
        &self,
        workspace_id: &str,
        name: &str,
        data: &[u8],
    ) -> ServiceResult<ResourceStatus> {
        (**self).put_rule_groups_namespace(workspace_id, name, data)
    }

    fn delete_rule_groups_namespace(&self, workspace_id: &str, name: &str) -> ServiceResult<()> {
        (**self).delete_rule_groups_namespace(workspace_id, name)
    }
}
