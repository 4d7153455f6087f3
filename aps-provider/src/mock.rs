//! Scripted in-process stand-in for the remote API.
//!
//! Each operation is answered by a closure registered with the matching
//! `on_*` builder method. Operations without a handler fail with an
//! unmapped error code, so a test notices any call it did not expect.
//! Every call is recorded by operation name.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::{ServiceError, ServiceResult};
use crate::types::*;
use crate::ApsService;
use aps_core::tags::TagMap;

pub const NOT_CONFIGURED: &str = "MockNotConfigured";

type Handler<A, T> = Option<Box<dyn Fn(A) -> ServiceResult<T>>>;

/// A sequence of canned values; the last value repeats once the rest are used.
pub struct Script<T> {
    items: RefCell<VecDeque<T>>,
}

impl<T: Clone> Script<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: RefCell::new(items.into()),
        }
    }

    /// Next value, or `None` if the script was created empty.
    pub fn next(&self) -> Option<T> {
        let mut items = self.items.borrow_mut();
        if items.len() > 1 {
            items.pop_front()
        } else {
            items.front().cloned()
        }
    }
}

#[derive(Default)]
pub struct MockApsService {
    calls: RefCell<Vec<String>>,
    create_workspace: Handler<CreateWorkspaceInput, CreateWorkspaceOutput>,
    describe_workspace: Handler<String, WorkspaceDescription>,
    update_workspace_alias: Handler<UpdateWorkspaceAliasInput, ()>,
    delete_workspace: Handler<String, ()>,
    list_workspaces: Handler<Option<String>, ListWorkspacesOutput>,
    tag_resource: Handler<(String, TagMap), ()>,
    untag_resource: Handler<(String, Vec<String>), ()>,
    create_alert_manager: Handler<(String, Vec<u8>), ResourceStatus>,
    describe_alert_manager: Handler<String, AlertManagerDefinitionDescription>,
    put_alert_manager: Handler<(String, Vec<u8>), ResourceStatus>,
    delete_alert_manager: Handler<String, ()>,
    create_logging: Handler<(String, String), ResourceStatus>,
    describe_logging: Handler<String, LoggingConfigurationDescription>,
    update_logging: Handler<(String, String), ResourceStatus>,
    delete_logging: Handler<String, ()>,
    create_namespace: Handler<CreateRuleGroupsNamespaceInput, RuleGroupsNamespaceDescription>,
    describe_namespace: Handler<(String, String), RuleGroupsNamespaceDescription>,
    put_namespace: Handler<(String, String, Vec<u8>), ResourceStatus>,
    delete_namespace: Handler<(String, String), ()>,
}

impl MockApsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operation names in the order they were called.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == operation).count()
    }

    pub fn was_called(&self, operation: &str) -> bool {
        self.call_count(operation) > 0
    }

    fn dispatch<A, T>(
        &self,
        operation: &str,
        handler: &Handler<A, T>,
        args: A,
    ) -> ServiceResult<T> {
        self.calls.borrow_mut().push(operation.to_string());
        match handler {
            Some(f) => f(args),
            None => Err(ServiceError::new(
                NOT_CONFIGURED,
                &format!("no handler registered for {}", operation),
            )),
        }
    }

    pub fn on_create_workspace(
        mut self,
        f: impl Fn(CreateWorkspaceInput) -> ServiceResult<CreateWorkspaceOutput> + 'static,
    ) -> Self {
        self.create_workspace = Some(Box::new(f));
        self
    }

    pub fn on_describe_workspace(
        mut self,
        f: impl Fn(String) -> ServiceResult<WorkspaceDescription> + 'static,
    ) -> Self {
        self.describe_workspace = Some(Box::new(f));
        self
    }

    pub fn on_update_workspace_alias(
        mut self,
        f: impl Fn(UpdateWorkspaceAliasInput) -> ServiceResult<()> + 'static,
    ) -> Self {
        self.update_workspace_alias = Some(Box::new(f));
        self
    }

    pub fn on_delete_workspace(
        mut self,
        f: impl Fn(String) -> ServiceResult<()> + 'static,
    ) -> Self {
        self.delete_workspace = Some(Box::new(f));
        self
    }

    pub fn on_list_workspaces(
        mut self,
        f: impl Fn(Option<String>) -> ServiceResult<ListWorkspacesOutput> + 'static,
    ) -> Self {
        self.list_workspaces = Some(Box::new(f));
        self
    }

    pub fn on_tag_resource(
        mut self,
        f: impl Fn((String, TagMap)) -> ServiceResult<()> + 'static,
    ) -> Self {
        self.tag_resource = Some(Box::new(f));
        self
    }

    pub fn on_untag_resource(
        mut self,
        f: impl Fn((String, Vec<String>)) -> ServiceResult<()> + 'static,
    ) -> Self {
        self.untag_resource = Some(Box::new(f));
        self
    }

    pub fn on_create_alert_manager_definition(
        mut self,
        f: impl Fn((String, Vec<u8>)) -> ServiceResult<ResourceStatus> + 'static,
    ) -> Self {
        self.create_alert_manager = Some(Box::new(f));
        self
    }

    pub fn on_describe_alert_manager_definition(
        mut self,
        f: impl Fn(String) -> ServiceResult<AlertManagerDefinitionDescription> + 'static,
    ) -> Self {
        self.describe_alert_manager = Some(Box::new(f));
        self
    }

    pub fn on_put_alert_manager_definition(
        mut self,
        f: impl Fn((String, Vec<u8>)) -> ServiceResult<ResourceStatus> + 'static,
    ) -> Self {
        self.put_alert_manager = Some(Box::new(f));
        self
    }

    pub fn on_delete_alert_manager_definition(
        mut self,
        f: impl Fn(String) -> ServiceResult<()> + 'static,
    ) -> Self {
        self.delete_alert_manager = Some(Box::new(f));
        self
    }

    pub fn on_create_logging_configuration(
        mut self,
        f: impl Fn((String, String)) -> ServiceResult<ResourceStatus> + 'static,
    ) -> Self {
        self.create_logging = Some(Box::new(f));
        self
    }

    pub fn on_describe_logging_configuration(
        mut self,
        f: impl Fn(String) -> ServiceResult<LoggingConfigurationDescription> + 'static,
    ) -> Self {
        self.describe_logging = Some(Box::new(f));
        self
    }

    pub fn on_update_logging_configuration(
        mut self,
        f: impl Fn((String, String)) -> ServiceResult<ResourceStatus> + 'static,
    ) -> Self {
        self.update_logging = Some(Box::new(f));
        self
    }

    pub fn on_delete_logging_configuration(
        mut self,
        f: impl Fn(String) -> ServiceResult<()> + 'static,
    ) -> Self {
        self.delete_logging = Some(Box::new(f));
        self
    }

    pub fn on_create_rule_groups_namespace(
        mut self,
        f: impl Fn(CreateRuleGroupsNamespaceInput) -> ServiceResult<RuleGroupsNamespaceDescription>
            + 'static,
    ) -> Self {
        self.create_namespace = Some(Box::new(f));
        self
    }

    pub fn on_describe_rule_groups_namespace(
        mut self,
        f: impl Fn((String, String)) -> ServiceResult<RuleGroupsNamespaceDescription> + 'static,
    ) -> Self {
        self.describe_namespace = Some(Box::new(f));
        self
    }

    pub fn on_put_rule_groups_namespace(
        mut self,
        f: impl Fn((String, String, Vec<u8>)) -> ServiceResult<ResourceStatus> + 'static,
    ) -> Self {
        self.put_namespace = Some(Box::new(f));
        self
    }

    pub fn on_delete_rule_groups_namespace(
        mut self,
        f: impl Fn((String, String)) -> ServiceResult<()> + 'static,
    ) -> Self {
        self.delete_namespace = Some(Box::new(f));
        self
    }
}

impl ApsService for MockApsService {
    fn create_workspace(
        &self,
        input: CreateWorkspaceInput,
    ) -> ServiceResult<CreateWorkspaceOutput> {
        self.dispatch("create_workspace", &self.create_workspace, input)
    }

    fn describe_workspace(&self, workspace_id: &str) -> ServiceResult<WorkspaceDescription> {
        self.dispatch("describe_workspace", &self.describe_workspace, workspace_id.to_string())
    }

    fn update_workspace_alias(&self, input: UpdateWorkspaceAliasInput) -> ServiceResult<()> {
        self.dispatch("update_workspace_alias", &self.update_workspace_alias, input)
    }

    fn delete_workspace(&self, workspace_id: &str) -> ServiceResult<()> {
        self.dispatch("delete_workspace", &self.delete_workspace, workspace_id.to_string())
    }

    fn list_workspaces(&self, next_token: Option<&str>) -> ServiceResult<ListWorkspacesOutput> {
        self.dispatch(
            "list_workspaces",
            &self.list_workspaces,
            next_token.map(str::to_string),
        )
    }

    fn tag_resource(&self, resource_arn: &str, tags: TagMap) -> ServiceResult<()> {
        self.dispatch("tag_resource", &self.tag_resource, (resource_arn.to_string(), tags))
    }

    fn untag_resource(&self, resource_arn: &str, tag_keys: Vec<String>) -> ServiceResult<()> {
        self.dispatch(
            "untag_resource",
            &self.untag_resource,
            (resource_arn.to_string(), tag_keys),
        )
    }

    fn create_alert_manager_definition(
        &self,
        workspace_id: &str,
        data: &[u8],
    ) -> ServiceResult<ResourceStatus> {
        self.dispatch(
            "create_alert_manager_definition",
            &self.create_alert_manager,
            (workspace_id.to_string(), data.to_vec()),
        )
    }

    fn describe_alert_manager_definition(
        &self,
        workspace_id: &str,
    ) -> ServiceResult<AlertManagerDefinitionDescription> {
        self.dispatch(
            "describe_alert_manager_definition",
            &self.describe_alert_manager,
            workspace_id.to_string(),
        )
    }

    fn put_alert_manager_definition(
        &self,
        workspace_id: &str,
        data: &[u8],
    ) -> ServiceResult<ResourceStatus> {
        self.dispatch(
            "put_alert_manager_definition",
            &self.put_alert_manager,
            (workspace_id.to_string(), data.to_vec()),
        )
    }

    fn delete_alert_manager_definition(&self, workspace_id: &str) -> ServiceResult<()> {
        self.dispatch(
            "delete_alert_manager_definition",
            &self.delete_alert_manager,
            workspace_id.to_string(),
        )
    }

    fn create_logging_configuration(
        &self,
        workspace_id: &str,
        log_group_arn: &str,
    ) -> ServiceResult<ResourceStatus> {
        self.dispatch(
            "create_logging_configuration",
            &self.create_logging,
            (workspace_id.to_string(), log_group_arn.to_string()),
        )
    }

    fn describe_logging_configuration(
        &self,
        workspace_id: &str,
    ) -> ServiceResult<LoggingConfigurationDescription> {
        self.dispatch(
            "describe_logging_configuration",
            &self.describe_logging,
            workspace_id.to_string(),
        )
    }

    fn update_logging_configuration(
        &self,
        workspace_id: &str,
        log_group_arn: &str,
    ) -> ServiceResult<ResourceStatus> {
        self.dispatch(
            "update_logging_configuration",
            &self.update_logging,
            (workspace_id.to_string(), log_group_arn.to_string()),
        )
    }

    fn delete_logging_configuration(&self, workspace_id: &str) -> ServiceResult<()> {
        self.dispatch(
            "delete_logging_configuration",
            &self.delete_logging,
            workspace_id.to_string(),
        )
    }

    fn create_rule_groups_namespace(
        &self,
        input: CreateRuleGroupsNamespaceInput,
    ) -> ServiceResult<RuleGroupsNamespaceDescription> {
        self.dispatch("create_rule_groups_namespace", &self.create_namespace, input)
    }

    fn describe_rule_groups_namespace(
        &self,
        workspace_id: &str,
        name: &str,
    ) -> ServiceResult<RuleGroupsNamespaceDescription> {
        self.dispatch(
            "describe_rule_groups_namespace",
            &self.describe_namespace,
            (workspace_id.to_string(), name.to_string()),
        )
    }

    fn put_rule_groups_namespace(
        &self,
        workspace_id: &str,
        name: &str,
        data: &[u8],
    ) -> ServiceResult<ResourceStatus> {
        self.dispatch(
            "put_rule_groups_namespace",
            &self.put_namespace,
            (workspace_id.to_string(), name.to_string(), data.to_vec()),
        )
    }

    fn delete_rule_groups_namespace(&self, workspace_id: &str, name: &str) -> ServiceResult<()> {
        self.dispatch(
            "delete_rule_groups_namespace",
            &self.delete_namespace,
            (workspace_id.to_string(), name.to_string()),
        )
    }
}
