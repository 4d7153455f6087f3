//! Rule-groups namespace resource.
//!
//! A namespace is addressed by an ARN of the form
//! `...:rulegroupsnamespace/<workspace-id>/<name>`. Create and update run
//! through a single-stage pipeline so they resume the same way the
//! workspace does.

use tracing::{debug, info};

use aps_config::{HandlerConfig, StageKeys};
use aps_core::arn::{resolve, ResourceArn, ResourceKind};
use aps_core::error::{ApsError, Result};
use aps_core::tags::{diff, map_to_tags};
use aps_provider::{ApsService, CreateRuleGroupsNamespaceInput, ResourceStatus, StatusCode};

use crate::event::ProgressEvent;
use crate::handler::{MESSAGE_CREATE_COMPLETE, MESSAGE_DELETE_COMPLETE, MESSAGE_READ_COMPLETE};
use crate::model::RuleGroupsNamespaceModel;
use crate::request::HandlerRequest;
use crate::resource::{fail_status, suspend};
use crate::stage::{Stage, StageOutcome, StagePipeline};

pub const MESSAGE_UPDATE_COMPLETE: &str = "Update Complete";

const ENTITY: &str = "RuleGroupsNamespace";

type Outcome = StageOutcome<RuleGroupsNamespaceModel>;

/// Workspace id and namespace name addressed by a namespace ARN.
struct Target {
    arn: ResourceArn,
    workspace_id: String,
    name: String,
}

fn target(model: &RuleGroupsNamespaceModel) -> Result<Target> {
    let raw = model
        .arn
        .as_deref()
        .ok_or_else(|| ApsError::MissingRequiredField("rule groups namespace Arn".to_string()))?;
    let (arn, workspace_id) = resolve(raw)?;
    if arn.kind() != ResourceKind::RuleGroupsNamespace {
        return Err(ApsError::MalformedIdentifier(format!(
            "expected a rule groups namespace ARN, got {}",
            arn.kind()
        )));
    }
    let name = arn
        .sub_path()
        .and_then(|path| path.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApsError::MalformedIdentifier(format!("{} has no namespace name", raw)))?
        .to_string();
    Ok(Target {
        arn,
        workspace_id,
        name,
    })
}

fn required<'m>(value: &'m Option<String>, what: &str) -> Result<&'m str> {
    value
        .as_deref()
        .ok_or_else(|| ApsError::InvalidRequest(format!("Missing {}", what)))
}

/// Describe the namespace and copy its remote fields into `model`.
fn refresh_namespace<S: ApsService>(
    service: &S,
    model: &mut RuleGroupsNamespaceModel,
) -> Result<ResourceStatus> {
    let target = target(model)?;
    let description = service.describe_rule_groups_namespace(&target.workspace_id, &target.name)?;

    let workspace_arn = target
        .arn
        .with_resource(ResourceKind::Workspace, &target.workspace_id);
    model.name = Some(target.name);
    model.workspace = Some(workspace_arn.to_string());
    model.data = Some(String::from_utf8_lossy(&description.data).into_owned());
    model.tags = map_to_tags(&description.tags);
    Ok(description.status)
}

fn await_active<S: ApsService>(
    service: &S,
    keys: &StageKeys,
    delay_seconds: u32,
    model: &mut RuleGroupsNamespaceModel,
) -> Outcome {
    let status = match refresh_namespace(service, model) {
        Ok(status) => status,
        Err(err) => return StageOutcome::fail(&err, model.clone()),
    };
    debug!(arn = ?model.arn, status = %status.code, "polled rule groups namespace");

    match status.code {
        StatusCode::Active => StageOutcome::Advance,
        code if code.is_failed() => fail_status(ENTITY, &status, model),
        _ => suspend(model, &keys.active, delay_seconds),
    }
}

struct CreateNamespace<'a, S> {
    service: &'a S,
    keys: &'a StageKeys,
    delay_seconds: u32,
}

impl<S: ApsService> CreateNamespace<'_, S> {
    fn start(&self, model: &mut RuleGroupsNamespaceModel) -> Result<()> {
        let workspace = required(&model.workspace, "Workspace ARN")?;
        let name = required(&model.name, "RuleGroupsNamespace Name")?;
        let data = required(&model.data, "RuleGroupsNamespace Data")?;

        let (workspace_arn, workspace_id) = resolve(workspace)?;
        if workspace_arn.kind() != ResourceKind::Workspace {
            return Err(ApsError::InvalidRequest(format!(
                "Workspace must be a workspace ARN, got {}",
                workspace_arn.kind()
            )));
        }

        info!(workspace_id = %workspace_id, namespace = name, "creating rule groups namespace");
        let created = self.service.create_rule_groups_namespace(CreateRuleGroupsNamespaceInput {
            workspace_id,
            name: name.to_string(),
            data: data.as_bytes().to_vec(),
            tags: model.tag_map(),
        })?;
        model.arn = Some(created.arn);
        Ok(())
    }
}

impl<S: ApsService> Stage<RuleGroupsNamespaceModel> for CreateNamespace<'_, S> {
    fn name(&self) -> &'static str {
        "rule_groups_namespace"
    }

    fn run(
        &self,
        request: &HandlerRequest,
        _previous: &RuleGroupsNamespaceModel,
        current: &mut RuleGroupsNamespaceModel,
    ) -> Outcome {
        if let Some(arn) = request.callback_context.get_str(&self.keys.active) {
            current.arn = Some(arn.to_string());
            return await_active(self.service, self.keys, self.delay_seconds, current);
        }
        match self.start(current) {
            Ok(()) => suspend(current, &self.keys.active, self.delay_seconds),
            Err(err) => StageOutcome::fail(&err, current.clone()),
        }
    }
}

struct UpdateNamespace<'a, S> {
    service: &'a S,
    keys: &'a StageKeys,
    delay_seconds: u32,
}

impl<S: ApsService> UpdateNamespace<'_, S> {
    fn apply(
        &self,
        previous: &RuleGroupsNamespaceModel,
        current: &RuleGroupsNamespaceModel,
    ) -> Result<()> {
        let target = target(current)?;
        let arn = target.arn.to_string();

        let tag_diff = diff(&current.tag_map(), &previous.tag_map());
        if !tag_diff.to_remove.is_empty() {
            info!(%arn, keys = ?tag_diff.to_remove, "removing rule groups namespace tags");
            self.service
                .untag_resource(&arn, tag_diff.to_remove.into_iter().collect())?;
        }
        if !tag_diff.to_change.is_empty() {
            info!(%arn, count = tag_diff.to_change.len(), "tagging rule groups namespace");
            self.service.tag_resource(&arn, tag_diff.to_change)?;
        }

        let data = required(&current.data, "RuleGroupsNamespace Data")?;
        info!(%arn, "replacing rule groups namespace data");
        self.service
            .put_rule_groups_namespace(&target.workspace_id, &target.name, data.as_bytes())?;
        Ok(())
    }
}

impl<S: ApsService> Stage<RuleGroupsNamespaceModel> for UpdateNamespace<'_, S> {
    fn name(&self) -> &'static str {
        "rule_groups_namespace"
    }

    fn run(
        &self,
        request: &HandlerRequest,
        previous: &RuleGroupsNamespaceModel,
        current: &mut RuleGroupsNamespaceModel,
    ) -> Outcome {
        if let Some(arn) = request.callback_context.get_str(&self.keys.active) {
            current.arn = Some(arn.to_string());
            return await_active(self.service, self.keys, self.delay_seconds, current);
        }
        match self.apply(previous, current) {
            Ok(()) => suspend(current, &self.keys.active, self.delay_seconds),
            Err(err) => StageOutcome::fail(&err, current.clone()),
        }
    }
}

pub struct RuleGroupsNamespaceOrchestrator<S> {
    service: S,
    config: HandlerConfig,
}

impl<S: ApsService> RuleGroupsNamespaceOrchestrator<S> {
    pub fn new(service: S, config: HandlerConfig) -> Self {
        Self { service, config }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn keys(&self) -> &StageKeys {
        &self.config.keys.rule_groups_namespace
    }

    fn delay_seconds(&self) -> u32 {
        self.config.callbacks.short_seconds
    }

    pub fn create(
        &self,
        request: &HandlerRequest,
        model: RuleGroupsNamespaceModel,
    ) -> ProgressEvent<RuleGroupsNamespaceModel> {
        StagePipeline::new(&self.config.keys.stage, MESSAGE_CREATE_COMPLETE)
            .stage(CreateNamespace {
                service: &self.service,
                keys: self.keys(),
                delay_seconds: self.delay_seconds(),
            })
            .execute(request, &RuleGroupsNamespaceModel::default(), model)
    }

    pub fn update(
        &self,
        request: &HandlerRequest,
        previous: &RuleGroupsNamespaceModel,
        model: RuleGroupsNamespaceModel,
    ) -> ProgressEvent<RuleGroupsNamespaceModel> {
        if let Err(err) = target(&model) {
            return ProgressEvent::from_error(&err, Some(model));
        }
        StagePipeline::new(&self.config.keys.stage, MESSAGE_UPDATE_COMPLETE)
            .stage(UpdateNamespace {
                service: &self.service,
                keys: self.keys(),
                delay_seconds: self.delay_seconds(),
            })
            .execute(request, previous, model)
    }

    pub fn delete(
        &self,
        request: &HandlerRequest,
        mut model: RuleGroupsNamespaceModel,
    ) -> ProgressEvent<RuleGroupsNamespaceModel> {
        if model.arn.is_none() {
            let err = ApsError::MissingRequiredField("rule groups namespace Arn".to_string());
            return ProgressEvent::from_error(&err, Some(model));
        }

        let outcome = match request.callback_context.get_str(&self.keys().deleted) {
            Some(arn) => {
                model.arn = Some(arn.to_string());
                self.resume_delete(&mut model)
            }
            None => self.start_delete(&mut model),
        };

        match outcome {
            StageOutcome::Advance => ProgressEvent::success(MESSAGE_DELETE_COMPLETE, None),
            StageOutcome::Suspend(evt) | StageOutcome::Fail(evt) => evt,
        }
    }

    fn start_delete(&self, model: &mut RuleGroupsNamespaceModel) -> Outcome {
        let target = match target(model) {
            Ok(target) => target,
            Err(err) => return StageOutcome::fail(&err, model.clone()),
        };

        info!(
            workspace_id = %target.workspace_id,
            namespace = %target.name,
            "deleting rule groups namespace"
        );
        match self
            .service
            .delete_rule_groups_namespace(&target.workspace_id, &target.name)
        {
            Ok(()) => suspend(model, &self.keys().deleted, self.delay_seconds()),
            Err(err) if err.is_not_found() => StageOutcome::Advance,
            Err(err) => StageOutcome::fail(&ApsError::from(err), model.clone()),
        }
    }

    fn resume_delete(&self, model: &mut RuleGroupsNamespaceModel) -> Outcome {
        match refresh_namespace(&self.service, model) {
            Ok(_) => suspend(model, &self.keys().deleted, self.delay_seconds()),
            Err(err) if err.is_not_found() => StageOutcome::Advance,
            Err(err) => StageOutcome::fail(&err, model.clone()),
        }
    }

    pub fn read(
        &self,
        mut model: RuleGroupsNamespaceModel,
    ) -> ProgressEvent<RuleGroupsNamespaceModel> {
        if model.arn.is_none() {
            let err = ApsError::MissingRequiredField("rule groups namespace Arn".to_string());
            return ProgressEvent::from_error(&err, Some(model));
        }
        match refresh_namespace(&self.service, &mut model) {
            Ok(_) => ProgressEvent::success(MESSAGE_READ_COMPLETE, Some(model)),
            Err(err) => ProgressEvent::from_error(&err, None),
        }
    }

    pub fn list(&self, _request: &HandlerRequest) -> ProgressEvent<RuleGroupsNamespaceModel> {
        let err = ApsError::InvalidRequest(
            "List is not supported for rule groups namespaces".to_string(),
        );
        ProgressEvent::from_error(&err, None)
    }
}
