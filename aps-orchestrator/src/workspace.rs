//! Workspace state machine: the first stage of every pipeline and the whole
//! of the delete flow.

use tracing::{debug, info};

use aps_config::StageKeys;
use aps_core::error::{ApsError, Result};
use aps_core::tags::{diff, map_to_tags, merge_into};
use aps_provider::{
    ApsService, CreateWorkspaceInput, ResourceStatus, StatusCode, UpdateWorkspaceAliasInput,
};

use crate::model::WorkspaceModel;
use crate::request::HandlerRequest;
use crate::resource::{fail_status, suspend, workspace_id, Outcome, SubResource};
use crate::stage::StageOutcome;

/// Describe the workspace and copy its remote fields into `model`.
pub(crate) fn refresh_workspace<S: ApsService>(
    service: &S,
    model: &mut WorkspaceModel,
) -> Result<ResourceStatus> {
    let id = workspace_id(model)?;
    let description = service.describe_workspace(&id)?;

    model.arn = Some(description.arn);
    model.workspace_id = Some(description.workspace_id);
    model.alias = description.alias;
    model.prometheus_endpoint = description.prometheus_endpoint;
    model.tags = map_to_tags(&description.tags);
    Ok(description.status)
}

/// Refresh the owning workspace before polling an attached configuration.
pub(crate) fn require_workspace<S: ApsService>(
    service: &S,
    model: &mut WorkspaceModel,
) -> Result<()> {
    match refresh_workspace(service, model) {
        Ok(_) => Ok(()),
        Err(err) if err.is_not_found() => {
            Err(ApsError::RemoteNotFound("Workspace not found".to_string()))
        }
        Err(err) => Err(err),
    }
}

pub struct WorkspaceResource<'a, S> {
    service: &'a S,
    keys: &'a StageKeys,
    poll_seconds: u32,
    delete_poll_seconds: u32,
}

impl<'a, S: ApsService> WorkspaceResource<'a, S> {
    pub fn new(
        service: &'a S,
        keys: &'a StageKeys,
        poll_seconds: u32,
        delete_poll_seconds: u32,
    ) -> Self {
        Self {
            service,
            keys,
            poll_seconds,
            delete_poll_seconds,
        }
    }

    fn await_active(&self, model: &mut WorkspaceModel) -> Outcome {
        let status = match refresh_workspace(self.service, model) {
            Ok(status) => status,
            Err(err) => return StageOutcome::fail(&err, model.clone()),
        };
        debug!(arn = ?model.arn, status = %status.code, "polled workspace");

        match status.code {
            StatusCode::Active => StageOutcome::Advance,
            code if code.is_failed() => fail_status("Workspace", &status, model),
            _ => suspend(model, &self.keys.active, self.poll_seconds),
        }
    }

    fn apply_changes(
        &self,
        request: &HandlerRequest,
        previous: &WorkspaceModel,
        current: &WorkspaceModel,
    ) -> Result<()> {
        let id = workspace_id(current)?;
        let arn = current.arn.clone().unwrap_or_default();

        if current.alias != previous.alias {
            info!(workspace_id = %id, alias = ?current.alias, "updating workspace alias");
            self.service.update_workspace_alias(UpdateWorkspaceAliasInput {
                workspace_id: id.clone(),
                alias: current.alias.clone(),
            })?;
        }

        let mut desired = current.tag_map();
        merge_into(&mut desired, &request.system_tags);
        let tag_diff = diff(&desired, &previous.tag_map());

        if !tag_diff.to_remove.is_empty() {
            info!(workspace_id = %id, keys = ?tag_diff.to_remove, "removing workspace tags");
            self.service
                .untag_resource(&arn, tag_diff.to_remove.into_iter().collect())?;
        }
        if !tag_diff.to_change.is_empty() {
            info!(workspace_id = %id, count = tag_diff.to_change.len(), "tagging workspace");
            self.service.tag_resource(&arn, tag_diff.to_change)?;
        }
        Ok(())
    }
}

impl<S: ApsService> SubResource for WorkspaceResource<'_, S> {
    fn name(&self) -> &'static str {
        "workspace"
    }

    fn keys(&self) -> &StageKeys {
        self.keys
    }

    fn create(&self, request: &HandlerRequest, model: &mut WorkspaceModel) -> Outcome {
        let mut tags = model.tag_map();
        merge_into(&mut tags, &request.system_tags);

        info!(alias = ?model.alias, "creating workspace");
        let output = match self.service.create_workspace(CreateWorkspaceInput {
            alias: model.alias.clone(),
            tags,
        }) {
            Ok(output) => output,
            Err(err) => return StageOutcome::fail(&ApsError::from(err), model.clone()),
        };

        info!(arn = %output.arn, status = %output.status.code, "workspace create accepted");
        model.arn = Some(output.arn);
        model.workspace_id = Some(output.workspace_id);
        suspend(model, &self.keys.active, self.poll_seconds)
    }

    fn resume_create(&self, model: &mut WorkspaceModel) -> Outcome {
        self.await_active(model)
    }

    fn update(
        &self,
        request: &HandlerRequest,
        previous: &WorkspaceModel,
        current: &mut WorkspaceModel,
    ) -> Outcome {
        if let Err(err) = self.apply_changes(request, previous, current) {
            return StageOutcome::fail(&err, current.clone());
        }
        suspend(current, &self.keys.active, self.poll_seconds)
    }

    fn resume_update(&self, model: &mut WorkspaceModel) -> Outcome {
        self.await_active(model)
    }

    fn delete(&self, model: &mut WorkspaceModel) -> Outcome {
        let id = match workspace_id(model) {
            Ok(id) => id,
            Err(err) => return StageOutcome::fail(&err, model.clone()),
        };

        info!(workspace_id = %id, "deleting workspace");
        match self.service.delete_workspace(&id) {
            Ok(()) => suspend(model, &self.keys.deleted, self.delete_poll_seconds),
            Err(err) if err.is_not_found() => {
                info!(workspace_id = %id, "workspace already deleted");
                StageOutcome::Advance
            }
            Err(err) => StageOutcome::fail(&ApsError::from(err), model.clone()),
        }
    }

    fn resume_delete(&self, model: &mut WorkspaceModel) -> Outcome {
        match refresh_workspace(self.service, model) {
            Ok(status) => {
                debug!(arn = ?model.arn, status = %status.code, "workspace still present");
                suspend(model, &self.keys.deleted, self.delete_poll_seconds)
            }
            Err(ApsError::RemoteNotFound(_)) => StageOutcome::Advance,
            Err(err) => StageOutcome::fail(&err, model.clone()),
        }
    }
}
