//! Operation entry points for the workspace resource.
//!
//! Each call is one stateless invocation: it receives the resource
//! description and the continuation blob from the previous invocation, does
//! at most one step of remote work per stage and reports the outcome.

use tracing::info;

use aps_config::HandlerConfig;
use aps_core::arn::{resolve, ResourceKind};
use aps_core::error::ApsError;
use aps_core::tags::map_to_tags;
use aps_provider::{ApsService, WorkspaceSummary};

use crate::alert_manager::{refresh_alert_manager, AlertManagerResource};
use crate::event::ProgressEvent;
use crate::logging_config::{refresh_logging, LoggingResource};
use crate::model::WorkspaceModel;
use crate::request::HandlerRequest;
use crate::resource::{CreateStage, SubResource, UpdateStage};
use crate::stage::{StageOutcome, StagePipeline};
use crate::workspace::{refresh_workspace, WorkspaceResource};

pub const MESSAGE_CREATE_COMPLETE: &str = "Create Completed";
pub const MESSAGE_UPDATE_COMPLETE: &str = "Update Completed";
pub const MESSAGE_DELETE_COMPLETE: &str = "Delete Complete";
pub const MESSAGE_READ_COMPLETE: &str = "Read Complete";
pub const MESSAGE_LIST_COMPLETE: &str = "List complete";

pub struct WorkspaceOrchestrator<S> {
    service: S,
    config: HandlerConfig,
}

impl<S: ApsService> WorkspaceOrchestrator<S> {
    pub fn new(service: S, config: HandlerConfig) -> Self {
        Self { service, config }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    fn workspace(&self) -> WorkspaceResource<'_, S> {
        WorkspaceResource::new(
            &self.service,
            &self.config.keys.workspace,
            self.config.callbacks.short_seconds,
            self.config.callbacks.long_seconds,
        )
    }

    fn alert_manager(&self) -> AlertManagerResource<'_, S> {
        AlertManagerResource::new(
            &self.service,
            &self.config.keys.alert_manager,
            self.config.callbacks.long_seconds,
        )
    }

    fn logging(&self) -> LoggingResource<'_, S> {
        LoggingResource::new(
            &self.service,
            &self.config.keys.logging,
            self.config.callbacks.long_seconds,
        )
    }

    /// Workspace, then alert manager definition, then logging configuration.
    pub fn create_pipeline(&self) -> StagePipeline<'_, WorkspaceModel> {
        StagePipeline::new(&self.config.keys.stage, MESSAGE_CREATE_COMPLETE)
            .stage(CreateStage(self.workspace()))
            .stage(CreateStage(self.alert_manager()))
            .stage(CreateStage(self.logging()))
    }

    pub fn update_pipeline(&self) -> StagePipeline<'_, WorkspaceModel> {
        StagePipeline::new(&self.config.keys.stage, MESSAGE_UPDATE_COMPLETE)
            .stage(UpdateStage(self.workspace()))
            .stage(UpdateStage(self.alert_manager()))
            .stage(UpdateStage(self.logging()))
    }

    pub fn create(
        &self,
        request: &HandlerRequest,
        model: WorkspaceModel,
    ) -> ProgressEvent<WorkspaceModel> {
        if model.workspace_id.is_some() && request.callback_context.is_empty() {
            let err = ApsError::InvalidRequest(
                "cannot create a resource using readOnly workspaceId property".to_string(),
            );
            return ProgressEvent::from_error(&err, None);
        }
        self.create_pipeline()
            .execute(request, &WorkspaceModel::default(), model)
    }

    pub fn update(
        &self,
        request: &HandlerRequest,
        previous: &WorkspaceModel,
        mut model: WorkspaceModel,
    ) -> ProgressEvent<WorkspaceModel> {
        let Some(arn) = model.arn.as_deref() else {
            let err = ApsError::MissingRequiredField("workspace Arn".to_string());
            return ProgressEvent::from_error(&err, None);
        };
        match resolve(arn) {
            Ok((parsed, id)) if parsed.kind() == ResourceKind::Workspace => {
                model.workspace_id = Some(id);
            }
            Ok((parsed, _)) => {
                let err = ApsError::MalformedIdentifier(format!(
                    "expected a workspace ARN, got {}",
                    parsed.kind()
                ));
                return ProgressEvent::from_error(&err, None);
            }
            Err(err) => return ProgressEvent::from_error(&err, None),
        }
        self.update_pipeline().execute(request, previous, model)
    }

    /// Delete the workspace. Attached configurations are removed by the
    /// service together with the workspace.
    pub fn delete(
        &self,
        request: &HandlerRequest,
        mut model: WorkspaceModel,
    ) -> ProgressEvent<WorkspaceModel> {
        if model.arn.is_none() {
            let err = ApsError::MissingRequiredField("workspace Arn".to_string());
            return ProgressEvent::from_error(&err, None);
        }

        let workspace = self.workspace();
        let outcome = match request.callback_context.get_str(&workspace.keys().deleted) {
            Some(arn) => {
                model.arn = Some(arn.to_string());
                workspace.resume_delete(&mut model)
            }
            None => workspace.delete(&mut model),
        };

        match outcome {
            StageOutcome::Advance => {
                info!(arn = ?model.arn, "workspace deleted");
                ProgressEvent::success(MESSAGE_DELETE_COMPLETE, None)
            }
            StageOutcome::Suspend(evt) | StageOutcome::Fail(evt) => evt,
        }
    }

    /// Refresh the description from the remote side. Attached configurations
    /// that do not exist are reported as absent.
    pub fn read(&self, mut model: WorkspaceModel) -> ProgressEvent<WorkspaceModel> {
        if model.arn.is_none() {
            let err = ApsError::MissingRequiredField("workspace Arn".to_string());
            return ProgressEvent::from_error(&err, None);
        }

        if let Err(err) = refresh_workspace(&self.service, &mut model) {
            return ProgressEvent::from_error(&err, None);
        }
        match refresh_alert_manager(&self.service, &mut model) {
            Ok(_) => {}
            Err(err) if err.is_not_found() => model.alert_manager_definition = None,
            Err(err) => return ProgressEvent::from_error(&err, None),
        }
        match refresh_logging(&self.service, &mut model) {
            Ok(_) => {}
            Err(err) if err.is_not_found() => model.logging_configuration = None,
            Err(err) => return ProgressEvent::from_error(&err, None),
        }

        ProgressEvent::success(MESSAGE_READ_COMPLETE, Some(model))
    }

    /// One page of workspaces.
    pub fn list(&self, request: &HandlerRequest) -> ProgressEvent<WorkspaceModel> {
        let token = request.next_token.as_deref().filter(|t| !t.is_empty());
        match self.service.list_workspaces(token) {
            Ok(page) => {
                let models = page.workspaces.into_iter().map(summary_to_model).collect();
                let next_token = page.next_token.filter(|t| !t.is_empty());
                ProgressEvent::page(MESSAGE_LIST_COMPLETE, models, next_token)
            }
            Err(err) => ProgressEvent::from_error(&ApsError::from(err), None),
        }
    }
}

fn summary_to_model(summary: WorkspaceSummary) -> WorkspaceModel {
    WorkspaceModel {
        arn: Some(summary.arn),
        workspace_id: Some(summary.workspace_id),
        alias: summary.alias,
        tags: map_to_tags(&summary.tags),
        ..Default::default()
    }
}
