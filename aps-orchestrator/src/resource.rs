//! The uniform state machine every workspace sub-resource implements, and the
//! adapters that plug a sub-resource into a create or update pipeline.

use aps_config::StageKeys;
use aps_core::arn::{resolve, ResourceKind};
use aps_core::context::CallbackContext;
use aps_core::error::{ApsError, ErrorCode, Result};
use aps_provider::ResourceStatus;

use crate::event::ProgressEvent;
use crate::model::{ResourceModel, WorkspaceModel};
use crate::request::HandlerRequest;
use crate::stage::{Stage, StageOutcome};

pub type Outcome = StageOutcome<WorkspaceModel>;

pub trait SubResource {
    fn name(&self) -> &'static str;

    fn keys(&self) -> &StageKeys;

    /// Start creating; never waits for the result.
    fn create(&self, request: &HandlerRequest, model: &mut WorkspaceModel) -> Outcome;

    fn resume_create(&self, model: &mut WorkspaceModel) -> Outcome;

    /// Reconcile this sub-resource's fields between `previous` and `current`.
    fn update(
        &self,
        request: &HandlerRequest,
        previous: &WorkspaceModel,
        current: &mut WorkspaceModel,
    ) -> Outcome;

    fn resume_update(&self, model: &mut WorkspaceModel) -> Outcome;

    fn delete(&self, model: &mut WorkspaceModel) -> Outcome;

    fn resume_delete(&self, model: &mut WorkspaceModel) -> Outcome;
}

/// Create-pipeline stage: resume if this stage's wait key is present,
/// otherwise start the create.
pub struct CreateStage<R>(pub R);

impl<R: SubResource> Stage<WorkspaceModel> for CreateStage<R> {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn run(
        &self,
        request: &HandlerRequest,
        _previous: &WorkspaceModel,
        current: &mut WorkspaceModel,
    ) -> Outcome {
        let context = &request.callback_context;
        if let Some(arn) = context.get_str(&self.0.keys().active) {
            current.arn = Some(arn.to_string());
            return self.0.resume_create(current);
        }
        self.0.create(request, current)
    }
}

/// Update-pipeline stage: resume whichever wait this stage recorded,
/// otherwise reconcile.
pub struct UpdateStage<R>(pub R);

impl<R: SubResource> Stage<WorkspaceModel> for UpdateStage<R> {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn run(
        &self,
        request: &HandlerRequest,
        previous: &WorkspaceModel,
        current: &mut WorkspaceModel,
    ) -> Outcome {
        let context = &request.callback_context;
        let keys = self.0.keys();
        if let Some(arn) = context.get_str(&keys.active) {
            current.arn = Some(arn.to_string());
            return self.0.resume_update(current);
        }
        if let Some(arn) = context.get_str(&keys.deleted) {
            current.arn = Some(arn.to_string());
            return self.0.resume_delete(current);
        }
        self.0.update(request, previous, current)
    }
}

/// Suspend, asking the caller to come back with `key` set to the model's ARN.
pub(crate) fn suspend<M: ResourceModel>(
    model: &M,
    key: &str,
    delay_seconds: u32,
) -> StageOutcome<M> {
    let arn = model.arn().unwrap_or_default();
    StageOutcome::Suspend(ProgressEvent::in_progress(
        model.clone(),
        CallbackContext::wait_for(key, arn),
        delay_seconds,
    ))
}

/// Terminal failure for a remote entity observed in a failed status. The
/// remote reason is passed through to the caller.
pub(crate) fn fail_status<M: Clone>(
    entity: &str,
    status: &ResourceStatus,
    model: &M,
) -> StageOutcome<M> {
    let mut message = format!("{} status: {}", entity, status.code);
    if !status.reason().is_empty() {
        message.push_str(&format!(". Reason: {}", status.reason()));
    }
    StageOutcome::Fail(ProgressEvent::failed(
        ErrorCode::GeneralServiceException,
        &message,
        Some(model.clone()),
    ))
}

/// Workspace id addressed by the model's ARN.
pub(crate) fn workspace_id(model: &WorkspaceModel) -> Result<String> {
    let arn = model
        .arn
        .as_deref()
        .ok_or_else(|| ApsError::MissingRequiredField("workspace Arn".to_string()))?;
    let (parsed, id) = resolve(arn)?;
    if parsed.kind() != ResourceKind::Workspace {
        return Err(ApsError::MalformedIdentifier(format!(
            "expected a workspace ARN, got {}",
            parsed.kind()
        )));
    }
    Ok(id)
}
