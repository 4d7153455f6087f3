//! Logging configuration state machine.
//!
//! Unlike the alert manager definition, a delete that finds nothing still
//! waits for a describe to confirm the configuration is gone.

use tracing::{debug, info};

use aps_config::StageKeys;
use aps_core::error::{ApsError, Result};
use aps_provider::{ApsService, ResourceStatus, ServiceResult, StatusCode};

use crate::model::{LoggingConfiguration, WorkspaceModel};
use crate::request::HandlerRequest;
use crate::resource::{fail_status, suspend, workspace_id, Outcome, SubResource};
use crate::stage::StageOutcome;
use crate::workspace::require_workspace;

const ENTITY: &str = "LoggingConfiguration";

pub(crate) fn refresh_logging<S: ApsService>(
    service: &S,
    model: &mut WorkspaceModel,
) -> Result<ResourceStatus> {
    let id = workspace_id(model)?;
    let description = service.describe_logging_configuration(&id)?;
    model.logging_configuration = Some(LoggingConfiguration {
        log_group_arn: description.log_group_arn,
    });
    Ok(description.status)
}

pub struct LoggingResource<'a, S> {
    service: &'a S,
    keys: &'a StageKeys,
    poll_seconds: u32,
}

impl<'a, S: ApsService> LoggingResource<'a, S> {
    pub fn new(service: &'a S, keys: &'a StageKeys, poll_seconds: u32) -> Self {
        Self {
            service,
            keys,
            poll_seconds,
        }
    }

    /// Issue a create or update and wait for `ACTIVE`, unless the response
    /// already reports `failed_code`.
    fn start(
        &self,
        model: &mut WorkspaceModel,
        failed_code: StatusCode,
        call: impl FnOnce(&S, &str, &str) -> ServiceResult<ResourceStatus>,
    ) -> Outcome {
        let id = match workspace_id(model) {
            Ok(id) => id,
            Err(err) => return StageOutcome::fail(&err, model.clone()),
        };
        let log_group_arn = model.log_group_arn().unwrap_or_default().to_string();

        info!(workspace_id = %id, log_group_arn = %log_group_arn, "applying logging configuration");
        match call(self.service, &id, &log_group_arn) {
            Ok(status) if status.code == failed_code => fail_status(ENTITY, &status, model),
            Ok(_) => suspend(model, &self.keys.active, self.poll_seconds),
            Err(err) => StageOutcome::fail(&ApsError::from(err), model.clone()),
        }
    }

    fn start_create(&self, model: &mut WorkspaceModel) -> Outcome {
        self.start(model, StatusCode::CreationFailed, |service, id, arn| {
            service.create_logging_configuration(id, arn)
        })
    }

    fn start_update(&self, model: &mut WorkspaceModel) -> Outcome {
        self.start(model, StatusCode::UpdateFailed, |service, id, arn| {
            service.update_logging_configuration(id, arn)
        })
    }

    fn await_active(&self, model: &mut WorkspaceModel) -> Outcome {
        if let Err(err) = require_workspace(self.service, model) {
            return StageOutcome::fail(&err, model.clone());
        }

        let status = match refresh_logging(self.service, model) {
            Ok(status) => status,
            Err(err) if err.is_not_found() => {
                let err = ApsError::RemoteNotFound(format!("{} was deleted out-of-band", ENTITY));
                return StageOutcome::fail(&err, model.clone());
            }
            Err(err) => return StageOutcome::fail(&err, model.clone()),
        };
        debug!(arn = ?model.arn, status = %status.code, "polled logging configuration");

        match status.code {
            StatusCode::Active => StageOutcome::Advance,
            code if code.is_failed() => fail_status(ENTITY, &status, model),
            _ => suspend(model, &self.keys.active, self.poll_seconds),
        }
    }
}

impl<S: ApsService> SubResource for LoggingResource<'_, S> {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn keys(&self) -> &StageKeys {
        self.keys
    }

    fn create(&self, _request: &HandlerRequest, model: &mut WorkspaceModel) -> Outcome {
        if model.log_group_arn().is_none() {
            return StageOutcome::Advance;
        }
        self.start_create(model)
    }

    fn resume_create(&self, model: &mut WorkspaceModel) -> Outcome {
        self.await_active(model)
    }

    fn update(
        &self,
        _request: &HandlerRequest,
        previous: &WorkspaceModel,
        current: &mut WorkspaceModel,
    ) -> Outcome {
        let desired = current.log_group_arn().map(str::to_string);
        match (previous.log_group_arn(), desired.as_deref()) {
            (before, after) if before == after => StageOutcome::Advance,
            (None, Some(_)) => self.start_create(current),
            (Some(_), None) => self.delete(current),
            _ => self.start_update(current),
        }
    }

    fn resume_update(&self, model: &mut WorkspaceModel) -> Outcome {
        self.await_active(model)
    }

    fn delete(&self, model: &mut WorkspaceModel) -> Outcome {
        let id = match workspace_id(model) {
            Ok(id) => id,
            Err(err) => return StageOutcome::fail(&err, model.clone()),
        };
        info!(workspace_id = %id, "deleting logging configuration");
        match self.service.delete_logging_configuration(&id) {
            Ok(()) => suspend(model, &self.keys.deleted, self.poll_seconds),
            Err(err) if err.is_not_found() => {
                info!(workspace_id = %id, "logging configuration not found, verifying deletion");
                suspend(model, &self.keys.deleted, self.poll_seconds)
            }
            Err(err) => StageOutcome::fail(&ApsError::from(err), model.clone()),
        }
    }

    fn resume_delete(&self, model: &mut WorkspaceModel) -> Outcome {
        if let Err(err) = require_workspace(self.service, model) {
            return StageOutcome::fail(&err, model.clone());
        }
        match refresh_logging(self.service, model) {
            Ok(status) => {
                debug!(
                    arn = ?model.arn,
                    status = %status.code,
                    "logging configuration still present"
                );
                suspend(model, &self.keys.deleted, self.poll_seconds)
            }
            Err(err) if err.is_not_found() => {
                model.logging_configuration = None;
                StageOutcome::Advance
            }
            Err(err) => StageOutcome::fail(&err, model.clone()),
        }
    }
}
