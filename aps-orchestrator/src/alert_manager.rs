//! Alert manager definition state machine.

use tracing::{debug, info};

use aps_config::StageKeys;
use aps_core::error::{ApsError, Result};
use aps_provider::{ApsService, ResourceStatus, StatusCode};

use crate::model::WorkspaceModel;
use crate::request::HandlerRequest;
use crate::resource::{fail_status, suspend, workspace_id, Outcome, SubResource};
use crate::stage::StageOutcome;
use crate::workspace::require_workspace;

const ENTITY: &str = "AlertManagerDefinition";

/// Describe the definition and copy its payload into `model`.
pub(crate) fn refresh_alert_manager<S: ApsService>(
    service: &S,
    model: &mut WorkspaceModel,
) -> Result<ResourceStatus> {
    let id = workspace_id(model)?;
    let description = service.describe_alert_manager_definition(&id)?;
    model.alert_manager_definition = Some(String::from_utf8_lossy(&description.data).into_owned());
    Ok(description.status)
}

pub struct AlertManagerResource<'a, S> {
    service: &'a S,
    keys: &'a StageKeys,
    poll_seconds: u32,
}

enum Intent {
    Create,
    Put,
    Delete,
}

impl<'a, S: ApsService> AlertManagerResource<'a, S> {
    pub fn new(service: &'a S, keys: &'a StageKeys, poll_seconds: u32) -> Self {
        Self {
            service,
            keys,
            poll_seconds,
        }
    }

    fn intent(previous: &WorkspaceModel, current: &WorkspaceModel) -> Option<Intent> {
        if current.alert_manager_definition == previous.alert_manager_definition {
            return None;
        }
        match (previous.alert_manager_payload(), current.alert_manager_payload()) {
            (None, Some(_)) => Some(Intent::Create),
            (_, None) => Some(Intent::Delete),
            (Some(_), Some(_)) => Some(Intent::Put),
        }
    }

    fn start_create(&self, model: &mut WorkspaceModel, data: &[u8]) -> Outcome {
        let id = match workspace_id(model) {
            Ok(id) => id,
            Err(err) => return StageOutcome::fail(&err, model.clone()),
        };
        info!(workspace_id = %id, "creating alert manager definition");
        match self.service.create_alert_manager_definition(&id, data) {
            Ok(_) => suspend(model, &self.keys.active, self.poll_seconds),
            Err(err) => StageOutcome::fail(&ApsError::from(err), model.clone()),
        }
    }

    fn start_put(&self, model: &mut WorkspaceModel, data: &[u8]) -> Outcome {
        let id = match workspace_id(model) {
            Ok(id) => id,
            Err(err) => return StageOutcome::fail(&err, model.clone()),
        };
        info!(workspace_id = %id, "replacing alert manager definition");
        match self.service.put_alert_manager_definition(&id, data) {
            Ok(_) => suspend(model, &self.keys.active, self.poll_seconds),
            Err(err) => StageOutcome::fail(&ApsError::from(err), model.clone()),
        }
    }

    fn await_active(&self, model: &mut WorkspaceModel) -> Outcome {
        if let Err(err) = require_workspace(self.service, model) {
            return StageOutcome::fail(&err, model.clone());
        }

        let status = match refresh_alert_manager(self.service, model) {
            Ok(status) => status,
            Err(err) if err.is_not_found() => {
                let err = ApsError::RemoteNotFound(format!("{} was deleted out-of-band", ENTITY));
                return StageOutcome::fail(&err, model.clone());
            }
            Err(err) => return StageOutcome::fail(&err, model.clone()),
        };
        debug!(arn = ?model.arn, status = %status.code, "polled alert manager definition");

        match status.code {
            StatusCode::Active => StageOutcome::Advance,
            code if code.is_failed() => fail_status(ENTITY, &status, model),
            _ => suspend(model, &self.keys.active, self.poll_seconds),
        }
    }
}

impl<S: ApsService> SubResource for AlertManagerResource<'_, S> {
    fn name(&self) -> &'static str {
        "alert_manager"
    }

    fn keys(&self) -> &StageKeys {
        self.keys
    }

    fn create(&self, _request: &HandlerRequest, model: &mut WorkspaceModel) -> Outcome {
        if model.alert_manager_payload().is_none() {
            return StageOutcome::Advance;
        }
        let data = model.alert_manager_definition.clone().unwrap_or_default();
        self.start_create(model, data.as_bytes())
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
        let data = current.alert_manager_definition.clone().unwrap_or_default();
        match Self::intent(previous, current) {
            None => StageOutcome::Advance,
            Some(Intent::Create) => self.start_create(current, data.as_bytes()),
            Some(Intent::Put) => self.start_put(current, data.as_bytes()),
            Some(Intent::Delete) => self.delete(current),
        }
    }

    fn resume_update(&self, model: &mut WorkspaceModel) -> Outcome {
        self.await_active(model)
    }

    /// A definition that is already gone completes the stage at once.
    fn delete(&self, model: &mut WorkspaceModel) -> Outcome {
        let id = match workspace_id(model) {
            Ok(id) => id,
            Err(err) => return StageOutcome::fail(&err, model.clone()),
        };
        info!(workspace_id = %id, "deleting alert manager definition");
        match self.service.delete_alert_manager_definition(&id) {
            Ok(()) => suspend(model, &self.keys.deleted, self.poll_seconds),
            Err(err) if err.is_not_found() => {
                info!(workspace_id = %id, "alert manager definition already deleted");
                StageOutcome::Advance
            }
            Err(err) => StageOutcome::fail(&ApsError::from(err), model.clone()),
        }
    }

    fn resume_delete(&self, model: &mut WorkspaceModel) -> Outcome {
        if let Err(err) = require_workspace(self.service, model) {
            return StageOutcome::fail(&err, model.clone());
        }
        match refresh_alert_manager(self.service, model) {
            Ok(status) => {
                debug!(
                    arn = ?model.arn,
                    status = %status.code,
                    "alert manager definition still present"
                );
                suspend(model, &self.keys.deleted, self.poll_seconds)
            }
            Err(err) if err.is_not_found() => {
                model.alert_manager_definition = None;
                StageOutcome::Advance
            }
            Err(err) => StageOutcome::fail(&err, model.clone()),
        }
    }
}
