//! End-to-end workspace flows driven invocation by invocation against the
//! scripted service, feeding each returned continuation blob back in.

use aps_config::HandlerConfig;
use aps_core::context::CallbackContext;
use aps_core::error::ErrorCode;
use aps_core::tags::Tag;
use aps_orchestrator::{
    HandlerRequest, LoggingConfiguration, ProgressEvent, WorkspaceModel, WorkspaceOrchestrator,
};
use aps_provider::mock::{MockApsService, Script};
use aps_provider::{
    AlertManagerDefinitionDescription, CreateWorkspaceOutput, ListWorkspacesOutput,
    LoggingConfigurationDescription, ResourceStatus, ServiceError, ServiceResult, StatusCode,
    WorkspaceDescription, WorkspaceSummary,
};

const WS_ARN: &str = "arn:aws:aps:us-west-2:123456789012:workspace/ws-1";
const AM_ACTIVE: &str = "waitForAlertManagerActive";
const LOGGING_ACTIVE: &str = "waitForLoggingConfigurationActive";
const LOGGING_DELETED: &str = "waitForLoggingConfigurationDeleted";
const AM_DELETED: &str = "waitForAlertManagerDeleted";
const AM_DATA: &str = "alertmanager_config: |\n  route:\n    receiver: default\n";
const LOG_GROUP: &str = "arn:aws:logs:us-west-2:123456789012:log-group:aps:*";
const OTHER_LOG_GROUP: &str = "arn:aws:logs:us-west-2:123456789012:log-group:aps-audit:*";

fn description(code: StatusCode) -> WorkspaceDescription {
    WorkspaceDescription {
        arn: WS_ARN.to_string(),
        workspace_id: "ws-1".to_string(),
        alias: Some("prod".to_string()),
        prometheus_endpoint: Some(
            "https://aps-workspaces.us-west-2.amazonaws.com/workspaces/ws-1/".to_string(),
        ),
        status: ResourceStatus::new(code),
        tags: Default::default(),
    }
}

fn created() -> ServiceResult<CreateWorkspaceOutput> {
    Ok(CreateWorkspaceOutput {
        arn: WS_ARN.to_string(),
        workspace_id: "ws-1".to_string(),
        status: ResourceStatus::new(StatusCode::Creating),
    })
}

fn orchestrator(mock: MockApsService) -> WorkspaceOrchestrator<MockApsService> {
    WorkspaceOrchestrator::new(mock, HandlerConfig::default())
}

/// Request and model for the invocation following `evt`.
fn follow_up(evt: &ProgressEvent<WorkspaceModel>) -> (HandlerRequest, WorkspaceModel) {
    assert!(evt.is_in_progress(), "expected IN_PROGRESS, got {:?}", evt);
    let model = evt.resource_model.clone().unwrap_or_default();
    (HandlerRequest::resume(evt.callback_context.clone()), model)
}

fn at_stage(index: usize) -> HandlerRequest {
    HandlerRequest::resume(CallbackContext::new().with_stage("stage", index))
}

#[test]
fn test_create_waits_for_active_workspace() {
    let statuses = Script::new(vec![StatusCode::Creating, StatusCode::Active]);
    let mock = MockApsService::new()
        .on_create_workspace(|input| {
            assert_eq!(input.alias.as_deref(), Some("prod"));
            assert_eq!(
                input.tags.get("aws:cloudformation:stack-name"),
                Some(&Some("monitoring".to_string()))
            );
            assert_eq!(input.tags.get("team"), Some(&Some("obs".to_string())));
            created()
        })
        .on_describe_workspace(move |id| {
            assert_eq!(id, "ws-1");
            Ok(description(statuses.next().unwrap_or(StatusCode::Active)))
        });
    let orchestrator = orchestrator(mock);

    let model = WorkspaceModel {
        alias: Some("prod".to_string()),
        tags: vec![Tag::new("team", "obs")],
        ..Default::default()
    };
    let request =
        HandlerRequest::new().with_system_tag("aws:cloudformation:stack-name", "monitoring");

    let evt = orchestrator.create(&request, model);
    assert!(evt.is_in_progress());
    assert_eq!(evt.callback_context.get_str("Arn"), Some(WS_ARN));
    assert_eq!(evt.callback_context.stage_index("stage").unwrap(), 0);
    assert_eq!(evt.callback_delay_seconds, 2);
    assert_eq!(
        evt.resource_model.as_ref().and_then(|m| m.workspace_id.as_deref()),
        Some("ws-1")
    );

    let (request, model) = follow_up(&evt);
    let evt = orchestrator.create(&request, model);
    assert!(evt.is_in_progress());
    assert_eq!(evt.callback_context.get_str("Arn"), Some(WS_ARN));

    let (request, model) = follow_up(&evt);
    let evt = orchestrator.create(&request, model);
    assert!(evt.is_success(), "expected success, got {:?}", evt);
    assert_eq!(evt.message, "Create Completed");
    let model = evt.resource_model.unwrap();
    assert!(model.prometheus_endpoint.is_some());

    assert_eq!(orchestrator.service().call_count("create_workspace"), 1);
    assert_eq!(orchestrator.service().call_count("describe_workspace"), 2);
}

#[test]
fn test_create_with_attached_configurations() {
    let am_statuses = Script::new(vec![StatusCode::Creating, StatusCode::Active]);
    let mock = MockApsService::new()
        .on_create_workspace(|_| created())
        .on_describe_workspace(|_| Ok(description(StatusCode::Active)))
        .on_create_alert_manager_definition(|(id, data)| {
            assert_eq!(id, "ws-1");
            assert_eq!(data, AM_DATA.as_bytes().to_vec());
            Ok(ResourceStatus::new(StatusCode::Creating))
        })
        .on_describe_alert_manager_definition(move |_| {
            Ok(AlertManagerDefinitionDescription {
                data: AM_DATA.as_bytes().to_vec(),
                status: ResourceStatus::new(am_statuses.next().unwrap_or(StatusCode::Active)),
            })
        })
        .on_create_logging_configuration(|(id, log_group)| {
            assert_eq!(id, "ws-1");
            assert_eq!(log_group, LOG_GROUP);
            Ok(ResourceStatus::new(StatusCode::Creating))
        })
        .on_describe_logging_configuration(|_| {
            Ok(LoggingConfigurationDescription {
                log_group_arn: Some(LOG_GROUP.to_string()),
                status: ResourceStatus::new(StatusCode::Active),
            })
        });
    let orchestrator = orchestrator(mock);

    let model = WorkspaceModel {
        alias: Some("prod".to_string()),
        alert_manager_definition: Some(AM_DATA.to_string()),
        logging_configuration: Some(LoggingConfiguration::new(LOG_GROUP)),
        ..Default::default()
    };

    let evt = orchestrator.create(&HandlerRequest::new(), model);
    assert_eq!(evt.callback_context.stage_index("stage").unwrap(), 0);

    // Workspace becomes active, alert manager definition starts.
    let (request, model) = follow_up(&evt);
    let evt = orchestrator.create(&request, model);
    assert_eq!(evt.callback_context.get_str(AM_ACTIVE), Some(WS_ARN));
    assert_eq!(evt.callback_context.stage_index("stage").unwrap(), 1);
    assert_eq!(evt.callback_delay_seconds, 10);

    let (request, model) = follow_up(&evt);
    let evt = orchestrator.create(&request, model);
    assert_eq!(evt.callback_context.get_str(AM_ACTIVE), Some(WS_ARN));
    assert_eq!(evt.callback_context.stage_index("stage").unwrap(), 1);

    // Definition active, logging configuration starts.
    let (request, model) = follow_up(&evt);
    let evt = orchestrator.create(&request, model);
    assert_eq!(evt.callback_context.get_str(LOGGING_ACTIVE), Some(WS_ARN));
    assert_eq!(evt.callback_context.stage_index("stage").unwrap(), 2);

    let (request, model) = follow_up(&evt);
    let evt = orchestrator.create(&request, model);
    assert!(evt.is_success(), "expected success, got {:?}", evt);
    let model = evt.resource_model.unwrap();
    assert_eq!(model.alert_manager_definition.as_deref(), Some(AM_DATA));
    assert_eq!(model.log_group_arn(), Some(LOG_GROUP));

    let service = orchestrator.service();
    assert_eq!(service.call_count("create_workspace"), 1);
    assert_eq!(service.call_count("create_alert_manager_definition"), 1);
    assert_eq!(service.call_count("create_logging_configuration"), 1);
}

#[test]
fn test_failed_alert_manager_status_reports_reason() {
    let mock = MockApsService::new()
        .on_describe_workspace(|_| Ok(description(StatusCode::Active)))
        .on_describe_alert_manager_definition(|_| {
            Ok(AlertManagerDefinitionDescription {
                data: Vec::new(),
                status: ResourceStatus::failed(StatusCode::CreationFailed, "invalid route"),
            })
        });
    let orchestrator = orchestrator(mock);

    let request = HandlerRequest::resume(
        CallbackContext::wait_for(AM_ACTIVE, WS_ARN).with_stage("stage", 1),
    );
    let model = WorkspaceModel {
        alert_manager_definition: Some(AM_DATA.to_string()),
        ..WorkspaceModel::with_arn(WS_ARN)
    };

    let evt = orchestrator.create(&request, model);
    assert!(evt.is_failed());
    assert_eq!(evt.error_code, Some(ErrorCode::GeneralServiceException));
    assert_eq!(
        evt.message,
        "AlertManagerDefinition status: CREATION_FAILED. Reason: invalid route"
    );
    assert!(!orchestrator.service().was_called("create_alert_manager_definition"));
}

#[test]
fn test_alert_manager_deleted_out_of_band_while_waiting() {
    let mock = MockApsService::new()
        .on_describe_workspace(|_| Ok(description(StatusCode::Active)))
        .on_describe_alert_manager_definition(|_| Err(ServiceError::not_found("no definition")));
    let orchestrator = orchestrator(mock);

    let request = HandlerRequest::resume(
        CallbackContext::wait_for(AM_ACTIVE, WS_ARN).with_stage("stage", 1),
    );
    let evt = orchestrator.create(&request, WorkspaceModel::with_arn(WS_ARN));
    assert!(evt.is_failed());
    assert_eq!(evt.error_code, Some(ErrorCode::NotFound));
    assert_eq!(evt.message, "AlertManagerDefinition was deleted out-of-band");
}

#[test]
fn test_logging_create_response_failure_is_terminal() {
    let mock = MockApsService::new().on_create_logging_configuration(|_| {
        Ok(ResourceStatus::failed(
            StatusCode::CreationFailed,
            "log group does not exist",
        ))
    });
    let orchestrator = orchestrator(mock);

    let model = WorkspaceModel {
        logging_configuration: Some(LoggingConfiguration::new(LOG_GROUP)),
        ..WorkspaceModel::with_arn(WS_ARN)
    };
    let evt = orchestrator.create(&at_stage(2), model);
    assert!(evt.is_failed());
    assert_eq!(evt.error_code, Some(ErrorCode::GeneralServiceException));
    assert_eq!(
        evt.message,
        "LoggingConfiguration status: CREATION_FAILED. Reason: log group does not exist"
    );
    assert!(!orchestrator.service().was_called("describe_logging_configuration"));
}

#[test]
fn test_create_rejects_read_only_workspace_id() {
    let orchestrator = orchestrator(MockApsService::new());
    let model = WorkspaceModel {
        workspace_id: Some("ws-1".to_string()),
        ..Default::default()
    };

    let evt = orchestrator.create(&HandlerRequest::new(), model);
    assert!(evt.is_failed());
    assert_eq!(evt.error_code, Some(ErrorCode::InvalidRequest));
    assert!(evt.resource_model.is_none());
    assert!(orchestrator.service().calls().is_empty());
}

#[test]
fn test_unhandled_remote_error_is_opaque() {
    let mock = MockApsService::new().on_create_workspace(|_| {
        Err(ServiceError::new(
            "InternalServerException",
            "partition 7 unavailable",
        ))
    });
    let orchestrator = orchestrator(mock);

    let evt = orchestrator.create(&HandlerRequest::new(), WorkspaceModel::default());
    assert!(evt.is_failed());
    assert_eq!(evt.error_code, Some(ErrorCode::GeneralServiceException));
    assert_eq!(evt.message, "Internal Failure");
}

#[test]
fn test_out_of_range_stage_index_is_rejected() {
    let orchestrator = orchestrator(MockApsService::new());
    let evt = orchestrator.create(&at_stage(3), WorkspaceModel::with_arn(WS_ARN));
    assert!(evt.is_failed());
    assert_eq!(evt.error_code, Some(ErrorCode::InvalidRequest));
    assert!(orchestrator.service().calls().is_empty());
}

#[test]
fn test_update_alias_and_tags() {
    let mock = MockApsService::new()
        .on_update_workspace_alias(|input| {
            assert_eq!(input.workspace_id, "ws-1");
            assert_eq!(input.alias.as_deref(), Some("new"));
            Ok(())
        })
        .on_untag_resource(|(arn, keys)| {
            assert_eq!(arn, WS_ARN);
            assert_eq!(keys, vec!["env".to_string()]);
            Ok(())
        })
        .on_tag_resource(|(arn, tags)| {
            assert_eq!(arn, WS_ARN);
            assert_eq!(tags.len(), 2);
            assert_eq!(tags.get("team"), Some(&Some("b".to_string())));
            assert_eq!(tags.get("stack"), Some(&Some("s".to_string())));
            Ok(())
        })
        .on_describe_workspace(|_| Ok(description(StatusCode::Active)));
    let orchestrator = orchestrator(mock);

    let previous = WorkspaceModel {
        alias: Some("old".to_string()),
        tags: vec![Tag::new("team", "a"), Tag::new("env", "x")],
        ..WorkspaceModel::with_arn(WS_ARN)
    };
    let current = WorkspaceModel {
        alias: Some("new".to_string()),
        tags: vec![Tag::new("team", "b")],
        ..WorkspaceModel::with_arn(WS_ARN)
    };
    let request = HandlerRequest::new().with_system_tag("stack", "s");

    let evt = orchestrator.update(&request, &previous, current);
    assert!(evt.is_in_progress(), "expected IN_PROGRESS, got {:?}", evt);
    assert_eq!(evt.callback_context.get_str("Arn"), Some(WS_ARN));
    assert_eq!(evt.callback_delay_seconds, 2);
    assert_eq!(
        evt.resource_model.as_ref().and_then(|m| m.workspace_id.as_deref()),
        Some("ws-1")
    );

    let (request, model) = follow_up(&evt);
    let evt = orchestrator.update(&request, &previous, model);
    assert!(evt.is_success(), "expected success, got {:?}", evt);
    assert_eq!(evt.message, "Update Completed");

    let service = orchestrator.service();
    assert_eq!(service.call_count("update_workspace_alias"), 1);
    assert_eq!(service.call_count("untag_resource"), 1);
    assert_eq!(service.call_count("tag_resource"), 1);
}

#[test]
fn test_update_removing_logging_verifies_deletion() {
    let mock = MockApsService::new()
        .on_delete_logging_configuration(|_| Err(ServiceError::not_found("nothing to delete")))
        .on_describe_workspace(|_| Ok(description(StatusCode::Active)))
        .on_describe_logging_configuration(|_| Err(ServiceError::not_found("gone")));
    let orchestrator = orchestrator(mock);

    let previous = WorkspaceModel {
        logging_configuration: Some(LoggingConfiguration::new(LOG_GROUP)),
        ..WorkspaceModel::with_arn(WS_ARN)
    };
    let current = WorkspaceModel::with_arn(WS_ARN);

    let evt = orchestrator.update(&at_stage(2), &previous, current);
    assert!(evt.is_in_progress(), "expected IN_PROGRESS, got {:?}", evt);
    assert_eq!(evt.callback_context.get_str(LOGGING_DELETED), Some(WS_ARN));
    assert_eq!(evt.callback_context.stage_index("stage").unwrap(), 2);
    assert_eq!(evt.callback_delay_seconds, 10);

    let (request, model) = follow_up(&evt);
    let evt = orchestrator.update(&request, &previous, model);
    assert!(evt.is_success(), "expected success, got {:?}", evt);
    assert!(evt.resource_model.unwrap().logging_configuration.is_none());
}

#[test]
fn test_update_removing_missing_alert_manager_completes_at_once() {
    let mock = MockApsService::new()
        .on_delete_alert_manager_definition(|_| Err(ServiceError::not_found("no definition")));
    let orchestrator = orchestrator(mock);

    let previous = WorkspaceModel {
        alert_manager_definition: Some(AM_DATA.to_string()),
        ..WorkspaceModel::with_arn(WS_ARN)
    };
    let current = WorkspaceModel::with_arn(WS_ARN);

    let evt = orchestrator.update(&at_stage(1), &previous, current);
    assert!(evt.is_success(), "expected success, got {:?}", evt);
    assert_eq!(
        orchestrator.service().calls(),
        vec!["delete_alert_manager_definition".to_string()]
    );
}

#[test]
fn test_update_replaces_changed_alert_manager_definition() {
    let mock = MockApsService::new()
        .on_put_alert_manager_definition(|(_, data)| {
            assert_eq!(data, b"alertmanager_config: changed".to_vec());
            Ok(ResourceStatus::new(StatusCode::Updating))
        });
    let orchestrator = orchestrator(mock);

    let previous = WorkspaceModel {
        alert_manager_definition: Some(AM_DATA.to_string()),
        ..WorkspaceModel::with_arn(WS_ARN)
    };
    let current = WorkspaceModel {
        alert_manager_definition: Some("alertmanager_config: changed".to_string()),
        ..WorkspaceModel::with_arn(WS_ARN)
    };

    let evt = orchestrator.update(&at_stage(1), &previous, current);
    assert!(evt.is_in_progress());
    assert_eq!(evt.callback_context.get_str(AM_ACTIVE), Some(WS_ARN));
}

#[test]
fn test_update_requires_workspace_arn() {
    let orchestrator = orchestrator(MockApsService::new());

    let evt = orchestrator.update(
        &HandlerRequest::new(),
        &WorkspaceModel::default(),
        WorkspaceModel::default(),
    );
    assert_eq!(evt.error_code, Some(ErrorCode::NotFound));

    let namespace =
        WorkspaceModel::with_arn("arn:aws:aps:us-west-2:123456789012:rulegroupsnamespace/ws-1/r");
    let evt = orchestrator.update(&HandlerRequest::new(), &WorkspaceModel::default(), namespace);
    assert_eq!(evt.error_code, Some(ErrorCode::NotFound));
    assert!(orchestrator.service().calls().is_empty());
}

#[test]
fn test_delete_waits_until_workspace_is_gone() {
    let describes: Script<ServiceResult<WorkspaceDescription>> = Script::new(vec![
        Ok(description(StatusCode::Deleting)),
        Err(ServiceError::not_found("workspace ws-1 not found")),
    ]);
    let mock = MockApsService::new()
        .on_delete_workspace(|id| {
            assert_eq!(id, "ws-1");
            Ok(())
        })
        .on_describe_workspace(move |_| {
            describes
                .next()
                .unwrap_or_else(|| Err(ServiceError::not_found("gone")))
        });
    let orchestrator = orchestrator(mock);

    let evt = orchestrator.delete(&HandlerRequest::new(), WorkspaceModel::with_arn(WS_ARN));
    assert!(evt.is_in_progress());
    assert_eq!(evt.callback_context.get_str("Arn"), Some(WS_ARN));
    assert_eq!(evt.callback_delay_seconds, 10);

    let (request, model) = follow_up(&evt);
    let evt = orchestrator.delete(&request, model);
    assert!(evt.is_in_progress());

    let (request, model) = follow_up(&evt);
    let evt = orchestrator.delete(&request, model);
    assert!(evt.is_success(), "expected success, got {:?}", evt);
    assert_eq!(evt.message, "Delete Complete");
    assert!(evt.resource_model.is_none());
    assert_eq!(orchestrator.service().call_count("delete_workspace"), 1);
}

#[test]
fn test_delete_of_missing_workspace_succeeds() {
    let mock =
        MockApsService::new().on_delete_workspace(|_| Err(ServiceError::not_found("missing")));
    let orchestrator = orchestrator(mock);

    let evt = orchestrator.delete(&HandlerRequest::new(), WorkspaceModel::with_arn(WS_ARN));
    assert!(evt.is_success());
    assert!(!orchestrator.service().was_called("describe_workspace"));
}

#[test]
fn test_delete_requires_arn() {
    let orchestrator = orchestrator(MockApsService::new());
    let evt = orchestrator.delete(&HandlerRequest::new(), WorkspaceModel::default());
    assert!(evt.is_failed());
    assert_eq!(evt.error_code, Some(ErrorCode::NotFound));
}

#[test]
fn test_read_reports_missing_attachments_as_absent() {
    let mock = MockApsService::new()
        .on_describe_workspace(|_| Ok(description(StatusCode::Active)))
        .on_describe_alert_manager_definition(|_| Err(ServiceError::not_found("none")))
        .on_describe_logging_configuration(|_| Err(ServiceError::not_found("none")));
    let orchestrator = orchestrator(mock);

    let model = WorkspaceModel {
        alert_manager_definition: Some("stale".to_string()),
        ..WorkspaceModel::with_arn(WS_ARN)
    };
    let evt = orchestrator.read(model);
    assert!(evt.is_success());
    assert_eq!(evt.message, "Read Complete");
    let model = evt.resource_model.unwrap();
    assert_eq!(model.workspace_id.as_deref(), Some("ws-1"));
    assert_eq!(model.alias.as_deref(), Some("prod"));
    assert!(model.alert_manager_definition.is_none());
    assert!(model.logging_configuration.is_none());
}

#[test]
fn test_read_of_missing_workspace_is_not_found() {
    let mock =
        MockApsService::new().on_describe_workspace(|_| Err(ServiceError::not_found("missing")));
    let orchestrator = orchestrator(mock);

    let evt = orchestrator.read(WorkspaceModel::with_arn(WS_ARN));
    assert!(evt.is_failed());
    assert_eq!(evt.error_code, Some(ErrorCode::NotFound));
}

#[test]
fn test_list_pages_through_workspaces() {
    let mock = MockApsService::new().on_list_workspaces(|token| {
        let summary = |id: &str| WorkspaceSummary {
            arn: format!("arn:aws:aps:us-west-2:123456789012:workspace/{}", id),
            workspace_id: id.to_string(),
            alias: None,
            status: ResourceStatus::new(StatusCode::Active),
            tags: Default::default(),
        };
        match token.as_deref() {
            None => Ok(ListWorkspacesOutput {
                workspaces: vec![summary("ws-1"), summary("ws-2")],
                next_token: Some("page-2".to_string()),
            }),
            Some("page-2") => Ok(ListWorkspacesOutput {
                workspaces: vec![summary("ws-3")],
                next_token: Some(String::new()),
            }),
            Some(other) => panic!("unexpected token {}", other),
        }
    });
    let orchestrator = orchestrator(mock);

    let evt = orchestrator.list(&HandlerRequest::new().with_next_token(""));
    assert!(evt.is_success());
    assert_eq!(evt.message, "List complete");
    assert_eq!(evt.resource_models.len(), 2);
    assert_eq!(evt.next_token.as_deref(), Some("page-2"));

    let evt = orchestrator.list(&HandlerRequest::new().with_next_token("page-2"));
    assert_eq!(evt.resource_models.len(), 1);
    assert_eq!(
        evt.resource_models[0].workspace_id.as_deref(),
        Some("ws-3")
    );
    assert!(evt.next_token.is_none());
}

#[test]
fn test_failed_workspace_status_reports_reason() {
    let mock = MockApsService::new()
        .on_create_workspace(|_| created())
        .on_describe_workspace(|_| {
            Ok(WorkspaceDescription {
                status: ResourceStatus::failed(StatusCode::CreationFailed, "quota exhausted"),
                ..description(StatusCode::CreationFailed)
            })
        });
    let orchestrator = orchestrator(mock);

    let evt = orchestrator.create(&HandlerRequest::new(), WorkspaceModel::default());
    let (request, model) = follow_up(&evt);
    let evt = orchestrator.create(&request, model);
    assert!(evt.is_failed());
    assert_eq!(evt.error_code, Some(ErrorCode::GeneralServiceException));
    assert_eq!(
        evt.message,
        "Workspace status: CREATION_FAILED. Reason: quota exhausted"
    );
    assert!(evt.callback_context.is_empty());
    assert!(!orchestrator.service().was_called("create_alert_manager_definition"));
}

#[test]
fn test_update_changes_log_group_and_waits() {
    let statuses = Script::new(vec![
        ResourceStatus::new(StatusCode::Updating),
        ResourceStatus::failed(StatusCode::UpdateFailed, "bad"),
    ]);
    let mock = MockApsService::new()
        .on_update_logging_configuration(|(id, log_group)| {
            assert_eq!(id, "ws-1");
            assert_eq!(log_group, OTHER_LOG_GROUP);
            Ok(ResourceStatus::new(StatusCode::Updating))
        })
        .on_describe_workspace(|_| Ok(description(StatusCode::Active)))
        .on_describe_logging_configuration(move |_| {
            Ok(LoggingConfigurationDescription {
                log_group_arn: Some(OTHER_LOG_GROUP.to_string()),
                status: statuses
                    .next()
                    .unwrap_or_else(|| ResourceStatus::new(StatusCode::Active)),
            })
        });
    let orchestrator = orchestrator(mock);

    let previous = WorkspaceModel {
        logging_configuration: Some(LoggingConfiguration::new(LOG_GROUP)),
        ..WorkspaceModel::with_arn(WS_ARN)
    };
    let current = WorkspaceModel {
        logging_configuration: Some(LoggingConfiguration::new(OTHER_LOG_GROUP)),
        ..WorkspaceModel::with_arn(WS_ARN)
    };

    let evt = orchestrator.update(&at_stage(2), &previous, current);
    assert_eq!(evt.callback_context.get_str(LOGGING_ACTIVE), Some(WS_ARN));
    assert_eq!(evt.callback_context.stage_index("stage").unwrap(), 2);
    assert_eq!(evt.callback_delay_seconds, 10);

    // Still UPDATING: keep waiting on the same key.
    let (request, model) = follow_up(&evt);
    let evt = orchestrator.update(&request, &previous, model);
    assert!(evt.is_in_progress());
    assert_eq!(evt.callback_context.get_str(LOGGING_ACTIVE), Some(WS_ARN));
    assert_eq!(evt.callback_context.stage_index("stage").unwrap(), 2);

    let (request, model) = follow_up(&evt);
    let evt = orchestrator.update(&request, &previous, model);
    assert!(evt.is_failed());
    assert_eq!(evt.error_code, Some(ErrorCode::GeneralServiceException));
    assert_eq!(
        evt.message,
        "LoggingConfiguration status: UPDATE_FAILED. Reason: bad"
    );

    let service = orchestrator.service();
    assert_eq!(service.call_count("update_logging_configuration"), 1);
    assert!(!service.was_called("create_logging_configuration"));
}

#[test]
fn test_logging_update_response_failure_is_terminal() {
    let mock = MockApsService::new().on_update_logging_configuration(|_| {
        Ok(ResourceStatus::failed(StatusCode::UpdateFailed, "log group is in another region"))
    });
    let orchestrator = orchestrator(mock);

    let previous = WorkspaceModel {
        logging_configuration: Some(LoggingConfiguration::new(LOG_GROUP)),
        ..WorkspaceModel::with_arn(WS_ARN)
    };
    let current = WorkspaceModel {
        logging_configuration: Some(LoggingConfiguration::new(OTHER_LOG_GROUP)),
        ..WorkspaceModel::with_arn(WS_ARN)
    };

    let evt = orchestrator.update(&at_stage(2), &previous, current);
    assert!(evt.is_failed());
    assert_eq!(
        evt.message,
        "LoggingConfiguration status: UPDATE_FAILED. Reason: log group is in another region"
    );
    assert!(!orchestrator.service().was_called("describe_logging_configuration"));
}

#[test]
fn test_logging_update_sends_trimmed_log_group() {
    let mock = MockApsService::new().on_update_logging_configuration(|(_, log_group)| {
        assert_eq!(log_group, OTHER_LOG_GROUP);
        Ok(ResourceStatus::new(StatusCode::Updating))
    });
    let orchestrator = orchestrator(mock);

    let previous = WorkspaceModel {
        logging_configuration: Some(LoggingConfiguration::new(LOG_GROUP)),
        ..WorkspaceModel::with_arn(WS_ARN)
    };
    let padded = format!("  {}\n", OTHER_LOG_GROUP);
    let current = WorkspaceModel {
        logging_configuration: Some(LoggingConfiguration::new(&padded)),
        ..WorkspaceModel::with_arn(WS_ARN)
    };

    let evt = orchestrator.update(&at_stage(2), &previous, current);
    assert!(evt.is_in_progress(), "expected IN_PROGRESS, got {:?}", evt);
    assert_eq!(orchestrator.service().call_count("update_logging_configuration"), 1);
}

#[test]
fn test_update_removing_alert_manager_waits_for_deletion() {
    let describes: Script<ServiceResult<AlertManagerDefinitionDescription>> = Script::new(vec![
        Ok(AlertManagerDefinitionDescription {
            data: AM_DATA.as_bytes().to_vec(),
            status: ResourceStatus::new(StatusCode::Deleting),
        }),
        Err(ServiceError::not_found("no definition")),
    ]);
    let mock = MockApsService::new()
        .on_delete_alert_manager_definition(|id| {
            assert_eq!(id, "ws-1");
            Ok(())
        })
        .on_describe_workspace(|_| Ok(description(StatusCode::Active)))
        .on_describe_alert_manager_definition(move |_| {
            describes
                .next()
                .unwrap_or_else(|| Err(ServiceError::not_found("gone")))
        });
    let orchestrator = orchestrator(mock);

    let previous = WorkspaceModel {
        alert_manager_definition: Some(AM_DATA.to_string()),
        ..WorkspaceModel::with_arn(WS_ARN)
    };
    let current = WorkspaceModel::with_arn(WS_ARN);

    let evt = orchestrator.update(&at_stage(1), &previous, current);
    assert!(evt.is_in_progress(), "expected IN_PROGRESS, got {:?}", evt);
    assert_eq!(evt.callback_context.get_str(AM_DELETED), Some(WS_ARN));
    assert_eq!(evt.callback_context.stage_index("stage").unwrap(), 1);
    assert_eq!(evt.callback_delay_seconds, 10);

    // Definition still present: keep waiting on the deleted key.
    let (request, model) = follow_up(&evt);
    let evt = orchestrator.update(&request, &previous, model);
    assert!(evt.is_in_progress());
    assert_eq!(evt.callback_context.get_str(AM_DELETED), Some(WS_ARN));
    assert_eq!(evt.callback_context.stage_index("stage").unwrap(), 1);

    let (request, model) = follow_up(&evt);
    let evt = orchestrator.update(&request, &previous, model);
    assert!(evt.is_success(), "expected success, got {:?}", evt);
    assert_eq!(evt.message, "Update Completed");
    assert!(evt.resource_model.unwrap().alert_manager_definition.is_none());

    let service = orchestrator.service();
    assert_eq!(service.call_count("delete_alert_manager_definition"), 1);
    assert_eq!(service.call_count("describe_alert_manager_definition"), 2);
}
