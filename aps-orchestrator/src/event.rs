//! Outcome reported to the caller at the end of every invocation.

use serde::{Deserialize, Serialize};

use aps_core::context::CallbackContext;
use aps_core::error::{ApsError, ErrorCode};

pub const MESSAGE_IN_PROGRESS: &str = "In Progress";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Success,
    InProgress,
    Failed,
}

/// Terminal or suspended result of one invocation.
///
/// An `IN_PROGRESS` event carries the continuation blob the caller must hand
/// back on the next invocation, together with a suggested delay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent<M> {
    pub status: OperationStatus,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,

    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub resource_model: Option<M>,

    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub resource_models: Vec<M>,

    #[serde(default, skip_serializing_if = "CallbackContext::is_empty")]
    pub callback_context: CallbackContext,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub callback_delay_seconds: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl<M> ProgressEvent<M> {
    fn with_status(status: OperationStatus, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
            error_code: None,
            resource_model: None,
            resource_models: Vec::new(),
            callback_context: CallbackContext::new(),
            callback_delay_seconds: 0,
            next_token: None,
        }
    }

    pub fn success(message: &str, model: Option<M>) -> Self {
        Self {
            resource_model: model,
            ..Self::with_status(OperationStatus::Success, message)
        }
    }

    /// Successful page of a list operation.
    pub fn page(message: &str, models: Vec<M>, next_token: Option<String>) -> Self {
        Self {
            resource_models: models,
            next_token,
            ..Self::with_status(OperationStatus::Success, message)
        }
    }

    pub fn in_progress(model: M, context: CallbackContext, delay_seconds: u32) -> Self {
        Self {
            resource_model: Some(model),
            callback_context: context,
            callback_delay_seconds: delay_seconds,
            ..Self::with_status(OperationStatus::InProgress, MESSAGE_IN_PROGRESS)
        }
    }

    pub fn failed(code: ErrorCode, message: &str, model: Option<M>) -> Self {
        Self {
            error_code: Some(code),
            resource_model: model,
            ..Self::with_status(OperationStatus::Failed, message)
        }
    }

    /// Failure carrying the outcome code and caller-safe message of `err`.
    pub fn from_error(err: &ApsError, model: Option<M>) -> Self {
        Self::failed(err.error_code(), &err.public_message(), model)
    }

    /// Record the active stage in the continuation blob.
    pub fn with_stage(mut self, stage_key: &str, index: usize) -> Self {
        self.callback_context = self.callback_context.with_stage(stage_key, index);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == OperationStatus::Success
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == OperationStatus::InProgress
    }

    pub fn is_failed(&self) -> bool {
        self.status == OperationStatus::Failed
    }
}
