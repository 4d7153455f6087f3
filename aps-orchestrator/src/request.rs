use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use aps_core::context::CallbackContext;

/// Per-invocation inputs supplied by the calling environment alongside the
/// resource descriptions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerRequest {
    /// Continuation blob returned by the previous invocation; empty at first
    #[serde(default)]
    pub callback_context: CallbackContext,

    /// Tags the environment applies to every resource it provisions
    #[serde(default)]
    pub system_tags: BTreeMap<String, String>,

    /// Page token for list operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl HandlerRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request resuming from a previously returned continuation blob.
    pub fn resume(callback_context: CallbackContext) -> Self {
        Self {
            callback_context,
            ..Default::default()
        }
    }

    pub fn with_system_tag(mut self, key: &str, value: &str) -> Self {
        self.system_tags.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_next_token(mut self, token: &str) -> Self {
        self.next_token = Some(token.to_string());
        self
    }
}
