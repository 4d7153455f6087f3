//! Configuration structure for the resource handlers.
//!
//! The wait keys end up in continuation blobs that callers persist between
//! invocations, so changing them while an operation is in flight strands it.
//! The workspace keys stay `Arn` for compatibility with earlier releases.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use aps_core::error::{ApsError, Result};

/// Root structure of the handler configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HandlerConfig {
    /// Suggested re-invocation delays
    #[serde(default, skip_serializing_if = "CallbackSettings::is_default")]
    pub callbacks: CallbackSettings,

    /// Continuation blob keys
    #[serde(default, skip_serializing_if = "WaitKeys::is_default")]
    pub keys: WaitKeys,
}

impl HandlerConfig {
    /// Check that delays are usable and that no two stages share a wait key.
    pub fn validate(&self) -> Result<()> {
        if self.callbacks.short_seconds == 0 || self.callbacks.long_seconds == 0 {
            return Err(ApsError::Config(
                "callback delays must be greater than zero".to_string(),
            ));
        }
        if self.keys.stage.trim().is_empty() {
            return Err(ApsError::Config("stage key cannot be empty".to_string()));
        }

        self.check_stage_keys("rule_groups_namespace", &self.keys.rule_groups_namespace)?;

        let mut owners: HashMap<&str, &str> = HashMap::new();
        for (owner, keys) in self.keys.pipeline_stages() {
            self.check_stage_keys(owner, keys)?;
            for key in [keys.active.as_str(), keys.deleted.as_str()] {
                if let Some(previous) = owners.insert(key, owner) {
                    if previous != owner {
                        return Err(ApsError::Config(format!(
                            "wait key '{}' is shared by {} and {}",
                            key, previous, owner
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn check_stage_keys(&self, owner: &str, keys: &StageKeys) -> Result<()> {
        for key in [&keys.active, &keys.deleted] {
            if key.trim().is_empty() {
                return Err(ApsError::Config(format!(
                    "wait keys for {} cannot be empty",
                    owner
                )));
            }
            if *key == self.keys.stage {
                return Err(ApsError::Config(format!(
                    "wait key '{}' for {} collides with the stage key",
                    key, owner
                )));
            }
        }
        Ok(())
    }
}

/// Delays, in seconds, suggested to the caller before the next invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallbackSettings {
    /// Workspace status polls
    #[serde(default = "default_short_seconds")]
    pub short_seconds: u32,

    /// Secondary configuration polls and deletion checks
    #[serde(default = "default_long_seconds")]
    pub long_seconds: u32,
}

fn default_short_seconds() -> u32 {
    2
}

fn default_long_seconds() -> u32 {
    10
}

impl Default for CallbackSettings {
    fn default() -> Self {
        Self {
            short_seconds: default_short_seconds(),
            long_seconds: default_long_seconds(),
        }
    }
}

impl CallbackSettings {
    pub fn is_default(&self) -> bool {
        self.short_seconds == default_short_seconds()
            && self.long_seconds == default_long_seconds()
    }
}

/// Keys for one stage: the condition being polled after a create/update and
/// after a delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageKeys {
    pub active: String,
    pub deleted: String,
}

impl StageKeys {
    pub fn new(active: &str, deleted: &str) -> Self {
        Self {
            active: active.to_string(),
            deleted: deleted.to_string(),
        }
    }
}

/// All continuation blob keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaitKeys {
    /// Reserved key carrying the active stage index
    #[serde(default = "default_stage_key")]
    pub stage: String,

    #[serde(default = "default_workspace_keys")]
    pub workspace: StageKeys,

    #[serde(default = "default_alert_manager_keys")]
    pub alert_manager: StageKeys,

    #[serde(default = "default_logging_keys")]
    pub logging: StageKeys,

    /// Rule-groups namespaces run their own single-stage pipeline.
    #[serde(default = "default_rule_groups_keys")]
    pub rule_groups_namespace: StageKeys,
}

fn default_stage_key() -> String {
    "stage".to_string()
}

fn default_workspace_keys() -> StageKeys {
    StageKeys::new("Arn", "Arn")
}

fn default_alert_manager_keys() -> StageKeys {
    StageKeys::new("waitForAlertManagerActive", "waitForAlertManagerDeleted")
}

fn default_logging_keys() -> StageKeys {
    StageKeys::new(
        "waitForLoggingConfigurationActive",
        "waitForLoggingConfigurationDeleted",
    )
}

fn default_rule_groups_keys() -> StageKeys {
    StageKeys::new("Arn", "Arn")
}

impl Default for WaitKeys {
    fn default() -> Self {
        Self {
            stage: default_stage_key(),
            workspace: default_workspace_keys(),
            alert_manager: default_alert_manager_keys(),
            logging: default_logging_keys(),
            rule_groups_namespace: default_rule_groups_keys(),
        }
    }
}

impl WaitKeys {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Stages that share a continuation blob within the workspace pipeline.
    pub fn pipeline_stages(&self) -> [(&'static str, &StageKeys); 3] {
        [
            ("workspace", &self.workspace),
            ("alert_manager", &self.alert_manager),
            ("logging", &self.logging),
        ]
    }
}
