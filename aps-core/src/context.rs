//! Continuation blob exchanged with the caller between invocations.
//!
//! The blob is a flat key/value map. A per-stage wait key records which
//! condition the next invocation has to poll and carries the identifier needed
//! to poll it; the stage key records which pipeline stage is active.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{ApsError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallbackContext(BTreeMap<String, Value>);

impl CallbackContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-entry blob asking the next invocation to resume on `key`.
    pub fn wait_for(key: &str, identifier: &str) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(key.to_string(), Value::String(identifier.to_string()));
        Self(entries)
    }

    /// Overlay the active stage index, leaving wait entries untouched.
    pub fn with_stage(mut self, stage_key: &str, index: usize) -> Self {
        self.0.insert(stage_key.to_string(), Value::from(index as u64));
        self
    }

    /// Identifier stored under a wait key, if that condition was requested.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Stage index recorded by a previous invocation; missing means the first
    /// stage. Callers that round-trip JSON through a float representation may
    /// hand back `2.0`, which is accepted.
    pub fn stage_index(&self, stage_key: &str) -> Result<usize> {
        let Some(value) = self.0.get(stage_key) else {
            return Ok(0);
        };
        if let Some(index) = value.as_u64() {
            return Ok(index as usize);
        }
        match value.as_f64() {
            Some(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as usize),
            _ => Err(ApsError::InvalidRequest(format!(
                "invalid stage index in callback context: {}",
                value
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<BTreeMap<String, Value>> for CallbackContext {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Self(entries)
    }
}
