use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

pub const DEFAULT_WRITE_SIZE: usize = 16;

/// What happens to entities that still carry pending intent once the
/// mutation tree has run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommitMode {
    /// Write them with the selected strategy.
    #[default]
    Auto,
    /// Hand them back unwritten.
    Manual,
    /// Fail with `UnsafeUnwrite`.
    Safe,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WriteMode {
    /// Bulk for multi-entity runs on bulk-capable adapters, sequential
    /// otherwise.
    #[default]
    Auto,
    Sequential,
    Concurrent,
    Bulk,
}

/// Scalar configuration. Every field is optional so layers can be merged;
/// unset fields fall back to the defaults at resolution time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_mode: Option<CommitMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_mode: Option<WriteMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_size: Option<usize>,
    /// Adapter-specific payload, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opaque: Option<Value>,
}

impl Settings {
    /// Parse settings from JSON. Both the bare object and the object nested
    /// under a top-level `"mutent"` key are accepted.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut value: Value = serde_json::from_str(json)?;
        if let Some(nested) = value.get_mut("mutent") {
            value = nested.take();
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Fields set in `other` win.
    pub fn merge(self, other: Settings) -> Settings {
        Settings {
            commit_mode: other.commit_mode.or(self.commit_mode),
            write_mode: other.write_mode.or(self.write_mode),
            write_size: other.write_size.or(self.write_size),
            opaque: other.opaque.or(self.opaque),
        }
    }
}
