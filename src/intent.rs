use std::fmt;

use serde::{Deserialize, Serialize};

/// How a mutation obtains its source entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// New data, wrapped into created entities.
    Create,
    /// Zero or one entity read through the adapter.
    Find,
    /// Exactly one entity read through the adapter.
    Read,
    /// Any number of entities read through the adapter.
    Filter,
    /// Data the caller already knows to be persisted.
    From,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Create => "CREATE",
            Intent::Find => "FIND",
            Intent::Read => "READ",
            Intent::Filter => "FILTER",
            Intent::From => "FROM",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
