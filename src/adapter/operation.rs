use std::fmt;

use serde::{Deserialize, Serialize};

/// A single adapter capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Find,
    Filter,
    Create,
    Update,
    Delete,
    Bulk,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Find,
        Operation::Filter,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
        Operation::Bulk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Find => "FIND",
            Operation::Filter => "FILTER",
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
            Operation::Bulk => "BULK",
        }
    }

    pub fn parse(value: &str) -> Option<Operation> {
        Operation::ALL
            .into_iter()
            .find(|operation| operation.as_str() == value)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
