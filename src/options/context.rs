use serde_json::Value;

use super::{CommitMode, WriteMode};
use crate::adapter::{Adapter, Operation};
use crate::error::MutentError;
use crate::hooks::Hooks;
use crate::intent::Intent;
use crate::tree::Node;

/// Fully resolved configuration for one run, shared by every stage and
/// handed to adapters and hooks.
pub struct Context<A: Adapter> {
    pub adapter: String,
    pub intent: Intent,
    /// Debug rendering of the query or data the run started from.
    pub argument: String,
    /// Whether the run may cover more than one entity.
    pub multiple: bool,
    pub commit_mode: CommitMode,
    pub write_mode: WriteMode,
    pub write_size: usize,
    pub hooks: Hooks<A>,
    pub mutators: Vec<Node<A::Item>>,
    pub opaque: Option<Value>,
}

impl<A: Adapter> Context<A> {
    pub fn unsupported(&self, operation: Operation) -> MutentError {
        MutentError::PartialAdapter {
            adapter: self.adapter.clone(),
            operation,
            intent: self.intent,
            argument: self.argument.clone(),
        }
    }
}

impl<A: Adapter> std::fmt::Debug for Context<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("adapter", &self.adapter)
            .field("intent", &self.intent)
            .field("argument", &self.argument)
            .field("multiple", &self.multiple)
            .field("commit_mode", &self.commit_mode)
            .field("write_mode", &self.write_mode)
            .field("write_size", &self.write_size)
            .field("mutators", &self.mutators.len())
            .field("opaque", &self.opaque)
            .finish()
    }
}
