use serde_json::{json, Value};
use thiserror::Error;

use crate::adapter::Operation;
use crate::intent::Intent;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = MutentError> = std::result::Result<T, E>;

/// Every failure surfaced by `unwrap`, `iterate` or `consume`.
///
/// Each variant maps to a stable code (see [`MutentError::code`]) and a
/// structured payload (see [`MutentError::info`]).
#[derive(Debug, Error)]
pub enum MutentError {
    #[error("adapter {adapter} does not support {operation} (required by {intent} intent on {argument})")]
    PartialAdapter {
        adapter: String,
        operation: Operation,
        intent: Intent,
        argument: String,
    },

    #[error("{intent} intent on {argument} produced more than one entity")]
    MutationOverflow {
        adapter: String,
        intent: Intent,
        argument: String,
    },

    #[error("{intent} intent on {argument} requires an entity, adapter {adapter} found none")]
    EntityRequired {
        adapter: String,
        intent: Intent,
        argument: String,
    },

    #[error("entity {entity} still has pending changes under SAFE commit mode")]
    UnsafeUnwrite {
        adapter: String,
        intent: Intent,
        argument: String,
        entity: String,
    },

    #[error("adapter {adapter} returned {actual} bulk results for {expected} actions")]
    InvalidBulkWrite {
        adapter: String,
        expected: usize,
        actual: usize,
    },

    #[error("cannot {action} an entity with a nil value")]
    NilEntity { action: &'static str },

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("adapter {adapter} failed: {source}")]
    Adapter {
        adapter: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    External(BoxError),

    #[error("settings error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl MutentError {
    /// Wrap a backend failure, naming the adapter that raised it.
    pub fn adapter(adapter: impl Into<String>, source: impl Into<BoxError>) -> Self {
        MutentError::Adapter {
            adapter: adapter.into(),
            source: source.into(),
        }
    }

    /// Wrap a failure raised by a hook, mutator or other caller code.
    pub fn external(source: impl Into<BoxError>) -> Self {
        MutentError::External(source.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            MutentError::PartialAdapter { .. } => "EMUT_PARTIAL_ADAPTER",
            MutentError::MutationOverflow { .. } => "EMUT_MUTATION_OVERFLOW",
            MutentError::EntityRequired { .. } => "EMUT_ENTITY_REQUIRED",
            MutentError::UnsafeUnwrite { .. } => "EMUT_UNSAFE_UNWRITE",
            MutentError::InvalidBulkWrite { .. } => "EMUT_INVALID_BULK_WRITE",
            MutentError::NilEntity { .. } => "EMUT_NIL_ENTITY",
            MutentError::InvalidOptions(_) => "EMUT_INVALID_OPTIONS",
            MutentError::Adapter { .. } => "EMUT_ADAPTER",
            MutentError::External(_) => "EMUT_EXTERNAL",
            MutentError::Serde(_) => "EMUT_SERDE",
        }
    }

    pub fn info(&self) -> Value {
        match self {
            MutentError::PartialAdapter {
                adapter,
                operation,
                intent,
                argument,
            } => json!({
                "adapter": adapter,
                "operation": operation.as_str(),
                "intent": intent.as_str(),
                "argument": argument,
            }),
            MutentError::MutationOverflow {
                adapter,
                intent,
                argument,
            }
            | MutentError::EntityRequired {
                adapter,
                intent,
                argument,
            } => json!({
                "adapter": adapter,
                "intent": intent.as_str(),
                "argument": argument,
            }),
            MutentError::UnsafeUnwrite {
                adapter,
                intent,
                argument,
                entity,
            } => json!({
                "adapter": adapter,
                "intent": intent.as_str(),
                "argument": argument,
                "entity": entity,
            }),
            MutentError::InvalidBulkWrite {
                adapter,
                expected,
                actual,
            } => json!({
                "adapter": adapter,
                "expected": expected,
                "actual": actual,
            }),
            MutentError::NilEntity { action } => json!({ "action": action }),
            MutentError::InvalidOptions(message) => json!({ "message": message }),
            MutentError::Adapter { adapter, source } => json!({
                "adapter": adapter,
                "message": source.to_string(),
            }),
            MutentError::External(source) => json!({ "message": source.to_string() }),
            MutentError::Serde(err) => json!({ "message": err.to_string() }),
        }
    }
}
