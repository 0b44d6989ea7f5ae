use serde::{Deserialize, Serialize};

use crate::error::{MutentError, Result};
use crate::record::Record;

/// Immutable snapshot of an entity's persisted value, target value and
/// pending intent.
///
/// Every transition consumes the status and returns a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status<T> {
    pub source: Option<T>,
    pub target: T,
    pub created: bool,
    pub updated: bool,
    pub deleted: bool,
}

impl<T: Record> Status<T> {
    /// Status of data that was never persisted.
    pub fn create(target: T) -> Result<Self> {
        if target.is_nil() {
            return Err(MutentError::NilEntity { action: "create" });
        }
        Ok(Status {
            source: None,
            target,
            created: true,
            updated: false,
            deleted: false,
        })
    }

    /// Status of data known to be persisted already.
    pub fn read(data: T) -> Self {
        Status {
            source: Some(data.clone()),
            target: data,
            created: false,
            updated: false,
            deleted: false,
        }
    }

    pub fn update(self, target: T) -> Result<Self> {
        if target.is_nil() {
            return Err(MutentError::NilEntity { action: "update" });
        }
        Ok(Status {
            target,
            updated: true,
            ..self
        })
    }

    /// Mark for deletion. The target is kept so hooks can still inspect it.
    pub fn delete(self) -> Self {
        Status {
            deleted: true,
            ..self
        }
    }

    /// Fold the target into the source and clear all intents. A status with
    /// nothing pending is returned as is.
    pub fn commit(self) -> Self {
        if !self.should_commit() {
            return self;
        }
        let source = if self.deleted {
            None
        } else {
            Some(self.target.clone())
        };
        Status {
            source,
            target: self.target,
            created: false,
            updated: false,
            deleted: false,
        }
    }
}

impl<T> Status<T> {
    pub fn should_commit(&self) -> bool {
        self.created || self.updated || self.deleted
    }

    pub fn should_create(&self) -> bool {
        self.source.is_none() && self.created && !self.deleted
    }

    pub fn should_update(&self) -> bool {
        self.source.is_some() && self.updated && !self.deleted
    }

    pub fn should_delete(&self) -> bool {
        self.source.is_some() && self.deleted
    }
}
