use serde::{Deserialize, Serialize};

use super::Operation;
use crate::entity::Entity;
use crate::record::Record;

/// One pending write handed to [`Adapter::bulk`](super::Adapter::bulk).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulkAction<T> {
    Create {
        data: T,
    },
    #[serde(rename_all = "camelCase")]
    Update {
        old_data: T,
        new_data: T,
    },
    Delete {
        data: T,
    },
}

impl<T: Record> BulkAction<T> {
    /// Describe the write an entity is waiting for, if any.
    pub fn from_entity(entity: &Entity<T>) -> Option<Self> {
        let status = entity.status();
        if entity.should_create() {
            Some(BulkAction::Create {
                data: status.target.clone(),
            })
        } else if entity.should_update() {
            status.source.clone().map(|old_data| BulkAction::Update {
                old_data,
                new_data: status.target.clone(),
            })
        } else if entity.should_delete() {
            status
                .source
                .clone()
                .map(|data| BulkAction::Delete { data })
        } else {
            None
        }
    }
}

impl<T> BulkAction<T> {
    pub fn operation(&self) -> Operation {
        match self {
            BulkAction::Create { .. } => Operation::Create,
            BulkAction::Update { .. } => Operation::Update,
            BulkAction::Delete { .. } => Operation::Delete,
        }
    }
}
