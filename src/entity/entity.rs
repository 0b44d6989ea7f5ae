use std::collections::HashMap;

use serde_json::Value;

use crate::error::Result;
use crate::record::Record;
use crate::status::Status;

/// Wrapper that carries one [`Status`] through a single write pass.
///
/// Lifecycle transitions consume the entity and hand back the next one, so
/// exactly one continuation owns it at any time. Adapters that work on live
/// entities use [`Entity::set`] to fold storage results into the target.
#[derive(Debug, Clone)]
pub struct Entity<T> {
    status: Status<T>,
    meta: HashMap<String, Value>,
}

impl<T: Record> Entity<T> {
    /// Wrap data that has never been persisted.
    pub fn create(data: T) -> Result<Self> {
        Ok(Entity::from_status(Status::create(data)?))
    }

    /// Wrap data that is already persisted.
    pub fn read(data: T) -> Self {
        Entity::from_status(Status::read(data))
    }

    pub fn from_status(status: Status<T>) -> Self {
        Entity {
            status,
            meta: HashMap::new(),
        }
    }

    pub fn update(self, data: T) -> Result<Self> {
        Ok(Entity {
            status: self.status.update(data)?,
            meta: self.meta,
        })
    }

    pub fn delete(self) -> Self {
        Entity {
            status: self.status.delete(),
            meta: self.meta,
        }
    }

    pub fn commit(self) -> Self {
        Entity {
            status: self.status.commit(),
            meta: self.meta,
        }
    }

    /// Replace the current target, leaving intent flags untouched.
    pub fn set(&mut self, data: T) -> &mut Self {
        self.status.target = data;
        self
    }

    pub fn status(&self) -> &Status<T> {
        &self.status
    }

    pub fn into_status(self) -> Status<T> {
        self.status
    }

    /// Current target value.
    pub fn value(&self) -> &T {
        &self.status.target
    }

    pub fn into_value(self) -> T {
        self.status.target
    }

    pub fn should_commit(&self) -> bool {
        self.status.should_commit()
    }

    pub fn should_create(&self) -> bool {
        self.status.should_create()
    }

    pub fn should_update(&self) -> bool {
        self.status.should_update()
    }

    pub fn should_delete(&self) -> bool {
        self.status.should_delete()
    }

    /// Needs an adapter call to reconcile, as opposed to a bare commit.
    pub fn should_write(&self) -> bool {
        self.should_create() || self.should_update() || self.should_delete()
    }

    pub fn meta(&self) -> &HashMap<String, Value> {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut HashMap<String, Value> {
        &mut self.meta
    }
}
