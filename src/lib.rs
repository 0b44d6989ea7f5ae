mod adapter;
mod entity;
mod error;
mod hooks;
mod intent;
#[cfg(feature = "memory")]
mod memory;
mod options;
mod record;
mod status;
mod store;
mod tree;
mod write;

pub use adapter::{Adapter, BulkAction, EntityAdapter, Operation};
pub use entity::Entity;
pub use error::{BoxError, MutentError, Result};
pub use hooks::{EntityHook, Hooks, QueryHook};
pub use intent::Intent;
#[cfg(feature = "memory")]
pub use memory::{MemoryAdapter, MemoryQuery};
pub use options::{
    CommitMode, Context, Options, Plugin, Settings, WriteMode, DEFAULT_WRITE_SIZE,
};
pub use record::Record;
pub use status::Status;
pub use store::{Many, Multiplicity, MultipleMutation, Mutation, One, SingleMutation, Store};
pub use tree::{Mapper, MutationTree, Node, Predicate, SideEffect};
