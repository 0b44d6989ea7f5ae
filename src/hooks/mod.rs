mod hooks;

pub(crate) use hooks::{fire_entity, fire_query};
pub use hooks::{EntityHook, Hooks, QueryHook};
