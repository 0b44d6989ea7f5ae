mod adapter;
mod bulk;
pub(crate) mod dispatch;
mod entity_adapter;
mod operation;

pub use adapter::Adapter;
pub use bulk::BulkAction;
pub use entity_adapter::EntityAdapter;
pub use operation::Operation;
