mod adapter;

pub use adapter::{MemoryAdapter, MemoryQuery};
