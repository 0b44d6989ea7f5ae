mod context;
mod options;
mod settings;

pub use context::Context;
pub use options::{Options, Plugin};
pub use settings::{CommitMode, Settings, WriteMode, DEFAULT_WRITE_SIZE};
