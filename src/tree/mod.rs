mod evaluate;
mod history;
mod node;

pub(crate) use evaluate::evaluate;
pub use history::MutationTree;
pub use node::{Mapper, Node, Predicate, SideEffect};
