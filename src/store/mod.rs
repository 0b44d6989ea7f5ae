mod multiplicity;
mod mutation;
mod source;
mod store;

pub use multiplicity::{Many, Multiplicity, One};
pub use mutation::{Mutation, MultipleMutation, SingleMutation};
pub use store::Store;
