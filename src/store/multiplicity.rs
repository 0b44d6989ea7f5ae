/// Compile-time cardinality of a mutation: decides what `unwrap` returns.
pub trait Multiplicity: Send + Sync + 'static {
    const MULTIPLE: bool;

    type Output<T>;

    fn collect<T>(items: Vec<T>) -> Self::Output<T>;
}

/// At most one entity; unwraps to `Option<T>`.
#[derive(Debug, Clone, Copy)]
pub struct One;

/// Any number of entities; unwraps to `Vec<T>`.
#[derive(Debug, Clone, Copy)]
pub struct Many;

impl Multiplicity for One {
    const MULTIPLE: bool = false;

    type Output<T> = Option<T>;

    fn collect<T>(items: Vec<T>) -> Option<T> {
        items.into_iter().next()
    }
}

impl Multiplicity for Many {
    const MULTIPLE: bool = true;

    type Output<T> = Vec<T>;

    fn collect<T>(items: Vec<T>) -> Vec<T> {
        items
    }
}
