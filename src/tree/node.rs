use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};

use crate::error::Result;

pub type Mapper<T> = Arc<dyn Fn(T) -> BoxFuture<'static, Result<T>> + Send + Sync>;
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
pub type SideEffect<T> = Arc<dyn Fn(&T) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// One step of a mutation tree.
///
/// Nodes are plain data: the same tree can be replayed against any number of
/// entities.
pub enum Node<T> {
    Update(Mapper<T>),
    Delete,
    Commit,
    /// The predicate is evaluated once against the current target, then the
    /// matching branch runs inline. Sibling conditions share nothing.
    Condition {
        predicate: Predicate<T>,
        when_true: Vec<Node<T>>,
        when_false: Vec<Node<T>>,
    },
    /// Drops the entity from the pipeline when the predicate is false.
    Filter(Predicate<T>),
    Tap(SideEffect<T>),
}

impl<T: Send + 'static> Node<T> {
    pub fn update<F>(mapper: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        Node::Update(Arc::new(move |value: T| future::ready(Ok(mapper(value))).boxed()))
    }

    /// A mapper that may fail.
    pub fn try_update<F>(mapper: F) -> Self
    where
        F: Fn(T) -> Result<T> + Send + Sync + 'static,
    {
        Node::Update(Arc::new(move |value: T| future::ready(mapper(value)).boxed()))
    }

    pub fn update_async<F, Fut>(mapper: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Node::Update(Arc::new(move |value: T| mapper(value).boxed()))
    }

    pub fn delete() -> Self {
        Node::Delete
    }

    pub fn commit() -> Self {
        Node::Commit
    }

    pub fn when<P, I>(predicate: P, when_true: I) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        I: IntoIterator<Item = Node<T>>,
    {
        Node::if_else(predicate, when_true, Vec::new())
    }

    pub fn unless<P, I>(predicate: P, when_false: I) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        I: IntoIterator<Item = Node<T>>,
    {
        Node::if_else(predicate, Vec::new(), when_false)
    }

    pub fn if_else<P, I, J>(predicate: P, when_true: I, when_false: J) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        I: IntoIterator<Item = Node<T>>,
        J: IntoIterator<Item = Node<T>>,
    {
        Node::Condition {
            predicate: Arc::new(predicate),
            when_true: when_true.into_iter().collect(),
            when_false: when_false.into_iter().collect(),
        }
    }

    pub fn filter<P>(predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Node::Filter(Arc::new(predicate))
    }

    pub fn tap<F>(effect: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Node::Tap(Arc::new(move |value: &T| {
            effect(value);
            future::ready(Ok(())).boxed()
        }))
    }

    pub fn tap_async<F, Fut>(effect: F) -> Self
    where
        F: Fn(&T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Node::Tap(Arc::new(move |value: &T| effect(value).boxed()))
    }
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        match self {
            Node::Update(mapper) => Node::Update(mapper.clone()),
            Node::Delete => Node::Delete,
            Node::Commit => Node::Commit,
            Node::Condition {
                predicate,
                when_true,
                when_false,
            } => Node::Condition {
                predicate: predicate.clone(),
                when_true: when_true.clone(),
                when_false: when_false.clone(),
            },
            Node::Filter(predicate) => Node::Filter(predicate.clone()),
            Node::Tap(effect) => Node::Tap(effect.clone()),
        }
    }
}

impl<T> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Update(_) => f.write_str("Update"),
            Node::Delete => f.write_str("Delete"),
            Node::Commit => f.write_str("Commit"),
            Node::Condition {
                when_true,
                when_false,
                ..
            } => f
                .debug_struct("Condition")
                .field("when_true", when_true)
                .field("when_false", when_false)
                .finish(),
            Node::Filter(_) => f.write_str("Filter"),
            Node::Tap(_) => f.write_str("Tap"),
        }
    }
}

impl Node<serde_json::Value> {
    /// Shallow-merge the keys of `partial` into the target object. A target
    /// that is not an object is replaced by one.
    pub fn assign(partial: serde_json::Value) -> Self {
        Node::update(move |target: serde_json::Value| assign_into(target, &partial))
    }
}

fn assign_into(target: serde_json::Value, partial: &serde_json::Value) -> serde_json::Value {
    use serde_json::{Map, Value};

    let mut object = match target {
        Value::Object(object) => object,
        _ => Map::new(),
    };
    if let Value::Object(partial) = partial {
        for (key, value) in partial {
            object.insert(key.clone(), value.clone());
        }
    }
    Value::Object(object)
}
