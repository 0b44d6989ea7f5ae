use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::adapter::{Adapter, Operation};
use crate::entity::Entity;
use crate::error::Result;
use crate::options::Context;

pub type QueryHook<A> = Arc<
    dyn Fn(&<A as Adapter>::Query, &Context<A>) -> BoxFuture<'static, Result<()>> + Send + Sync,
>;

pub type EntityHook<A> = Arc<
    dyn Fn(&Entity<<A as Adapter>::Item>, &Context<A>) -> BoxFuture<'static, Result<()>>
        + Send
        + Sync,
>;

/// Ordered callback lists, one per extension point.
///
/// Layers are combined with [`Hooks::concat`]: lists are appended, never
/// replaced. Callbacks run one after another; the first error aborts the
/// entity and surfaces to the caller.
pub struct Hooks<A: Adapter> {
    pub on_find: Vec<QueryHook<A>>,
    pub on_filter: Vec<QueryHook<A>>,
    pub on_entity: Vec<EntityHook<A>>,
    pub before_create: Vec<EntityHook<A>>,
    pub after_create: Vec<EntityHook<A>>,
    pub before_update: Vec<EntityHook<A>>,
    pub after_update: Vec<EntityHook<A>>,
    pub before_delete: Vec<EntityHook<A>>,
    pub after_delete: Vec<EntityHook<A>>,
}

impl<A: Adapter> Default for Hooks<A> {
    fn default() -> Self {
        Hooks {
            on_find: Vec::new(),
            on_filter: Vec::new(),
            on_entity: Vec::new(),
            before_create: Vec::new(),
            after_create: Vec::new(),
            before_update: Vec::new(),
            after_update: Vec::new(),
            before_delete: Vec::new(),
            after_delete: Vec::new(),
        }
    }
}

impl<A: Adapter> Clone for Hooks<A> {
    fn clone(&self) -> Self {
        Hooks {
            on_find: self.on_find.clone(),
            on_filter: self.on_filter.clone(),
            on_entity: self.on_entity.clone(),
            before_create: self.before_create.clone(),
            after_create: self.after_create.clone(),
            before_update: self.before_update.clone(),
            after_update: self.after_update.clone(),
            before_delete: self.before_delete.clone(),
            after_delete: self.after_delete.clone(),
        }
    }
}

fn query_hook<A, F, Fut>(hook: F) -> QueryHook<A>
where
    A: Adapter,
    F: Fn(&A::Query, &Context<A>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |query: &A::Query, ctx: &Context<A>| hook(query, ctx).boxed())
}

fn entity_hook<A, F, Fut>(hook: F) -> EntityHook<A>
where
    A: Adapter,
    F: Fn(&Entity<A::Item>, &Context<A>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |entity: &Entity<A::Item>, ctx: &Context<A>| {
        hook(entity, ctx).boxed()
    })
}

macro_rules! entity_hook_setter {
    ($($(#[$doc:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name<F, Fut>(mut self, hook: F) -> Self
            where
                F: Fn(&Entity<A::Item>, &Context<A>) -> Fut + Send + Sync + 'static,
                Fut: Future<Output = Result<()>> + Send + 'static,
            {
                self.$name.push(entity_hook(hook));
                self
            }
        )*
    };
}

impl<A: Adapter> Hooks<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fired once per `find`/`read`, before the adapter is queried.
    pub fn on_find<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(&A::Query, &Context<A>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.on_find.push(query_hook(hook));
        self
    }

    /// Fired once per `filter`, before the adapter is queried.
    pub fn on_filter<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(&A::Query, &Context<A>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.on_filter.push(query_hook(hook));
        self
    }

    entity_hook_setter! {
        /// Fired for every wrapped entity before the mutation tree runs.
        on_entity,
        before_create,
        after_create,
        before_update,
        after_update,
        before_delete,
        after_delete,
    }

    /// Append every list of `other` after the lists of `self`.
    pub fn concat(mut self, other: Hooks<A>) -> Self {
        self.on_find.extend(other.on_find);
        self.on_filter.extend(other.on_filter);
        self.on_entity.extend(other.on_entity);
        self.before_create.extend(other.before_create);
        self.after_create.extend(other.after_create);
        self.before_update.extend(other.before_update);
        self.after_update.extend(other.after_update);
        self.before_delete.extend(other.before_delete);
        self.after_delete.extend(other.after_delete);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.on_find.is_empty()
            && self.on_filter.is_empty()
            && self.on_entity.is_empty()
            && self.before_create.is_empty()
            && self.after_create.is_empty()
            && self.before_update.is_empty()
            && self.after_update.is_empty()
            && self.before_delete.is_empty()
            && self.after_delete.is_empty()
    }

    pub fn before(&self, operation: Operation) -> &[EntityHook<A>] {
        match operation {
            Operation::Create => &self.before_create,
            Operation::Update => &self.before_update,
            Operation::Delete => &self.before_delete,
            _ => &[],
        }
    }

    pub fn after(&self, operation: Operation) -> &[EntityHook<A>] {
        match operation {
            Operation::Create => &self.after_create,
            Operation::Update => &self.after_update,
            Operation::Delete => &self.after_delete,
            _ => &[],
        }
    }
}

pub(crate) async fn fire_query<A: Adapter>(
    hooks: &[QueryHook<A>],
    query: &A::Query,
    ctx: &Context<A>,
) -> Result<()> {
    for hook in hooks {
        hook(query, ctx).await?;
    }
    Ok(())
}

pub(crate) async fn fire_entity<A: Adapter>(
    hooks: &[EntityHook<A>],
    entity: &Entity<A::Item>,
    ctx: &Context<A>,
) -> Result<()> {
    for hook in hooks {
        hook(entity, ctx).await?;
    }
    Ok(())
}
