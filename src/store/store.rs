use std::sync::Arc;

use super::source::Source;
use super::{Many, Mutation, One};
use crate::adapter::Adapter;
use crate::options::{Options, Plugin, Settings};

/// Entry point bound to one adapter.
///
/// A store only holds defaults; every intent method returns a fresh
/// [`Mutation`] that does nothing until driven.
pub struct Store<A: Adapter> {
    adapter: Arc<A>,
    options: Options<A>,
}

impl<A: Adapter> Clone for Store<A> {
    fn clone(&self) -> Self {
        Store {
            adapter: self.adapter.clone(),
            options: self.options.clone(),
        }
    }
}

impl<A: Adapter> Store<A> {
    pub fn new(adapter: A) -> Self {
        Store::with_shared(Arc::new(adapter))
    }

    /// Build a store over an adapter that is shared with other code.
    pub fn with_shared(adapter: Arc<A>) -> Self {
        Store {
            adapter,
            options: Options::default(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.options = self.options.settings(settings);
        self
    }

    /// Layer a plugin over the store defaults. Plugins apply in registration
    /// order; per-call options still win over all of them.
    pub fn register(mut self, plugin: Plugin<A>) -> Self {
        self.options = self.options.merge(plugin);
        self
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn options(&self) -> &Options<A> {
        &self.options
    }

    /// A new entity that will be created on commit.
    pub fn create(&self, data: A::Item) -> Mutation<A, One> {
        self.mutation(Source::Create(vec![data]))
    }

    pub fn create_many<I>(&self, data: I) -> Mutation<A, Many>
    where
        I: IntoIterator<Item = A::Item>,
    {
        self.mutation(Source::Create(data.into_iter().collect()))
    }

    /// At most one persisted entity. Finding nothing is not an error.
    pub fn find(&self, query: A::Query) -> Mutation<A, One> {
        self.mutation(Source::Find(query))
    }

    /// Exactly one persisted entity. Finding nothing fails with
    /// `EntityRequired`.
    pub fn read(&self, query: A::Query) -> Mutation<A, One> {
        self.mutation(Source::Read(query))
    }

    pub fn filter(&self, query: A::Query) -> Mutation<A, Many> {
        self.mutation(Source::Filter(query))
    }

    /// Data the caller knows is already persisted. A nil value fails with
    /// `EntityRequired`, like a `read` that matched nothing.
    pub fn from(&self, data: A::Item) -> Mutation<A, One> {
        self.mutation(Source::From(vec![data]))
    }

    pub fn from_many<I>(&self, data: I) -> Mutation<A, Many>
    where
        I: IntoIterator<Item = A::Item>,
    {
        self.mutation(Source::From(data.into_iter().collect()))
    }

    fn mutation<M: super::Multiplicity>(&self, source: Source<A>) -> Mutation<A, M> {
        Mutation::new(self.adapter.clone(), source, self.options.clone())
    }
}
