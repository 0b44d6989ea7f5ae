use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::future;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use serde_json::Value;
use tracing::debug;

use super::source::{self, Source};
use super::{Many, Multiplicity, One};
use crate::adapter::Adapter;
use crate::entity::Entity;
use crate::error::Result;
use crate::hooks::fire_entity;
use crate::options::{Context, Options};
use crate::tree::{evaluate, MutationTree, Node};
use crate::write;

/// An immutable, replayable pipeline over the entities of one source.
///
/// Every step returns a new mutation; nothing touches the adapter until one
/// of the terminals (`iterate`, `unwrap`, `consume`) is driven.
pub struct Mutation<A: Adapter, M: Multiplicity = One> {
    adapter: Arc<A>,
    source: Arc<Source<A>>,
    tree: MutationTree<A::Item>,
    options: Options<A>,
    multiplicity: PhantomData<M>,
}

pub type SingleMutation<A> = Mutation<A, One>;
pub type MultipleMutation<A> = Mutation<A, Many>;

impl<A: Adapter, M: Multiplicity> Clone for Mutation<A, M> {
    fn clone(&self) -> Self {
        Mutation {
            adapter: self.adapter.clone(),
            source: self.source.clone(),
            tree: self.tree.clone(),
            options: self.options.clone(),
            multiplicity: PhantomData,
        }
    }
}

impl<A: Adapter, M: Multiplicity> Mutation<A, M> {
    pub(crate) fn new(adapter: Arc<A>, source: Source<A>, options: Options<A>) -> Self {
        Mutation {
            adapter,
            source: Arc::new(source),
            tree: MutationTree::new(),
            options,
            multiplicity: PhantomData,
        }
    }

    fn with_tree(&self, tree: MutationTree<A::Item>) -> Self {
        Mutation {
            tree,
            ..self.clone()
        }
    }

    pub fn tree(&self) -> &MutationTree<A::Item> {
        &self.tree
    }

    pub fn update<F>(&self, mapper: F) -> Self
    where
        F: Fn(A::Item) -> A::Item + Send + Sync + 'static,
    {
        self.pipe([Node::update(mapper)])
    }

    pub fn try_update<F>(&self, mapper: F) -> Self
    where
        F: Fn(A::Item) -> Result<A::Item> + Send + Sync + 'static,
    {
        self.pipe([Node::try_update(mapper)])
    }

    pub fn update_async<F, Fut>(&self, mapper: F) -> Self
    where
        F: Fn(A::Item) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<A::Item>> + Send + 'static,
    {
        self.pipe([Node::update_async(mapper)])
    }

    pub fn delete(&self) -> Self {
        self.pipe([Node::delete()])
    }

    pub fn commit(&self) -> Self {
        self.pipe([Node::commit()])
    }

    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&A::Item) -> bool + Send + Sync + 'static,
    {
        self.pipe([Node::filter(predicate)])
    }

    pub fn tap<F>(&self, effect: F) -> Self
    where
        F: Fn(&A::Item) + Send + Sync + 'static,
    {
        self.pipe([Node::tap(effect)])
    }

    pub fn tap_async<F, Fut>(&self, effect: F) -> Self
    where
        F: Fn(&A::Item) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.pipe([Node::tap_async(effect)])
    }

    pub fn when<P, I>(&self, predicate: P, when_true: I) -> Self
    where
        P: Fn(&A::Item) -> bool + Send + Sync + 'static,
        I: IntoIterator<Item = Node<A::Item>>,
    {
        self.pipe([Node::when(predicate, when_true)])
    }

    pub fn unless<P, I>(&self, predicate: P, when_false: I) -> Self
    where
        P: Fn(&A::Item) -> bool + Send + Sync + 'static,
        I: IntoIterator<Item = Node<A::Item>>,
    {
        self.pipe([Node::unless(predicate, when_false)])
    }

    pub fn if_else<P, I, J>(&self, predicate: P, when_true: I, when_false: J) -> Self
    where
        P: Fn(&A::Item) -> bool + Send + Sync + 'static,
        I: IntoIterator<Item = Node<A::Item>>,
        J: IntoIterator<Item = Node<A::Item>>,
    {
        self.pipe([Node::if_else(predicate, when_true, when_false)])
    }

    pub fn pipe<I>(&self, nodes: I) -> Self
    where
        I: IntoIterator<Item = Node<A::Item>>,
    {
        self.with_tree(self.tree.extend(nodes))
    }

    pub fn undo(&self, steps: usize) -> Self {
        self.with_tree(self.tree.undo(steps))
    }

    pub fn redo(&self, steps: usize) -> Self {
        self.with_tree(self.tree.redo(steps))
    }

    /// Layer options over the store defaults for this mutation only.
    pub fn with_options(&self, options: Options<A>) -> Self {
        Mutation {
            options: self.options.clone().merge(options),
            ..self.clone()
        }
    }

    /// Stream the resulting values. Nothing runs until the stream is polled,
    /// and dropping it stops further adapter calls.
    pub fn iterate(&self, options: Options<A>) -> BoxStream<'static, Result<A::Item>> {
        let resolved = self.options.clone().merge(options).resolve(
            self.adapter.name(),
            self.source.intent(),
            self.source.argument(),
            M::MULTIPLE,
        );
        let ctx = match resolved {
            Ok(ctx) => Arc::new(ctx),
            Err(err) => return futures::stream::iter([Err(err)]).boxed(),
        };
        debug!(
            adapter = %ctx.adapter,
            intent = %ctx.intent,
            argument = %ctx.argument,
            commit_mode = ?ctx.commit_mode,
            "iterate"
        );

        let nodes: Arc<[Node<A::Item>]> = self
            .tree
            .nodes()
            .iter()
            .chain(ctx.mutators.iter())
            .cloned()
            .collect();

        let entities = source::open(self.source.clone(), self.adapter.clone(), ctx.clone());
        let mutated = {
            let adapter = self.adapter.clone();
            let ctx = ctx.clone();
            entities
                .and_then(move |entity| {
                    mutate(entity, nodes.clone(), adapter.clone(), ctx.clone())
                })
                .try_filter_map(future::ok)
                .boxed()
        };

        write::settle(mutated, self.adapter.clone(), ctx)
            .map_ok(Entity::into_value)
            .boxed()
    }

    pub async fn unwrap(&self, options: Options<A>) -> Result<M::Output<A::Item>> {
        let items: Vec<A::Item> = self.iterate(options).try_collect().await?;
        Ok(M::collect(items))
    }

    /// Drive the pipeline to the end, returning how many entities came out.
    pub async fn consume(&self, options: Options<A>) -> Result<usize> {
        self.iterate(options)
            .try_fold(0, |count, _| future::ok(count + 1))
            .await
    }
}

impl<A, M> Mutation<A, M>
where
    A: Adapter<Item = Value>,
    M: Multiplicity,
{
    pub fn assign(&self, partial: Value) -> Self {
        self.pipe([Node::assign(partial)])
    }
}

async fn mutate<A: Adapter>(
    entity: Entity<A::Item>,
    nodes: Arc<[Node<A::Item>]>,
    adapter: Arc<A>,
    ctx: Arc<Context<A>>,
) -> Result<Option<Entity<A::Item>>> {
    fire_entity(&ctx.hooks.on_entity, &entity, ctx.as_ref()).await?;
    evaluate(entity, &nodes, adapter.as_ref(), ctx.as_ref()).await
}
