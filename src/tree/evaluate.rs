use futures::future::{BoxFuture, FutureExt};

use super::Node;
use crate::adapter::Adapter;
use crate::entity::Entity;
use crate::error::Result;
use crate::options::Context;
use crate::write::write_entity;

/// Interpret `nodes` left to right against one entity.
///
/// Returns `None` when a filter node drops the entity.
pub(crate) fn evaluate<'a, A: Adapter>(
    entity: Entity<A::Item>,
    nodes: &'a [Node<A::Item>],
    adapter: &'a A,
    ctx: &'a Context<A>,
) -> BoxFuture<'a, Result<Option<Entity<A::Item>>>> {
    async move {
        let mut entity = entity;
        for node in nodes {
            entity = match node {
                Node::Update(mapper) => {
                    let next = mapper(entity.value().clone()).await?;
                    entity.update(next)?
                }
                Node::Delete => entity.delete(),
                Node::Commit if entity.should_commit() => write_entity(entity, adapter, ctx).await?,
                Node::Commit => entity.commit(),
                Node::Condition {
                    predicate,
                    when_true,
                    when_false,
                } => {
                    let branch = if predicate(entity.value()) {
                        when_true
                    } else {
                        when_false
                    };
                    match evaluate(entity, branch, adapter, ctx).await? {
                        Some(entity) => entity,
                        None => return Ok(None),
                    }
                }
                Node::Filter(predicate) => {
                    if !predicate(entity.value()) {
                        return Ok(None);
                    }
                    entity
                }
                Node::Tap(effect) => {
                    effect(entity.value()).await?;
                    entity
                }
            };
        }
        Ok(Some(entity))
    }
    .boxed()
}
