//! Capability resolution: picks the entity-aware method when the adapter
//! exposes one, falls back to the plain method, and fails loudly otherwise.

use futures::stream::{BoxStream, TryStreamExt};
use tracing::trace;

use super::{Adapter, BulkAction, Operation};
use crate::entity::Entity;
use crate::error::{MutentError, Result};
use crate::options::Context;
use crate::record::Record;

pub(crate) fn supports<A: Adapter>(adapter: &A, operation: Operation) -> bool {
    adapter.supports(operation)
        || adapter
            .entities()
            .map(|entities| entities.supports(operation))
            .unwrap_or(false)
}

/// Read at most one item. Without `find`, the adapter's `filter` is used and
/// more than one match is an overflow.
pub(crate) async fn find<A: Adapter>(
    adapter: &A,
    query: &A::Query,
    ctx: &Context<A>,
) -> Result<Option<A::Item>> {
    trace!(adapter = %ctx.adapter, ?query, "find");
    if let Some(entities) = adapter.entities().filter(|e| e.supports(Operation::Find)) {
        return entities.find_entity(query, ctx).await;
    }
    if adapter.supports(Operation::Find) {
        return adapter.find(query, ctx).await;
    }
    if supports(adapter, Operation::Filter) {
        let mut matches = filter(adapter, query, ctx)?;
        let first = matches.try_next().await?;
        if first.is_some() && matches.try_next().await?.is_some() {
            return Err(MutentError::MutationOverflow {
                adapter: ctx.adapter.clone(),
                intent: ctx.intent,
                argument: ctx.argument.clone(),
            });
        }
        return Ok(first);
    }
    Err(ctx.unsupported(Operation::Find))
}

pub(crate) fn filter<A: Adapter>(
    adapter: &A,
    query: &A::Query,
    ctx: &Context<A>,
) -> Result<BoxStream<'static, Result<A::Item>>> {
    trace!(adapter = %ctx.adapter, ?query, "filter");
    if let Some(entities) = adapter.entities().filter(|e| e.supports(Operation::Filter)) {
        return Ok(entities.filter_entities(query, ctx));
    }
    if adapter.supports(Operation::Filter) {
        return Ok(adapter.filter(query, ctx));
    }
    Err(ctx.unsupported(Operation::Filter))
}

/// Run the adapter call an entity is waiting for. Hooks and the commit are
/// the caller's business.
pub(crate) async fn write<A: Adapter>(
    adapter: &A,
    entity: &mut Entity<A::Item>,
    operation: Operation,
    ctx: &Context<A>,
) -> Result<()> {
    trace!(adapter = %ctx.adapter, %operation, "write");
    if let Some(entities) = adapter.entities().filter(|e| e.supports(operation)) {
        return match operation {
            Operation::Create => entities.create_entity(entity, ctx).await,
            Operation::Update => entities.update_entity(entity, ctx).await,
            Operation::Delete => entities.delete_entity(entity, ctx).await,
            other => Err(ctx.unsupported(other)),
        };
    }
    if !adapter.supports(operation) {
        return Err(ctx.unsupported(operation));
    }

    let status = entity.status();
    match (operation, status.source.clone()) {
        (Operation::Create, _) => {
            let returned = adapter.create(status.target.clone(), ctx).await?;
            fold(entity, returned);
        }
        (Operation::Update, Some(old_data)) => {
            let returned = adapter
                .update(old_data, status.target.clone(), ctx)
                .await?;
            fold(entity, returned);
        }
        (Operation::Delete, Some(data)) => adapter.delete(data, ctx).await?,
        (other, _) => return Err(ctx.unsupported(other)),
    }
    Ok(())
}

/// Write a batch of entities with a single bulk call.
pub(crate) async fn bulk<A: Adapter>(
    adapter: &A,
    batch: &mut [Entity<A::Item>],
    ctx: &Context<A>,
) -> Result<()> {
    trace!(adapter = %ctx.adapter, size = batch.len(), "bulk");
    if let Some(entities) = adapter.entities().filter(|e| e.supports(Operation::Bulk)) {
        return entities.bulk_entities(batch, ctx).await;
    }
    if !adapter.supports(Operation::Bulk) {
        return Err(ctx.unsupported(Operation::Bulk));
    }

    let actions: Vec<BulkAction<A::Item>> =
        batch.iter().filter_map(BulkAction::from_entity).collect();
    let operations: Vec<Operation> = actions.iter().map(BulkAction::operation).collect();
    let expected = actions.len();

    let Some(results) = adapter.bulk(actions, ctx).await? else {
        return Ok(());
    };
    if results.len() != expected {
        return Err(MutentError::InvalidBulkWrite {
            adapter: ctx.adapter.clone(),
            expected,
            actual: results.len(),
        });
    }

    for ((entity, operation), returned) in batch.iter_mut().zip(operations).zip(results) {
        if operation != Operation::Delete {
            fold(entity, returned);
        }
    }
    Ok(())
}

fn fold<T: Record>(entity: &mut Entity<T>, returned: Option<T>) {
    if let Some(value) = returned.filter(|value| !value.is_nil()) {
        entity.set(value);
    }
}
