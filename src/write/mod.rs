mod bulk;
mod concurrent;
mod sequential;
mod single;

use std::sync::Arc;

use futures::future;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use tracing::debug;

use crate::adapter::{dispatch, Adapter, Operation};
use crate::entity::Entity;
use crate::error::{MutentError, Result};
use crate::options::{CommitMode, Context, WriteMode};

pub(crate) use single::{pending_operation, write_entity};

pub(crate) type EntityStream<T> = BoxStream<'static, Result<Entity<T>>>;

/// Resolve `Auto` into a concrete strategy.
pub(crate) fn select<A: Adapter>(adapter: &A, ctx: &Context<A>) -> WriteMode {
    match ctx.write_mode {
        WriteMode::Auto if ctx.multiple && dispatch::supports(adapter, Operation::Bulk) => {
            WriteMode::Bulk
        }
        WriteMode::Auto => WriteMode::Sequential,
        explicit => explicit,
    }
}

/// Feed entities through the selected write strategy.
pub(crate) fn write<A: Adapter>(
    entities: EntityStream<A::Item>,
    adapter: Arc<A>,
    ctx: Arc<Context<A>>,
) -> EntityStream<A::Item> {
    let mode = select(adapter.as_ref(), ctx.as_ref());
    debug!(adapter = %ctx.adapter, intent = %ctx.intent, ?mode, "write strategy");
    match mode {
        WriteMode::Bulk if !dispatch::supports(adapter.as_ref(), Operation::Bulk) => {
            reject_writes(entities, ctx, Operation::Bulk)
        }
        WriteMode::Bulk => bulk::bulk(entities, adapter, ctx),
        WriteMode::Concurrent => concurrent::concurrent(entities, adapter, ctx),
        WriteMode::Sequential | WriteMode::Auto => sequential::sequential(entities, adapter, ctx),
    }
}

/// Fail on the first entity that needs a write the adapter cannot perform.
/// Entities with nothing to write still pass through committed.
fn reject_writes<A: Adapter>(
    entities: EntityStream<A::Item>,
    ctx: Arc<Context<A>>,
    operation: Operation,
) -> EntityStream<A::Item> {
    entities
        .and_then(move |entity| {
            let result = if entity.should_write() {
                Err(ctx.unsupported(operation))
            } else {
                Ok(entity.commit())
            };
            future::ready(result)
        })
        .boxed()
}

/// Apply the commit mode to entities leaving the mutation tree.
pub(crate) fn settle<A: Adapter>(
    entities: EntityStream<A::Item>,
    adapter: Arc<A>,
    ctx: Arc<Context<A>>,
) -> EntityStream<A::Item> {
    match ctx.commit_mode {
        CommitMode::Auto => write(entities, adapter, ctx),
        CommitMode::Manual => entities,
        CommitMode::Safe => entities
            .and_then(move |entity| {
                let result = if entity.should_commit() {
                    Err(MutentError::UnsafeUnwrite {
                        adapter: ctx.adapter.clone(),
                        intent: ctx.intent,
                        argument: ctx.argument.clone(),
                        entity: format!("{:?}", entity.value()),
                    })
                } else {
                    Ok(entity)
                };
                future::ready(result)
            })
            .boxed(),
    }
}
