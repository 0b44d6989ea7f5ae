use std::collections::VecDeque;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::debug;

use super::{pending_operation, EntityStream};
use crate::adapter::{dispatch, Adapter, Operation};
use crate::entity::Entity;
use crate::error::Result;
use crate::hooks::fire_entity;
use crate::options::Context;
use crate::record::Record;

/// Meta key remembering which hook set applies to an entity between the
/// prepare and flush phases.
pub(crate) const OPERATION_META: &str = "mutent:operation";

struct BulkWriter<A: Adapter> {
    input: EntityStream<A::Item>,
    adapter: Arc<A>,
    ctx: Arc<Context<A>>,
    queue: Vec<Entity<A::Item>>,
    writes: usize,
    ready: VecDeque<Entity<A::Item>>,
    done: bool,
}

/// Queue entities and write them with one `bulk` call per batch.
///
/// A batch is flushed when `write_size` write-needing entities are queued,
/// as soon as an entity with nothing to write is queued (so finished entities
/// are never held behind a growing batch), and at the end of the input.
/// Output order always matches input order.
pub(crate) fn bulk<A: Adapter>(
    entities: EntityStream<A::Item>,
    adapter: Arc<A>,
    ctx: Arc<Context<A>>,
) -> EntityStream<A::Item> {
    let writer = BulkWriter {
        input: entities,
        adapter,
        ctx,
        queue: Vec::new(),
        writes: 0,
        ready: VecDeque::new(),
        done: false,
    };

    stream::unfold(writer, |mut writer| async move {
        loop {
            if let Some(entity) = writer.ready.pop_front() {
                return Some((Ok(entity), writer));
            }
            if writer.done {
                return None;
            }

            let should_flush = match writer.input.next().await {
                Some(Ok(entity)) => writer.enqueue(entity),
                Some(Err(err)) => {
                    writer.done = true;
                    return Some((Err(err), writer));
                }
                None => {
                    writer.done = true;
                    !writer.queue.is_empty()
                }
            };

            if should_flush {
                if let Err(err) = writer.flush().await {
                    writer.done = true;
                    writer.queue.clear();
                    return Some((Err(err), writer));
                }
            }
        }
    })
    .boxed()
}

impl<A: Adapter> BulkWriter<A> {
    /// Queue an entity, returning whether the queue must be flushed now.
    fn enqueue(&mut self, entity: Entity<A::Item>) -> bool {
        let writes = entity.should_write();
        self.queue.push(entity);
        if writes {
            self.writes += 1;
            self.writes >= self.ctx.write_size
        } else {
            true
        }
    }

    async fn flush(&mut self) -> Result<()> {
        let adapter = self.adapter.as_ref();
        let ctx = self.ctx.as_ref();
        let mut queue = std::mem::take(&mut self.queue);
        self.writes = 0;

        let mut slots = Vec::new();
        for (index, entity) in queue.iter_mut().enumerate() {
            if let Some(operation) = pending_operation(entity) {
                entity
                    .meta_mut()
                    .insert(OPERATION_META.into(), Value::from(operation.as_str()));
                slots.push((index, operation));
            }
        }
        debug!(
            adapter = %ctx.adapter,
            queued = queue.len(),
            writes = slots.len(),
            "bulk flush"
        );

        for entity in &queue {
            if let Some(operation) = recorded_operation(entity) {
                fire_entity(ctx.hooks.before(operation), entity, ctx).await?;
            }
        }

        match slots.as_slice() {
            [] => {}
            [(index, operation)] if dispatch::supports(adapter, *operation) => {
                dispatch::write(adapter, &mut queue[*index], *operation, ctx).await?;
            }
            _ => queue = write_batch(adapter, queue, &slots, ctx).await?,
        }

        for entity in queue {
            let mut entity = entity.commit();
            if let Some(operation) = recorded_operation(&entity) {
                fire_entity(ctx.hooks.after(operation), &entity, ctx).await?;
                entity.meta_mut().remove(OPERATION_META);
            }
            self.ready.push_back(entity);
        }
        Ok(())
    }
}

/// Pull the write-needing entities out of the queue, hand them to the
/// adapter as one batch, and put them back in place.
async fn write_batch<A: Adapter>(
    adapter: &A,
    queue: Vec<Entity<A::Item>>,
    slots: &[(usize, Operation)],
    ctx: &Context<A>,
) -> Result<Vec<Entity<A::Item>>> {
    let mut cells: Vec<Option<Entity<A::Item>>> = queue.into_iter().map(Some).collect();
    let mut batch: Vec<Entity<A::Item>> = slots
        .iter()
        .filter_map(|(index, _)| cells[*index].take())
        .collect();
    dispatch::bulk(adapter, &mut batch, ctx).await?;
    for ((index, _), entity) in slots.iter().zip(batch) {
        cells[*index] = Some(entity);
    }
    Ok(cells.into_iter().flatten().collect())
}

fn recorded_operation<T: Record>(entity: &Entity<T>) -> Option<Operation> {
    entity
        .meta()
        .get(OPERATION_META)
        .and_then(Value::as_str)
        .and_then(Operation::parse)
}
