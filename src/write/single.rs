use crate::adapter::{dispatch, Adapter, Operation};
use crate::entity::Entity;
use crate::error::Result;
use crate::hooks::fire_entity;
use crate::options::Context;
use crate::record::Record;

/// The adapter call an entity is waiting for, if any.
pub(crate) fn pending_operation<T: Record>(entity: &Entity<T>) -> Option<Operation> {
    if entity.should_create() {
        Some(Operation::Create)
    } else if entity.should_update() {
        Some(Operation::Update)
    } else if entity.should_delete() {
        Some(Operation::Delete)
    } else {
        None
    }
}

/// Reconcile one entity: before hooks, adapter call, commit, after hooks.
///
/// Entities with pending intent but nothing to write (created then deleted)
/// are only committed.
pub(crate) async fn write_entity<A: Adapter>(
    entity: Entity<A::Item>,
    adapter: &A,
    ctx: &Context<A>,
) -> Result<Entity<A::Item>> {
    let Some(operation) = pending_operation(&entity) else {
        return Ok(entity.commit());
    };

    let mut entity = entity;
    fire_entity(ctx.hooks.before(operation), &entity, ctx).await?;
    dispatch::write(adapter, &mut entity, operation, ctx).await?;
    let entity = entity.commit();
    fire_entity(ctx.hooks.after(operation), &entity, ctx).await?;
    Ok(entity)
}
