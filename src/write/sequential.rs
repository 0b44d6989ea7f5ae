use std::sync::Arc;

use futures::stream::{StreamExt, TryStreamExt};

use super::{write_entity, EntityStream};
use crate::adapter::Adapter;
use crate::options::Context;

/// One entity at a time, in input order.
pub(crate) fn sequential<A: Adapter>(
    entities: EntityStream<A::Item>,
    adapter: Arc<A>,
    ctx: Arc<Context<A>>,
) -> EntityStream<A::Item> {
    entities
        .and_then(move |entity| {
            let adapter = adapter.clone();
            let ctx = ctx.clone();
            async move { write_entity(entity, adapter.as_ref(), ctx.as_ref()).await }
        })
        .boxed()
}
