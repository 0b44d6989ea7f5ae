use std::sync::Arc;

use futures::future::try_join_all;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use super::{write_entity, EntityStream};
use crate::adapter::Adapter;
use crate::options::Context;

/// Fixed windows of `write_size` entities. Each window is written as one
/// parallel group and fully settled before the next one is pulled; results
/// keep input order.
pub(crate) fn concurrent<A: Adapter>(
    entities: EntityStream<A::Item>,
    adapter: Arc<A>,
    ctx: Arc<Context<A>>,
) -> EntityStream<A::Item> {
    let window = ctx.write_size;
    entities
        .try_chunks(window)
        .map_err(|err| err.1)
        .and_then(move |chunk| {
            let adapter = adapter.clone();
            let ctx = ctx.clone();
            async move {
                debug!(adapter = %ctx.adapter, size = chunk.len(), "concurrent window");
                let adapter = adapter.as_ref();
                let ctx = ctx.as_ref();
                try_join_all(
                    chunk
                        .into_iter()
                        .map(|entity| write_entity(entity, adapter, ctx)),
                )
                .await
            }
        })
        .map_ok(|written| stream::iter(written.into_iter().map(Ok)))
        .try_flatten()
        .boxed()
}
