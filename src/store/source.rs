use std::sync::Arc;

use futures::future;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use crate::adapter::{dispatch, Adapter};
use crate::entity::Entity;
use crate::error::{MutentError, Result};
use crate::hooks::fire_query;
use crate::intent::Intent;
use crate::options::Context;
use crate::record::Record;
use crate::write::EntityStream;

/// Where a mutation's entities come from.
pub(crate) enum Source<A: Adapter> {
    Create(Vec<A::Item>),
    Find(A::Query),
    Read(A::Query),
    Filter(A::Query),
    From(Vec<A::Item>),
}

impl<A: Adapter> Source<A> {
    pub(crate) fn intent(&self) -> Intent {
        match self {
            Source::Create(_) => Intent::Create,
            Source::Find(_) => Intent::Find,
            Source::Read(_) => Intent::Read,
            Source::Filter(_) => Intent::Filter,
            Source::From(_) => Intent::From,
        }
    }

    pub(crate) fn argument(&self) -> String {
        match self {
            Source::Create(data) | Source::From(data) => match data.as_slice() {
                [single] => format!("{single:?}"),
                many => format!("{many:?}"),
            },
            Source::Find(query) | Source::Read(query) | Source::Filter(query) => {
                format!("{query:?}")
            }
        }
    }
}

/// Wrap the source into entities: created for new data, committed for data
/// that comes from storage.
pub(crate) fn open<A: Adapter>(
    source: Arc<Source<A>>,
    adapter: Arc<A>,
    ctx: Arc<Context<A>>,
) -> EntityStream<A::Item> {
    match source.intent() {
        Intent::Create | Intent::From => supplied(source.as_ref(), ctx.as_ref()),
        Intent::Find | Intent::Read => read_one(source, adapter, ctx),
        Intent::Filter => read_many(source, adapter, ctx),
    }
}

fn supplied<A: Adapter>(source: &Source<A>, ctx: &Context<A>) -> EntityStream<A::Item> {
    match source {
        Source::Create(data) => stream::iter(data.clone().into_iter().map(Entity::create)).boxed(),
        Source::From(data) => {
            let data: Vec<A::Item> = data.iter().filter(|item| !item.is_nil()).cloned().collect();
            if data.is_empty() && !ctx.multiple {
                return stream::iter([Err(MutentError::EntityRequired {
                    adapter: ctx.adapter.clone(),
                    intent: ctx.intent,
                    argument: ctx.argument.clone(),
                })])
                .boxed();
            }
            stream::iter(data.into_iter().map(|item| Ok(Entity::read(item)))).boxed()
        }
        _ => stream::empty().boxed(),
    }
}

fn read_one<A: Adapter>(
    source: Arc<Source<A>>,
    adapter: Arc<A>,
    ctx: Arc<Context<A>>,
) -> EntityStream<A::Item> {
    stream::once(find_one(source, adapter, ctx))
        .try_filter_map(future::ok)
        .boxed()
}

fn read_many<A: Adapter>(
    source: Arc<Source<A>>,
    adapter: Arc<A>,
    ctx: Arc<Context<A>>,
) -> EntityStream<A::Item> {
    stream::once(filter_all(source, adapter, ctx))
        .try_flatten()
        .map_ok(Entity::read)
        .boxed()
}

async fn find_one<A: Adapter>(
    source: Arc<Source<A>>,
    adapter: Arc<A>,
    ctx: Arc<Context<A>>,
) -> Result<Option<Entity<A::Item>>> {
    let query = match source.as_ref() {
        Source::Find(query) | Source::Read(query) => query,
        _ => return Ok(None),
    };
    fire_query(&ctx.hooks.on_find, query, ctx.as_ref()).await?;
    match dispatch::find(adapter.as_ref(), query, ctx.as_ref()).await? {
        Some(item) => Ok(Some(Entity::read(item))),
        None if ctx.intent == Intent::Read => Err(MutentError::EntityRequired {
            adapter: ctx.adapter.clone(),
            intent: ctx.intent,
            argument: ctx.argument.clone(),
        }),
        None => Ok(None),
    }
}

async fn filter_all<A: Adapter>(
    source: Arc<Source<A>>,
    adapter: Arc<A>,
    ctx: Arc<Context<A>>,
) -> Result<BoxStream<'static, Result<A::Item>>> {
    let Source::Filter(query) = source.as_ref() else {
        return Ok(stream::empty().boxed());
    };
    fire_query(&ctx.hooks.on_filter, query, ctx.as_ref()).await?;
    dispatch::filter(adapter.as_ref(), query, ctx.as_ref())
}
