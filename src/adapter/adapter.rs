use std::fmt::Debug;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

use super::{BulkAction, EntityAdapter, Operation};
use crate::error::Result;
use crate::options::Context;
use crate::record::Record;

/// Storage backend contract.
///
/// Every operation is optional. An adapter declares what it implements
/// through [`Adapter::supports`]; the engine raises
/// `MutentError::PartialAdapter` when a pipeline needs a missing capability.
/// The default method bodies raise the same error.
///
/// Adapters that want to work on live entities instead of raw values expose
/// an [`EntityAdapter`] through [`Adapter::entities`]. Every operation that
/// interface supports takes precedence over the plain method.
#[async_trait]
pub trait Adapter: Sized + Send + Sync + 'static {
    type Item: Record;
    type Query: Debug + Send + Sync + 'static;

    fn name(&self) -> &str;

    fn supports(&self, operation: Operation) -> bool;

    fn entities(&self) -> Option<&dyn EntityAdapter<Self>> {
        None
    }

    async fn find(&self, query: &Self::Query, ctx: &Context<Self>) -> Result<Option<Self::Item>> {
        let _ = query;
        Err(ctx.unsupported(Operation::Find))
    }

    fn filter(
        &self,
        query: &Self::Query,
        ctx: &Context<Self>,
    ) -> BoxStream<'static, Result<Self::Item>> {
        let _ = query;
        stream::iter([Err(ctx.unsupported(Operation::Filter))]).boxed()
    }

    /// A `Some` return replaces the entity's target.
    async fn create(&self, data: Self::Item, ctx: &Context<Self>) -> Result<Option<Self::Item>> {
        let _ = data;
        Err(ctx.unsupported(Operation::Create))
    }

    /// A `Some` return replaces the entity's target.
    async fn update(
        &self,
        old_data: Self::Item,
        new_data: Self::Item,
        ctx: &Context<Self>,
    ) -> Result<Option<Self::Item>> {
        let _ = (old_data, new_data);
        Err(ctx.unsupported(Operation::Update))
    }

    async fn delete(&self, data: Self::Item, ctx: &Context<Self>) -> Result<()> {
        let _ = data;
        Err(ctx.unsupported(Operation::Delete))
    }

    /// Apply many writes at once. A returned list must match `actions`
    /// position by position.
    async fn bulk(
        &self,
        actions: Vec<BulkAction<Self::Item>>,
        ctx: &Context<Self>,
    ) -> Result<Option<Vec<Option<Self::Item>>>> {
        let _ = actions;
        Err(ctx.unsupported(Operation::Bulk))
    }
}
