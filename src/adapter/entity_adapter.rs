use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

use super::{Adapter, Operation};
use crate::entity::Entity;
use crate::error::Result;
use crate::options::Context;

/// Entity-aware counterpart of [`Adapter`].
///
/// Write methods receive the live entity and own every change to it: a
/// storage-assigned value is folded back with [`Entity::set`]. The engine
/// commits the entity afterwards.
#[async_trait]
pub trait EntityAdapter<A: Adapter>: Send + Sync {
    fn supports(&self, operation: Operation) -> bool;

    async fn find_entity(&self, query: &A::Query, ctx: &Context<A>) -> Result<Option<A::Item>> {
        let _ = query;
        Err(ctx.unsupported(Operation::Find))
    }

    fn filter_entities(
        &self,
        query: &A::Query,
        ctx: &Context<A>,
    ) -> BoxStream<'static, Result<A::Item>> {
        let _ = query;
        stream::iter([Err(ctx.unsupported(Operation::Filter))]).boxed()
    }

    async fn create_entity(&self, entity: &mut Entity<A::Item>, ctx: &Context<A>) -> Result<()> {
        let _ = entity;
        Err(ctx.unsupported(Operation::Create))
    }

    async fn update_entity(&self, entity: &mut Entity<A::Item>, ctx: &Context<A>) -> Result<()> {
        let _ = entity;
        Err(ctx.unsupported(Operation::Update))
    }

    async fn delete_entity(&self, entity: &mut Entity<A::Item>, ctx: &Context<A>) -> Result<()> {
        let _ = entity;
        Err(ctx.unsupported(Operation::Delete))
    }

    async fn bulk_entities(
        &self,
        entities: &mut [Entity<A::Item>],
        ctx: &Context<A>,
    ) -> Result<()> {
        let _ = entities;
        Err(ctx.unsupported(Operation::Bulk))
    }
}
