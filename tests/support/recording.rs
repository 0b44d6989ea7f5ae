//! Test adapter that records every call it receives.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use mutent_rust::{Adapter, BulkAction, Context, Entity, EntityAdapter, Operation, Result};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Find,
    Filter,
    Create(Value),
    Update(Value, Value),
    Delete(Value),
    Bulk(Vec<Operation>),
    CreateEntity(Value),
}

#[derive(Default)]
struct State {
    items: Mutex<Vec<Value>>,
    calls: Mutex<Vec<Call>>,
    in_flight: AtomicUsize,
    write_starts: Mutex<Vec<usize>>,
    finished: Mutex<Vec<Value>>,
}

/// Items are JSON objects with a numeric `id`. A query of `Some(id)` matches
/// that id, `None` matches everything.
#[derive(Clone)]
pub struct RecordingAdapter {
    operations: Vec<Operation>,
    create_returns: Option<Value>,
    bulk_returns: Option<Vec<Option<Value>>>,
    delay: Option<Duration>,
    delay_by_id: Option<fn(i64) -> u64>,
    stamper: Option<Stamper>,
    state: Arc<State>,
}

impl RecordingAdapter {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items(items: Vec<Value>) -> Self {
        let state = State {
            items: Mutex::new(items),
            ..State::default()
        };
        RecordingAdapter {
            operations: Operation::ALL.to_vec(),
            create_returns: None,
            bulk_returns: None,
            delay: None,
            delay_by_id: None,
            stamper: None,
            state: Arc::new(state),
        }
    }

    pub fn seeded(count: i64) -> Self {
        Self::with_items((1..=count).map(|id| json!({ "id": id })).collect())
    }

    pub fn with_operations<I: IntoIterator<Item = Operation>>(mut self, operations: I) -> Self {
        self.operations = operations.into_iter().collect();
        self
    }

    pub fn without(mut self, operation: Operation) -> Self {
        self.operations.retain(|op| *op != operation);
        self
    }

    pub fn create_returns(mut self, value: Value) -> Self {
        self.create_returns = Some(value);
        self
    }

    pub fn bulk_returns(mut self, results: Vec<Option<Value>>) -> Self {
        self.bulk_returns = Some(results);
        self
    }

    pub fn with_delay(mut self, millis: u64) -> Self {
        self.delay = Some(Duration::from_millis(millis));
        self
    }

    /// Delay each single write by a duration in millis derived from its id.
    pub fn with_delay_by_id(mut self, delay: fn(i64) -> u64) -> Self {
        self.delay_by_id = Some(delay);
        self
    }

    /// Expose an entity-aware `create` that stamps the entity.
    pub fn entity_aware(mut self) -> Self {
        self.stamper = Some(Stamper {
            state: self.state.clone(),
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn items(&self) -> Vec<Value> {
        self.state.items.lock().unwrap().clone()
    }

    /// Ids of single writes in the order they completed.
    pub fn finished(&self) -> Vec<Value> {
        self.state.finished.lock().unwrap().clone()
    }

    /// In-flight write count observed as each write started.
    pub fn write_starts(&self) -> Vec<usize> {
        self.state.write_starts.lock().unwrap().clone()
    }

    fn push(&self, call: Call) {
        self.state.calls.lock().unwrap().push(call);
    }

    fn matching(&self, query: &Option<i64>) -> Vec<Value> {
        self.items()
            .into_iter()
            .filter(|item| query.map_or(true, |id| item["id"] == id))
            .collect()
    }

    async fn track<T>(&self, data: Option<&Value>, work: impl FnOnce() -> T) -> T {
        let started = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.write_starts.lock().unwrap().push(started);
        let by_id = self.delay_by_id.zip(data.and_then(|data| data["id"].as_i64()));
        let delay = match by_id {
            Some((delay, id)) => Some(Duration::from_millis(delay(id))),
            None => self.delay,
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let result = work();
        if let Some(data) = data {
            self.state.finished.lock().unwrap().push(data["id"].clone());
        }
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn apply(&self, action: &BulkAction<Value>) {
        let mut items = self.state.items.lock().unwrap();
        match action {
            BulkAction::Create { data } => items.push(data.clone()),
            BulkAction::Update { old_data, new_data } => {
                if let Some(slot) = items.iter_mut().find(|item| *item == old_data) {
                    *slot = new_data.clone();
                }
            }
            BulkAction::Delete { data } => items.retain(|item| item != data),
        }
    }
}

#[async_trait]
impl Adapter for RecordingAdapter {
    type Item = Value;
    type Query = Option<i64>;

    fn name(&self) -> &str {
        "recording"
    }

    fn supports(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }

    fn entities(&self) -> Option<&dyn EntityAdapter<Self>> {
        self.stamper.as_ref().map(|s| s as &dyn EntityAdapter<Self>)
    }

    async fn find(&self, query: &Option<i64>, _ctx: &Context<Self>) -> Result<Option<Value>> {
        self.push(Call::Find);
        Ok(self.matching(query).into_iter().next())
    }

    fn filter(&self, query: &Option<i64>, _ctx: &Context<Self>) -> BoxStream<'static, Result<Value>> {
        self.push(Call::Filter);
        stream::iter(self.matching(query).into_iter().map(Ok)).boxed()
    }

    async fn create(&self, data: Value, _ctx: &Context<Self>) -> Result<Option<Value>> {
        self.push(Call::Create(data.clone()));
        let stored = self.create_returns.clone().unwrap_or_else(|| data.clone());
        self.track(Some(&data), || self.apply(&BulkAction::Create { data: stored }))
            .await;
        Ok(self.create_returns.clone())
    }

    async fn update(&self, old_data: Value, new_data: Value, _ctx: &Context<Self>) -> Result<Option<Value>> {
        self.push(Call::Update(old_data.clone(), new_data.clone()));
        let id = new_data.clone();
        self.track(Some(&id), || self.apply(&BulkAction::Update { old_data, new_data }))
            .await;
        Ok(None)
    }

    async fn delete(&self, data: Value, _ctx: &Context<Self>) -> Result<()> {
        self.push(Call::Delete(data.clone()));
        let id = data.clone();
        self.track(Some(&id), || self.apply(&BulkAction::Delete { data })).await;
        Ok(())
    }

    async fn bulk(
        &self,
        actions: Vec<BulkAction<Value>>,
        _ctx: &Context<Self>,
    ) -> Result<Option<Vec<Option<Value>>>> {
        self.push(Call::Bulk(actions.iter().map(BulkAction::operation).collect()));
        self.track(None, || actions.iter().for_each(|action| self.apply(action)))
            .await;
        Ok(self.bulk_returns.clone())
    }
}

/// Entity-aware `create` that marks the entity instead of returning a value.
#[derive(Clone)]
pub struct Stamper {
    state: Arc<State>,
}

#[async_trait]
impl EntityAdapter<RecordingAdapter> for Stamper {
    fn supports(&self, operation: Operation) -> bool {
        operation == Operation::Create
    }

    async fn create_entity(
        &self,
        entity: &mut Entity<Value>,
        _ctx: &Context<RecordingAdapter>,
    ) -> Result<()> {
        let mut stamped = entity.value().clone();
        stamped["stamped"] = json!(true);
        self.state
            .calls
            .lock()
            .unwrap()
            .push(Call::CreateEntity(entity.value().clone()));
        self.state.items.lock().unwrap().push(stamped.clone());
        entity.set(stamped);
        Ok(())
    }
}
