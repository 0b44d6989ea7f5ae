//! MemoryAdapter - Vec-backed adapter for testing and development.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

use crate::adapter::{Adapter, BulkAction, Operation};
use crate::error::{MutentError, Result};
use crate::options::Context;
use crate::record::Record;

/// Selects stored items by predicate.
pub enum MemoryQuery<T> {
    All,
    Where(Arc<dyn Fn(&T) -> bool + Send + Sync>),
}

impl<T> MemoryQuery<T> {
    pub fn matching<P>(predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        MemoryQuery::Where(Arc::new(predicate))
    }

    fn matches(&self, item: &T) -> bool {
        match self {
            MemoryQuery::All => true,
            MemoryQuery::Where(predicate) => predicate(item),
        }
    }
}

impl<T> fmt::Debug for MemoryQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryQuery::All => f.write_str("All"),
            MemoryQuery::Where(_) => f.write_str("Where(..)"),
        }
    }
}

/// In-memory adapter storing items in insertion order.
///
/// Items are matched by equality for updates and deletes. Clone-friendly via
/// Arc: clones share storage, which lets tests inspect what a store wrote.
#[derive(Clone)]
pub struct MemoryAdapter<T> {
    name: String,
    items: Arc<RwLock<Vec<T>>>,
    operations: Vec<Operation>,
}

impl<T: Record + PartialEq> Default for MemoryAdapter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record + PartialEq> MemoryAdapter<T> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        MemoryAdapter {
            name: "memory".into(),
            items: Arc::new(RwLock::new(items.into_iter().collect())),
            operations: Operation::ALL.to_vec(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Restrict the advertised capabilities.
    pub fn with_operations<I>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.operations = operations.into_iter().collect();
        self
    }

    /// Snapshot of everything stored.
    pub fn items(&self) -> Result<Vec<T>> {
        Ok(self.read()?.clone())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<T>>> {
        self.items
            .read()
            .map_err(|_| MutentError::adapter(self.name.as_str(), "lock poisoned (read)"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>> {
        self.items
            .write()
            .map_err(|_| MutentError::adapter(self.name.as_str(), "lock poisoned (write)"))
    }

    fn replace(&self, items: &mut [T], old_data: &T, new_data: T) -> Result<()> {
        match items.iter_mut().find(|item| *item == old_data) {
            Some(slot) => {
                *slot = new_data;
                Ok(())
            }
            None => Err(MutentError::adapter(
                self.name.as_str(),
                format!("no stored item matches {old_data:?}"),
            )),
        }
    }
}

fn remove<T: PartialEq>(items: &mut Vec<T>, data: &T) {
    if let Some(index) = items.iter().position(|item| item == data) {
        items.remove(index);
    }
}

#[async_trait]
impl<T: Record + PartialEq> Adapter for MemoryAdapter<T> {
    type Item = T;
    type Query = MemoryQuery<T>;

    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }

    async fn find(&self, query: &MemoryQuery<T>, _ctx: &Context<Self>) -> Result<Option<T>> {
        Ok(self.read()?.iter().find(|item| query.matches(item)).cloned())
    }

    fn filter(&self, query: &MemoryQuery<T>, _ctx: &Context<Self>) -> BoxStream<'static, Result<T>> {
        let matches: Result<Vec<T>> = self.read().map(|items| {
            items
                .iter()
                .filter(|item| query.matches(item))
                .cloned()
                .collect()
        });
        match matches {
            Ok(matches) => stream::iter(matches.into_iter().map(Ok)).boxed(),
            Err(err) => stream::iter([Err(err)]).boxed(),
        }
    }

    async fn create(&self, data: T, _ctx: &Context<Self>) -> Result<Option<T>> {
        self.write()?.push(data);
        Ok(None)
    }

    async fn update(&self, old_data: T, new_data: T, _ctx: &Context<Self>) -> Result<Option<T>> {
        let mut items = self.write()?;
        self.replace(&mut items, &old_data, new_data)?;
        Ok(None)
    }

    async fn delete(&self, data: T, _ctx: &Context<Self>) -> Result<()> {
        let mut items = self.write()?;
        remove(&mut items, &data);
        Ok(())
    }

    async fn bulk(
        &self,
        actions: Vec<BulkAction<T>>,
        _ctx: &Context<Self>,
    ) -> Result<Option<Vec<Option<T>>>> {
        let mut items = self.write()?;
        for action in actions {
            match action {
                BulkAction::Create { data } => items.push(data),
                BulkAction::Update { old_data, new_data } => {
                    self.replace(&mut items, &old_data, new_data)?
                }
                BulkAction::Delete { data } => remove(&mut items, &data),
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::options::Options;
    use serde_json::{json, Value};

    fn seeded() -> MemoryAdapter<Value> {
        MemoryAdapter::with_items(vec![
            json!({ "id": 1, "tag": "a" }),
            json!({ "id": 2, "tag": "b" }),
            json!({ "id": 3, "tag": "a" }),
        ])
    }

    fn tagged(tag: &'static str) -> MemoryQuery<Value> {
        MemoryQuery::matching(move |item: &Value| item["tag"] == tag)
    }

    #[tokio::test]
    async fn create_then_read_back() {
        let adapter = MemoryAdapter::<Value>::new();
        let store = Store::new(adapter.clone());

        let created = store
            .create(json!({ "id": 7 }))
            .unwrap(Options::new())
            .await
            .unwrap();
        assert_eq!(created, Some(json!({ "id": 7 })));
        assert_eq!(adapter.items().unwrap(), vec![json!({ "id": 7 })]);
    }

    #[tokio::test]
    async fn filter_update_writes_in_bulk() {
        let adapter = seeded();
        let store = Store::new(adapter.clone());

        let updated = store
            .filter(tagged("a"))
            .assign(json!({ "seen": true }))
            .unwrap(Options::new())
            .await
            .unwrap();
        assert_eq!(updated.len(), 2);

        let items = adapter.items().unwrap();
        assert_eq!(items[0], json!({ "id": 1, "tag": "a", "seen": true }));
        assert_eq!(items[1], json!({ "id": 2, "tag": "b" }));
        assert_eq!(items[2], json!({ "id": 3, "tag": "a", "seen": true }));
    }

    #[tokio::test]
    async fn delete_removes_matches() {
        let adapter = seeded();
        let store = Store::new(adapter.clone());

        let removed = store
            .filter(tagged("a"))
            .delete()
            .consume(Options::new())
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(adapter.items().unwrap(), vec![json!({ "id": 2, "tag": "b" })]);
    }

    #[tokio::test]
    async fn update_of_missing_item_fails() {
        let adapter = MemoryAdapter::<Value>::new();
        let store = Store::new(adapter);

        let err = store
            .from(json!({ "id": 9 }))
            .assign(json!({ "x": 1 }))
            .unwrap(Options::new())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "EMUT_ADAPTER");
    }

    #[test]
    fn clone_shares_storage() {
        let adapter = MemoryAdapter::<Value>::new();
        let clone = adapter.clone();
        adapter.write().unwrap().push(json!(1));
        assert_eq!(clone.len().unwrap(), 1);
        assert!(!clone.is_empty().unwrap());
    }

    #[test]
    fn query_debug() {
        assert_eq!(format!("{:?}", MemoryQuery::<Value>::All), "All");
        assert_eq!(format!("{:?}", tagged("a")), "Where(..)");
    }
}
