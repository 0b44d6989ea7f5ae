use std::fmt::Debug;

/// Types that can flow through a mutation pipeline.
///
/// `is_nil` marks values that stand for "nothing" (JSON `null`, `None`).
/// Statuses refuse nil targets, so a mapper that produces one fails with
/// `MutentError::NilEntity` instead of silently persisting it.
pub trait Record: Clone + Debug + Send + Sync + 'static {
    fn is_nil(&self) -> bool {
        false
    }
}

impl Record for serde_json::Value {
    fn is_nil(&self) -> bool {
        self.is_null()
    }
}

impl<T: Record> Record for Option<T> {
    fn is_nil(&self) -> bool {
        self.is_none()
    }
}

impl Record for String {}
impl Record for i64 {}
impl Record for u64 {}
