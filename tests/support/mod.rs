#![allow(dead_code)]

pub mod recording;

use std::sync::{Arc, Mutex};

use futures::future::{self, Ready};
use mutent_rust::{Context, Entity, Result};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use recording::RecordingAdapter;

pub type Log = Arc<Mutex<Vec<String>>>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Entity hook that appends `label:<id>` to the log.
pub fn record(
    log: &Log,
    label: &'static str,
) -> impl Fn(&Entity<Value>, &Context<RecordingAdapter>) -> Ready<Result<()>> + Send + Sync + 'static
{
    let log = log.clone();
    move |entity: &Entity<Value>, _ctx: &Context<RecordingAdapter>| {
        log.lock()
            .unwrap()
            .push(format!("{label}:{}", entity.value()["id"]));
        future::ready(Ok(()))
    }
}

/// Query hook that appends `label` to the log.
pub fn record_query(
    log: &Log,
    label: &'static str,
) -> impl Fn(&Option<i64>, &Context<RecordingAdapter>) -> Ready<Result<()>> + Send + Sync + 'static
{
    let log = log.clone();
    move |_query: &Option<i64>, _ctx: &Context<RecordingAdapter>| {
        log.lock().unwrap().push(label.to_string());
        future::ready(Ok(()))
    }
}
