mod support;

use mutent_rust::{Operation, Options, Store, WriteMode};
use serde_json::{json, Value};
use support::recording::{Call, RecordingAdapter};

fn ids(range: std::ops::RangeInclusive<i64>) -> Vec<Value> {
    range.map(|id| json!({ "id": id })).collect()
}

fn bulk(size: usize) -> Options<RecordingAdapter> {
    Options::new().write_mode(WriteMode::Bulk).write_size(size)
}

async fn bulk_create(count: i64) -> Vec<Call> {
    let adapter = RecordingAdapter::new();
    let store = Store::new(adapter.clone());

    let created = store.create_many(ids(1..=count)).unwrap(bulk(4)).await.unwrap();
    assert_eq!(created, ids(1..=count));
    assert_eq!(adapter.items(), ids(1..=count));
    adapter.calls()
}

#[tokio::test]
async fn bulk_flushes_at_write_size_and_end() {
    support::init_tracing();
    use Operation::Create;

    assert_eq!(bulk_create(1).await, vec![Call::Create(json!({ "id": 1 }))]);
    assert_eq!(bulk_create(3).await, vec![Call::Bulk(vec![Create; 3])]);
    assert_eq!(bulk_create(4).await, vec![Call::Bulk(vec![Create; 4])]);
    assert_eq!(
        bulk_create(5).await,
        vec![Call::Bulk(vec![Create; 4]), Call::Create(json!({ "id": 5 }))]
    );
}

#[tokio::test]
async fn bulk_flushes_on_pass_through_entities() {
    let adapter = RecordingAdapter::seeded(6);
    let store = Store::new(adapter.clone());

    let result = store
        .from_many(ids(1..=6))
        .unless(
            |value: &Value| value["id"] == 1 || value["id"] == 4,
            [mutent_rust::Node::assign(json!({ "touched": true }))],
        )
        .unwrap(bulk(4))
        .await
        .unwrap();

    let touched = |id: i64| json!({ "id": id, "touched": true });
    let expected = vec![
        json!({ "id": 1 }),
        touched(2),
        touched(3),
        json!({ "id": 4 }),
        touched(5),
        touched(6),
    ];
    assert_eq!(result, expected);
    assert_eq!(adapter.items(), expected);
    assert_eq!(
        adapter.calls(),
        vec![
            Call::Bulk(vec![Operation::Update; 2]),
            Call::Bulk(vec![Operation::Update; 2]),
        ]
    );
}

#[tokio::test]
async fn bulk_results_replace_targets() {
    let adapter = RecordingAdapter::new().bulk_returns(vec![Some(json!({ "id": 1, "rev": 1 })), None]);
    let store = Store::new(adapter);

    let created = store.create_many(ids(1..=2)).unwrap(bulk(4)).await.unwrap();
    assert_eq!(created, vec![json!({ "id": 1, "rev": 1 }), json!({ "id": 2 })]);
}

#[tokio::test]
async fn short_bulk_result_is_rejected() {
    let adapter = RecordingAdapter::new().bulk_returns(vec![None]);
    let store = Store::new(adapter);

    let err = store.create_many(ids(1..=3)).unwrap(bulk(4)).await.unwrap_err();
    assert_eq!(err.code(), "EMUT_INVALID_BULK_WRITE");
    assert_eq!(
        err.info(),
        json!({ "adapter": "recording", "expected": 3, "actual": 1 })
    );
}

#[tokio::test]
async fn auto_mode_prefers_bulk_for_many() {
    let adapter = RecordingAdapter::new();
    let store = Store::new(adapter.clone());

    store.create_many(ids(1..=3)).consume(Options::new()).await.unwrap();
    assert_eq!(adapter.calls(), vec![Call::Bulk(vec![Operation::Create; 3])]);
}

#[tokio::test]
async fn auto_mode_without_bulk_is_sequential() {
    let adapter = RecordingAdapter::new().without(Operation::Bulk);
    let store = Store::new(adapter.clone());

    store.create_many(ids(1..=3)).consume(Options::new()).await.unwrap();
    assert_eq!(
        adapter.calls(),
        ids(1..=3).into_iter().map(Call::Create).collect::<Vec<_>>()
    );
    assert_eq!(adapter.write_starts(), vec![1, 1, 1]);
}

#[tokio::test]
async fn concurrent_windows_overlap_within_and_never_across() {
    let adapter = RecordingAdapter::new().with_delay(20);
    let store = Store::new(adapter.clone());
    let options = Options::new()
        .write_mode(WriteMode::Concurrent)
        .write_size(2);

    let created = store.create_many(ids(1..=5)).unwrap(options).await.unwrap();

    assert_eq!(created, ids(1..=5));
    assert_eq!(adapter.write_starts(), vec![1, 2, 1, 2, 1]);
}

#[tokio::test]
async fn sequential_never_overlaps() {
    let adapter = RecordingAdapter::new().with_delay(5);
    let store = Store::new(adapter.clone());

    let created = store
        .create_many(ids(1..=3))
        .unwrap(Options::new().write_mode(WriteMode::Sequential))
        .await
        .unwrap();

    assert_eq!(created, ids(1..=3));
    assert_eq!(adapter.write_starts(), vec![1, 1, 1]);
}

#[tokio::test]
async fn iterate_is_lazy() {
    let adapter = RecordingAdapter::new();
    let store = Store::new(adapter.clone());

    let stream = store.create_many(ids(1..=3)).iterate(Options::new());
    assert!(adapter.calls().is_empty());
    drop(stream);
    assert!(adapter.calls().is_empty());
}

#[tokio::test]
async fn explicit_bulk_requires_bulk_capability() {
    for size in [1, 4] {
        let adapter = RecordingAdapter::new().without(Operation::Bulk);
        let store = Store::new(adapter.clone());

        let err = store
            .create_many(ids(1..=3))
            .consume(bulk(size))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "EMUT_PARTIAL_ADAPTER");
        assert_eq!(err.info()["operation"], "BULK");
        assert!(adapter.calls().is_empty());
    }
}

#[tokio::test]
async fn explicit_bulk_without_capability_passes_unchanged_entities() {
    let adapter = RecordingAdapter::seeded(2).without(Operation::Bulk);
    let store = Store::new(adapter.clone());

    let read = store.filter(None).unwrap(bulk(4)).await.unwrap();
    assert_eq!(read, ids(1..=2));
    assert_eq!(adapter.calls(), vec![Call::Filter]);
}

#[tokio::test]
async fn bulk_ignores_results_for_deletes() {
    let adapter = RecordingAdapter::seeded(2)
        .bulk_returns(vec![Some(json!({ "id": 10 })), Some(json!({ "id": 20 }))]);
    let store = Store::new(adapter.clone());

    let deleted = store.filter(None).delete().unwrap(bulk(4)).await.unwrap();

    assert_eq!(deleted, ids(1..=2));
    assert_eq!(adapter.calls(), vec![Call::Filter, Call::Bulk(vec![Operation::Delete; 2])]);
    assert!(adapter.items().is_empty());
}

#[tokio::test]
async fn bulk_mixes_updates_and_deletes_in_one_batch() {
    let adapter = RecordingAdapter::seeded(3);
    let store = Store::new(adapter.clone());

    let result = store
        .filter(None)
        .if_else(
            |value: &Value| value["id"] == 2,
            [mutent_rust::Node::delete()],
            [mutent_rust::Node::assign(json!({ "kept": true }))],
        )
        .unwrap(bulk(4))
        .await
        .unwrap();

    let kept = |id: i64| json!({ "id": id, "kept": true });
    assert_eq!(result, vec![kept(1), json!({ "id": 2 }), kept(3)]);
    assert_eq!(
        adapter.calls(),
        vec![
            Call::Filter,
            Call::Bulk(vec![Operation::Update, Operation::Delete, Operation::Update]),
        ]
    );
    assert_eq!(adapter.items(), vec![kept(1), kept(3)]);
}

#[tokio::test]
async fn concurrent_output_keeps_input_order() {
    let adapter = RecordingAdapter::new().with_delay_by_id(|id| (5 - id as u64) * 10);
    let store = Store::new(adapter.clone());
    let options = Options::new()
        .write_mode(WriteMode::Concurrent)
        .write_size(4);

    let created = store.create_many(ids(1..=4)).unwrap(options).await.unwrap();

    assert_eq!(adapter.finished(), vec![json!(4), json!(3), json!(2), json!(1)]);
    assert_eq!(created, ids(1..=4));
}
