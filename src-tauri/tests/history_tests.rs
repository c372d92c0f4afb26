mod common;

use std::sync::Arc;

use parley_lib::history::{HistoryStore, TranslationHistoryItem};
use parley_lib::settings::Settings;
use parley_lib::storage::{KeyValueStore, MemoryStore};

use common::FlakyStore;

const T0: i64 = 1_700_000_000_000;

fn item(from: &str, at: i64) -> TranslationHistoryItem {
    TranslationHistoryItem::new(from, format!("{from}!"), "English", "French").with_timestamp(at)
}

fn history(store: Arc<dyn KeyValueStore>) -> HistoryStore {
    HistoryStore::new(store, &Settings::default())
}

fn sources(history: &HistoryStore) -> Vec<String> {
    history.items().into_iter().map(|i| i.from_text).collect()
}

#[test]
fn new_items_get_distinct_ids() {
    let a = TranslationHistoryItem::new("a", "b", "English", "French");
    let b = TranslationHistoryItem::new("a", "b", "English", "French");
    assert_ne!(a.id, b.id);
    assert!(a.timestamp > 0);
}

#[test]
fn serializes_with_camel_case_keys() {
    let value = serde_json::to_value(item("hi", T0)).expect("item should serialize");
    for key in ["id", "fromText", "toText", "fromLang", "toLang", "timestamp"] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }
}

#[test]
fn add_prepends_unconditionally() {
    let history = history(Arc::new(MemoryStore::new()));
    history.add(item("hello", T0)).expect("add");
    history.add(item("hello", T0 + 10)).expect("add");
    assert_eq!(history.len(), 2);
}

#[test]
fn continuation_within_window_replaces_newest() {
    let history = history(Arc::new(MemoryStore::new()));
    history.add_or_update(item("Hel", T0)).expect("first");
    history.add_or_update(item("Hello", T0 + 1_000)).expect("second");
    history.add_or_update(item("Hello there ", T0 + 2_000)).expect("third");

    assert_eq!(sources(&history), vec!["Hello there "]);
}

#[test]
fn identical_text_within_window_replaces_newest() {
    let history = history(Arc::new(MemoryStore::new()));
    history.add_or_update(item("  Hello", T0)).expect("first");
    history.add_or_update(item("Hello  ", T0 + 500)).expect("second");
    assert_eq!(history.len(), 1);
    assert_eq!(history.items()[0].timestamp, T0 + 500);
}

#[test]
fn continuation_outside_window_prepends() {
    let history = history(Arc::new(MemoryStore::new()));
    history.add_or_update(item("Hello", T0)).expect("first");
    history.add_or_update(item("Hello world", T0 + 3_000)).expect("second");
    assert_eq!(sources(&history), vec!["Hello world", "Hello"]);
}

#[test]
fn unrelated_text_prepends() {
    let history = history(Arc::new(MemoryStore::new()));
    history.add_or_update(item("Hello", T0)).expect("first");
    history.add_or_update(item("Goodbye", T0 + 100)).expect("second");
    assert_eq!(sources(&history), vec!["Goodbye", "Hello"]);
}

#[test]
fn list_is_bounded_by_limit() {
    let settings = Settings {
        history_limit: 3,
        ..Settings::default()
    };
    let history = HistoryStore::new(Arc::new(MemoryStore::new()), &settings);
    for n in 0..5 {
        history.add(item(&format!("entry {n}"), T0 + n)).expect("add");
    }
    assert_eq!(sources(&history), vec!["entry 4", "entry 3", "entry 2"]);
}

#[test]
fn delete_removes_exactly_one_item() {
    let store = Arc::new(MemoryStore::new());
    let history = history(store.clone());
    history.add(item("one", T0)).expect("add");
    history.add(item("two", T0 + 10_000)).expect("add");
    let id = history.items()[1].id.clone();

    assert!(history.delete(&id).expect("delete"));
    assert!(!history.delete("missing").expect("delete missing"));
    assert_eq!(sources(&history), vec!["two"]);

    let reopened = HistoryStore::open(store, &Settings::default());
    assert_eq!(sources(&reopened), vec!["two"]);
}

#[test]
fn clear_empties_and_removes_key() {
    let store = Arc::new(MemoryStore::new());
    let history = history(store.clone());
    history.add(item("one", T0)).expect("add");
    assert!(store.contains("translationHistory"));

    history.clear().expect("clear");
    assert!(history.is_empty());
    assert!(!store.contains("translationHistory"));
}

#[test]
fn open_restores_persisted_order() {
    let store = Arc::new(MemoryStore::new());
    let history = history(store.clone());
    history.add(item("older", T0)).expect("add");
    history.add(item("newer", T0 + 60_000)).expect("add");

    let reopened = HistoryStore::open(store, &Settings::default());
    assert_eq!(sources(&reopened), vec!["newer", "older"]);
}

#[test]
fn undecodable_history_loads_empty() {
    let store = Arc::new(MemoryStore::new());
    store
        .set("translationHistory", serde_json::json!({"not": "a list"}))
        .expect("set");
    let history = HistoryStore::open(store, &Settings::default());
    assert!(history.is_empty());
}

#[test]
fn failed_write_is_reported_but_kept_in_memory() {
    let store = FlakyStore::new();
    let history = history(store.clone());
    store.fail_writes(true);

    assert!(history.add_or_update(item("hello", T0)).is_err());
    assert_eq!(history.len(), 1);
}

#[test]
fn failed_read_loads_empty() {
    let store = FlakyStore::new();
    store.fail_reads(true);
    let history = HistoryStore::open(store, &Settings::default());
    assert!(history.is_empty());
}

#[test]
fn subscribers_see_every_mutation() {
    let history = history(Arc::new(MemoryStore::new()));
    let mut changes = history.subscribe();
    let start = *changes.borrow_and_update();

    history.add(item("one", T0)).expect("add");
    history.add_or_update(item("one more", T0 + 10)).expect("update");
    history.clear().expect("clear");

    assert!(changes.has_changed().expect("sender alive"));
    assert_eq!(*changes.borrow_and_update(), start + 3);
}
