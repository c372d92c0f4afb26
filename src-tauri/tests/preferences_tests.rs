mod common;

use std::sync::Arc;

use parley_lib::language::LanguagePreference;
use parley_lib::preferences::{default_preference, PreferenceStore};
use parley_lib::storage::{KeyValueStore, MemoryStore};

use common::{english, french, spanish};

#[test]
fn defaults_to_first_two_available() {
    let pair = default_preference(&[english(), french(), spanish()]).expect("pair");
    assert_eq!(pair.first, english());
    assert_eq!(pair.second, french());
}

#[test]
fn single_language_is_used_on_both_sides() {
    let pair = default_preference(&[spanish()]).expect("pair");
    assert_eq!(pair.first, spanish());
    assert_eq!(pair.second, spanish());
}

#[test]
fn nothing_available_resolves_to_none() {
    let store = Arc::new(MemoryStore::new());
    let preferences = PreferenceStore::new(store.clone());
    assert_eq!(preferences.resolve(&[]), None);
    assert!(!store.contains("firstLanguage"));
}

#[test]
fn resolved_defaults_are_persisted() {
    let store = Arc::new(MemoryStore::new());
    let preferences = PreferenceStore::new(store.clone());

    let resolved = preferences.resolve(&[english(), french()]).expect("pair");
    assert_eq!(preferences.load(), Some(resolved));

    let first = store
        .get("firstLanguage")
        .expect("read")
        .expect("firstLanguage stored");
    assert_eq!(
        first,
        serde_json::json!({ "code": "en-US", "name": "English" })
    );
}

#[test]
fn stored_pair_wins_over_defaults() {
    let store = Arc::new(MemoryStore::new());
    let preferences = PreferenceStore::new(store);
    preferences
        .save(&LanguagePreference {
            first: spanish(),
            second: english(),
        })
        .expect("save");

    let resolved = preferences.resolve(&[english(), french()]).expect("pair");
    assert_eq!(resolved.first.code, "es-ES");
    assert_eq!(resolved.second.code, "en-US");
}

#[test]
fn half_stored_pair_is_absent() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(
            "firstLanguage",
            serde_json::json!({ "code": "fr-FR", "name": "French" }),
        )
        .expect("set");
    let preferences = PreferenceStore::new(store);

    assert_eq!(preferences.load(), None);
    let resolved = preferences.resolve(&[english(), spanish()]).expect("pair");
    assert_eq!(resolved.first, english());
    assert_eq!(resolved.second, spanish());
}

#[test]
fn malformed_entry_is_ignored() {
    let store = Arc::new(MemoryStore::new());
    store
        .set("firstLanguage", serde_json::json!("fr-FR"))
        .expect("set");
    store
        .set(
            "secondLanguage",
            serde_json::json!({ "code": "en-US", "name": "English" }),
        )
        .expect("set");

    assert_eq!(PreferenceStore::new(store).load(), None);
}
