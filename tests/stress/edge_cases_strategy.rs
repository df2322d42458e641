//! Edge case tests: argument validation, unknown and cyclic codes, odd
//! names, corrupt storage, lock timeouts and interrupted statements.

use std::sync::Arc;
use std::thread;

use wallet_strategy::code::{is_resolved, resolve};
use wallet_strategy::{
    Address, CodeRegistry, Page, StoreConfig, StrategyError, StrategyStore, AGGREGATE_BASE,
};

const NO_METHODS: &[&str] = &[];

fn store() -> StrategyStore {
    StrategyStore::open_in_memory().expect("in-memory store")
}

fn addr(s: &str) -> Address {
    s.parse().expect("valid address")
}

// === Argument Edge Cases ===

#[test]
fn edge_blank_names_rejected_everywhere() {
    let store = store();
    let a = addr("f01000");
    for name in ["", "   ", "\t"] {
        assert!(matches!(
            store.create_msg_type_template(name, &[1]),
            Err(StrategyError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.create_method_template(name, &["Send"]),
            Err(StrategyError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.create_key_bind(name, &a, &[1], NO_METHODS),
            Err(StrategyError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.create_group(name, &["kb"]),
            Err(StrategyError::InvalidArgument(_))
        ));
    }
}

#[test]
fn edge_empty_code_list_rejected() {
    let store = store();
    assert!(matches!(
        store.create_key_bind("kb", &addr("f01000"), &[], NO_METHODS),
        Err(StrategyError::InvalidArgument(_))
    ));
    assert!(store.list_key_binds(Page::all()).unwrap().is_empty());
}

#[test]
fn edge_blank_method_rejected_on_key_bind() {
    let store = store();
    assert!(matches!(
        store.create_key_bind("kb", &addr("f01000"), &[1], &["Send", ""]),
        Err(StrategyError::InvalidArgument(_))
    ));
}

#[test]
fn edge_duplicate_inputs_collapse() {
    let store = store();
    let kb = store
        .create_key_bind("kb", &addr("f01000"), &[1, 1, 2, 1], &["Send", "Send"])
        .unwrap();
    assert_eq!(kb.codes.as_slice(), &[1, 2]);
    assert_eq!(kb.methods.len(), 1);

    let kb = store.add_codes("kb", &[2, 1]).unwrap();
    assert_eq!(kb.codes.as_slice(), &[1, 2]);
}

#[test]
fn edge_unicode_and_quoted_names_round_trip() {
    let store = store();
    let names = ["ключ", "naïve 'quoted'", "semi;colon", "名前", "x\"y"];
    for name in names {
        store
            .create_key_bind(name, &addr("f01000"), &[1], &["Send"])
            .unwrap();
        assert_eq!(store.get_key_bind(name).unwrap().name, name);
    }
    store.create_group("unicode-group", &names).unwrap();
    assert_eq!(
        store.get_group("unicode-group").unwrap().key_bind_names(),
        names.to_vec()
    );
}

#[test]
fn edge_address_validation() {
    for bad in ["", "f", "x01000", "f5abc", "f0abc", "f1abc!", "f1"] {
        assert!(
            bad.parse::<Address>().is_err(),
            "'{bad}' should be rejected"
        );
    }
    let a: Address = "F1ABCDEF".parse().unwrap();
    assert_eq!(a.as_str(), "f1abcdef");

    // Delegated: namespace actor id, 'f', base32 sub-address.
    for bad in ["f410", "f410f", "f4fabc", "f41x0fabc"] {
        assert!(bad.parse::<Address>().is_err(), "'{bad}' should be rejected");
    }
    let delegated: Address = "f410fkkld55ioe7qg24wvt7fu6pbknb56ht7pt4zamxa".parse().unwrap();
    assert_eq!(delegated.protocol(), 4);

    let store = store();
    store
        .create_key_bind("evm", &delegated, &[1], NO_METHODS)
        .unwrap();
    assert_eq!(store.get_key_binds_by_address(&delegated).unwrap().len(), 1);
}

// === Code Edge Cases ===

#[test]
fn edge_unknown_codes_pass_through() {
    let registry = CodeRegistry::default();
    let resolved = resolve(&registry, [4242, AGGREGATE_BASE + 777, 1]);
    assert_eq!(resolved.as_slice(), &[4242, AGGREGATE_BASE + 777, 1]);
    assert!(is_resolved(&registry, &resolved));
}

#[test]
fn edge_cyclic_aggregates_terminate() {
    let registry = CodeRegistry::builder()
        .leaf(1, "one")
        .leaf(2, "two")
        .aggregate(100, "a", [101, 1])
        .aggregate(101, "b", [100, 2])
        .aggregate(102, "self", [102])
        .build();

    let resolved = resolve(&registry, [100]);
    assert_eq!(resolved.as_slice(), &[2, 1]);
    assert!(resolve(&registry, [102]).is_empty());
}

#[test]
fn edge_all_aggregate_covers_every_leaf() {
    let store = store();
    let kb = store
        .create_key_bind("everything", &addr("f01000"), &[1003], NO_METHODS)
        .unwrap();
    let mut codes = kb.codes.into_vec();
    codes.sort_unstable();
    assert_eq!(codes, (0..=11).collect::<Vec<_>>());
}

#[test]
fn edge_remove_every_code_leaves_empty_key_bind() {
    let store = store();
    store
        .create_key_bind("kb", &addr("f01000"), &[1, 2], &["Send"])
        .unwrap();
    let kb = store.remove_codes("kb", &[1003]).unwrap();
    assert!(kb.codes.is_empty());

    store.create_group("g", &["kb"]).unwrap();
    let token = store.create_token("g").unwrap();
    let v = store.verify(&token, &addr("f01000"), 1, Some("Send")).unwrap();
    assert!(v.address_bound);
    assert!(!v.code_allowed);
    assert_eq!(v.denial_reason(), Some("message type not allowed"));
}

// === Token Edge Cases ===

#[test]
fn edge_token_format_and_lookup() {
    let store = store();
    store
        .create_key_bind("kb", &addr("f01000"), &[1], NO_METHODS)
        .unwrap();
    store.create_group("g", &["kb"]).unwrap();
    let token = store.create_token("g").unwrap();

    assert_base58(&token);
    assert!(matches!(store.get_token(""), Err(StrategyError::NotFound(_))));
    assert!(matches!(
        store.get_token(&token.to_uppercase()),
        Err(StrategyError::NotFound(_))
    ));

    // Error messages never carry the token itself.
    store.remove_token(&token).unwrap();
    let err = store.remove_token(&token).unwrap_err();
    assert!(!err.to_string().contains(&token));
}

fn assert_base58(token: &str) {
    const ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
    assert!(token.chars().all(|c| ALPHABET.contains(c)), "not base58: {token}");
    assert!(token.len() <= 44, "unexpected length {}", token.len());
    assert!(token.len() >= 32, "unexpected length {}", token.len());
}

// === Storage Edge Cases ===

#[test]
fn edge_malformed_config_is_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), "{ not json").unwrap();
    match StrategyStore::open_repo(dir.path()) {
        Err(StrategyError::Serialization(_)) => {}
        Err(other) => panic!("expected Serialization, got {other:?}"),
        Ok(_) => panic!("expected Serialization, got a store"),
    }
}

#[test]
fn edge_in_memory_config() {
    let dir = tempfile::tempdir().unwrap();
    let store = StrategyStore::open(dir.path(), &StoreConfig::in_memory()).unwrap();
    store.create_msg_type_template("t", &[1]).unwrap();
    assert!(!dir.path().join("strategy.db").exists());
}

#[test]
fn edge_short_lock_timeout_only_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        lock_timeout_ms: 50,
        ..StoreConfig::default()
    };
    let store = Arc::new(StrategyStore::open(dir.path(), &config).unwrap());
    store
        .create_key_bind("kb", &addr("f01000"), &[1], NO_METHODS)
        .unwrap();

    // Every call either commits or gives up waiting for the connection.
    let mut handles = Vec::new();
    for t in 0..8 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            let mut outcomes = Vec::new();
            for i in 0..20 {
                outcomes.push(store.create_method_template(&format!("m-{t}-{i}"), &["Send"]));
            }
            outcomes
        }));
    }
    for h in handles {
        for outcome in h.join().unwrap() {
            match outcome {
                Ok(_) | Err(StrategyError::StorageFailure(_)) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
    }
}

#[test]
fn edge_interrupt_without_running_statement_is_harmless() {
    let store = store();
    store.interrupt();
    store.create_msg_type_template("after", &[1]).unwrap();
    assert!(store.get_msg_type_template("after").is_ok());
}
