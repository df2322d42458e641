//! Scale test: thousands of key-binds, large groups and large code sets.
//!
//! Validates that listing, bulk removal, snapshotting and verification stay
//! correct as the store grows.

use wallet_strategy::code::resolve;
use wallet_strategy::{Address, CodeRegistry, Page, StrategyStore};

const NO_METHODS: &[&str] = &[];

fn addr(i: usize) -> Address {
    format!("f0{}", 10_000 + i).parse().expect("valid address")
}

#[test]
fn stress_5k_key_binds_list_and_page() {
    let store = StrategyStore::open_in_memory().unwrap();
    for i in 0..5_000 {
        store
            .create_key_bind(&format!("kb-{i:05}"), &addr(i % 100), &[1003], &["Send"])
            .expect("create should succeed");
    }

    assert_eq!(store.list_key_binds(Page::all()).unwrap().len(), 5_000);

    let page = store.list_key_binds(Page::range(4_990, 5_010)).unwrap();
    assert_eq!(page.len(), 10);
    assert_eq!(page[0].name, "kb-04990");

    for kb in store.list_key_binds(Page::range(0, 50)).unwrap() {
        assert_eq!(kb.codes.len(), 12);
    }
}

#[test]
fn stress_bulk_remove_by_address() {
    let store = StrategyStore::open_in_memory().unwrap();
    for i in 0..2_000 {
        store
            .create_key_bind(&format!("kb-{i}"), &addr(i % 4), &[1], NO_METHODS)
            .unwrap();
    }

    for a in 0..4 {
        assert_eq!(store.remove_key_binds_by_address(&addr(a)).unwrap(), 500);
        assert_eq!(store.remove_key_binds_by_address(&addr(a)).unwrap(), 0);
    }
    assert!(store.list_key_binds(Page::all()).unwrap().is_empty());
}

#[test]
fn stress_group_of_1k_key_binds() {
    let store = StrategyStore::open_in_memory().unwrap();
    let names: Vec<String> = (0..1_000).map(|i| format!("kb-{i}")).collect();
    for (i, name) in names.iter().enumerate() {
        store
            .create_key_bind(name, &addr(i), &[i as u32 % 12], &[format!("M{i}")])
            .unwrap();
    }

    let group = store.create_group("big", &names).unwrap();
    assert_eq!(group.key_binds.len(), 1_000);
    let token = store.create_token("big").unwrap();

    // Edits after grouping do not reach the snapshot.
    for name in names.iter().take(100) {
        store.add_codes(name, &[1003]).unwrap();
    }

    for i in (0..1_000).step_by(37) {
        let code = i as u32 % 12;
        let method = format!("M{i}");
        store.authorize(&token, &addr(i), code, Some(&method)).unwrap();

        let other = (code + 1) % 12;
        let v = store.verify(&token, &addr(i), other, Some(&method)).unwrap();
        assert!(!v.is_permitted, "key-bind {i} should not allow code {other}");
    }

    assert_eq!(store.get_group("big").unwrap(), group);
}

#[test]
fn stress_large_code_sets() {
    // No aggregates, so every number is a leaf.
    let store = StrategyStore::open_in_memory()
        .unwrap()
        .with_registry(CodeRegistry::empty());
    let codes: Vec<u32> = (0..2_000).collect();
    store
        .create_key_bind("wide", &addr(0), &codes, NO_METHODS)
        .unwrap();

    let kb = store.add_codes("wide", &(1_000..3_000).collect::<Vec<_>>()).unwrap();
    assert_eq!(kb.codes.len(), 3_000);

    let kb = store.remove_codes("wide", &(0..2_800).collect::<Vec<_>>()).unwrap();
    assert_eq!(kb.codes.len(), 200);
    assert_eq!(kb.codes.as_slice().first(), Some(&2_800));
}

#[test]
fn stress_deep_aggregate_chain() {
    let mut builder = CodeRegistry::builder().leaf(0, "base");
    for depth in 1..=500u32 {
        builder = builder.aggregate(
            10_000 + depth,
            format!("level{depth}"),
            [10_000 + depth - 1, depth],
        );
    }
    let registry = builder.aggregate(10_000, "root", [0]).build();

    let resolved = resolve(&registry, [10_500]);
    assert_eq!(resolved.len(), 501);
    assert!(resolved.iter().all(|c| *c <= 500));
}
