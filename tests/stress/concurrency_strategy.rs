//! Concurrency test: many threads sharing one `StrategyStore`.
//!
//! Validates that store operations are thread-safe, that racing creates of
//! the same name produce exactly one winner, and that readers never see a
//! half-applied edit.

use std::collections::HashSet;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use wallet_strategy::{Address, Page, StrategyError, StrategyStore};

const NO_METHODS: &[&str] = &[];

fn addr(i: usize) -> Address {
    format!("f0{}", 1000 + i).parse().expect("valid address")
}

#[test]
fn stress_50_threads_create_distinct_key_binds() {
    let store = Arc::new(StrategyStore::open_in_memory().unwrap());

    let mut handles = Vec::new();
    for thread_id in 0..50 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for i in 0..20 {
                store
                    .create_key_bind(
                        &format!("kb-{thread_id}-{i}"),
                        &addr(thread_id),
                        &[1, 1002],
                        &["Send"],
                    )
                    .expect("create should succeed");
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(store.list_key_binds(Page::all()).unwrap().len(), 1_000);
    for thread_id in 0..50 {
        assert_eq!(
            store.get_key_binds_by_address(&addr(thread_id)).unwrap().len(),
            20
        );
    }
}

#[test]
fn stress_racing_creates_have_one_winner() {
    let store = Arc::new(StrategyStore::open_in_memory().unwrap());
    let barrier = Arc::new(Barrier::new(32));
    let outcomes = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for thread_id in 0..32 {
        let store = Arc::clone(&store);
        let barrier = Arc::clone(&barrier);
        let outcomes = Arc::clone(&outcomes);
        handles.push(thread::spawn(move || {
            barrier.wait();
            let result = store.create_msg_type_template("contended", &[thread_id as u32]);
            outcomes.lock().unwrap().push((thread_id, result.map(|t| t.codes)));
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    let outcomes = outcomes.lock().unwrap();
    let winners: Vec<_> = outcomes.iter().filter(|(_, r)| r.is_ok()).collect();
    assert_eq!(winners.len(), 1);
    for (_, r) in outcomes.iter().filter(|(_, r)| r.is_err()) {
        assert!(matches!(r, Err(StrategyError::AlreadyExists(_))));
    }

    let (winner_id, winner_codes) = winners[0];
    let stored = store.get_msg_type_template("contended").unwrap();
    assert_eq!(&stored.codes, winner_codes.as_ref().unwrap());
    assert_eq!(stored.codes.as_slice(), &[*winner_id as u32]);
}

#[test]
fn stress_concurrent_edits_are_not_lost() {
    let store = Arc::new(StrategyStore::open_in_memory().unwrap());
    store
        .create_key_bind("shared", &addr(0), &[0], NO_METHODS)
        .unwrap();

    let mut handles = Vec::new();
    for thread_id in 0..16u32 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for i in 0..10u32 {
                store
                    .add_codes("shared", &[100 + thread_id * 10 + i])
                    .expect("add should succeed");
                store
                    .add_methods("shared", &[format!("M{thread_id}_{i}")])
                    .expect("add should succeed");
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    let kb = store.get_key_bind("shared").unwrap();
    assert_eq!(kb.codes.len(), 1 + 160);
    assert_eq!(kb.methods.len(), 160);
}

#[test]
fn stress_verifiers_during_group_churn() {
    let store = Arc::new(StrategyStore::open_in_memory().unwrap());
    let a = addr(0);
    store.create_key_bind("kb", &a, &[1, 2], &["Send"]).unwrap();
    store.create_group("stable", &["kb"]).unwrap();
    let token = store.create_token("stable").unwrap();

    let mut handles = Vec::new();

    // Writers: create and remove throwaway groups with their own tokens.
    for thread_id in 0..4 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for i in 0..25 {
                let name = format!("churn-{thread_id}-{i}");
                store.create_group(&name, &["kb"]).unwrap();
                store.create_token(&name).unwrap();
                assert_eq!(store.remove_group(&name).unwrap(), 1);
            }
        }));
    }

    // Readers: the stable token keeps verifying the same way.
    for _ in 0..8 {
        let store = Arc::clone(&store);
        let token = token.clone();
        let a = a.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                store.authorize(&token, &a, 1, Some("Send")).unwrap();
                let v = store.verify(&token, &a, 3, None).unwrap();
                assert!(!v.is_permitted);
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }

    let groups: HashSet<_> = store
        .list_groups(Page::all())
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(groups, HashSet::from(["stable".to_string()]));
}

#[test]
fn stress_tokens_are_unique_across_threads() {
    let store = Arc::new(StrategyStore::open_in_memory().unwrap());
    store
        .create_key_bind("kb", &addr(0), &[1], NO_METHODS)
        .unwrap();
    store.create_group("g", &["kb"]).unwrap();

    let tokens = Arc::new(Mutex::new(HashSet::new()));
    let mut handles = Vec::new();
    for _ in 0..20 {
        let store = Arc::clone(&store);
        let tokens = Arc::clone(&tokens);
        handles.push(thread::spawn(move || {
            for _ in 0..25 {
                let t = store.create_token("g").unwrap();
                assert!(tokens.lock().unwrap().insert(t));
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(tokens.lock().unwrap().len(), 500);
    assert_eq!(store.list_tokens_by_group("g").unwrap().len(), 500);
}

#[test]
fn stress_file_store_shared_across_threads() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(StrategyStore::open_repo(dir.path()).unwrap());

    let mut handles = Vec::new();
    for thread_id in 0..8 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for i in 0..10 {
                let name = format!("t-{thread_id}-{i}");
                store.create_method_template(&name, &["Send"]).unwrap();
                store.get_method_template(&name).unwrap();
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    drop(store);
    let reopened = StrategyStore::open_repo(dir.path()).unwrap();
    assert_eq!(reopened.list_method_templates(Page::all()).unwrap().len(), 80);
}
