//! Copy-on-write behavior of shared buffers and concurrent readers

use argbuf::{Argument, Arguments, SharedArguments};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn config() -> SharedArguments {
    let mut args = SharedArguments::new();
    args.append_named("host", "localhost").unwrap();
    args.append_named("port", 8080u16).unwrap();
    args.append_section("peers", ["a", "b", "c"]).unwrap();
    args
}

#[test]
fn test_clone_is_cheap_and_reads_agree() {
    let original = config();
    let copy = original.clone();

    assert!(copy.shares_with(&original));
    assert_eq!(original.reference_count(), 2);
    assert!(!original.is_owner());
    assert_eq!(copy.as_bytes().as_ptr(), original.as_bytes().as_ptr());
    assert_eq!(copy.value("port"), Argument::UInt16(8080));
}

#[test]
fn test_every_mutation_forks_first() {
    let original = config();

    let mutations: [fn(&mut SharedArguments); 7] = [
        |args| {
            args.append(1i32).unwrap();
        },
        |args| {
            args.set_named("port", 9090u16).unwrap();
        },
        |args| {
            args.set_named("host", "example.org").unwrap();
        },
        |args| {
            args.remove_named("host").unwrap();
        },
        |args| {
            args.insert_at(0, Some("first"), true).unwrap();
        },
        |args| {
            args.set_section("peers", ["z"]).unwrap();
        },
        |args| {
            args.shrink_to_fit().unwrap();
            args.append(0u8).unwrap();
        },
    ];

    for mutate in mutations {
        let mut copy = original.clone();
        mutate(&mut copy);
        assert!(!copy.shares_with(&original));
        assert_eq!(original, config());
        assert!(copy.is_owner());
    }
    assert_eq!(original.reference_count(), 1);
}

#[test]
fn test_clear_detaches_only_one_handle() {
    let original = config();
    let mut copy = original.clone();

    copy.clear();
    assert!(copy.is_empty());
    assert_eq!(copy.reference_count(), 0);
    assert_eq!(original.len(), 5);
    assert!(original.is_owner());
}

#[test]
fn test_conversion_between_flavors() {
    let shared = config();
    let owned: Arguments = shared.to_buffer().unwrap();
    assert_eq!(owned, shared);
    assert_eq!(owned.as_bytes(), shared.as_bytes());

    let back: SharedArguments = owned.to_buffer().unwrap();
    assert!(!back.shares_with(&shared));
    assert!(back.contains_all(&shared));
}

#[test]
fn test_concurrent_readers_on_clones() {
    let base = config();
    let seen = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|thread_id| {
            let mut args = base.clone();
            let seen = seen.clone();
            std::thread::spawn(move || {
                for _ in 0..200 {
                    if args.value("port").as_u32() == 8080 {
                        seen.fetch_add(1, Ordering::Relaxed);
                    }
                }
                // Writers only touch their own copy
                if thread_id % 2 == 0 {
                    args.set_named("port", thread_id as u16).unwrap();
                    assert_eq!(args.value("port").as_u32(), thread_id as u32);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(seen.load(Ordering::Relaxed), 8 * 200);
    assert_eq!(base.value("port"), Argument::UInt16(8080));
}

#[test]
fn test_lock_guarded_writer_with_readers() {
    let args = Arc::new(RwLock::new(config()));

    let handles: Vec<_> = (0..6)
        .map(|thread_id| {
            let args = args.clone();
            std::thread::spawn(move || {
                if thread_id == 0 {
                    for i in 0..100u32 {
                        args.write().append_named("counter", i).unwrap();
                    }
                } else {
                    for _ in 0..500 {
                        let guard = args.read();
                        let snapshot = guard.clone();
                        drop(guard);
                        assert_eq!(snapshot.value("host").as_str(), Some("localhost"));
                        assert_eq!(snapshot.used_len() % argbuf::ALIGNMENT, 0);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    let args = args.read();
    assert_eq!(args.count("counter"), 100);
    assert_eq!(args.find_nth("counter", 99).map(|p| args.get(p).unwrap().as_u32()), Some(99));
}
