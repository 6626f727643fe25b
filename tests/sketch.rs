use minsketch::{Sketch, SketchBuilder, SketchError};
use rand::{rngs::StdRng, Rng, SeedableRng};
use scoped_threadpool::Pool;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_sketch_is_send_and_sync() {
    assert_send_sync::<Sketch<String>>();
    assert_send_sync::<Sketch<u64>>();
}

#[test]
fn test_never_underestimates() {
    // a narrow sketch forces plenty of collisions
    let sketch: Sketch<u32> = Sketch::new(16, 3).unwrap();
    let mut exact: HashMap<u32, u32> = HashMap::new();
    let mut rng = StdRng::seed_from_u64(0xdead_beef);

    for _ in 0..20_000 {
        let k = rng.gen_range(0..500u32);
        sketch.insert(&k);
        *exact.entry(k).or_default() += 1;
    }

    for (k, n) in exact.iter() {
        assert!(sketch.count(k) >= *n, "key {} estimated below {}", k, n);
    }
}

#[test]
fn test_zero_state() {
    let sketch: Sketch<String> = Sketch::new(64, 4).unwrap();
    for k in ["a", "b", "", "some longer key"] {
        assert_eq!(sketch.count(k), 0);
    }

    for i in 0..100 {
        sketch.insert(&i.to_string());
    }
    sketch.clear();
    for i in 0..100 {
        assert_eq!(sketch.count(&i.to_string()), 0);
    }
    assert_eq!(sketch.width(), 64);
    assert_eq!(sketch.depth(), 4);
}

#[test]
fn test_exact_without_collisions() {
    let sketch: Sketch<u64> = Sketch::new(1 << 16, 4).unwrap();
    for k in 1..=20u64 {
        (0..k).for_each(|_| sketch.insert(&k));
    }
    for k in 1..=20u64 {
        assert_eq!(sketch.count(&k) as u64, k);
    }
}

#[test]
fn test_merge_is_cell_wise_sum() {
    let a: Sketch<u64> = Sketch::new(1 << 14, 4).unwrap();
    let b: Sketch<u64> = Sketch::new(1 << 14, 4).unwrap();
    let c: Sketch<u64> = Sketch::new(1 << 14, 4).unwrap();

    (0..40u64).for_each(|k| (0..=k % 7).for_each(|_| a.insert(&k)));
    (20..60u64).for_each(|k| (0..=k % 5).for_each(|_| b.insert(&k)));

    let before: Vec<(u32, u32)> = (0..60u64).map(|k| (a.count(&k), b.count(&k))).collect();

    c.merge(&a).unwrap();
    c.merge(&b).unwrap();
    for (k, (ca, cb)) in (0..60u64).zip(before) {
        assert_eq!(c.count(&k), ca + cb);
    }

    // merging leaves the other operand untouched
    for k in 20..60u64 {
        assert_eq!(b.count(&k), (k % 5 + 1) as u32);
    }
}

#[test]
fn test_merge_rejects_mismatched_shapes() {
    let small: Sketch<&str> = Sketch::new(4, 3).unwrap();
    let large: Sketch<&str> = Sketch::new(8, 3).unwrap();
    small.insert("x");
    (0..3).for_each(|_| large.insert("x"));

    let err = large.merge(&small).unwrap_err();
    assert_eq!(
        err,
        SketchError::DimensionMismatch {
            expected: (8, 3),
            found: (4, 3),
        }
    );
    assert_eq!(small.count("x"), 1);
    assert_eq!(large.count("x"), 3);

    let deeper: Sketch<&str> = Sketch::new(8, 4).unwrap();
    assert!(large.merge(&deeper).is_err());
}

#[test]
fn test_construction_rejects_degenerate_shapes() {
    assert!(matches!(
        Sketch::<String>::new(0, 5),
        Err(SketchError::InvalidDimensions { width: 0, depth: 5 })
    ));
    assert!(matches!(
        Sketch::<String>::new(5, 0),
        Err(SketchError::InvalidDimensions { width: 5, depth: 0 })
    ));
    assert!(SketchBuilder::new(0, 0).finalize::<String>().is_err());
}

#[test]
fn test_top_k() {
    let sketch: Sketch<String> = Sketch::new(4096, 5).unwrap();
    (0..10).for_each(|_| sketch.insert("a"));
    (0..5).for_each(|_| sketch.insert("b"));
    sketch.insert("c");

    let candidates: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
    let top = sketch.top_k(2, candidates.clone());
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].0, "a");
    assert!(top[0].1 >= 10);
    assert_eq!(top[1].0, "b");
    assert!(top[1].1 >= 5);

    let all = sketch.top_k(10, candidates);
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].0, "c");
    assert!(sketch.top_k(0, vec!["a".to_string()]).is_empty());
}

#[test]
fn test_concurrent_inserts_lose_no_updates() {
    const THREADS: u32 = 8;
    const PER_THREAD: u32 = 20_000;

    let sketch: Sketch<&str> = Sketch::new(256, 4).unwrap();
    thread::scope(|s| {
        for t in 0..THREADS {
            let sketch = &sketch;
            s.spawn(move || {
                for i in 0..PER_THREAD {
                    sketch.insert("hot");
                    if i % 3 == 0 {
                        let _ = sketch.count(if t % 2 == 0 { "cold" } else { "hot" });
                    }
                }
            });
        }
    });

    assert!(sketch.count("hot") >= THREADS * PER_THREAD);
}

#[test]
fn test_concurrent_inserts_thread_pool() {
    let sketch: Sketch<u64> = Sketch::new(1024, 4).unwrap();
    let mut pool = Pool::new(4);
    pool.scoped(|scope| {
        for t in 0..4u64 {
            let sketch = &sketch;
            scope.execute(move || {
                for k in 0..100u64 {
                    sketch.add(&k, (t + 1) as u32);
                }
            });
        }
    });

    // each key received 1 + 2 + 3 + 4
    for k in 0..100u64 {
        assert!(sketch.count(&k) >= 10);
    }
}

#[test]
fn test_shared_across_threads() {
    let sketch: Arc<Sketch<u64>> = Arc::new(Sketch::new(512, 3).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let sketch = Arc::clone(&sketch);
            thread::spawn(move || (0..1_000).for_each(|_| sketch.insert(&42)))
        })
        .collect();
    handles.into_iter().for_each(|h| h.join().unwrap());
    assert!(sketch.count(&42) >= 4_000);
}

#[test]
fn test_move_keeps_counts() {
    fn relocate(sketch: Sketch<u64>) -> Box<Sketch<u64>> {
        Box::new(sketch)
    }

    let sketch: Sketch<u64> = Sketch::new(128, 4).unwrap();
    (0..7).for_each(|_| sketch.insert(&9));
    let moved = relocate(sketch);
    assert!(moved.count(&9) >= 7);
    assert_eq!(moved.width(), 128);
}

#[test]
fn test_random_seeds_are_not_mergeable_exactly() {
    let a: Sketch<u64> = Sketch::with_seed(256, 4, 1).unwrap();
    let b: Sketch<u64> = Sketch::with_seed(256, 4, 1).unwrap();
    let r: Sketch<u64> = Sketch::with_random_seed(256, 4).unwrap();
    assert!(a.is_mergeable_with(&b));
    assert_eq!(a.is_mergeable_with(&r), r.seed() == 1);
}
