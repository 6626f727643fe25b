use minsketch::Sketch;
use rand::{thread_rng, Rng};
use std::thread;

const SHARDS: usize = 4;
const REQUESTS_PER_SHARD: usize = 200_000;
const KEYS: u64 = 10_000;

// skewed key: low ids are requested far more often than high ones
fn next_key<R: Rng>(rng: &mut R) -> String {
    let x: f64 = rng.gen();
    format!("user:{}", ((x * x * x * x) * KEYS as f64) as u64)
}

fn main() {
    // every shard counts its own traffic, then the shards are merged
    let shards: Vec<Sketch<String>> = thread::scope(|s| {
        let handles: Vec<_> = (0..SHARDS)
            .map(|_| {
                s.spawn(|| {
                    let sketch: Sketch<String> = Sketch::new(4096, 4).unwrap();
                    let mut rng = thread_rng();
                    (0..REQUESTS_PER_SHARD).for_each(|_| sketch.insert(&next_key(&mut rng)));
                    sketch
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let total: Sketch<String> = Sketch::new(4096, 4).unwrap();
    for shard in &shards {
        assert!(total.is_mergeable_with(shard));
        total.merge(shard).unwrap();
    }

    let candidates = (0..KEYS).map(|i| format!("user:{}", i));
    println!("hottest keys over {} requests:", SHARDS * REQUESTS_PER_SHARD);
    for (key, estimate) in total.top_k(10, candidates) {
        println!("{:>12} ~ {}", key, estimate);
    }
}
