//! Integration tests for `RingBufferQueue` through the public API.
//!
//! # Running with tracing
//!
//! Resize events are logged at trace level:
//! ```bash
//! RUST_LOG=ringq=trace cargo test --features tracing -- --nocapture
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Once};
use std::thread;
use std::time::Instant;

use ringq::config::DEFAULT_CAPACITY;
use ringq::{Queue, QueueConfig, RingBufferQueue};

static INIT_TRACING: Once = Once::new();

/// Initialize tracing for tests (only once).
fn init_test_tracing() {
    INIT_TRACING.call_once(|| {
        ringq::init_tracing();
    });
}

/// Enqueues `items` and then dequeues the same number through the trait.
fn round_trip<Q: Queue<Item = u64>>(queue: &Q, items: u64) -> Vec<u64> {
    for i in 0..items {
        queue.enqueue(i);
    }
    (0..items).filter_map(|_| queue.dequeue()).collect()
}

#[test]
fn fifo_order_through_trait() {
    init_test_tracing();

    let queue = RingBufferQueue::new(10);
    let out = round_trip(&queue, 1_000);

    assert_eq!(out, (0..1_000).collect::<Vec<_>>());
    assert!(queue.is_empty());
}

#[test]
fn growth_from_every_small_capacity() {
    init_test_tracing();

    for capacity in [10usize, 11, 30, 64, 500] {
        let queue = RingBufferQueue::new(capacity);
        for i in 0..=capacity {
            queue.enqueue(i);
        }
        assert_eq!(queue.capacity(), 2 * capacity, "capacity {capacity}");
        assert_eq!(queue.drain(), (0..=capacity).collect::<Vec<_>>());
    }
}

/// Whether `capacity` is `initial * 2^k` for some `k`.
fn on_doubling_lattice(capacity: usize, initial: usize) -> bool {
    capacity % initial == 0 && (capacity / initial).is_power_of_two()
}

#[test]
fn shrink_halves_default_capacity_below_threshold() {
    init_test_tracing();

    let queue = RingBufferQueue::new(DEFAULT_CAPACITY);
    for i in 0..961u32 {
        queue.enqueue(i);
    }
    assert_eq!(queue.capacity(), 1920);

    let mut trajectory = vec![queue.capacity()];
    while queue.dequeue().is_some() {
        let current = queue.capacity();
        if current != trajectory[trajectory.len() - 1] {
            trajectory.push(current);
        }
    }
    assert_eq!(trajectory, [1920, 960]);
}

#[test]
fn shrink_keeps_capacity_on_doubling_lattice() {
    init_test_tracing();

    let queue = RingBufferQueue::new(DEFAULT_CAPACITY);
    for i in 0..10_000u32 {
        queue.enqueue(i);
    }
    let peak = queue.capacity();
    assert_eq!(peak, 30 * 512);

    let mut previous = peak;
    while queue.dequeue().is_some() {
        let current = queue.capacity();
        assert!(current == previous || current == previous / 2);
        assert!(on_doubling_lattice(current, DEFAULT_CAPACITY));
        previous = current;
    }
    // 1920 is the last capacity above the threshold; it halves once more.
    assert_eq!(queue.capacity(), 960);
}

#[test]
fn empty_queue_operations_change_nothing() {
    let queue = RingBufferQueue::<String>::with_config(QueueConfig::new(40));

    for _ in 0..3 {
        assert_eq!(queue.dequeue(), None);
        assert_eq!(queue.peek(), None);
    }
    assert_eq!(queue.len(), 0);
    assert_eq!(queue.capacity(), 40);
    assert!(queue.drain().is_empty());
}

#[test]
fn config_clamping_matches_new() {
    for requested in [0usize, 5, 9, 10, 500, 65_535, 65_536, 100_000] {
        let from_new = RingBufferQueue::<u8>::new(requested).capacity();
        let from_config =
            RingBufferQueue::<u8>::with_config(QueueConfig::new(requested)).capacity();
        assert_eq!(from_new, from_config);
        assert_eq!(from_new, QueueConfig::new(requested).effective_capacity());
    }
}

#[test]
fn concurrent_producers_and_consumers() {
    init_test_tracing();

    const PRODUCERS: usize = 8;
    const CONSUMERS: usize = 8;
    const PER_PRODUCER: u64 = 10_000;
    let total = PRODUCERS as u64 * PER_PRODUCER;

    let queue = Arc::new(RingBufferQueue::new(10));
    let taken = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(PRODUCERS + CONSUMERS));

    let producers: Vec<_> = (0..PRODUCERS as u64)
        .map(|p| {
            let queue = Arc::clone(&queue);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..PER_PRODUCER {
                    queue.enqueue(p * PER_PRODUCER + i);
                }
            })
        })
        .collect();

    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let queue = Arc::clone(&queue);
            let barrier = Arc::clone(&barrier);
            let taken = Arc::clone(&taken);
            thread::spawn(move || {
                barrier.wait();
                let mut received = Vec::new();
                while (taken.load(Ordering::Relaxed) as u64) < total {
                    match queue.dequeue() {
                        Some(item) => {
                            taken.fetch_add(1, Ordering::Relaxed);
                            received.push(item);
                        }
                        None => std::hint::spin_loop(),
                    }
                }
                received
            })
        })
        .collect();

    for handle in producers {
        handle.join().unwrap();
    }

    let mut seen = HashSet::new();
    let mut sum = 0u64;
    for handle in consumers {
        for item in handle.join().unwrap() {
            assert!(seen.insert(item), "item {item} dequeued twice");
            sum += item;
        }
    }

    assert_eq!(seen.len() as u64, total);
    assert_eq!(sum, total * (total - 1) / 2);
    assert!(queue.is_empty());
    assert!(queue.len() <= queue.capacity());
}

#[test]
fn per_producer_order_is_preserved() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 5_000;

    let queue = Arc::new(RingBufferQueue::new(10));
    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    queue.enqueue((p, i));
                }
            })
        })
        .collect();
    for handle in producers {
        handle.join().unwrap();
    }

    // A single consumer must see each producer's items in the order they were sent.
    let mut next = [0usize; PRODUCERS];
    for (p, i) in queue.drain() {
        assert_eq!(i, next[p]);
        next[p] += 1;
    }
    assert_eq!(next, [PER_PRODUCER; PRODUCERS]);
}

#[test]
fn lock_free_reads_during_resizes() {
    let queue = Arc::new(RingBufferQueue::new(10));
    let barrier = Arc::new(Barrier::new(2));

    let writer = {
        let queue = Arc::clone(&queue);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for round in 0..50u32 {
                for i in 0..2_000 {
                    queue.enqueue(round * 2_000 + i);
                }
                while queue.dequeue().is_some() {}
            }
        })
    };

    barrier.wait();
    while !writer.is_finished() {
        // Snapshots may be stale but never torn.
        let capacity = queue.capacity();
        assert!(on_doubling_lattice(capacity, 10), "capacity {capacity}");
        assert!(queue.len() <= 2_000);
    }
    writer.join().unwrap();
    assert!(queue.is_empty());
}

#[test]
#[ignore]
fn enqueue_dequeue_throughput() {
    const ITERATIONS: u64 = 10_000_000;

    let queue = RingBufferQueue::new(DEFAULT_CAPACITY);

    let start = Instant::now();
    for i in 0..ITERATIONS {
        queue.enqueue(i);
        let _ = queue.dequeue();
    }
    let elapsed = start.elapsed();

    println!(
        "enqueue+dequeue: {:.1} ns/pair",
        elapsed.as_nanos() as f64 / ITERATIONS as f64
    );
}
