//! Multi-threaded enqueue/dequeue throughput benchmark.
//!
//! Usage:
//!     cargo run --release --bin queue_bench
//!
//! Environment variables:
//!     PRODUCERS=2       Producer thread count (default: 2)
//!     CONSUMERS=2       Consumer thread count (default: 2)
//!     ITERATIONS=N      Items enqueued per producer (default: 1 << 20)
//!     INITIAL_CAPACITY  Queue initial capacity (default: 30)
//!     PIN_CPUS=1        Pin each worker to its own core when set

use std::env;
use std::hint;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use minstant::Instant;

use ringq::RingBufferQueue;
use ringq::config::DEFAULT_CAPACITY;

const DEFAULT_WORKERS: usize = 2;
const DEFAULT_ITERATIONS: usize = 1 << 20;

#[derive(Debug, thiserror::Error)]
enum BenchError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidVar { name: &'static str, value: String },
    #[error("{0} must be at least 1")]
    NoWorkers(&'static str),
    #[error("worker thread panicked")]
    WorkerPanicked,
    #[error("checksum mismatch: enqueued {enqueued}, dequeued {dequeued}")]
    Checksum { enqueued: u64, dequeued: u64 },
}

struct BenchConfig {
    producers: usize,
    consumers: usize,
    iterations: usize,
    initial_capacity: usize,
    pin_cpus: bool,
}

fn env_usize(name: &'static str, default: usize) -> Result<usize, BenchError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| BenchError::InvalidVar { name, value }),
        Err(_) => Ok(default),
    }
}

fn load_config() -> Result<BenchConfig, BenchError> {
    let config = BenchConfig {
        producers: env_usize("PRODUCERS", DEFAULT_WORKERS)?,
        consumers: env_usize("CONSUMERS", DEFAULT_WORKERS)?,
        iterations: env_usize("ITERATIONS", DEFAULT_ITERATIONS)?,
        initial_capacity: env_usize("INITIAL_CAPACITY", DEFAULT_CAPACITY)?,
        pin_cpus: env::var_os("PIN_CPUS").is_some(),
    };
    if config.producers == 0 {
        return Err(BenchError::NoWorkers("PRODUCERS"));
    }
    if config.consumers == 0 {
        return Err(BenchError::NoWorkers("CONSUMERS"));
    }
    Ok(config)
}

/// Pins the calling thread to the `worker`-th core, wrapping around.
fn pin_worker(cores: Option<&[core_affinity::CoreId]>, worker: usize) {
    if let Some(cores) = cores
        && !cores.is_empty()
    {
        core_affinity::set_for_current(cores[worker % cores.len()]);
    }
}

fn join_all<R>(handles: Vec<JoinHandle<R>>) -> Result<Vec<R>, BenchError> {
    handles
        .into_iter()
        .map(|handle| handle.join().map_err(|_| BenchError::WorkerPanicked))
        .collect()
}

fn bench_throughput(config: &BenchConfig) -> Result<(), BenchError> {
    let queue = Arc::new(RingBufferQueue::<u64>::new(config.initial_capacity));
    let total = config.producers * config.iterations;
    let taken = Arc::new(AtomicUsize::new(0));
    let start_flag = Arc::new(AtomicBool::new(false));
    let cores = if config.pin_cpus {
        core_affinity::get_core_ids()
    } else {
        None
    };
    let cores = cores.map(Arc::new);

    let producers: Vec<_> = (0..config.producers)
        .map(|p| {
            let queue = Arc::clone(&queue);
            let start_flag = Arc::clone(&start_flag);
            let cores = cores.clone();
            let iterations = config.iterations;
            thread::spawn(move || {
                pin_worker(cores.as_deref().map(Vec::as_slice), p);
                while !start_flag.load(Ordering::Acquire) {
                    hint::spin_loop();
                }
                let base = (p * iterations) as u64;
                let mut sum = 0u64;
                for i in 0..iterations as u64 {
                    queue.enqueue(base + i);
                    sum = sum.wrapping_add(base + i);
                }
                sum
            })
        })
        .collect();

    let consumers: Vec<_> = (0..config.consumers)
        .map(|c| {
            let queue = Arc::clone(&queue);
            let start_flag = Arc::clone(&start_flag);
            let taken = Arc::clone(&taken);
            let cores = cores.clone();
            let worker = config.producers + c;
            thread::spawn(move || {
                pin_worker(cores.as_deref().map(Vec::as_slice), worker);
                while !start_flag.load(Ordering::Acquire) {
                    hint::spin_loop();
                }
                let mut sum = 0u64;
                while taken.load(Ordering::Relaxed) < total {
                    if let Some(value) = queue.dequeue() {
                        taken.fetch_add(1, Ordering::Relaxed);
                        sum = sum.wrapping_add(value);
                    } else {
                        hint::spin_loop();
                    }
                }
                sum
            })
        })
        .collect();

    let start = Instant::now();
    start_flag.store(true, Ordering::Release);

    let enqueued = join_all(producers)?
        .into_iter()
        .fold(0u64, u64::wrapping_add);
    let dequeued = join_all(consumers)?
        .into_iter()
        .fold(0u64, u64::wrapping_add);
    let elapsed = start.elapsed();

    if enqueued != dequeued {
        return Err(BenchError::Checksum { enqueued, dequeued });
    }

    // Each item is one enqueue plus one dequeue.
    let ops = 2 * total as u128;
    let ops_per_ms = ops * 1_000_000 / elapsed.as_nanos().max(1);
    println!("{ops_per_ms} ops/ms");
    println!("final capacity: {}", queue.capacity());
    Ok(())
}

fn run() -> Result<(), BenchError> {
    ringq::init_tracing();
    let config = load_config()?;

    println!(
        "ringq RingBufferQueue (producers={}, consumers={}, iters={}, initial_capacity={}):",
        config.producers, config.consumers, config.iterations, config.initial_capacity
    );
    bench_throughput(&config)
}

fn main() {
    if let Err(e) = run() {
        eprintln!("queue_bench: {e}");
        std::process::exit(1);
    }
}
