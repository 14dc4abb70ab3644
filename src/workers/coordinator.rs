//! Fans candidate primality checks out to a pool of native threads,
//! consumes the first `true` result, and cancels the rest.
//!
//! There is no shared mutable state between workers beyond a best-effort
//! stop flag: each worker owns only its current task and a handle to the
//! OS CSPRNG via the coordinator, which mints every candidate.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use num_bigint::{BigInt as Integer, Sign};

use crate::error::Error;
use crate::primality;
use crate::rng;

/// A request sent to a worker: the candidate to test and how many
/// Miller-Rabin rounds to run. `id` identifies which worker is being
/// addressed, so a reply can be matched back to the channel that should
/// receive its next task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimalityTask {
    pub candidate: Integer,
    pub iterations: u32,
    pub id: u64,
}

/// A worker's reply to a `PrimalityTask`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimalityResult {
    pub candidate: Integer,
    pub is_prime: bool,
    pub id: u64,
}

enum Command {
    Task(PrimalityTask),
    Shutdown,
}

enum Outcome {
    Result(PrimalityResult),
    Failed(String),
}

fn draw_candidate(bit_length: u64) -> Result<Integer, Error> {
    let bytes = rng::rand_bits_sync(bit_length, true)?;
    Ok(Integer::from_bytes_be(Sign::Plus, &bytes))
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked with a non-string payload".to_string()
    }
}

fn worker_loop(
    id: u64,
    task_rx: mpsc::Receiver<Command>,
    result_tx: mpsc::Sender<Outcome>,
    stop: Arc<AtomicBool>,
) {
    while let Ok(command) = task_rx.recv() {
        let task = match command {
            Command::Shutdown => break,
            Command::Task(task) => task,
        };
        if stop.load(Ordering::Relaxed) {
            break;
        }

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            primality::is_probably_prime(&task.candidate, task.iterations)
        }));

        let message = match outcome {
            Ok(Ok(is_prime)) => Outcome::Result(PrimalityResult {
                candidate: task.candidate,
                is_prime,
                id,
            }),
            Ok(Err(e)) => Outcome::Failed(e.to_string()),
            Err(panic) => Outcome::Failed(panic_message(panic)),
        };

        if result_tx.send(message).is_err() {
            break;
        }
    }
}

/// Exploits hardware parallelism to shorten expected prime-search latency.
/// Self-contained: a worker pool is created at the start of `search` and
/// torn down on every exit path (success, worker failure, or candidate-draw
/// failure). There is no global pool and no memoization.
pub struct WorkerCoordinator {
    pool_size: usize,
}

impl WorkerCoordinator {
    /// `pool_size = max(1, available_parallelism - 1)`.
    pub fn new() -> Self {
        let available = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self {
            pool_size: available.saturating_sub(1).max(1),
        }
    }

    /// Forces a specific pool size. Useful for deterministic tests.
    pub fn with_pool_size(pool_size: usize) -> Self {
        Self {
            pool_size: pool_size.max(1),
        }
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Repeatedly draws bit-length candidates across `pool_size` worker
    /// threads and returns the first one that tests as a probable prime.
    /// A worker failure (panic or propagated `Error`) aborts every worker
    /// and fails the whole call.
    pub fn search(&self, bit_length: u64, iterations: u32) -> Result<Integer, Error> {
        if bit_length < 1 {
            return Err(Error::invalid_argument("bit length must be >= 1"));
        }

        let stop = Arc::new(AtomicBool::new(false));
        let (result_tx, result_rx) = mpsc::channel::<Outcome>();
        let mut task_txs = Vec::with_capacity(self.pool_size);
        let mut handles = Vec::with_capacity(self.pool_size);

        for worker_id in 0..self.pool_size {
            let (task_tx, task_rx) = mpsc::channel::<Command>();
            let result_tx = result_tx.clone();
            let stop_flag = Arc::clone(&stop);
            let handle = thread::Builder::new()
                .name(format!("prime-search-worker-{worker_id}"))
                .spawn(move || worker_loop(worker_id as u64, task_rx, result_tx, stop_flag))
                .map_err(|e| Error::worker_failure(e.to_string()))?;
            tracing::info!(worker_id, "spawned primality worker");
            task_txs.push(task_tx);
            handles.push(handle);
        }

        let outcome = (|| -> Result<Integer, Error> {
            for (worker_id, tx) in task_txs.iter().enumerate() {
                let candidate = draw_candidate(bit_length)?;
                let task = PrimalityTask {
                    candidate,
                    iterations,
                    id: worker_id as u64,
                };
                let _ = tx.send(Command::Task(task));
            }

            loop {
                match result_rx.recv() {
                    Ok(Outcome::Result(result)) if result.is_prime => return Ok(result.candidate),
                    Ok(Outcome::Result(result)) => {
                        let candidate = draw_candidate(bit_length)?;
                        let next = PrimalityTask {
                            candidate,
                            iterations,
                            id: result.id,
                        };
                        let _ = task_txs[result.id as usize].send(Command::Task(next));
                    }
                    Ok(Outcome::Failed(message)) => {
                        tracing::warn!(%message, "primality worker failed");
                        return Err(Error::worker_failure(message));
                    }
                    Err(_) => {
                        return Err(Error::worker_failure(
                            "all primality workers disconnected unexpectedly",
                        ))
                    }
                }
            }
        })();

        stop.store(true, Ordering::SeqCst);
        for tx in &task_txs {
            let _ = tx.send(Command::Shutdown);
        }
        drop(task_txs);
        for handle in handles {
            let _ = handle.join();
        }
        tracing::info!(pool_size = self.pool_size, "primality worker pool torn down");

        outcome
    }
}

impl Default for WorkerCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
