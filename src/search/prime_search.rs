//! Draws random candidates of a requested bit length and returns the first
//! one that survives `is_probably_prime`.

use num_bigint::{BigInt as Integer, Sign};

use crate::error::Error;
use crate::primality;
use crate::primality::DEFAULT_ITERATIONS;
use crate::rng;

#[cfg(feature = "async")]
use crate::workers::WorkerCoordinator;

/// Single-threaded candidate-generate-and-test loop. Each candidate is an
/// independent trial; the random source is reseeded only implicitly by the
/// OS CSPRNG. The result's `bit_length` always equals `bit_length` (the
/// candidate's MSB is forced).
pub fn prime_sync(bit_length: u64, iterations: u32) -> Result<Integer, Error> {
    if bit_length < 1 {
        return Err(Error::invalid_argument("bit length must be >= 1"));
    }

    loop {
        let bytes = rng::rand_bits_sync(bit_length, true)?;
        let candidate = Integer::from_bytes_be(Sign::Plus, &bytes);
        if primality::is_probably_prime(&candidate, iterations)? {
            return Ok(candidate);
        }
    }
}

/// Async entry point. Delegates to the `WorkerCoordinator` on a blocking
/// task — a thin scheduler over the same sync kernel, honoring the async
/// contract (a deferred value) even when the coordinator degrades to a
/// single-worker pool on a single-core host.
#[cfg(feature = "async")]
pub async fn prime(bit_length: u64, iterations: u32) -> Result<Integer, Error> {
    tokio::task::spawn_blocking(move || WorkerCoordinator::new().search(bit_length, iterations))
        .await
        .map_err(|e| Error::worker_failure(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel;

    #[test]
    fn prime_sync_matches_requested_bit_length() {
        let p = prime_sync(64, DEFAULT_ITERATIONS).unwrap();
        assert_eq!(kernel::bit_length(&p), 64);
        assert!(primality::is_probably_prime(&p, DEFAULT_ITERATIONS).unwrap());
    }

    #[test]
    fn prime_sync_rejects_zero_bit_length() {
        assert!(prime_sync(0, DEFAULT_ITERATIONS).is_err());
    }

    #[test]
    fn prime_sync_small_bit_lengths() {
        for bit_length in [2u64, 3, 4, 5, 8] {
            let p = prime_sync(bit_length, DEFAULT_ITERATIONS).unwrap();
            assert_eq!(kernel::bit_length(&p), bit_length);
        }
    }
}
