//! Re-exports the probable-prime tester.

mod miller_rabin;

pub use miller_rabin::{is_probably_prime, DEFAULT_ITERATIONS, SMALL_PRIMES};

#[cfg(feature = "async")]
pub use miller_rabin::is_probably_prime_async;
