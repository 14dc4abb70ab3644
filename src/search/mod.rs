//! Re-exports the prime search entry points.

mod prime_search;

pub use prime_search::prime_sync;

#[cfg(feature = "async")]
pub use prime_search::prime;
