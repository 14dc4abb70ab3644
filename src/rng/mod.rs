//! Re-exports the secure random source.

mod secure;

pub use secure::{rand_between, rand_bits_sync, rand_bytes_sync};

#[cfg(feature = "async")]
pub use secure::{rand_bits, rand_bytes};
