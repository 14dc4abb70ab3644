//! Re-exports the arbitrary-precision arithmetic kernel.

mod arithmetic;

pub use arithmetic::{
    abs, bit_length, crt, egcd, gcd, lcm, max, min, mod_add, mod_inverse, mod_multiply, mod_pow,
    phi, to_zn, CrtFactor,
};

/// The sole arbitrary-precision integer type threaded through this crate's
/// public API. Machine integers coerce into it via `From`; non-integer
/// floats are deliberately not convertible.
pub type Integer = num_bigint::BigInt;
