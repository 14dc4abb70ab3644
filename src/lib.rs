//! Arbitrary-precision integer primitives for cryptographic use.
//!
//! Three tightly coupled pieces: a modular-arithmetic kernel, a
//! cryptographically secure random source, and a probable-prime pipeline
//! (trial division plus iterated Miller-Rabin, optionally spread across a
//! pool of worker threads). Consumers are higher-level protocols — RSA key
//! generation, Paillier, discrete-log constructions — that need large
//! random primes and modular exponentiation.
//!
//! This crate makes **no constant-time guarantee**. It is a probabilistic
//! primality library, not a certified-prime library: `is_probably_prime`
//! can be wrong with probability at most `4^-iterations`, and there is no
//! deterministic primality proof (AKS, ECPP) anywhere in this crate.

mod error;
mod kernel;
mod primality;
mod rng;
mod search;
mod workers;

pub use error::Error;

pub use kernel::{
    abs, bit_length, crt, egcd, gcd, lcm, max, min, mod_add, mod_inverse, mod_multiply, mod_pow,
    phi, to_zn, CrtFactor, Integer,
};

pub use rng::{rand_between, rand_bits_sync, rand_bytes_sync};

pub use primality::{is_probably_prime, DEFAULT_ITERATIONS, SMALL_PRIMES};

pub use search::prime_sync;

pub use workers::{PrimalityResult, PrimalityTask, WorkerCoordinator};

#[cfg(feature = "async")]
pub use primality::is_probably_prime_async;
#[cfg(feature = "async")]
pub use rng::{rand_bits, rand_bytes};
#[cfg(feature = "async")]
pub use search::prime;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn prime_then_mod_pow_round_trip() {
        let p = prime_sync(64, DEFAULT_ITERATIONS).unwrap();
        assert_eq!(bit_length(&p), 64);
        assert!(is_probably_prime(&p, DEFAULT_ITERATIONS).unwrap());

        let base = Integer::from(7);
        let exp = &p - Integer::from(1);
        // Fermat's little theorem: base^(p-1) == 1 (mod p) for prime p not
        // dividing base.
        assert_eq!(mod_pow(&base, &exp, &p, None).unwrap(), Integer::from(1));
    }

    #[test]
    fn modinv_and_modpow_are_consistent_with_egcd() {
        let (g, x, y) = egcd(&Integer::from(240), &Integer::from(46)).unwrap();
        assert_eq!(g, Integer::from(2));
        assert_eq!(&Integer::from(240) * &x + &Integer::from(46) * &y, g);

        let inv = mod_inverse(&Integer::from(3), &Integer::from(11)).unwrap();
        assert_eq!(inv, Integer::from(4));
        assert_eq!(
            mod_multiply(&[Integer::from(3), inv], &Integer::from(11)).unwrap(),
            Integer::from(1)
        );
    }

    #[test]
    fn invalid_arguments_surface_as_typed_errors() {
        assert!(matches!(
            to_zn(&Integer::from(1), &Integer::from(0)),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            mod_inverse(&Integer::from(6), &Integer::from(9)),
            Err(Error::NoInverse)
        ));
    }
}
