//! Cryptographically secure random bytes, bits, and bounded integers.
//!
//! Entropy always comes from the host CSPRNG (`rand_core::OsRng`), never a
//! PRNG seeded from the clock. A CSPRNG read error is surfaced as
//! `Error::EntropyFailure` rather than silently falling back to weaker
//! output.

use num_bigint::{BigInt as Integer, Sign};
use rand_core::{OsRng, RngCore};

use crate::error::Error;
use crate::kernel;

/// Defensive cap on a single entropy read, carried over from the browser
/// CSPRNG API this crate's behavior is specified against — not a limit
/// `OsRng` itself imposes, but cheap to keep.
const MAX_CHUNK_BYTES: usize = 65_536;

fn fill_secure(buf: &mut [u8]) -> Result<(), Error> {
    for chunk in buf.chunks_mut(MAX_CHUNK_BYTES) {
        OsRng
            .try_fill_bytes(chunk)
            .map_err(|e| Error::entropy_failure(e.to_string()))?;
    }
    Ok(())
}

/// `len` secure random bytes. When `force_msb`, the top bit of byte 0 is
/// set (`buf[0] |= 0x80`). Fails when `len < 1`.
pub fn rand_bytes_sync(len: usize, force_msb: bool) -> Result<Vec<u8>, Error> {
    if len < 1 {
        return Err(Error::invalid_argument("byte length must be >= 1"));
    }
    let mut buf = vec![0u8; len];
    fill_secure(&mut buf)?;
    if force_msb {
        buf[0] |= 0x80;
    }
    tracing::trace!(len, force_msb, "drew secure random bytes");
    Ok(buf)
}

/// A buffer of exactly `ceil(bit_len / 8)` bytes whose value, interpreted
/// big-endian, has at most `bit_len` significant bits. When `force_msb`,
/// the bit at position `(bit_len - 1) mod 8` of byte 0 is set, forcing the
/// interpreted integer's bit length to be exactly `bit_len`. Fails when
/// `bit_len < 1`.
pub fn rand_bits_sync(bit_len: u64, force_msb: bool) -> Result<Vec<u8>, Error> {
    if bit_len < 1 {
        return Err(Error::invalid_argument("bit length must be >= 1"));
    }
    let byte_len = ((bit_len + 7) / 8) as usize;
    let mut buf = rand_bytes_sync(byte_len, false)?;

    // byte 0 is the most-significant byte of the big-endian buffer, but the
    // bits of *it* that matter are its low `remainder_bits` bits: the rest
    // of byte 0 covers bit positions >= bit_len and must be zeroed.
    let remainder_bits = (bit_len % 8) as u32;
    if remainder_bits != 0 {
        let keep_low_bits: u8 = ((1u16 << remainder_bits) - 1) as u8;
        buf[0] &= keep_low_bits;
    }
    if force_msb {
        let msb_mask: u8 = if remainder_bits != 0 {
            1u8 << (remainder_bits - 1)
        } else {
            0x80
        };
        buf[0] |= msb_mask;
    }

    tracing::trace!(bit_len, force_msb, "drew secure random bits");
    Ok(buf)
}

/// A uniformly random `Integer` in `[min, max]` inclusive, via rejection
/// sampling: draw a `bitLength(max-min)`-bit string until its value is
/// `<= max-min`, then add `min`. Requires `max > min`.
pub fn rand_between(max: &Integer, min: Option<&Integer>) -> Result<Integer, Error> {
    let owned_one;
    let min = match min {
        Some(m) => m,
        None => {
            owned_one = Integer::from(1);
            &owned_one
        }
    };
    if max <= min {
        return Err(Error::invalid_argument("max must be strictly greater than min"));
    }

    let range = max - min;
    let k = kernel::bit_length(&range);

    loop {
        let bits = rand_bits_sync(k, false)?;
        let candidate = Integer::from_bytes_be(Sign::Plus, &bits);
        if candidate <= range {
            return Ok(candidate + min);
        }
        tracing::trace!("rand_between rejection sampling retry");
    }
}

#[cfg(feature = "async")]
pub async fn rand_bytes(len: usize, force_msb: bool) -> Result<Vec<u8>, Error> {
    tokio::task::spawn_blocking(move || rand_bytes_sync(len, force_msb))
        .await
        .map_err(|e| Error::worker_failure(e.to_string()))?
}

#[cfg(feature = "async")]
pub async fn rand_bits(bit_len: u64, force_msb: bool) -> Result<Vec<u8>, Error> {
    tokio::task::spawn_blocking(move || rand_bits_sync(bit_len, force_msb))
        .await
        .map_err(|e| Error::worker_failure(e.to_string()))?
}
