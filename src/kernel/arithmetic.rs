//! Arbitrary-precision modular arithmetic kernel.
//!
//! Every operation here is a pure function of its inputs (no RNG, no I/O).
//! `n` always denotes a modulus and every operation that takes one requires
//! `n > 0`, failing with `Error::InvalidArgument` otherwise.

use num_bigint::BigInt as Integer;
use num_integer::Integer as NumInteger;
use num_traits::{One, Signed, Zero};

use crate::error::Error;

/// One `(prime, exponent)` pair in a factorization `n = prod(p_i^k_i)`.
/// Primes are not verified to be prime; exponents must be >= 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrtFactor {
    pub prime: Integer,
    pub exponent: u32,
}

impl CrtFactor {
    pub fn new(prime: Integer, exponent: u32) -> Self {
        CrtFactor { prime, exponent }
    }
}

/// Merges duplicate primes in a factor list, summing their exponents.
fn merge_factors(factors: &[CrtFactor]) -> Vec<CrtFactor> {
    let mut merged: Vec<CrtFactor> = Vec::with_capacity(factors.len());
    for f in factors {
        match merged.iter_mut().find(|m: &&mut CrtFactor| m.prime == f.prime) {
            Some(existing) => existing.exponent += f.exponent,
            None => merged.push(f.clone()),
        }
    }
    merged
}

/// `base^exponent`, exact, no modulus. Used internally to build `p^k`.
fn int_pow(base: &Integer, mut exponent: u32) -> Integer {
    let mut result = Integer::one();
    let mut b = base.clone();
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = &result * &b;
        }
        b = &b * &b;
        exponent >>= 1;
    }
    result
}

/// Returns `a` if `a >= 0`, else `-a`.
pub fn abs(a: &Integer) -> Integer {
    a.abs()
}

/// Number of bits needed to represent `|a|`. `bit_length(0) == 0`.
pub fn bit_length(a: &Integer) -> u64 {
    a.bits()
}

/// Total order on `Integer`.
pub fn min(a: &Integer, b: &Integer) -> Integer {
    if a <= b {
        a.clone()
    } else {
        b.clone()
    }
}

/// Total order on `Integer`.
pub fn max(a: &Integer, b: &Integer) -> Integer {
    if a >= b {
        a.clone()
    } else {
        b.clone()
    }
}

/// Iterative extended Euclidean algorithm, valid for any `a, b` with `b`
/// eventually reducing to zero (no sign precondition). Internal building
/// block for the public `egcd`, `mod_inverse`, and `crt`.
fn extended_gcd_raw(a: &Integer, b: &Integer) -> (Integer, Integer, Integer) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (Integer::one(), Integer::zero());
    let (mut old_t, mut t) = (Integer::zero(), Integer::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let tmp_r = r.clone();
        r = &old_r - &quotient * &r;
        old_r = tmp_r;

        let tmp_s = s.clone();
        s = &old_s - &quotient * &s;
        old_s = tmp_s;

        let tmp_t = t.clone();
        t = &old_t - &quotient * &t;
        old_t = tmp_t;
    }

    (old_r, old_s, old_t)
}

/// `(g, x, y)` with `g = gcd(a, b)` and `a*x + b*y = g`. Requires `a > 0`
/// and `b > 0`.
pub fn egcd(a: &Integer, b: &Integer) -> Result<(Integer, Integer, Integer), Error> {
    if a <= &Integer::zero() || b <= &Integer::zero() {
        return Err(Error::invalid_argument("egcd requires both operands to be positive"));
    }
    Ok(extended_gcd_raw(a, b))
}

/// Binary (Stein's) GCD over `|a|`, `|b|`. Returns the other operand's
/// absolute value when one input is zero; always non-negative.
pub fn gcd(a: &Integer, b: &Integer) -> Integer {
    let mut u = a.magnitude().clone();
    let mut v = b.magnitude().clone();

    if u.is_zero() {
        return Integer::from(v);
    }
    if v.is_zero() {
        return Integer::from(u);
    }

    let i = u.trailing_zeros().unwrap_or(0) as usize;
    let j = v.trailing_zeros().unwrap_or(0) as usize;
    u >>= i;
    v >>= j;
    let shift = i.min(j);

    loop {
        if u > v {
            std::mem::swap(&mut u, &mut v);
        }
        v -= &u;
        if v.is_zero() {
            break;
        }
        let tz = v.trailing_zeros().unwrap_or(0) as usize;
        v >>= tz;
    }

    Integer::from(u << shift)
}

/// `0` when both inputs are zero; otherwise `|a*b| / gcd(a,b)`.
pub fn lcm(a: &Integer, b: &Integer) -> Integer {
    if a.is_zero() && b.is_zero() {
        return Integer::zero();
    }
    ((a * b) / gcd(a, b)).abs()
}

/// Canonical non-negative residue of `a` modulo `n`, in `[0, n)`.
pub fn to_zn(a: &Integer, n: &Integer) -> Result<Integer, Error> {
    if n <= &Integer::zero() {
        return Err(Error::invalid_argument("modulus must be positive"));
    }
    let r = a % n;
    if r.is_negative() {
        Ok(r + n)
    } else {
        Ok(r)
    }
}

/// The unique `x` in `[0, n)` with `a*x == 1 (mod n)`. Fails with
/// `Error::NoInverse` when `gcd(a, n) != 1` or with `Error::InvalidArgument`
/// when `n <= 0`.
pub fn mod_inverse(a: &Integer, n: &Integer) -> Result<Integer, Error> {
    if n <= &Integer::zero() {
        return Err(Error::invalid_argument("modulus must be positive"));
    }
    let a_mod = to_zn(a, n)?;
    let (g, x, _y) = extended_gcd_raw(&a_mod, n);
    if g != Integer::one() {
        return Err(Error::NoInverse);
    }
    to_zn(&x, n)
}

/// Right-to-left square-and-multiply, no CRT acceleration. `e` must be
/// non-negative; `base` must already be reduced into `[0, n)`.
fn mod_pow_plain(base: &Integer, e: &Integer, n: &Integer) -> Integer {
    let mut result = Integer::one();
    let mut b = base.clone();
    let mut exp = e.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &b) % n;
        }
        b = (&b * &b) % n;
        exp = &exp / 2;
    }

    result
}

/// CRT-accelerated exponentiation: reduces `e` modulo `phi(p_i^k_i)` for
/// each factor, exponentiates in each residue ring, and reconstructs with
/// `crt`. Must be bit-identical to the non-CRT path for a valid
/// factorization of `n`.
fn mod_pow_crt(
    base: &Integer,
    e: &Integer,
    n: &Integer,
    factors: &[CrtFactor],
) -> Result<Integer, Error> {
    let merged = merge_factors(factors);
    let mut remainders = Vec::with_capacity(merged.len());
    let mut moduli = Vec::with_capacity(merged.len());

    for factor in &merged {
        let m_i = int_pow(&factor.prime, factor.exponent);
        let phi_i = phi(std::slice::from_ref(factor));
        let e_mod = to_zn(e, &phi_i)?;
        let base_i = to_zn(base, &m_i)?;
        remainders.push(mod_pow_plain(&base_i, &e_mod, &m_i));
        moduli.push(m_i);
    }

    crt(&remainders, &moduli, Some(n.clone()))
}

/// `b^e mod n`. `n` must be `> 0`. `n == 1` returns `0`. A negative `e`
/// returns `mod_inverse(mod_pow(b, |e|, n), n)`, inheriting `NoInverse`.
/// `b` is normalized via `to_zn` before exponentiation. When `factors` names
/// a (merged) factorization of `n`, the CRT-accelerated path is used.
pub fn mod_pow(
    b: &Integer,
    e: &Integer,
    n: &Integer,
    factors: Option<&[CrtFactor]>,
) -> Result<Integer, Error> {
    if n <= &Integer::zero() {
        return Err(Error::invalid_argument("modulus must be positive"));
    }
    if n == &Integer::one() {
        return Ok(Integer::zero());
    }
    if e.is_negative() {
        let positive = mod_pow(b, &(-e), n, factors)?;
        return mod_inverse(&positive, n);
    }

    let base = to_zn(b, n)?;
    match factors {
        Some(fs) if !fs.is_empty() => mod_pow_crt(&base, e, n, fs),
        _ => Ok(mod_pow_plain(&base, e, n)),
    }
}

/// Chinese Remainder reconstruction: the unique `x` in `[0, N)` with
/// `x == remainders[i] (mod moduli[i])`. `N` defaults to the product of
/// `moduli` when not given. Moduli should be pairwise coprime (not
/// validated up front — a non-coprime pair surfaces as `Error::NoInverse`).
pub fn crt(
    remainders: &[Integer],
    moduli: &[Integer],
    n: Option<Integer>,
) -> Result<Integer, Error> {
    if remainders.is_empty() || remainders.len() != moduli.len() {
        return Err(Error::invalid_argument(
            "crt requires non-empty, equal-length remainder and modulus arrays",
        ));
    }

    let big_n = match n {
        Some(n) => n,
        None => moduli.iter().fold(Integer::one(), |acc, m| acc * m),
    };
    if big_n <= Integer::zero() {
        return Err(Error::invalid_argument("crt modulus product must be positive"));
    }

    let mut x = Integer::zero();
    for (r, m) in remainders.iter().zip(moduli.iter()) {
        if m <= &Integer::zero() {
            return Err(Error::invalid_argument("each CRT modulus must be positive"));
        }
        let partial_modulus = &big_n / m;
        let inverse = mod_inverse(&partial_modulus, m)?;
        x += to_zn(r, m)? * &partial_modulus * inverse;
    }

    to_zn(&x, &big_n)
}

/// Euler's totient of a factorization: `prod(p_i^(k_i - 1) * (p_i - 1))`.
/// Duplicate primes are merged first.
pub fn phi(factors: &[CrtFactor]) -> Integer {
    let merged = merge_factors(factors);
    let mut result = Integer::one();
    for factor in &merged {
        let p_pow = int_pow(&factor.prime, factor.exponent.saturating_sub(1));
        result = &result * &p_pow * (&factor.prime - Integer::one());
    }
    result
}

/// Folds `values` under addition mod `n`, returning a canonical residue.
pub fn mod_add(values: &[Integer], n: &Integer) -> Result<Integer, Error> {
    if n <= &Integer::zero() {
        return Err(Error::invalid_argument("modulus must be positive"));
    }
    let sum = values.iter().fold(Integer::zero(), |acc, v| acc + v);
    to_zn(&sum, n)
}

/// Folds `values` under multiplication mod `n`, returning a canonical
/// residue.
pub fn mod_multiply(values: &[Integer], n: &Integer) -> Result<Integer, Error> {
    if n <= &Integer::zero() {
        return Err(Error::invalid_argument("modulus must be positive"));
    }
    let product = values.iter().fold(Integer::one(), |acc, v| acc * v);
    to_zn(&product, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i(v: i64) -> Integer {
        Integer::from(v)
    }

    #[test]
    fn bit_length_boundaries() {
        assert_eq!(bit_length(&i(0)), 0);
        assert_eq!(bit_length(&i(1)), 1);
        assert_eq!(bit_length(&i(-2)), 2);
        assert_eq!(bit_length(&"11592217955149597331".parse::<Integer>().unwrap()), 64);
    }

    #[test]
    fn to_zn_matches_spec_vectors() {
        assert_eq!(to_zn(&i(1), &i(19)).unwrap(), i(1));
        assert_eq!(to_zn(&i(-25), &i(9)).unwrap(), i(2));
        assert_eq!(
            to_zn(&"12359782465012847510249".parse::<Integer>().unwrap(), &i(5)).unwrap(),
            i(4)
        );
        assert!(to_zn(&i(1), &i(0)).is_err());
    }

    #[test]
    fn mod_pow_matches_spec_vector() {
        assert_eq!(mod_pow(&i(4), &i(13), &i(497), None).unwrap(), i(445));
    }

    #[test]
    fn mod_pow_zero_modulus_fails() {
        assert!(mod_pow(&i(4), &i(13), &i(0), None).is_err());
    }

    #[test]
    fn mod_pow_modulus_one_is_zero() {
        assert_eq!(mod_pow(&i(7), &i(3), &i(1), None).unwrap(), i(0));
    }

    #[test]
    fn mod_inverse_matches_spec_vectors() {
        assert_eq!(mod_inverse(&i(3), &i(11)).unwrap(), i(4));
        assert!(mod_inverse(&i(6), &i(9)).is_err());
    }

    #[test]
    fn egcd_matches_spec_vector() {
        let (g, x, y) = egcd(&i(240), &i(46)).unwrap();
        assert_eq!(g, i(2));
        assert_eq!(&i(240) * &x + &i(46) * &y, g);
    }

    #[test]
    fn egcd_rejects_non_positive() {
        assert!(egcd(&i(0), &i(5)).is_err());
        assert!(egcd(&i(5), &i(-1)).is_err());
    }

    #[test]
    fn gcd_lcm_identity() {
        let a = i(240);
        let b = i(46);
        assert_eq!(&gcd(&a, &b) * &lcm(&a, &b), (&a * &b).abs());
        assert_eq!(gcd(&i(0), &i(0)), i(0));
        assert_eq!(lcm(&i(0), &i(0)), i(0));
        assert_eq!(gcd(&i(0), &i(7)), i(7));
    }

    #[test]
    fn negative_exponent_uses_mod_inverse() {
        let forward = mod_pow(&i(3), &i(4), &i(11), None).unwrap();
        let backward = mod_pow(&i(3), &i(-4), &i(11), None).unwrap();
        assert_eq!(mod_inverse(&forward, &i(11)).unwrap(), backward);
    }

    #[test]
    fn crt_reconstructs_known_residues() {
        let remainders = vec![i(2), i(3), i(2)];
        let moduli = vec![i(3), i(5), i(7)];
        let x = crt(&remainders, &moduli, None).unwrap();
        assert_eq!(x, i(23));
    }

    #[test]
    fn crt_rejects_mismatched_lengths() {
        assert!(crt(&[i(1), i(2)], &[i(3)], None).is_err());
    }

    #[test]
    fn mod_pow_crt_matches_plain_path() {
        let n = i(3) * i(5) * i(7);
        let factors = vec![
            CrtFactor::new(i(3), 1),
            CrtFactor::new(i(5), 1),
            CrtFactor::new(i(7), 1),
        ];
        let plain = mod_pow(&i(17), &i(100), &n, None).unwrap();
        let crt_accel = mod_pow(&i(17), &i(100), &n, Some(&factors)).unwrap();
        assert_eq!(plain, crt_accel);
    }

    #[test]
    fn phi_of_prime_power() {
        // phi(5^1) = 4, phi(2^3) = 4
        assert_eq!(phi(&[CrtFactor::new(i(5), 1)]), i(4));
        assert_eq!(phi(&[CrtFactor::new(i(2), 3)]), i(4));
    }

    #[test]
    fn phi_merges_duplicate_primes() {
        let direct = phi(&[CrtFactor::new(i(3), 3)]);
        let duplicated = phi(&[CrtFactor::new(i(3), 1), CrtFactor::new(i(3), 2)]);
        assert_eq!(direct, duplicated);
    }

    #[test]
    fn mod_add_and_mod_multiply_fold_to_canonical_residue() {
        assert_eq!(mod_add(&[i(7), i(8), i(-1)], &i(5)).unwrap(), i(4));
        assert_eq!(mod_multiply(&[i(7), i(8), i(-1)], &i(5)).unwrap(), i(1));
    }

    #[test]
    fn min_max_total_order() {
        assert_eq!(min(&i(3), &i(-5)), i(-5));
        assert_eq!(max(&i(3), &i(-5)), i(3));
    }
}
