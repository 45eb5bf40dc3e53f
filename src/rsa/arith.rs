use std::mem;
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use crate::RSA;

impl RSA {
    /// `a^q mod n` by square-and-multiply. Needs `n >= 1` and `q >= 0`.
    pub fn fast_modular_exponent(a: &BigInt, q: &BigInt, n: &BigInt) -> BigInt {
        debug_assert!(n >= &BigInt::one() && !q.is_negative());
        let mut r: BigInt = BigInt::one() % n;
        let mut a = a % n;
        let mut q = q.clone();
        while !q.is_zero() {
            if q.bit(0) { r = (r * &a) % n; }
            q >>= 1;
            a = (&a * &a) % n;
        }
        r
    }

    /// Euclid's algorithm, larger operand reduced first.
    pub fn gcd(a: &BigInt, b: &BigInt) -> BigInt {
        let (mut a, mut b) = (a.abs(), b.abs());
        if b > a { mem::swap(&mut a, &mut b); }
        while !b.is_zero() {
            let k = &a % &b;
            a = mem::replace(&mut b, k);
        }
        a
    }

    /// Returns `(g, s, t)` with `max(a, b) * s + min(a, b) * t == g`.
    ///
    /// The operands are put in descending order before reducing, so when `a < b`
    /// the coefficient of `a` is `t`, not `s`. Example: `(77, 43)` and `(43, 77)`
    /// both give `(1, 19, -34)`.
    pub fn extended_euclid(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
        let (mut a, mut b) = (a.abs(), b.abs());
        if b > a { mem::swap(&mut a, &mut b); }
        let (mut s1, mut t1) = (BigInt::one(), BigInt::zero());
        let (mut s2, mut t2) = (BigInt::zero(), BigInt::one());
        while !b.is_zero() {
            let q = &a / &b;
            let k = &a % &b;
            a = mem::replace(&mut b, k);
            let s = &s1 - &q * &s2;
            let t = &t1 - &q * &t2;
            s1 = mem::replace(&mut s2, s);
            t1 = mem::replace(&mut t2, t);
        }
        (a, s1, t1)
    }

    /// φ(n) for n = p·q.
    pub fn euler(p: &BigInt, q: &BigInt) -> BigInt { (p - 1) * (q - 1) }

    /// Decimal digit count of `n`, the width of every cipher block under it.
    pub fn block_width(n: &BigInt) -> usize {
        n.magnitude().to_radix_be(10).len()
    }
}
