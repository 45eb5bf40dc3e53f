use std::collections::HashSet;
use chrono::Local;
use num::Integer;
use num_bigint::{BigInt, RandBigInt};
use num_traits::{One, Pow, Signed, ToPrimitive, Zero};
use rand::Rng;
use crate::rsa::error::RsaError;
use crate::rsa::keys::{Key, KeySet};
use crate::rsa::prime_gen::Primality;
use crate::{say, RSA};

impl RSA {
    /// Picks `e` uniformly from the untried values of `[2, φ)` until one is coprime
    /// to φ and differs from both primes. Returns `(n, e)`.
    pub fn find_public_exponent<R: Rng + ?Sized>(p: &BigInt, q: &BigInt, rng: &mut R) -> Result<(BigInt, BigInt), RsaError> {
        let n = p * q;
        let f = RSA::euler(p, q);
        let two = BigInt::from(2);
        if f <= two { return Err(RsaError::ExponentExhausted); }
        let pool = (&f - &two).to_u64().unwrap_or(u64::MAX);
        let mut tried = HashSet::new();
        while (tried.len() as u64) < pool {
            let e = rng.gen_bigint_range(&two, &f);
            if tried.contains(&e) { continue; }
            if RSA::gcd(&e, &f).is_one() && &e != p && &e != q {
                return Ok((n, e));
            }
            tried.insert(e);
        }
        Err(RsaError::ExponentExhausted)
    }

    /// Inverse of `e` modulo `(p-1)(q-1)`.
    pub fn find_private_exponent(e: &BigInt, p: &BigInt, q: &BigInt) -> Result<BigInt, RsaError> {
        if e == p || e == q {
            return Err(RsaError::KeyDerivation(format!("e = {} equals one of the primes", e)));
        }
        let f = RSA::euler(p, q);
        if f <= BigInt::one() {
            return Err(RsaError::KeyDerivation(format!("totient of ({}, {}) is {}", p, q, f)));
        }
        let (g, s, t) = RSA::extended_euclid(e, &f);
        if !g.is_one() {
            return Err(RsaError::KeyDerivation(format!("e = {} is not coprime to {}", e, f)));
        }
        let mut d = if e.abs() >= f { s } else { t };
        while d.is_negative() { d += &f; }
        RSA::check_key_set(&d, e, &f)?;
        Ok(d)
    }

    pub fn check_key_set(d: &BigInt, e: &BigInt, f: &BigInt) -> Result<(), RsaError> {
        if d.is_negative() || d >= f {
            return Err(RsaError::KeyDerivation(format!("d = {} is outside [0, {})", d, f)));
        }
        let res = (d * e) % f;
        say!("(d * e) % f = {} % {} = {}", d * e, f, res);
        if !res.is_one() {
            return Err(RsaError::KeyDerivation(format!("{} * {} mod {} = {}", d, e, f, res)));
        }
        Ok(())
    }

    /// Draws odd candidates from `[10^(t-1)+1, 10^t+1)` until two distinct probable
    /// primes turn up, then derives the key pair from them.
    pub fn generate_key<R: Rng + ?Sized>(&self, digits: u32, rng: &mut R) -> Result<KeySet, RsaError> {
        if digits == 0 { return Err(RsaError::InvalidDigits(digits)); }
        let ten = BigInt::from(10);
        let mut low: BigInt = ten.clone().pow(digits - 1) + 1;
        if low.is_even() { low += 1; }
        let high: BigInt = ten.pow(digits) + 1;
        // odd candidates are low + 2k for k in [0, slots)
        let slots: BigInt = (&high - &low + 1) / 2;
        let start = Local::now().timestamp_millis();
        let mut primes: Vec<BigInt> = Vec::new();
        let mut draws = 0;
        while primes.len() < 2 {
            if draws >= self.retry {
                say!("Failed generation in {} tries after {} ms", draws, Local::now().timestamp_millis() - start);
                return Err(RsaError::PrimesExhausted { draws });
            }
            draws += 1;
            let candidate = &low + rng.gen_bigint_range(&BigInt::zero(), &slots) * 2;
            if primes.contains(&candidate) { continue; }
            if RSA::miller_rabin(&candidate, self.rounds, rng)? == Primality::ProbablyPrime {
                primes.push(candidate);
            }
        }
        say!("Done generation in {} tries after {} ms", draws, Local::now().timestamp_millis() - start);
        let (p, q) = (&primes[0], &primes[1]);
        let (n, e) = RSA::find_public_exponent(p, q, rng)?;
        let d = RSA::find_private_exponent(&e, p, q)?;
        Ok(KeySet { public: Key { m: n.clone(), base: e }, private: Key { m: n, base: d } })
    }
}
