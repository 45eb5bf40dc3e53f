use num::Integer;
use num_bigint::{BigInt, RandBigInt};
use num_traits::One;
use rand::Rng;
use crate::rsa::error::RsaError;
use crate::RSA;

/// Verdict of a Miller-Rabin run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primality {
    Composite,
    ProbablyPrime,
}

impl RSA {
    /// Miller-Rabin with `rounds` random witnesses from `[2, n-2]`.
    ///
    /// A `ProbablyPrime` verdict is wrong with probability at most `4^-rounds`;
    /// `Composite` is always right.
    pub fn miller_rabin<R: Rng + ?Sized>(n: &BigInt, rounds: u32, rng: &mut R) -> Result<Primality, RsaError> {
        let two = BigInt::from(2);
        if n <= &two || n.is_even() {
            return Err(RsaError::InvalidCandidate(n.clone()));
        }
        // [2, n-2] is empty for 3
        if n == &BigInt::from(3) { return Ok(Primality::ProbablyPrime); }
        let m: BigInt = n - 1;
        let mut d = m.clone();
        let mut s = 0u64;
        while d.is_even() {
            d >>= 1;
            s += 1;
        }
        'witness: for _ in 0..rounds {
            let a = rng.gen_bigint_range(&two, &m);
            let mut x = RSA::fast_modular_exponent(&a, &d, n);
            if x.is_one() || x == m { continue; }
            for _ in 1..s {
                x = (&x * &x) % n;
                if x == m { continue 'witness; }
            }
            return Ok(Primality::Composite);
        }
        Ok(Primality::ProbablyPrime)
    }

    /// All primes `<= limit`, sieving odd candidates only.
    pub fn sieve_primes(limit: u64) -> Vec<u64> {
        if limit < 2 { return Vec::new(); }
        // slot i stands for 2i + 3
        let slots = ((limit - 1) / 2) as usize;
        let mut composite = vec![false; slots];
        let mut i = 0;
        while i < slots {
            let p = 2 * i as u64 + 3;
            if p * p > limit { break; }
            if !composite[i] {
                let mut j = ((p * p - 3) / 2) as usize;
                while j < slots {
                    composite[j] = true;
                    j += p as usize;
                }
            }
            i += 1;
        }
        let mut primes = vec![2];
        primes.extend(composite.iter().enumerate()
            .filter(|(_, c)| !**c)
            .map(|(i, _)| 2 * i as u64 + 3));
        primes
    }

    /// Primes in `(low, high]`.
    pub fn primes_in_range(low: u64, high: u64) -> Vec<u64> {
        RSA::sieve_primes(high).into_iter().filter(|p| *p > low).collect()
    }
}
