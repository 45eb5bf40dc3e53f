use chrono::Local;
use indicatif::ProgressBar;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use crate::rsa::config::is_silent;
use crate::rsa::error::RsaError;
use crate::rsa::keys::{Key, KeySet};
use crate::{say, RSA};

const PROGRESS_STEP: u64 = 1 << 16;

impl RSA {
    /// Every divisor of `n` in `[2, n)`, ascending; empty when `n` is prime.
    ///
    /// Plain trial division, linear in `n`, so moduli above `factor_limit` are refused.
    pub fn factorize(&self, n: &BigInt) -> Result<Vec<BigInt>, RsaError> {
        let too_large = || RsaError::ModulusTooLarge { n: n.clone(), limit: self.factor_limit };
        let m = n.to_u64().ok_or_else(too_large)?;
        if m > self.factor_limit { return Err(too_large()); }
        let start = Local::now().timestamp_millis();
        let pb = if is_silent() { None } else { Some(ProgressBar::new(m)) };
        let mut factors = Vec::new();
        for i in 2..m {
            if m % i == 0 { factors.push(BigInt::from(i)); }
            if i % PROGRESS_STEP == 0 {
                if let Some(pb) = &pb { pb.set_position(i); }
            }
        }
        if let Some(pb) = &pb { pb.finish_and_clear(); }
        say!("factored {} in {} ms: {:?}", n, Local::now().timestamp_millis() - start,
            factors.iter().map(|f| f.to_string()).collect::<Vec<_>>());
        Ok(factors)
    }

    /// Recovers a private key for `public` from the first pair of factors of its modulus and
    /// decodes `ciphertext` with it.
    ///
    /// The pair is trusted as is: it is not checked to multiply back to `n`, so a modulus
    /// with more than two prime factors gives a key that need not work.
    pub fn break_key(&self, public: &Key, ciphertext: &[BigInt]) -> Result<(KeySet, String), RsaError> {
        let factors = self.factorize(&public.m)?;
        let (p, q) = match factors.as_slice() {
            [p, q, ..] => (p, q),
            _ => return Err(RsaError::NoFactorPair(public.m.clone())),
        };
        let d = RSA::find_private_exponent(&public.base, p, q)?;
        let private = Key { m: public.m.clone(), base: d };
        let message = RSA::decode(&private, ciphertext)?;
        say!("**********");
        say!("Decoded message: {}", message);
        say!("Private key: {}", private.base);
        Ok((KeySet { public: public.clone(), private }, message))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::fs;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::rsa::config::CONFIG_DEF;
    use super::*;

    fn big(x: i64) -> BigInt { BigInt::from(x) }

    fn blocks(key: &Key, message: &str) -> Result<Vec<BigInt>, RsaError> {
        RSA::split_blocks(&RSA::encode(key, message).concat(), RSA::block_width(&key.m))
    }

    #[test]
    fn factor_lists() -> Result<(), RsaError> {
        let rsa = CONFIG_DEF.clone();
        assert_eq!(rsa.factorize(&big(3233))?, vec![big(53), big(61)]);
        assert_eq!(rsa.factorize(&big(97))?, Vec::<BigInt>::new());
        assert_eq!(rsa.factorize(&big(12))?, vec![big(2), big(3), big(4), big(6)]);
        assert_eq!(rsa.factorize(&big(2))?, Vec::<BigInt>::new());
        Ok(())
    }

    #[test]
    fn size_guard() {
        let mut rsa = CONFIG_DEF.clone();
        rsa.factor_limit = 1000;
        assert!(matches!(rsa.factorize(&big(3233)), Err(RsaError::ModulusTooLarge { limit: 1000, .. })));
        let huge = BigInt::from(u64::MAX) * 3;
        assert!(matches!(CONFIG_DEF.factorize(&huge), Err(RsaError::ModulusTooLarge { .. })));
    }

    #[test]
    fn break_textbook_key() -> Result<(), RsaError> {
        let public = Key::new(3233, 17);
        let ciphertext = blocks(&public, "Attack at dawn")?;
        let (keys, message) = CONFIG_DEF.break_key(&public, &ciphertext)?;
        assert_eq!(keys.private, Key::new(3233, 2753));
        assert_eq!(message, "Attack at dawn");
        Ok(())
    }

    #[test]
    fn break_generated_key() -> Result<(), RsaError> {
        let rsa = CONFIG_DEF.clone();
        let mut rng = StdRng::seed_from_u64(21);
        let keys = rsa.generate_key(3, &mut rng)?;
        let ciphertext = blocks(&keys.public, "weak keys leak")?;
        let (broken, message) = rsa.break_key(&keys.public, &ciphertext)?;
        assert_eq!(message, "weak keys leak");
        assert_eq!(RSA::decode(&broken.private, &ciphertext)?, "weak keys leak");
        assert_eq!(broken.private, keys.private);
        Ok(())
    }

    #[test]
    fn prime_modulus_cannot_be_broken() {
        assert!(matches!(CONFIG_DEF.break_key(&Key::new(3229, 17), &[]), Err(RsaError::NoFactorPair(_))));
        // 49 only has the factor 7
        assert!(matches!(CONFIG_DEF.break_key(&Key::new(49, 5), &[]), Err(RsaError::NoFactorPair(_))));
    }

    #[test]
    fn first_pair_is_used() -> Result<(), RsaError> {
        // 105 = 3 * 5 * 7; the pair (3, 5) gives φ = 8 and 7 is its own inverse mod 8
        let (keys, message) = CONFIG_DEF.break_key(&Key::new(105, 7), &[])?;
        assert_eq!(keys.private, Key::new(105, 7));
        assert_eq!(message, "");
        Ok(())
    }

    #[test]
    fn break_from_file() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("secret.txt");
        fs::write(&source, "The quick brown fox jumps over the lazy dog")?;
        let public = Key::new(3233, 17);
        let encrypted = RSA::encrypt_file(&source, &public)?;
        let (keys, message) = CONFIG_DEF.break_file(&public, &encrypted)?;
        assert_eq!(message, "The quick ");
        assert_eq!(keys.private.base, big(2753));
        Ok(())
    }

    #[test]
    fn break_from_file_with_bad_tail() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("fox.txt");
        fs::write(&source, "The quick brown fox")?;
        let public = Key::new(3233, 17);
        let encrypted = RSA::encrypt_file(&source, &public)?;
        let mut stream = fs::read_to_string(&encrypted)?;
        stream.push_str("12x");
        fs::write(&encrypted, stream)?;
        let (keys, message) = CONFIG_DEF.break_file(&public, &encrypted)?;
        assert_eq!(message, "The quick ");
        assert_eq!(keys.private.base, big(2753));
        Ok(())
    }
}
