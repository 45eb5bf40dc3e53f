use std::fmt::{Display, Formatter};
use std::str::FromStr;
use num_bigint::BigInt;
use num_traits::{One, Zero};
use crate::rsa::error::RsaError;

/// One half of a key pair: modulus `m` and exponent `base` (e for public, d for private).
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub base: BigInt,
    pub m: BigInt,
}

impl Key {
    pub fn new(m: impl Into<BigInt>, base: impl Into<BigInt>) -> Self {
        Self { base: base.into(), m: m.into() }
    }
}

/// Keys are written the way they are typed in: `n, exponent`.
impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.m, self.base)
    }
}

impl FromStr for Key {
    type Err = RsaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('(').trim_end_matches(')');
        let parts = s.split(',').map(|x| x.trim()).collect::<Vec<_>>();
        if parts.len() != 2 {
            return Err(RsaError::Parse(format!("expected `n, exponent', got `{}'", s)));
        }
        let parse = |x: &str| x.parse::<BigInt>()
            .map_err(|e| RsaError::Parse(format!("`{}': {}", x, e)));
        let (m, base) = (parse(parts[0])?, parse(parts[1])?);
        if m <= BigInt::one() || base < BigInt::zero() {
            return Err(RsaError::Parse(format!("`{}' is not a usable key", s)));
        }
        Ok(Self { base, m })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeySet {
    pub public: Key,
    pub private: Key,
}

impl KeySet {
    /// The `(n, e, d)` triple.
    pub fn triple(&self) -> (&BigInt, &BigInt, &BigInt) {
        (&self.public.m, &self.public.base, &self.private.base)
    }
}
