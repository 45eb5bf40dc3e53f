use num_bigint::BigInt;
use thiserror::Error;

/// Every failure the engine and the command line can report.
#[derive(Debug, Error)]
pub enum RsaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed ciphertext, key text or number.
    #[error("parse error: {0}")]
    Parse(String),

    /// Miller-Rabin only accepts odd candidates above 2.
    #[error("{0} is not an odd integer greater than 2")]
    InvalidCandidate(BigInt),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("no public exponent coprime to the totient is left to try")]
    ExponentExhausted,

    #[error("could not find two distinct probable primes in {draws} draws")]
    PrimesExhausted { draws: u64 },

    #[error("key length must be at least one digit, got {0}")]
    InvalidDigits(u32),

    /// A cipher block must be smaller than the modulus.
    #[error("cipher block {0} is not below the modulus")]
    BlockOutOfRange(BigInt),

    #[error("{0} does not map to a character")]
    InvalidCodePoint(BigInt),

    #[error("modulus {n} exceeds the trial division limit {limit}")]
    ModulusTooLarge { n: BigInt, limit: u64 },

    #[error("{0} has fewer than two nontrivial factors")]
    NoFactorPair(BigInt),

    #[error("unknown run mode `{0}', available: generate(default), encode, decode, encrypt-file, decrypt-file, break, break-file, primes, book")]
    UnknownMode(String),
}
