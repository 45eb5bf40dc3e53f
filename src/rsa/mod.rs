use std::error::Error;
use clap::Parser;
use num_bigint::BigInt;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub mod arith;
pub mod breaker;
pub mod codec;
pub mod config;
pub mod error;
pub mod file_codec;
pub mod keygen;
pub mod keys;
pub mod prime_gen;

use config::*;
use error::RsaError;
use keys::*;
use crate::say;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Generate,
    Encode,
    Decode,
    EncryptFile,
    DecryptFile,
    Break,
    BreakFile,
    Primes,
    Book,
}

#[macro_export]
macro_rules! rsa_t {
    ($CONFIG: expr, $NAME: ident) => {
#[derive(Debug, Clone, Parser)]
pub struct $NAME {
    #[clap(short, long, value_parser, default_value = $CONFIG.mode.as_str(), help = "Run mode: generate, encode, decode, encrypt-file, decrypt-file, break, break-file, primes, book")]
    pub mode: String,
    #[clap(short, long, value_parser, help = "Key as `n, e' for encoding or `n, d' for decoding")]
    pub key: Option<String>,
    #[clap(short, long, value_parser, help = "Public key `n, e' to break when the private key is unknown")]
    pub public: Option<String>,
    #[clap(long, value_parser, help = "Message to encode")]
    pub message: Option<String>,
    #[clap(short, long, value_parser, help = "Ciphertext as `[xxx, yyy, ...]' or `xxxyyy...'")]
    pub ciphertext: Option<String>,
    #[clap(short, long, value_parser, help = "Input filename")]
    pub input: Option<String>,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.digits, help = "Decimal digits of each generated prime")]
    pub digits: u32,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.rounds, help = "Miller Rabin calculate rounds")]
    pub rounds: u32,
    #[clap(long, value_parser, default_value_t = $CONFIG.retry, help = "Max prime candidates drawn before giving up")]
    pub retry: u64,
    #[clap(long, value_parser, default_value_t = $CONFIG.factor_limit, help = "Largest modulus the key breaker will trial divide")]
    pub factor_limit: u64,
    #[clap(long, value_parser, default_value_t = $CONFIG.low, help = "Primes mode: exclusive lower bound")]
    pub low: u64,
    #[clap(long, value_parser, default_value_t = $CONFIG.high, help = "Primes mode: inclusive upper bound")]
    pub high: u64,
    #[clap(long, value_parser, help = "Seed for the random source, entropy when absent")]
    pub seed: Option<u64>,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.silent, help = "Disable log output")]
    pub silent: bool,
}
    };
}

rsa_t!(CONFIG_DEF, RSA);

impl RSA {
    pub fn run_mode(&self) -> Result<RunMode, RsaError> {
        match self.mode.as_str() {
            "generate" => Ok(RunMode::Generate),
            "encode" => Ok(RunMode::Encode),
            "decode" => Ok(RunMode::Decode),
            "encrypt-file" => Ok(RunMode::EncryptFile),
            "decrypt-file" => Ok(RunMode::DecryptFile),
            "break" => Ok(RunMode::Break),
            "break-file" => Ok(RunMode::BreakFile),
            "primes" => Ok(RunMode::Primes),
            "book" => Ok(RunMode::Book),
            m => Err(RsaError::UnknownMode(m.to_string())),
        }
    }

    /// The one random source of a run.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn required<'a>(value: &'a Option<String>, what: &str) -> Result<&'a str, RsaError> {
        value.as_deref().ok_or_else(|| RsaError::Parse(format!("no {} given", what)))
    }

    fn key(&self) -> Result<Key, RsaError> { RSA::required(&self.key, "key")?.parse() }

    fn public_key(&self) -> Result<Key, RsaError> { RSA::required(&self.public, "public key")?.parse() }

    fn input(&self) -> Result<&str, RsaError> { RSA::required(&self.input, "input file") }

    fn ciphertext(&self) -> Result<&str, RsaError> { RSA::required(&self.ciphertext, "ciphertext") }

    /// The private key from `--key`, or one broken out of `--public` when no key is given.
    fn private_key(&self, sample: impl FnOnce(&Key) -> Result<Vec<BigInt>, RsaError>) -> Result<Key, RsaError> {
        if self.key.is_some() { return self.key(); }
        let public = self.public_key()?;
        say!("no private key given, trying to break {}", public);
        let ciphertext = sample(&public)?;
        let (keys, _) = self.break_key(&public, &ciphertext)?;
        Ok(keys.private)
    }

    pub fn run(&self) -> Result<(), Box<dyn Error>> {
        match self.run_mode()? {
            RunMode::Generate => {
                let keys = self.generate_key(self.digits, &mut self.rng())?;
                say!("get keys: {:?}", keys);
                let (n, e, d) = keys.triple();
                println!("Your public key is {}, {}.", n, e);
                println!("Your private key is {}, {}.", n, d);
            }
            RunMode::Encode => {
                let key = self.key()?;
                let blocks = RSA::encode(&key, RSA::required(&self.message, "message")?);
                println!("{:?}", blocks);
                println!("{}", blocks.concat());
            }
            RunMode::Decode => {
                let key = self.private_key(|public| RSA::parse_ciphertext(self.ciphertext()?, &public.m))?;
                let ciphertext = RSA::parse_ciphertext(self.ciphertext()?, &key.m)?;
                println!("{}", RSA::decode(&key, &ciphertext)?);
            }
            RunMode::EncryptFile => {
                let target = RSA::encrypt_file(self.input()?, &self.key()?)?;
                println!("{}", target.display());
            }
            RunMode::DecryptFile => {
                let input = self.input()?;
                let key = self.private_key(|public| {
                    RSA::read_sample_blocks(input, &public.m, file_codec::BREAK_SAMPLE_BLOCKS)
                })?;
                let target = RSA::decrypt_file(input, &key)?;
                println!("{}", target.display());
            }
            RunMode::Break => {
                let public = self.public_key()?;
                let ciphertext = RSA::parse_ciphertext(self.ciphertext()?, &public.m)?;
                let (keys, message) = self.break_key(&public, &ciphertext)?;
                println!("Private key: {}", keys.private);
                println!("Decoded message: {}", message);
            }
            RunMode::BreakFile => {
                let (keys, message) = self.break_file(&self.public_key()?, self.input()?)?;
                println!("Private key: {}", keys.private);
                println!("Decoded message: {}", message);
            }
            RunMode::Primes => {
                println!("{:?}", RSA::primes_in_range(self.low, self.high));
            }
            RunMode::Book => {
                println!("Here is our address book:");
                for (name, n, e) in ADDRESS_BOOK {
                    println!("{} ({}, {})", name, n, e);
                }
            }
        }
        Ok(())
    }
}
