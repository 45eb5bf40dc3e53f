use lazy_static::lazy_static;
use mut_static::MutStatic;
use crate::RSA;

lazy_static! {
    pub static ref CONFIG_DEF: RSA = RSA {
        mode: String::from("generate"),
        key: None,
        public: None,
        message: None,
        ciphertext: None,
        input: None,
        digits: 3,
        rounds: 40,
        retry: 10_000,
        factor_limit: 1_000_000_000,
        low: 0,
        high: 100,
        seed: None,
        silent: false,
    };
    pub static ref SILENT: MutStatic<bool> =
        MutStatic::new();
}

/// Demonstration public keys, small enough for the key breaker given a raised `--factor-limit`.
pub const ADDRESS_BOOK: [(&str, u64, u64); 3] = [
    ("John Doe", 264607518881, 127427),
    ("Jane Eyre", 290208112387, 459953),
    ("Moby Duck", 136906631761, 257953),
];

/// Logging is off until `main` decides otherwise, which keeps tests quiet.
pub fn is_silent() -> bool {
    SILENT.read().map(|s| *s).unwrap_or(true)
}

#[macro_export]
macro_rules! say {
    ($($arg: tt)*) => {
        if !$crate::rsa::config::is_silent() { println!($($arg)*); }
    };
}
