use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use crate::rsa::error::RsaError;
use crate::rsa::keys::Key;
use crate::RSA;

impl RSA {
    /// Zero-padded decimal rendering of `value` in exactly `width` digits.
    ///
    /// Values with more digits than `width` come out unpadded and longer.
    pub fn fixed_width(value: &BigInt, width: usize) -> String {
        let digits = value.magnitude().to_radix_be(10);
        let mut block = String::with_capacity(width.max(digits.len()));
        for _ in digits.len()..width { block.push('0'); }
        block.extend(digits.iter().map(|d| char::from(b'0' + d)));
        block
    }

    /// Encrypts every character of `message` under the public key, one block per code point.
    ///
    /// Code points `>= n` are reduced modulo `n` and will not decode back.
    pub fn encode(key: &Key, message: &str) -> Vec<String> {
        let width = RSA::block_width(&key.m);
        message.chars()
            .map(|c| RSA::fast_modular_exponent(&BigInt::from(c as u32), &key.base, &key.m))
            .map(|c| RSA::fixed_width(&c, width))
            .collect()
    }

    pub fn decode(key: &Key, ciphertext: &[BigInt]) -> Result<String, RsaError> {
        ciphertext.iter().map(|c| {
            if c.is_negative() || c >= &key.m {
                return Err(RsaError::BlockOutOfRange(c.clone()));
            }
            let m = RSA::fast_modular_exponent(c, &key.base, &key.m);
            m.to_u32().and_then(char::from_u32).ok_or(RsaError::InvalidCodePoint(m))
        }).collect()
    }

    pub fn parse_block(block: &str) -> Result<BigInt, RsaError> {
        if block.is_empty() || !block.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RsaError::Parse(format!("`{}' is not a decimal cipher block", block)));
        }
        BigInt::parse_bytes(block.as_bytes(), 10)
            .ok_or_else(|| RsaError::Parse(format!("`{}' is not a decimal cipher block", block)))
    }

    /// Splits a delimiter-free digit stream into blocks of `width` digits.
    pub fn split_blocks(stream: &str, width: usize) -> Result<Vec<BigInt>, RsaError> {
        if width == 0 || stream.len() % width != 0 {
            return Err(RsaError::Parse(format!("stream length {} is not a multiple of the block width {}", stream.len(), width)));
        }
        stream.as_bytes().chunks(width)
            .map(|b| std::str::from_utf8(b)
                .map_err(|e| RsaError::Parse(e.to_string()))
                .and_then(RSA::parse_block))
            .collect()
    }

    /// Parses the list form `[xxx, yyy, zzz]`, items optionally quoted.
    pub fn parse_block_list(text: &str) -> Result<Vec<BigInt>, RsaError> {
        let text = text.trim();
        let inner = text.strip_prefix('[').and_then(|t| t.strip_suffix(']'))
            .ok_or_else(|| RsaError::Parse(format!("`{}' is not a bracketed list", text)))?;
        inner.split(',')
            .map(|x| x.trim().trim_matches(|c| c == '\'' || c == '"'))
            .filter(|x| !x.is_empty())
            .map(RSA::parse_block)
            .collect()
    }

    /// Accepts either the list form or the single-stream form of a ciphertext.
    pub fn parse_ciphertext(text: &str, n: &BigInt) -> Result<Vec<BigInt>, RsaError> {
        let text = text.trim();
        if text.starts_with('[') {
            RSA::parse_block_list(text)
        } else {
            RSA::split_blocks(text, RSA::block_width(n))
        }
    }
}
