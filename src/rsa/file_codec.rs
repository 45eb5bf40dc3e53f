use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};
use num_bigint::BigInt;
use crate::rsa::config::is_silent;
use crate::rsa::error::RsaError;
use crate::rsa::keys::{Key, KeySet};
use crate::{say, RSA};

pub const ENCRYPTED_SUFFIX: &str = "_encrypted.txt";
pub const DECRYPTED_SUFFIX: &str = "_decrypted.txt";

/// Number of blocks `break_file` feeds to the key breaker.
pub const BREAK_SAMPLE_BLOCKS: usize = 10;

fn progress_bar(len: usize) -> Option<ProgressBar> {
    if is_silent() { return None; }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})") {
        pb.set_style(style.progress_chars("#>-"));
    }
    Some(pb)
}

impl RSA {
    /// Sibling of `path` named after the part of its file name before the first '.', plus `suffix`.
    pub fn derived_path(path: &Path, suffix: &str) -> PathBuf {
        let name = path.file_name().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let base = name.split('.').next().unwrap_or_default();
        path.with_file_name(format!("{}{}", base, suffix))
    }

    /// Encrypts a text file chunk by chunk, `block_width(n)` characters at a time, into
    /// `<base>_encrypted.txt`: one undelimited stream of fixed-width blocks.
    pub fn encrypt_file(path: impl AsRef<Path>, key: &Key) -> Result<PathBuf, RsaError> {
        let path = path.as_ref();
        let width = RSA::block_width(&key.m);
        let source = fs::read_to_string(path)?.chars().collect::<Vec<_>>();
        let pb = progress_bar(source.len());
        let mut stream = String::with_capacity(source.len() * width);
        for chunk in source.chunks(width) {
            let chunk = chunk.iter().collect::<String>();
            for block in RSA::encode(key, &chunk) { stream.push_str(&block); }
            if let Some(pb) = &pb { pb.inc(chunk.chars().count() as u64); }
        }
        if let Some(pb) = &pb { pb.finish_with_message("Done"); }
        let target = RSA::derived_path(path, ENCRYPTED_SUFFIX);
        fs::write(&target, stream)?;
        say!("encrypted {} characters into {}", source.len(), target.display());
        Ok(target)
    }

    /// Reads a block stream written by `encrypt_file`. Trailing whitespace, such as a final
    /// newline added by an editor, is ignored.
    pub fn read_blocks(path: impl AsRef<Path>, n: &BigInt) -> Result<Vec<BigInt>, RsaError> {
        let stream = fs::read_to_string(path)?;
        RSA::split_blocks(stream.trim_end(), RSA::block_width(n))
    }

    /// Reads at most the first `count` blocks of a block stream, leaving the rest of the file
    /// unread.
    pub fn read_sample_blocks(path: impl AsRef<Path>, n: &BigInt, count: usize) -> Result<Vec<BigInt>, RsaError> {
        let width = RSA::block_width(n);
        let mut stream = String::with_capacity(count * width);
        File::open(path)?.take((count * width) as u64).read_to_string(&mut stream)?;
        RSA::split_blocks(stream.trim_end(), width)
    }

    pub fn decrypt_file(path: impl AsRef<Path>, key: &Key) -> Result<PathBuf, RsaError> {
        let path = path.as_ref();
        let ciphertext = RSA::read_blocks(path, &key.m)?;
        let pb = progress_bar(ciphertext.len());
        let mut text = String::with_capacity(ciphertext.len());
        for block in ciphertext.chunks(64) {
            text.push_str(&RSA::decode(key, block)?);
            if let Some(pb) = &pb { pb.inc(block.len() as u64); }
        }
        if let Some(pb) = &pb { pb.finish_with_message("Done"); }
        let target = RSA::derived_path(path, DECRYPTED_SUFFIX);
        fs::write(&target, text)?;
        say!("decrypted {} blocks into {}", ciphertext.len(), target.display());
        Ok(target)
    }

    /// Breaks `public` from the first few blocks of an encrypted file.
    pub fn break_file(&self, public: &Key, path: impl AsRef<Path>) -> Result<(KeySet, String), RsaError> {
        let ciphertext = RSA::read_sample_blocks(path, &public.m, BREAK_SAMPLE_BLOCKS)?;
        self.break_key(public, &ciphertext)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::fs;
    use super::*;

    fn keys() -> KeySet {
        KeySet { public: Key::new(3233, 17), private: Key::new(3233, 2753) }
    }

    #[test]
    fn output_names() {
        assert_eq!(RSA::derived_path(Path::new("dir/notes.txt"), ENCRYPTED_SUFFIX), PathBuf::from("dir/notes_encrypted.txt"));
        assert_eq!(RSA::derived_path(Path::new("./a.b.c"), DECRYPTED_SUFFIX), PathBuf::from("./a_decrypted.txt"));
        assert_eq!(RSA::derived_path(Path::new("/tmp/v1.2/plain"), ENCRYPTED_SUFFIX), PathBuf::from("/tmp/v1.2/plain_encrypted.txt"));
        assert_eq!(RSA::derived_path(Path::new("notes_encrypted.txt"), DECRYPTED_SUFFIX), PathBuf::from("notes_encrypted_decrypted.txt"));
    }

    #[test]
    fn file_round_trip() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("letter.txt");
        // 4-character chunks and 23 characters: the last chunk is short
        let content = "Meet me at noon.\nBring ";
        assert_eq!(content.chars().count() % 4, 3);
        fs::write(&source, content)?;
        let keys = keys();

        let encrypted = RSA::encrypt_file(&source, &keys.public)?;
        assert_eq!(encrypted, dir.path().join("letter_encrypted.txt"));
        let stream = fs::read_to_string(&encrypted)?;
        assert_eq!(stream.len(), content.chars().count() * 4);
        assert!(stream.bytes().all(|b| b.is_ascii_digit()));
        assert!(stream.starts_with(&RSA::encode(&keys.public, "M")[0]));

        let decrypted = RSA::decrypt_file(&encrypted, &keys.private)?;
        assert_eq!(decrypted, dir.path().join("letter_encrypted_decrypted.txt"));
        assert_eq!(fs::read(&decrypted)?, content.as_bytes());
        Ok(())
    }

    #[test]
    fn empty_file_round_trip() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("empty.txt");
        fs::write(&source, "")?;
        let keys = keys();
        let encrypted = RSA::encrypt_file(&source, &keys.public)?;
        assert_eq!(fs::read_to_string(&encrypted)?, "");
        let decrypted = RSA::decrypt_file(&encrypted, &keys.private)?;
        assert_eq!(fs::read_to_string(&decrypted)?, "");
        Ok(())
    }

    #[test]
    fn trailing_newline_is_ignored() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("c.txt");
        fs::write(&source, "27900001\n")?;
        let decrypted = RSA::decrypt_file(&source, &keys().private)?;
        assert_eq!(fs::read_to_string(&decrypted)?, "A\u{1}");
        Ok(())
    }

    #[test]
    fn truncated_stream_fails() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("bad.txt");
        fs::write(&source, "279000")?;
        assert!(matches!(RSA::decrypt_file(&source, &keys().private), Err(RsaError::Parse(_))));
        assert!(!dir.path().join("bad_decrypted.txt").exists());
        Ok(())
    }

    #[test]
    fn sample_ignores_tail() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("fox.txt");
        fs::write(&source, "The quick brown fox")?;
        let keys = keys();
        let encrypted = RSA::encrypt_file(&source, &keys.public)?;
        let mut stream = fs::read_to_string(&encrypted)?;
        stream.push_str("12");
        fs::write(&encrypted, &stream)?;

        assert!(matches!(RSA::read_blocks(&encrypted, &keys.public.m), Err(RsaError::Parse(_))));
        let sample = RSA::read_sample_blocks(&encrypted, &keys.public.m, BREAK_SAMPLE_BLOCKS)?;
        assert_eq!(sample.len(), BREAK_SAMPLE_BLOCKS);
        assert_eq!(RSA::decode(&keys.private, &sample)?, "The quick ");
        // a sample reaching the bad tail still fails
        assert!(matches!(RSA::read_sample_blocks(&encrypted, &keys.public.m, 100), Err(RsaError::Parse(_))));
        // a file shorter than the sample yields every block it has
        fs::write(&encrypted, &stream[..12])?;
        assert_eq!(RSA::read_sample_blocks(&encrypted, &keys.public.m, BREAK_SAMPLE_BLOCKS)?.len(), 3);
        Ok(())
    }

    #[test]
    fn missing_file() {
        assert!(matches!(RSA::encrypt_file("/nonexistent/nothing.txt", &keys().public), Err(RsaError::Io(_))));
    }
}
