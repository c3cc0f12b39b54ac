//! BIP-39 mnemonics and the signer that holds them
//!
//! A [`Signer`] is the in-memory owner of a wallet's recovery phrase. A
//! watch-only signer has none, which is why [`Signer::mnemonic_phrase`]
//! returns an `Option`.

use bip39::{Language, Mnemonic};
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    #[error("Mnemonic generation failed: {0}")]
    GenerationFailed(String),
}

/// Supported BIP-39 mnemonic lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCount {
    Words12,
    Words15,
    Words18,
    Words21,
    Words24,
}

impl WordCount {
    pub fn count(&self) -> usize {
        match self {
            Self::Words12 => 12,
            Self::Words15 => 15,
            Self::Words18 => 18,
            Self::Words21 => 21,
            Self::Words24 => 24,
        }
    }

    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            12 => Some(Self::Words12),
            15 => Some(Self::Words15),
            18 => Some(Self::Words18),
            21 => Some(Self::Words21),
            24 => Some(Self::Words24),
            _ => None,
        }
    }
}

/// Generate a new English BIP-39 mnemonic
pub fn generate_mnemonic(words: WordCount) -> Result<Mnemonic, SeedError> {
    Mnemonic::generate_in(Language::English, words.count())
        .map_err(|e| SeedError::GenerationFailed(e.to_string()))
}

/// Parse a mnemonic from words
pub fn parse_mnemonic(words: &str) -> Result<Mnemonic, SeedError> {
    Mnemonic::parse_in(Language::English, words)
        .map_err(|e| SeedError::InvalidMnemonic(e.to_string()))
}

/// Holder of a wallet's recovery phrase
#[derive(Clone, Default)]
pub struct Signer {
    mnemonic: Option<Mnemonic>,
}

impl Signer {
    /// Signer backed by an existing mnemonic
    pub fn new(mnemonic: Mnemonic) -> Self {
        Self {
            mnemonic: Some(mnemonic),
        }
    }

    /// Signer with no recovery phrase (e.g. imported from an address only)
    pub fn watch_only() -> Self {
        Self { mnemonic: None }
    }

    /// Validate `words` and wrap them in a signer
    pub fn from_phrase(words: &str) -> Result<Self, SeedError> {
        parse_mnemonic(words).map(Self::new)
    }

    /// Fresh signer with a newly generated mnemonic
    pub fn generate(words: WordCount) -> Result<Self, SeedError> {
        generate_mnemonic(words).map(Self::new)
    }

    pub fn has_mnemonic(&self) -> bool {
        self.mnemonic.is_some()
    }

    /// The space-separated recovery phrase, if this signer has one
    pub fn mnemonic_phrase(&self) -> Option<Zeroizing<String>> {
        self.mnemonic
            .as_ref()
            .map(|m| Zeroizing::new(m.to_string()))
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("has_mnemonic", &self.has_mnemonic())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon \
                           abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generate_word_counts() {
        for wc in [WordCount::Words12, WordCount::Words18, WordCount::Words24] {
            let mnemonic = generate_mnemonic(wc).unwrap();
            assert_eq!(mnemonic.word_count(), wc.count());
        }
    }

    #[test]
    fn test_parse_valid_and_invalid() {
        assert!(parse_mnemonic(ABANDON).is_ok());
        // Bad checksum word
        let bad = ABANDON.replace("about", "abandon");
        assert!(matches!(
            parse_mnemonic(&bad),
            Err(SeedError::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn test_word_count_from_count() {
        assert_eq!(WordCount::from_count(24), Some(WordCount::Words24));
        assert_eq!(WordCount::from_count(13), None);
    }

    #[test]
    fn test_signer_phrase() {
        let signer = Signer::from_phrase(ABANDON).unwrap();
        assert!(signer.has_mnemonic());
        let phrase = signer.mnemonic_phrase().unwrap();
        assert_eq!(phrase.split_whitespace().count(), 12);
        assert!(phrase.ends_with("about"));
    }

    #[test]
    fn test_watch_only_signer_has_no_phrase() {
        let signer = Signer::watch_only();
        assert!(!signer.has_mnemonic());
        assert!(signer.mnemonic_phrase().is_none());
    }

    #[test]
    fn test_debug_hides_phrase() {
        let signer = Signer::from_phrase(ABANDON).unwrap();
        let shown = format!("{:?}", signer);
        assert!(!shown.contains("abandon"));
    }
}
