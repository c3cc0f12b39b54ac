//! Where the vault gets the phrase it encrypts.

use pinvault_core::Signer;
use zeroize::Zeroizing;

/// Something that may hold a recovery phrase
pub trait SecretSource {
    /// The phrase, or `None` when there is nothing to save
    fn mnemonic_phrase(&self) -> Option<Zeroizing<String>>;
}

impl SecretSource for Signer {
    fn mnemonic_phrase(&self) -> Option<Zeroizing<String>> {
        Signer::mnemonic_phrase(self)
    }
}

/// An absent signer
impl<T: SecretSource> SecretSource for Option<T> {
    fn mnemonic_phrase(&self) -> Option<Zeroizing<String>> {
        self.as_ref().and_then(|s| s.mnemonic_phrase())
    }
}

impl<T: SecretSource + ?Sized> SecretSource for &T {
    fn mnemonic_phrase(&self) -> Option<Zeroizing<String>> {
        (**self).mnemonic_phrase()
    }
}

/// A phrase handed over directly, used exactly as given. Blank input
/// counts as no phrase.
impl SecretSource for Zeroizing<String> {
    fn mnemonic_phrase(&self) -> Option<Zeroizing<String>> {
        if self.trim().is_empty() {
            None
        } else {
            Some(self.clone())
        }
    }
}
