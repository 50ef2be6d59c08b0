//! Random password generation.
//!
//! Characters are drawn independently and uniformly from the union of the
//! selected character classes using the thread-local CSPRNG.

use rand::Rng;

use crate::errors::{Result, VaultError};

/// Length used when the caller does not ask for one.
pub const DEFAULT_LENGTH: usize = 12;

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";
const PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

/// Which character classes a generated password may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharClasses {
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub punctuation: bool,
}

impl Default for CharClasses {
    fn default() -> Self {
        Self {
            uppercase: true,
            lowercase: true,
            digits: true,
            punctuation: true,
        }
    }
}

impl CharClasses {
    /// The union of all selected classes, in a fixed order.
    pub fn alphabet(&self) -> Vec<char> {
        let mut chars = Vec::new();
        for (enabled, set) in [
            (self.uppercase, UPPERCASE),
            (self.lowercase, LOWERCASE),
            (self.digits, DIGITS),
            (self.punctuation, PUNCTUATION),
        ] {
            if enabled {
                chars.extend(set.chars());
            }
        }
        chars
    }
}

/// Produces random passwords from a fixed alphabet.
#[derive(Debug, Clone)]
pub struct PasswordGenerator {
    alphabet: Vec<char>,
}

impl Default for PasswordGenerator {
    fn default() -> Self {
        Self {
            alphabet: CharClasses::default().alphabet(),
        }
    }
}

impl PasswordGenerator {
    /// Build a generator for the given classes.
    ///
    /// Fails with `EmptyAlphabet` when no class is selected.
    pub fn new(classes: CharClasses) -> Result<Self> {
        let alphabet = classes.alphabet();
        if alphabet.is_empty() {
            return Err(VaultError::EmptyAlphabet);
        }
        Ok(Self { alphabet })
    }

    /// Generate a password of exactly `length` characters.
    pub fn generate(&self, length: usize) -> Result<String> {
        if length == 0 {
            return Err(VaultError::InvalidLength(length));
        }

        let mut rng = rand::rng();
        let password = (0..length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect();
        Ok(password)
    }
}
