//! Recovery phrase container
//!
//! The phrase is held as an ordered list of words and wiped from memory when
//! dropped. It deliberately implements neither `Display` nor `Serialize`, and
//! its `Debug` output only reports the word count.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// An ordered sequence of mnemonic words
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Secret {
    words: Vec<String>,
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("word_count", &self.words.len())
            .field("words", &"[REDACTED]")
            .finish()
    }
}

impl Secret {
    /// Build a secret from already-split words
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a phrase on any run of whitespace
    pub fn parse(phrase: &str) -> Self {
        Self::from_words(phrase.split_whitespace())
    }

    /// The words in order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The words joined by single spaces
    ///
    /// The returned buffer is wiped when dropped.
    pub fn phrase(&self) -> Zeroizing<String> {
        Zeroizing::new(self.words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_joins_with_single_spaces() {
        let secret = Secret::from_words(["alpha", "beta", "gamma"]);
        assert_eq!(secret.phrase().as_str(), "alpha beta gamma");
    }

    #[test]
    fn test_parse_collapses_whitespace() {
        let secret = Secret::parse("  alpha\tbeta\n\ngamma ");
        assert_eq!(secret.words(), &["alpha", "beta", "gamma"]);
        assert_eq!(secret.len(), 3);
    }

    #[test]
    fn test_debug_is_redacted() {
        let secret = Secret::from_words(["abandon", "ability"]);
        let debug = format!("{:?}", secret);
        assert!(debug.contains("word_count: 2"));
        assert!(!debug.contains("abandon"));
        assert!(!debug.contains("ability"));
    }

    #[test]
    fn test_empty_secret() {
        let secret = Secret::parse("   ");
        assert!(secret.is_empty());
        assert_eq!(secret.phrase().as_str(), "");
    }
}
