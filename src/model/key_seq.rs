// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

/// Character used inside key sequences for the Enter key.
pub const ENTER_SYMBOL: char = '⏎';

/// A non-empty sequence of printable keys, typed one character at a time.
///
/// Lengths are measured in characters: `o⏎` is two keys long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeySeq(SmolStr);

impl KeySeq {
    pub fn new(value: impl AsRef<str>) -> Result<Self, KeySeqError> {
        let value = value.as_ref();
        if value.is_empty() {
            return Err(KeySeqError::Empty);
        }
        if let Some(ch) = value.chars().find(|ch| !is_sequence_char(*ch)) {
            return Err(KeySeqError::NonPrintable(ch));
        }
        // Typed keys are lowercased before lookup.
        if let Some(ch) = value.chars().find(|ch| ch.is_uppercase()) {
            return Err(KeySeqError::Uppercase(ch));
        }
        Ok(Self(SmolStr::new(value)))
    }

    pub fn from_char(ch: char) -> Result<Self, KeySeqError> {
        let mut buf = [0u8; 4];
        Self::new(ch.encode_utf8(&mut buf))
    }

    /// Appends `ch` to `prefix`; `prefix` may be empty.
    pub fn with_suffix(prefix: &str, ch: char) -> Result<Self, KeySeqError> {
        let mut value = String::with_capacity(prefix.len() + ch.len_utf8());
        value.push_str(prefix);
        value.push(ch);
        Self::new(value)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Every non-empty prefix, shortest first, ending with the sequence itself.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> + '_ {
        let s = self.as_str();
        s.char_indices()
            .map(move |(idx, ch)| &s[..idx + ch.len_utf8()])
    }

    /// The part of the sequence after `typed`, or `None` if `typed` is not a prefix.
    pub fn remainder_after<'a>(&'a self, typed: &str) -> Option<&'a str> {
        self.0.strip_prefix(typed)
    }
}

impl fmt::Display for KeySeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for KeySeq {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for KeySeq {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for KeySeq {
    type Err = KeySeqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySeqError {
    Empty,
    NonPrintable(char),
    Uppercase(char),
}

impl fmt::Display for KeySeqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("key sequence must not be empty"),
            Self::NonPrintable(ch) => {
                write!(f, "key sequence contains non-printable key {:?}", ch)
            }
            Self::Uppercase(ch) => {
                write!(f, "key sequence contains uppercase key {:?}", ch)
            }
        }
    }
}

impl std::error::Error for KeySeqError {}

pub(crate) fn is_sequence_char(ch: char) -> bool {
    ch == ENTER_SYMBOL || !(ch.is_control() || ch.is_whitespace())
}

/// The first `n` characters of `s`.
pub(crate) fn truncate_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::{truncate_chars, KeySeq, KeySeqError, ENTER_SYMBOL};

    #[test]
    fn rejects_empty_and_whitespace() {
        assert_eq!(KeySeq::new(""), Err(KeySeqError::Empty));
        assert_eq!(KeySeq::new("a b"), Err(KeySeqError::NonPrintable(' ')));
        assert_eq!(KeySeq::new("a\n"), Err(KeySeqError::NonPrintable('\n')));
    }

    #[test]
    fn rejects_keys_that_cannot_be_typed() {
        assert_eq!(KeySeq::new("gA"), Err(KeySeqError::Uppercase('A')));
        assert_eq!(KeySeq::new("Ä"), Err(KeySeqError::Uppercase('Ä')));
        assert!(KeySeq::new("^1⏎").is_ok());
    }

    #[test]
    fn enter_symbol_counts_as_one_key() {
        let seq = KeySeq::with_suffix("o", ENTER_SYMBOL).expect("seq");
        assert_eq!(seq.char_len(), 2);
        assert_eq!(seq.prefixes().collect::<Vec<_>>(), vec!["o", "o⏎"]);
        assert_eq!(seq.remainder_after("o"), Some("⏎"));
        assert_eq!(seq.remainder_after("x"), None);
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("1⏎x", 2), "1⏎");
        assert_eq!(truncate_chars("ab", 5), "ab");
        assert_eq!(truncate_chars("ab", 0), "");
    }
}
