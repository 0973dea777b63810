// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use smallvec::SmallVec;

use crate::model::key_seq::is_sequence_char;
use crate::model::KeySeq;

/// Home row first, then the top and bottom rows, then digits.
pub const DEFAULT_JUMP_KEYS: &str = "asdfghjklqwertyuiopzxcvbnm1234567890";

/// Ordered alphabet used when label-derived keys run out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpKeys {
    keys: SmallVec<[char; 36]>,
}

impl JumpKeys {
    pub fn new(chars: &str) -> Result<Self, JumpKeysError> {
        let mut keys = SmallVec::<[char; 36]>::new();
        for ch in chars.chars() {
            if !is_sequence_char(ch) {
                return Err(JumpKeysError::NonPrintable(ch));
            }
            if ch.is_uppercase() {
                return Err(JumpKeysError::Uppercase(ch));
            }
            if keys.contains(&ch) {
                return Err(JumpKeysError::Duplicate(ch));
            }
            keys.push(ch);
        }
        if keys.is_empty() {
            return Err(JumpKeysError::Empty);
        }
        Ok(Self { keys })
    }

    pub fn chars(&self) -> &[char] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Every single key, then every pair `s t` with the doubled `s s` ahead of the rest.
    pub fn fallback_sequences(&self) -> impl Iterator<Item = KeySeq> + '_ {
        let singles = self.keys.iter().filter_map(|&ch| KeySeq::from_char(ch).ok());
        let pairs = self.keys.iter().flat_map(move |&first| {
            std::iter::once(first)
                .chain(self.keys.iter().copied().filter(move |&second| second != first))
                .filter_map(move |second| {
                    let mut buf = [0u8; 4];
                    KeySeq::with_suffix(first.encode_utf8(&mut buf), second).ok()
                })
        });
        singles.chain(pairs)
    }
}

impl Default for JumpKeys {
    fn default() -> Self {
        Self {
            keys: DEFAULT_JUMP_KEYS.chars().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JumpKeysError {
    Empty,
    Duplicate(char),
    NonPrintable(char),
    Uppercase(char),
}

impl fmt::Display for JumpKeysError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("jump keys must not be empty"),
            Self::Duplicate(ch) => write!(f, "jump keys must not repeat {ch:?}"),
            Self::NonPrintable(ch) => write!(f, "jump keys must be printable, got {ch:?}"),
            Self::Uppercase(ch) => write!(f, "jump keys must be lowercase, got {ch:?}"),
        }
    }
}

impl std::error::Error for JumpKeysError {}

#[cfg(test)]
mod tests {
    use super::{JumpKeys, JumpKeysError, DEFAULT_JUMP_KEYS};
    use std::collections::HashSet;

    #[test]
    fn default_alphabet_is_valid() {
        let keys = JumpKeys::new(DEFAULT_JUMP_KEYS).expect("default keys");
        assert_eq!(keys, JumpKeys::default());
        assert_eq!(keys.len(), 36);
    }

    #[test]
    fn fallback_prefers_singles_then_doubles() {
        let keys = JumpKeys::new("abc").expect("keys");
        let seqs = keys
            .fallback_sequences()
            .map(|seq| seq.as_str().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(
            seqs,
            vec!["a", "b", "c", "aa", "ab", "ac", "bb", "ba", "bc", "cc", "ca", "cb"]
        );
    }

    #[test]
    fn fallback_has_no_duplicates() {
        let keys = JumpKeys::default();
        let seqs = keys.fallback_sequences().collect::<Vec<_>>();
        assert_eq!(seqs.len(), 36 + 36 * 36);

        let mut uniq = HashSet::with_capacity(seqs.len());
        for seq in &seqs {
            assert!(uniq.insert(seq.clone()), "duplicate sequence: {seq}");
        }
    }

    #[test]
    fn rejects_invalid_alphabets() {
        assert_eq!(JumpKeys::new(""), Err(JumpKeysError::Empty));
        assert_eq!(JumpKeys::new("abca"), Err(JumpKeysError::Duplicate('a')));
        assert_eq!(JumpKeys::new("a b"), Err(JumpKeysError::NonPrintable(' ')));
        assert_eq!(JumpKeys::new("JK"), Err(JumpKeysError::Uppercase('J')));
    }
}
