// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Numbered keys for document blocks.
//!
//! Blocks are bound by position instead of text. Indices shorter than the longest index in the
//! group are terminated with Enter, so `3⏎` and `31` can coexist without one prefixing the other.

use crate::model::{Candidate, CandidateId, KeySeq, KeySeqError, ENTER_SYMBOL};

/// Key for the last block of a group.
pub const LAST_BLOCK_KEY: char = 'd';

/// Prefix for blocks shown in the right sidebar.
pub const SIDEBAR_BLOCK_PREFIX: &str = "s";

/// Forced candidates for `blocks`, keyed `prefix` + index (or [`LAST_BLOCK_KEY`] for `last`).
pub fn numbered_blocks(
    blocks: &[CandidateId],
    last: Option<&CandidateId>,
    prefix: &str,
) -> Result<Vec<Candidate>, KeySeqError> {
    if blocks.is_empty() {
        return Ok(Vec::new());
    }

    let max_digits = decimal_digits(blocks.len().saturating_sub(1).max(1));
    let mut out = Vec::with_capacity(blocks.len());
    let mut buf = itoa::Buffer::new();

    for (idx, id) in blocks.iter().enumerate() {
        let mut key = String::with_capacity(prefix.len() + max_digits + ENTER_SYMBOL.len_utf8());
        key.push_str(prefix);
        if last == Some(id) {
            key.push(LAST_BLOCK_KEY);
        } else {
            let digits = buf.format(idx);
            key.push_str(digits);
            if digits.len() < max_digits {
                key.push(ENTER_SYMBOL);
            }
        }
        out.push(Candidate::forced(id.clone(), KeySeq::new(&key)?));
    }

    Ok(out)
}

fn decimal_digits(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::{decimal_digits, numbered_blocks, SIDEBAR_BLOCK_PREFIX};
    use crate::model::{CandidateId, KeySeqError};

    fn ids(n: usize) -> Vec<CandidateId> {
        (0..n)
            .map(|i| CandidateId::new(format!("block-{i}")).expect("id"))
            .collect()
    }

    fn keys(blocks: &[crate::model::Candidate]) -> Vec<String> {
        blocks
            .iter()
            .map(|c| c.forced_seq().expect("forced").as_str().to_owned())
            .collect()
    }

    #[test]
    fn digit_counts() {
        assert_eq!(decimal_digits(0), 1);
        assert_eq!(decimal_digits(9), 1);
        assert_eq!(decimal_digits(10), 2);
        assert_eq!(decimal_digits(100), 3);
    }

    #[test]
    fn single_digit_groups_need_no_enter() {
        let blocks = ids(3);
        let out = numbered_blocks(&blocks, None, "").expect("blocks");
        assert_eq!(keys(&out), vec!["0", "1", "2"]);
    }

    #[test]
    fn short_indices_end_with_enter_when_group_is_wider() {
        let blocks = ids(12);
        let out = numbered_blocks(&blocks, Some(&blocks[11]), "").expect("blocks");
        let keys = keys(&out);
        assert_eq!(keys[0], "0⏎");
        assert_eq!(keys[9], "9⏎");
        assert_eq!(keys[10], "10");
        assert_eq!(keys[11], "d");
    }

    #[test]
    fn sidebar_prefix_is_prepended() {
        let blocks = ids(2);
        let out = numbered_blocks(&blocks, Some(&blocks[1]), SIDEBAR_BLOCK_PREFIX).expect("blocks");
        assert_eq!(keys(&out), vec!["s0", "sd"]);
    }

    #[test]
    fn rejects_prefix_with_whitespace() {
        let blocks = ids(1);
        let err = numbered_blocks(&blocks, None, "a b").unwrap_err();
        assert_eq!(err, KeySeqError::NonPrintable(' '));
    }
}
