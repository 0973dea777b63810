// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, HashSet};
use std::ops::Bound;

use smol_str::SmolStr;

use crate::model::KeySeq;

/// Committed sequences plus every prefix of every committed sequence.
///
/// A sequence can be committed only when none of its prefixes is committed and it is not
/// itself a prefix of something committed; this keeps the committed set prefix-free.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
    committed: BTreeMap<KeySeq, usize>,
    prefixes: HashSet<SmolStr>,
}

impl Ledger {
    /// No committed sequence equals `seq` or any prefix of it.
    pub(crate) fn clear_of_committed_prefixes(&self, seq: &str) -> bool {
        seq.char_indices()
            .all(|(idx, ch)| !self.committed.contains_key(&seq[..idx + ch.len_utf8()]))
    }

    pub(crate) fn is_available(&self, seq: &str) -> bool {
        !seq.is_empty() && self.clear_of_committed_prefixes(seq) && !self.prefixes.contains(seq)
    }

    pub(crate) fn commit(&mut self, seq: KeySeq, owner: usize) -> bool {
        if !self.is_available(seq.as_str()) {
            return false;
        }
        for prefix in seq.prefixes() {
            self.prefixes.insert(SmolStr::new(prefix));
        }
        self.committed.insert(seq, owner);
        true
    }

    /// Owner of a committed sequence that blocks `seq`, in either prefix direction.
    pub(crate) fn blocker(&self, seq: &str) -> Option<usize> {
        let shorter = seq
            .char_indices()
            .find_map(|(idx, ch)| self.committed.get(&seq[..idx + ch.len_utf8()]).copied());
        shorter.or_else(|| {
            self.committed
                .range::<str, _>((Bound::Included(seq), Bound::Unbounded))
                .take_while(|(key, _)| key.starts_with(seq))
                .map(|(_, owner)| *owner)
                .next()
        })
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.committed.len()
    }

    pub(crate) fn into_committed(self) -> BTreeMap<KeySeq, usize> {
        self.committed
    }
}
