// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Key sequence allocation.
//!
//! [`allocate`] maps candidates to short, prefix-free key sequences. Keys are tried in tiers:
//! forced sequences, long initials, shortened label prefixes, label prefixes with a suffix
//! key, and finally arbitrary jump-key combinations. A candidate leaves the pool as soon as
//! it is bound, and a committed key blocks all of its prefixes and extensions.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Bound;

use smallvec::SmallVec;

use crate::logging::targets;
use crate::model::key_seq::truncate_chars;
use crate::model::{Candidate, CandidateId, KeySeq};

pub mod blocks;
mod jump_keys;
mod ledger;

pub use blocks::{numbered_blocks, LAST_BLOCK_KEY, SIDEBAR_BLOCK_PREFIX};
pub use jump_keys::{JumpKeys, JumpKeysError, DEFAULT_JUMP_KEYS};

use ledger::Ledger;

/// Longest label-derived prefix. More than two keys does not fit well next to an element.
pub const DEFAULT_MAX_PREFIX: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    id: CandidateId,
    sticky: bool,
}

impl Binding {
    pub fn id(&self) -> &CandidateId {
        &self.id
    }

    pub fn is_sticky(&self) -> bool {
        self.sticky
    }
}

/// A forced sequence that could not be honoured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocConflict {
    pub seq: KeySeq,
    pub candidate: CandidateId,
    pub holder: Option<CandidateId>,
}

impl fmt::Display for AllocConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.holder {
            Some(holder) => write!(
                f,
                "forced key sequence `{}` for `{}` collides with `{}`",
                self.seq, self.candidate, holder
            ),
            None => write!(
                f,
                "forced key sequence `{}` for `{}` is unavailable",
                self.seq, self.candidate
            ),
        }
    }
}

impl std::error::Error for AllocConflict {}

/// The result of one allocator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    bindings: BTreeMap<KeySeq, Binding>,
    conflicts: Vec<AllocConflict>,
    unassigned: Vec<CandidateId>,
}

impl Allocation {
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn get(&self, seq: &str) -> Option<&Binding> {
        self.bindings.get(seq)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KeySeq, &Binding)> + '_ {
        self.bindings.iter()
    }

    pub fn key_for(&self, id: &CandidateId) -> Option<&KeySeq> {
        self.bindings
            .iter()
            .find(|(_, binding)| &binding.id == id)
            .map(|(seq, _)| seq)
    }

    /// Bindings whose sequence starts with `typed`, in key order.
    pub fn with_prefix<'a>(
        &'a self,
        typed: &'a str,
    ) -> impl Iterator<Item = (&'a KeySeq, &'a Binding)> + 'a {
        self.bindings
            .range::<str, _>((Bound::Included(typed), Bound::Unbounded))
            .take_while(move |(seq, _)| seq.starts_with(typed))
    }

    pub fn has_prefix(&self, typed: &str) -> bool {
        self.with_prefix(typed).next().is_some()
    }

    /// Same keys bound to the same candidates; diagnostics are ignored.
    pub fn same_bindings(&self, other: &Allocation) -> bool {
        self.bindings.len() == other.bindings.len()
            && self
                .bindings
                .iter()
                .zip(other.bindings.iter())
                .all(|((a_seq, a), (b_seq, b))| a_seq == b_seq && a.id == b.id)
    }

    pub fn conflicts(&self) -> &[AllocConflict] {
        &self.conflicts
    }

    pub fn unassigned(&self) -> &[CandidateId] {
        &self.unassigned
    }

    pub fn is_prefix_free(&self) -> bool {
        let mut prev: Option<&KeySeq> = None;
        for seq in self.bindings.keys() {
            // In sorted order any key prefixed by another follows it directly.
            if let Some(prev) = prev {
                if seq.starts_with(prev.as_str()) {
                    return false;
                }
            }
            prev = Some(seq);
        }
        true
    }
}

#[derive(Debug, Clone)]
pub struct Allocator {
    max_prefix: usize,
    jump_keys: JumpKeys,
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PREFIX, JumpKeys::default())
    }
}

impl Allocator {
    pub fn new(max_prefix: usize, jump_keys: JumpKeys) -> Self {
        Self {
            max_prefix: max_prefix.max(1),
            jump_keys,
        }
    }

    pub fn max_prefix(&self) -> usize {
        self.max_prefix
    }

    pub fn jump_keys(&self) -> &JumpKeys {
        &self.jump_keys
    }

    pub fn allocate(&self, candidates: &[Candidate]) -> Allocation {
        let mut run = Run::new(candidates);

        let conflicts = run.forced_tier();
        run.initials_tier(self.max_prefix);
        run.label_prefix_tier(self.max_prefix);
        run.suffix_tier(self.max_prefix, &self.jump_keys);
        run.fallback_tier(&self.jump_keys);

        let unassigned = run
            .pool()
            .map(|idx| candidates[idx].id().clone())
            .collect::<Vec<_>>();
        if !unassigned.is_empty() {
            tracing::info!(
                target: targets::ALLOC,
                unassigned = unassigned.len(),
                candidates = candidates.len(),
                "more candidates than short key sequences; some stay unbound"
            );
        }

        let bindings = run
            .ledger
            .into_committed()
            .into_iter()
            .map(|(seq, idx)| {
                let candidate = &candidates[idx];
                let binding = Binding {
                    id: candidate.id().clone(),
                    sticky: candidate.is_sticky(),
                };
                (seq, binding)
            })
            .collect::<BTreeMap<_, _>>();

        tracing::debug!(
            target: targets::ALLOC,
            bound = bindings.len(),
            candidates = candidates.len(),
            conflicts = conflicts.len(),
            "allocated key sequences"
        );

        Allocation {
            bindings,
            conflicts,
            unassigned,
        }
    }

    /// Allocates only the candidates accepted by `keep`, preserving their order.
    pub fn allocate_where(
        &self,
        candidates: &[Candidate],
        keep: impl Fn(&Candidate) -> bool,
    ) -> Allocation {
        let kept = candidates
            .iter()
            .filter(|candidate| keep(candidate))
            .cloned()
            .collect::<Vec<_>>();
        self.allocate(&kept)
    }
}

/// Allocates with the default jump-key alphabet.
pub fn allocate(candidates: &[Candidate], max_prefix: usize) -> Allocation {
    Allocator::new(max_prefix, JumpKeys::default()).allocate(candidates)
}

type Group = (String, SmallVec<[usize; 4]>);

struct Run<'a> {
    candidates: &'a [Candidate],
    bound: Vec<bool>,
    ledger: Ledger,
}

impl<'a> Run<'a> {
    fn new(candidates: &'a [Candidate]) -> Self {
        Self {
            candidates,
            bound: vec![false; candidates.len()],
            ledger: Ledger::default(),
        }
    }

    fn pool(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.candidates.len()).filter(|&idx| !self.bound[idx])
    }

    fn commit(&mut self, seq: KeySeq, idx: usize) -> bool {
        let committed = self.ledger.commit(seq, idx);
        if committed {
            self.bound[idx] = true;
        }
        committed
    }

    fn commit_str(&mut self, seq: &str, idx: usize) -> bool {
        match KeySeq::new(seq) {
            Ok(seq) => self.commit(seq, idx),
            Err(err) => {
                tracing::error!(
                    target: targets::ALLOC,
                    candidate = %self.candidates[idx].id(),
                    seq,
                    %err,
                    "derived an invalid key sequence; skipping"
                );
                false
            }
        }
    }

    /// Groups the pool by `key`, in order of first occurrence.
    fn groups(&self, key: impl Fn(&Candidate) -> Option<String>) -> Vec<Group> {
        let mut groups = Vec::<Group>::new();
        let mut index = HashMap::<String, usize>::new();
        for idx in self.pool() {
            let Some(k) = key(&self.candidates[idx]) else {
                continue;
            };
            match index.get(&k) {
                Some(&slot) => groups[slot].1.push(idx),
                None => {
                    index.insert(k.clone(), groups.len());
                    let mut members = SmallVec::new();
                    members.push(idx);
                    groups.push((k, members));
                }
            }
        }
        groups
    }

    fn forced_tier(&mut self) -> Vec<AllocConflict> {
        let mut conflicts = Vec::new();
        let groups = self.groups(|c| c.forced_seq().map(|seq| seq.as_str().to_owned()));
        for (_, members) in groups {
            let first = members[0];
            let Some(seq) = self.candidates[first].forced_seq().cloned() else {
                continue;
            };
            let holder = if self.commit(seq.clone(), first) {
                Some(first)
            } else {
                let blocker = self.ledger.blocker(seq.as_str());
                conflicts.push(self.conflict(&seq, first, blocker));
                blocker
            };
            for &loser in &members[1..] {
                conflicts.push(self.conflict(&seq, loser, holder));
            }
        }
        conflicts
    }

    fn conflict(&self, seq: &KeySeq, idx: usize, holder: Option<usize>) -> AllocConflict {
        let conflict = AllocConflict {
            seq: seq.clone(),
            candidate: self.candidates[idx].id().clone(),
            holder: holder.map(|h| self.candidates[h].id().clone()),
        };
        tracing::error!(target: targets::ALLOC, %conflict, "forced key sequence conflict");
        conflict
    }

    fn initials_tier(&mut self, max_prefix: usize) {
        let groups = self.groups(|c| {
            let initials = c.initials();
            (initials.chars().count() >= max_prefix)
                .then(|| truncate_chars(initials, max_prefix).to_owned())
        });
        for (key, members) in groups {
            if self.ledger.is_available(&key) {
                self.commit_str(&key, members[0]);
            }
        }
    }

    fn label_prefix_tier(&mut self, max_prefix: usize) {
        let groups = self.groups(|c| {
            let label = c.label();
            (!label.is_empty()).then(|| truncate_chars(label, max_prefix).to_owned())
        });
        for (gi, (key, members)) in groups.iter().enumerate() {
            let mut proposed = key.as_str();
            for len in (1..max_prefix).rev() {
                let short = truncate_chars(key, len);
                let distinct = groups
                    .iter()
                    .enumerate()
                    .all(|(gj, (other, _))| gj == gi || truncate_chars(other, len) != short);
                if distinct && self.ledger.is_available(short) {
                    proposed = short;
                    break;
                }
            }
            let proposed = proposed.to_owned();
            self.commit_str(&proposed, members[0]);
        }
    }

    fn suffix_tier(&mut self, max_prefix: usize, jump_keys: &JumpKeys) {
        let candidates = self.candidates;
        for len in (0..max_prefix).rev() {
            let pool = self.pool().collect::<Vec<_>>();
            for idx in pool {
                let prefix = truncate_chars(candidates[idx].label(), len);
                if !self.ledger.clear_of_committed_prefixes(prefix) {
                    continue;
                }
                let doubled = prefix.chars().last();
                let suffixes = doubled.into_iter().chain(jump_keys.chars().iter().copied());
                for suffix in suffixes {
                    let Ok(seq) = KeySeq::with_suffix(prefix, suffix) else {
                        continue;
                    };
                    if self.commit(seq, idx) {
                        break;
                    }
                }
            }
        }
    }

    fn fallback_tier(&mut self, jump_keys: &JumpKeys) {
        let pool = self.pool().collect::<Vec<_>>();
        for idx in pool {
            for seq in jump_keys.fallback_sequences() {
                if self.commit(seq, idx) {
                    break;
                }
            }
        }
    }
}
