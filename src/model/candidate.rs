// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::CandidateId;
use super::key_seq::KeySeq;

/// A host element that can receive a key sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    id: CandidateId,
    forced: Option<KeySeq>,
    label: String,
    initials: String,
    sticky: bool,
}

impl Candidate {
    /// Builds a candidate whose keys are derived from its display text.
    pub fn from_text(id: CandidateId, text: &str) -> Self {
        Self {
            id,
            forced: None,
            label: normalize_label(text),
            initials: initials(text),
            sticky: false,
        }
    }

    /// Builds a candidate that must receive exactly `seq`.
    pub fn forced(id: CandidateId, seq: KeySeq) -> Self {
        Self {
            id,
            forced: Some(seq),
            label: String::new(),
            initials: String::new(),
            sticky: false,
        }
    }

    pub fn with_forced(mut self, seq: KeySeq) -> Self {
        self.forced = Some(seq);
        self
    }

    /// Activation of a sticky candidate keeps navigation engaged.
    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    pub fn id(&self) -> &CandidateId {
        &self.id
    }

    pub fn forced_seq(&self) -> Option<&KeySeq> {
        self.forced.as_ref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn initials(&self) -> &str {
        &self.initials
    }

    pub fn is_sticky(&self) -> bool {
        self.sticky
    }
}

/// Lowercases `text` and keeps only ASCII letters and digits.
pub fn normalize_label(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// One lowercased character per word start: index 0, after a space, or an uppercase letter.
pub fn initials(text: &str) -> String {
    let mut out = String::new();
    let mut prev: Option<char> = None;
    for ch in text.chars() {
        let word_start = match prev {
            None => true,
            Some(p) => p == ' ' || ch.is_ascii_uppercase(),
        };
        if ch.is_ascii_alphanumeric() && word_start {
            out.push(ch.to_ascii_lowercase());
        }
        prev = Some(ch);
    }
    out
}
