// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use keytip::alloc::{numbered_blocks, SIDEBAR_BLOCK_PREFIX};
use keytip::model::{Candidate, CandidateId, KeySeq};

const WORDS: &[&str] = &[
    "Inbox", "Today", "Upcoming", "Projects", "Product", "Papers", "Reading", "Daily", "Notes",
    "Weekly", "Review", "Meeting", "Metrics", "Alpha", "Beta", "Goals", "Planning", "Books",
    "Bookmarks", "Archive", "Ideas", "Journal", "Recipes", "Travel",
];

#[derive(Debug, Clone, Copy)]
pub enum Case {
    /// A sidebar with a handful of starred pages.
    Small,
    /// A typical page: starred pages plus a few dozen blocks.
    Page,
    /// Far more targets than short keys.
    Crowded,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Page => "page",
            Self::Crowded => "crowded",
        }
    }

    fn shape(self) -> (usize, usize, usize) {
        // (labelled, main blocks, sidebar blocks)
        match self {
            Self::Small => (12, 0, 0),
            Self::Page => (24, 40, 8),
            Self::Crowded => (400, 300, 60),
        }
    }
}

pub fn id(value: &str) -> CandidateId {
    CandidateId::new(value).expect("candidate id")
}

/// Two-word label for index `i`; repeats once the word pairs run out.
pub fn label(i: usize) -> String {
    let first = WORDS[i % WORDS.len()];
    let second = WORDS[(i / WORDS.len() + i) % WORDS.len()];
    if i < WORDS.len() {
        first.to_owned()
    } else {
        format!("{first} {second}")
    }
}

pub fn candidates(case: Case) -> Vec<Candidate> {
    let (labelled, blocks, sidebar) = case.shape();
    let mut out = vec![
        Candidate::forced(id("nav:daily"), KeySeq::new("g").expect("seq")),
        Candidate::forced(id("nav:graph"), KeySeq::new("o⏎").expect("seq")),
        Candidate::forced(id("nav:all-pages"), KeySeq::new("a").expect("seq")),
    ];
    for i in 0..labelled {
        out.push(Candidate::from_text(id(&format!("page:{i}")), &label(i)));
    }

    let main = (0..blocks).map(|i| id(&format!("block:{i}"))).collect::<Vec<_>>();
    out.extend(numbered_blocks(&main, main.last(), "").expect("blocks"));
    let side = (0..sidebar).map(|i| id(&format!("sidebar:{i}"))).collect::<Vec<_>>();
    out.extend(numbered_blocks(&side, side.last(), SIDEBAR_BLOCK_PREFIX).expect("blocks"));
    out
}

pub fn block_ids(n: usize) -> Vec<CandidateId> {
    (0..n).map(|i| id(&format!("block:{i}"))).collect()
}
