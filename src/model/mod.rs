// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Data model shared by the allocator and the navigation session.
//!
//! Candidates are host-owned targets; key sequences are the strings typed to reach them.

pub mod candidate;
pub mod ids;
pub mod key_seq;

pub use candidate::{initials, normalize_label, Candidate};
pub use ids::{CandidateId, Id, IdError};
pub use key_seq::{KeySeq, KeySeqError, ENTER_SYMBOL};
