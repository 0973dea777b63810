// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The boundary between the session and the host UI.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use smol_str::SmolStr;

use super::key::Modifiers;
use crate::model::{Candidate, CandidateId};

/// One visible tip: the part already typed and what is left to type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tip {
    pub typed: SmolStr,
    pub remainder: SmolStr,
    pub id: CandidateId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMagnitude {
    Line,
    HalfPage,
}

/// Which container a scroll applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollScope {
    Main,
    Sidebar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub direction: ScrollDirection,
    pub magnitude: ScrollMagnitude,
    pub scope: ScrollScope,
}

/// Handed to the host on entry; bump it whenever the candidate set may have changed.
///
/// Notifications are coalesced: the session only tracks whether anything happened since the
/// last pass, never how many times.
#[derive(Debug, Clone, Default)]
pub struct ChangeNotifier {
    generation: Rc<Cell<u64>>,
}

impl ChangeNotifier {
    pub fn notify(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation.get()
    }
}

/// Keeps a change subscription alive; dropping it unsubscribes.
#[derive(Default)]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(unsubscribe)),
        }
    }

    pub fn none() -> Self {
        Self { cancel: None }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Capabilities the session needs from the host UI.
pub trait HostAdapter {
    type Error: std::error::Error + 'static;

    /// A snapshot of the current targets, in display order.
    fn list_candidates(&mut self) -> Vec<Candidate>;

    /// Replaces every displayed tip with `tips`.
    fn render_tips(&mut self, tips: &[Tip]) -> Result<(), Self::Error>;

    fn clear_tips(&mut self);

    fn activate(&mut self, id: &CandidateId, modifiers: Modifiers) -> Result<(), Self::Error>;

    fn scroll(&mut self, request: ScrollRequest) -> Result<(), Self::Error>;

    /// Called on entry. The subscription is dropped when navigation ends.
    fn subscribe_changes(&mut self, notifier: ChangeNotifier) -> Subscription {
        let _ = notifier;
        Subscription::none()
    }

    fn is_text_entry_focused(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::{ChangeNotifier, Subscription};

    #[test]
    fn dropping_subscription_unsubscribes_once() {
        let calls = Rc::new(Cell::new(0));
        let sub = {
            let calls = Rc::clone(&calls);
            Subscription::new(move || calls.set(calls.get() + 1))
        };
        drop(sub);
        assert_eq!(calls.get(), 1);

        let sub = {
            let calls = Rc::clone(&calls);
            Subscription::new(move || calls.set(calls.get() + 1))
        };
        sub.unsubscribe();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn notifier_clones_share_a_generation() {
        let notifier = ChangeNotifier::default();
        let host_side = notifier.clone();
        host_side.notify();
        host_side.notify();
        assert_eq!(notifier.generation(), 2);
    }
}
