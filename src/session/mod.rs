// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Navigation mode.
//!
//! A [`Session`] owns the host adapter and runs one navigation episode at a time: entry
//! allocates keys and renders tips, typed characters narrow the tips until one matches, and
//! the match is activated. Every exit path clears the tips and drops the change subscription.

use std::fmt;

use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::alloc::{Allocation, Allocator, SIDEBAR_BLOCK_PREFIX};
use crate::config::{ConfigError, NavigatorConfig};
use crate::logging::targets;

mod adapter;
mod key;

pub use adapter::{
    ChangeNotifier, HostAdapter, ScrollDirection, ScrollMagnitude, ScrollRequest, ScrollScope,
    Subscription, Tip,
};
pub use key::{KeyDisposition, KeyInput, Modifiers, NavKey};

/// Upper bound on change passes per [`Session::pump_changes`] call.
pub const MAX_CHANGE_PASSES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Navigation was not active.
    Ignored,
    /// Same keys bound to the same candidates; nothing was re-rendered.
    Unchanged,
    Rerendered,
    /// The new candidate set had nothing to show.
    Ended,
}

#[derive(Debug)]
pub enum SessionError<E> {
    Render(E),
    Activate(E),
    Scroll(E),
}

impl<E: fmt::Display> fmt::Display for SessionError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(err) => write!(f, "rendering tips failed: {err}"),
            Self::Activate(err) => write!(f, "activating target failed: {err}"),
            Self::Scroll(err) => write!(f, "scrolling failed: {err}"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for SessionError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(err) | Self::Activate(err) | Self::Scroll(err) => Some(err),
        }
    }
}

#[derive(Debug)]
struct Episode {
    allocation: Allocation,
    typed: String,
    seen_generation: u64,
    _subscription: Subscription,
}

pub struct Session<A: HostAdapter> {
    adapter: A,
    config: NavigatorConfig,
    allocator: Allocator,
    notifier: ChangeNotifier,
    episode: Option<Episode>,
    /// Keys pressed during navigation whose release must not reach the host.
    held: SmallVec<[NavKey; 4]>,
}

impl<A: HostAdapter> Session<A> {
    pub fn new(adapter: A, config: NavigatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let allocator = config.allocator()?;
        Ok(Self {
            adapter,
            config,
            allocator,
            notifier: ChangeNotifier::default(),
            episode: None,
            held: SmallVec::new(),
        })
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        if self.episode.is_some() {
            SessionState::Active
        } else {
            SessionState::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.episode.is_some()
    }

    pub fn typed(&self) -> &str {
        self.episode.as_ref().map_or("", |episode| episode.typed.as_str())
    }

    pub fn allocation(&self) -> Option<&Allocation> {
        self.episode.as_ref().map(|episode| &episode.allocation)
    }

    /// Tips matching what has been typed so far; empty while idle.
    pub fn visible_tips(&self) -> Vec<Tip> {
        let Some(episode) = &self.episode else {
            return Vec::new();
        };
        let typed = episode.typed.as_str();
        episode
            .allocation
            .with_prefix(typed)
            .map(|(seq, binding)| Tip {
                typed: SmolStr::new(typed),
                remainder: SmolStr::new(seq.remainder_after(typed).unwrap_or_default()),
                id: binding.id().clone(),
            })
            .collect()
    }

    /// Starts navigation. Does nothing while already active.
    pub fn enter(&mut self) -> Result<(), SessionError<A::Error>> {
        if self.episode.is_some() {
            tracing::debug!(target: targets::SESSION, "already navigating");
            return Ok(());
        }

        let subscription = self.adapter.subscribe_changes(self.notifier.clone());
        let candidates = self.adapter.list_candidates();
        let allocation = self.allocator.allocate(&candidates);
        tracing::debug!(
            target: targets::SESSION,
            candidates = candidates.len(),
            bound = allocation.len(),
            "entering navigation"
        );

        self.held.clear();
        self.episode = Some(Episode {
            allocation,
            typed: String::new(),
            seen_generation: self.notifier.generation(),
            _subscription: subscription,
        });
        self.render_or_end()?;
        Ok(())
    }

    /// Enters navigation if the host asked for it at startup.
    pub fn on_startup(&mut self) -> Result<(), SessionError<A::Error>> {
        if self.config.activate_on_startup {
            self.enter()?;
        }
        Ok(())
    }

    /// The host reports that a text input lost focus.
    pub fn on_focus_cleared(&mut self) -> Result<(), SessionError<A::Error>> {
        if self.config.activate_on_no_focus && !self.adapter.is_text_entry_focused() {
            self.enter()?;
        }
        Ok(())
    }

    /// Ends navigation from outside, e.g. when the host navigates away.
    pub fn cancel(&mut self) {
        self.teardown("cancelled");
    }

    pub fn handle_key(&mut self, input: KeyInput) -> Result<KeyDisposition, SessionError<A::Error>> {
        if input.key == NavKey::Modifier {
            return Ok(if self.is_active() {
                KeyDisposition::Suppress
            } else {
                KeyDisposition::PassThrough
            });
        }

        if !self.is_active() {
            return self.handle_idle_key(input);
        }

        if !self.held.contains(&input.key) {
            self.held.push(input.key);
        }

        match input.key {
            NavKey::Space => {
                let direction = if input.modifiers.shift {
                    ScrollDirection::Up
                } else {
                    ScrollDirection::Down
                };
                self.scroll_active(direction, ScrollMagnitude::HalfPage)?;
            }
            NavKey::ArrowUp => self.scroll_active(ScrollDirection::Up, ScrollMagnitude::Line)?,
            NavKey::ArrowDown => {
                self.scroll_active(ScrollDirection::Down, ScrollMagnitude::Line)?
            }
            NavKey::Backspace => {
                if let Some(episode) = self.episode.as_mut() {
                    episode.typed.pop();
                }
                self.render_or_end()?;
            }
            key => match key.typed_char() {
                Some(ch) => self.type_char(ch, input.modifiers)?,
                None => self.teardown("cancelled by key"),
            },
        }

        Ok(KeyDisposition::Suppress)
    }

    /// Release of `key`. Releases of keys pressed during navigation stay hidden from the host.
    pub fn handle_key_release(&mut self, key: NavKey) -> KeyDisposition {
        let held = self.held.iter().position(|k| *k == key);
        if let Some(pos) = held {
            self.held.remove(pos);
        }
        if self.is_active() || held.is_some() {
            KeyDisposition::Suppress
        } else {
            KeyDisposition::PassThrough
        }
    }

    pub fn notifier(&self) -> ChangeNotifier {
        self.notifier.clone()
    }

    /// Processes pending change notifications one at a time.
    ///
    /// Reports `Rerendered` if any pass re-rendered, even when later passes only saw the
    /// host echo those tips back.
    pub fn pump_changes(&mut self) -> Result<ChangeOutcome, SessionError<A::Error>> {
        let mut outcome = ChangeOutcome::Ignored;
        for _ in 0..MAX_CHANGE_PASSES {
            let generation = self.notifier.generation();
            match self.episode.as_mut() {
                Some(episode) if episode.seen_generation != generation => {
                    episode.seen_generation = generation;
                }
                _ => return Ok(outcome),
            }
            outcome = match (outcome, self.on_candidates_changed()?) {
                (
                    ChangeOutcome::Rerendered,
                    ChangeOutcome::Unchanged | ChangeOutcome::Ignored,
                ) => ChangeOutcome::Rerendered,
                (_, pass) => pass,
            };
        }

        // Still pending; the next pump picks it up.
        if let Some(episode) = &self.episode {
            if episode.seen_generation != self.notifier.generation() {
                tracing::warn!(
                    target: targets::SESSION,
                    passes = MAX_CHANGE_PASSES,
                    "candidate set keeps changing; deferring further updates"
                );
            }
        }
        Ok(outcome)
    }

    /// Re-allocates against the host's current candidates.
    pub fn on_candidates_changed(&mut self) -> Result<ChangeOutcome, SessionError<A::Error>> {
        if self.episode.is_none() {
            return Ok(ChangeOutcome::Ignored);
        }

        let candidates = self.adapter.list_candidates();
        let allocation = self.allocator.allocate(&candidates);

        let Some(episode) = self.episode.as_mut() else {
            return Ok(ChangeOutcome::Ignored);
        };
        if allocation.same_bindings(&episode.allocation) {
            tracing::debug!(target: targets::SESSION, "same navigation targets; not re-rendering");
            return Ok(ChangeOutcome::Unchanged);
        }

        tracing::debug!(target: targets::SESSION, bound = allocation.len(), "navigation targets changed");
        episode.allocation = allocation;
        episode.typed.clear();
        if self.render_or_end()? {
            Ok(ChangeOutcome::Rerendered)
        } else {
            Ok(ChangeOutcome::Ended)
        }
    }

    fn handle_idle_key(&mut self, input: KeyInput) -> Result<KeyDisposition, SessionError<A::Error>> {
        if input.key == NavKey::Char(self.config.start_key)
            && (input.modifiers.alt || !self.adapter.is_text_entry_focused())
        {
            self.enter()?;
            self.held.push(input.key);
            return Ok(KeyDisposition::Suppress);
        }

        if self.config.scroll_outside_navigate_mode && !self.adapter.is_text_entry_focused() {
            if let Some((direction, magnitude)) = idle_scroll(input) {
                let request = ScrollRequest {
                    direction,
                    magnitude,
                    scope: ScrollScope::Main,
                };
                self.adapter.scroll(request).map_err(SessionError::Scroll)?;
                return Ok(KeyDisposition::Suppress);
            }
        }

        if let Some(pos) = self.held.iter().position(|k| *k == input.key) {
            self.held.remove(pos);
        }
        Ok(KeyDisposition::PassThrough)
    }

    fn type_char(&mut self, ch: char, modifiers: Modifiers) -> Result<(), SessionError<A::Error>> {
        let Some(episode) = self.episode.as_mut() else {
            return Ok(());
        };
        episode.typed.push(ch);

        let Some(binding) = episode.allocation.get(&episode.typed).cloned() else {
            self.render_or_end()?;
            return Ok(());
        };

        tracing::debug!(target: targets::SESSION, target_id = %binding.id(), "activating");
        if let Err(err) = self.adapter.activate(binding.id(), modifiers) {
            self.teardown("activation failed");
            return Err(SessionError::Activate(err));
        }

        if binding.is_sticky() {
            if let Some(episode) = self.episode.as_mut() {
                episode.typed.clear();
            }
            self.render_or_end()?;
        } else {
            self.teardown("activated");
        }
        Ok(())
    }

    fn scroll_active(
        &mut self,
        direction: ScrollDirection,
        magnitude: ScrollMagnitude,
    ) -> Result<(), SessionError<A::Error>> {
        let scope = if self.typed().starts_with(SIDEBAR_BLOCK_PREFIX) {
            ScrollScope::Sidebar
        } else {
            ScrollScope::Main
        };
        let request = ScrollRequest {
            direction,
            magnitude,
            scope,
        };
        if let Err(err) = self.adapter.scroll(request) {
            self.teardown("scroll failed");
            return Err(SessionError::Scroll(err));
        }
        Ok(())
    }

    /// Renders the tips for the current input, or ends navigation if there are none.
    fn render_or_end(&mut self) -> Result<bool, SessionError<A::Error>> {
        let tips = self.visible_tips();
        if tips.is_empty() {
            self.teardown("no matching tips");
            return Ok(false);
        }
        if let Err(err) = self.adapter.render_tips(&tips) {
            self.teardown("rendering failed");
            return Err(SessionError::Render(err));
        }
        Ok(true)
    }

    fn teardown(&mut self, reason: &'static str) {
        if let Some(episode) = self.episode.take() {
            self.adapter.clear_tips();
            drop(episode);
            tracing::debug!(target: targets::SESSION, reason, "navigation finished");
        }
    }
}

impl<A: HostAdapter> Drop for Session<A> {
    fn drop(&mut self) {
        self.teardown("session dropped");
    }
}

fn idle_scroll(input: KeyInput) -> Option<(ScrollDirection, ScrollMagnitude)> {
    match input.key {
        NavKey::Space if input.modifiers.shift => {
            Some((ScrollDirection::Up, ScrollMagnitude::HalfPage))
        }
        NavKey::Space => Some((ScrollDirection::Down, ScrollMagnitude::HalfPage)),
        NavKey::ArrowUp => Some((ScrollDirection::Up, ScrollMagnitude::Line)),
        NavKey::ArrowDown => Some((ScrollDirection::Down, ScrollMagnitude::Line)),
        _ => None,
    }
}
