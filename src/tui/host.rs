// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::fmt;

use crate::logging::targets;
use crate::model::CandidateId;
use crate::retry::{RetryPolicy, RetryStep, RetryTask};
use crate::session::{
    ChangeNotifier, HostAdapter, Modifiers, ScrollDirection, ScrollMagnitude, ScrollRequest,
    ScrollScope, Subscription, Tip,
};

use super::document::{Document, EditTarget, Target, View};

/// A terminal row counts as this many pixels when applying the line scroll setting.
const ROW_HEIGHT_PX: u16 = 20;

#[derive(Debug)]
pub(crate) enum DemoError {
    UnknownTarget(CandidateId),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTarget(id) => write!(f, "unknown navigation target `{id}`"),
        }
    }
}

impl std::error::Error for DemoError {}

/// Text input the demo owns. While one is open the host reports a focused text entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Editor {
    pub(crate) target: EditTarget,
    pub(crate) buffer: String,
}

#[derive(Debug)]
pub(crate) struct DemoHost {
    document: Document,
    tips: HashMap<CandidateId, Tip>,
    notifier: Option<ChangeNotifier>,
    main_scroll: u16,
    sidebar_scroll: u16,
    main_viewport: u16,
    sidebar_viewport: u16,
    line_rows: u16,
    editor: Option<Editor>,
    editor_wait: Option<RetryTask>,
    retry_policy: RetryPolicy,
    status: Option<String>,
}

impl DemoHost {
    pub(crate) fn new(document: Document, line_scroll: u16) -> Self {
        Self {
            document,
            tips: HashMap::new(),
            notifier: None,
            main_scroll: 0,
            sidebar_scroll: 0,
            main_viewport: 0,
            sidebar_viewport: 0,
            line_rows: (line_scroll / ROW_HEIGHT_PX).max(1),
            editor: None,
            editor_wait: None,
            retry_policy: RetryPolicy::default(),
            status: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn tip_for(&self, id: &CandidateId) -> Option<&Tip> {
        self.tips.get(id)
    }

    pub(crate) fn scroll_offsets(&self) -> (u16, u16) {
        (self.main_scroll, self.sidebar_scroll)
    }

    pub(crate) fn set_viewports(&mut self, main: u16, sidebar: u16) {
        self.main_viewport = main;
        self.sidebar_viewport = sidebar;
        self.main_scroll = self.main_scroll.min(self.max_scroll(ScrollScope::Main));
        self.sidebar_scroll = self.sidebar_scroll.min(self.max_scroll(ScrollScope::Sidebar));
    }

    pub(crate) fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }

    pub(crate) fn is_waiting_for_editor(&self) -> bool {
        self.editor_wait.is_some()
    }

    pub(crate) fn retry_delay(&self) -> std::time::Duration {
        self.retry_policy.delay
    }

    pub(crate) fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub(crate) fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// One event loop tick: lets a scheduled editor open and polls for it.
    pub(crate) fn tick(&mut self) {
        self.document.advance();
        let Some(task) = self.editor_wait.as_mut() else {
            return;
        };
        let document = &mut self.document;
        match task.step(|| document.take_open_editor()) {
            RetryStep::Pending => {}
            RetryStep::Found(target) => {
                tracing::debug!(target: targets::TUI, attempts = task.attempts(), ?target, "editor open");
                let buffer = document.text_of(target).unwrap_or_default().to_owned();
                self.editor = Some(Editor { target, buffer });
                self.editor_wait = None;
            }
            RetryStep::Exhausted | RetryStep::Cancelled => {
                self.editor_wait = None;
                self.status = Some("editor did not open".to_owned());
            }
        }
    }

    pub(crate) fn editor_input(&mut self, ch: char) {
        if let Some(editor) = self.editor.as_mut() {
            editor.buffer.push(ch);
        }
    }

    pub(crate) fn editor_backspace(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.buffer.pop();
        }
    }

    /// Closes the editor, keeping its text when `commit` is set.
    pub(crate) fn close_editor(&mut self, commit: bool) {
        let Some(editor) = self.editor.take() else {
            return;
        };
        if commit {
            self.document.set_text(editor.target, editor.buffer);
            self.notify_changed();
        }
    }

    fn notify_changed(&self) {
        if let Some(notifier) = &self.notifier {
            notifier.notify();
        }
    }

    fn begin_edit(&mut self, edit: EditTarget) {
        self.document.begin_edit(edit);
        self.editor_wait = Some(RetryTask::new("block editor", self.retry_policy));
        self.status = Some("opening editor".to_owned());
    }

    fn abandon_edit(&mut self) {
        if self.editor_wait.take().is_some() {
            self.document.cancel_edit();
            self.status = None;
        }
    }

    fn open_view(&mut self, view: View) {
        self.document.set_view(view);
        self.main_scroll = 0;
        self.status = None;
    }

    fn content_rows(&self, scope: ScrollScope) -> u16 {
        let rows = match scope {
            ScrollScope::Main => match self.document.view() {
                View::Page(_) => self.document.current_page().map_or(0, |p| p.blocks.len() + 2),
                View::AllPages => self.document.pages().len(),
                View::Graph => 1,
            },
            ScrollScope::Sidebar => self.document.sidebar().map_or(0, |p| p.blocks.len() + 2),
        };
        u16::try_from(rows).unwrap_or(u16::MAX)
    }

    fn max_scroll(&self, scope: ScrollScope) -> u16 {
        let viewport = match scope {
            ScrollScope::Main => self.main_viewport,
            ScrollScope::Sidebar => self.sidebar_viewport,
        };
        self.content_rows(scope).saturating_sub(viewport)
    }
}

impl HostAdapter for DemoHost {
    type Error = DemoError;

    fn list_candidates(&mut self) -> Vec<crate::model::Candidate> {
        self.document.candidates()
    }

    fn render_tips(&mut self, tips: &[Tip]) -> Result<(), DemoError> {
        self.tips = tips.iter().map(|tip| (tip.id.clone(), tip.clone())).collect();
        // A page observing its own DOM would see the tips as a mutation.
        self.notify_changed();
        Ok(())
    }

    fn clear_tips(&mut self) {
        self.tips.clear();
    }

    fn activate(&mut self, id: &CandidateId, modifiers: Modifiers) -> Result<(), DemoError> {
        let target = Target::parse(id).ok_or_else(|| DemoError::UnknownTarget(id.clone()))?;
        tracing::debug!(target: targets::TUI, %id, shift = modifiers.shift, "activate");

        // Navigating away blurs the open input; its text is dropped.
        self.close_editor(false);
        self.abandon_edit();

        let page_count = self.document.pages().len();
        match target {
            Target::Daily => self.open_view(View::Page(0)),
            Target::Graph => self.open_view(View::Graph),
            Target::AllPages => self.open_view(View::AllPages),
            Target::Page(i) | Target::Starred(i) if i < page_count => {
                self.open_view(View::Page(i))
            }
            Target::Page(_) | Target::Starred(_) => {
                return Err(DemoError::UnknownTarget(id.clone()))
            }
            Target::ToggleStarred => {
                self.document.toggle_starred();
                self.notify_changed();
            }
            Target::Sidebar(block) => self.begin_edit(EditTarget::Sidebar(block)),
            Target::Title | Target::Block(_) => {
                let View::Page(page) = self.document.view() else {
                    return Err(DemoError::UnknownTarget(id.clone()));
                };
                let edit = match target {
                    Target::Block(block) => EditTarget::Block(page, block),
                    _ => EditTarget::Title(page),
                };
                self.begin_edit(edit);
            }
        }
        Ok(())
    }

    fn scroll(&mut self, request: ScrollRequest) -> Result<(), DemoError> {
        let max = self.max_scroll(request.scope);
        let (offset, viewport) = match request.scope {
            ScrollScope::Main => (&mut self.main_scroll, self.main_viewport),
            ScrollScope::Sidebar => (&mut self.sidebar_scroll, self.sidebar_viewport),
        };
        let rows = match request.magnitude {
            ScrollMagnitude::Line => self.line_rows,
            ScrollMagnitude::HalfPage => (viewport / 2).max(1),
        };
        *offset = match request.direction {
            ScrollDirection::Up => offset.saturating_sub(rows),
            ScrollDirection::Down => offset.saturating_add(rows).min(max),
        };
        Ok(())
    }

    fn subscribe_changes(&mut self, notifier: ChangeNotifier) -> Subscription {
        self.notifier = Some(notifier);
        Subscription::none()
    }

    fn is_text_entry_focused(&self) -> bool {
        self.editor.is_some()
    }
}
