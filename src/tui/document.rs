// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-memory outline the demo navigates.

use crate::alloc::{numbered_blocks, SIDEBAR_BLOCK_PREFIX};
use crate::model::{Candidate, CandidateId, KeySeq, ENTER_SYMBOL};

/// Ticks between activating a block and its editor showing up.
pub(crate) const EDITOR_DELAY_TICKS: u8 = 3;

pub(crate) const DAILY_KEY: &str = "g";
pub(crate) const ALL_PAGES_KEY: &str = "a";
pub(crate) const EDIT_TITLE_KEY: &str = "^";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Page {
    pub(crate) title: String,
    pub(crate) blocks: Vec<String>,
}

impl Page {
    fn new(title: &str, blocks: &[&str]) -> Self {
        Self {
            title: title.to_owned(),
            blocks: blocks.iter().map(|b| (*b).to_owned()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    Page(usize),
    Graph,
    AllPages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditTarget {
    Title(usize),
    Block(usize, usize),
    Sidebar(usize),
}

/// What an activated candidate id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Daily,
    Graph,
    AllPages,
    ToggleStarred,
    Title,
    Page(usize),
    Starred(usize),
    Block(usize),
    Sidebar(usize),
}

impl Target {
    pub(crate) fn parse(id: &CandidateId) -> Option<Self> {
        let raw = id.as_str();
        match raw {
            "nav:daily" => return Some(Self::Daily),
            "nav:graph" => return Some(Self::Graph),
            "nav:all-pages" => return Some(Self::AllPages),
            "toggle:starred" => return Some(Self::ToggleStarred),
            "title" => return Some(Self::Title),
            _ => {}
        }
        let (kind, index) = raw.split_once(':')?;
        let index = index.parse().ok()?;
        match kind {
            "page" => Some(Self::Page(index)),
            "starred" => Some(Self::Starred(index)),
            "block" => Some(Self::Block(index)),
            "sidebar" => Some(Self::Sidebar(index)),
            _ => None,
        }
    }

    pub(crate) fn id(self) -> CandidateId {
        let raw = match self {
            Self::Daily => "nav:daily".to_owned(),
            Self::Graph => "nav:graph".to_owned(),
            Self::AllPages => "nav:all-pages".to_owned(),
            Self::ToggleStarred => "toggle:starred".to_owned(),
            Self::Title => "title".to_owned(),
            Self::Page(i) => format!("page:{i}"),
            Self::Starred(i) => format!("starred:{i}"),
            Self::Block(i) => format!("block:{i}"),
            Self::Sidebar(i) => format!("sidebar:{i}"),
        };
        CandidateId::new_unchecked(raw)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Document {
    pages: Vec<Page>,
    starred: Vec<usize>,
    sidebar_page: Option<usize>,
    view: View,
    starred_folded: bool,
    pending_editor: Option<(EditTarget, u8)>,
}

impl Document {
    pub(crate) fn demo() -> Self {
        let pages = vec![
            Page::new(
                "Daily Notes",
                &[
                    "Review inbox",
                    "Call with the design team",
                    "Plan the week",
                    "Read two chapters",
                ],
            ),
            Page::new("Inbox", &["Receipts to file", "Reply to Sam", "Book dentist"]),
            Page::new("Today", &["Ship the release notes", "Water the plants"]),
            Page::new(
                "Project Alpha",
                &[
                    "Goal: a keyboard-first outline",
                    "Milestone 1: prototype",
                    "Milestone 2: beta users",
                    "Open risks",
                    "Decision log",
                    "Budget",
                    "Team",
                    "Timeline",
                    "Retro notes",
                    "Vendor list",
                    "Hiring plan",
                    "Launch checklist",
                ],
            ),
            Page::new("Project Beta", &["Scope", "Stakeholders", "Status"]),
            Page::new("Reading List", &["Thinking in Systems", "The Rust Book"]),
            Page::new(
                "Meeting Notes",
                &["Standup: no blockers", "Sync: move launch a week", "1:1 topics"],
            ),
        ];
        Self {
            pages,
            starred: vec![1, 2, 3, 4, 5],
            sidebar_page: Some(6),
            view: View::Page(0),
            starred_folded: false,
            pending_editor: None,
        }
    }

    pub(crate) fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub(crate) fn view(&self) -> View {
        self.view
    }

    pub(crate) fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub(crate) fn current_page(&self) -> Option<&Page> {
        match self.view {
            View::Page(i) => self.pages.get(i),
            View::Graph | View::AllPages => None,
        }
    }

    pub(crate) fn sidebar(&self) -> Option<&Page> {
        self.sidebar_page.and_then(|i| self.pages.get(i))
    }

    pub(crate) fn starred(&self) -> impl Iterator<Item = (usize, &Page)> + '_ {
        self.starred
            .iter()
            .filter_map(|&i| self.pages.get(i).map(|page| (i, page)))
    }

    pub(crate) fn starred_folded(&self) -> bool {
        self.starred_folded
    }

    pub(crate) fn toggle_starred(&mut self) {
        self.starred_folded = !self.starred_folded;
    }

    /// Navigation targets in display order.
    pub(crate) fn candidates(&self) -> Vec<Candidate> {
        let mut out = Vec::new();
        out.push(forced(Target::Daily, DAILY_KEY));
        out.push(forced(Target::Graph, &format!("o{ENTER_SYMBOL}")));
        out.push(forced(Target::AllPages, ALL_PAGES_KEY));
        out.push(Candidate::from_text(Target::ToggleStarred.id(), "Starred").sticky());
        if !self.starred_folded {
            for (i, page) in self.starred() {
                out.push(Candidate::from_text(Target::Starred(i).id(), &page.title));
            }
        }

        match self.view {
            View::Page(_) => {
                if let Some(page) = self.current_page() {
                    out.push(forced(Target::Title, EDIT_TITLE_KEY));
                    let ids = (0..page.blocks.len())
                        .map(|i| Target::Block(i).id())
                        .collect::<Vec<_>>();
                    push_blocks(&mut out, &ids, "");
                }
            }
            View::AllPages => {
                for (i, page) in self.pages.iter().enumerate() {
                    out.push(Candidate::from_text(Target::Page(i).id(), &page.title));
                }
            }
            View::Graph => {}
        }

        if let Some(sidebar) = self.sidebar() {
            let ids = (0..sidebar.blocks.len())
                .map(|i| Target::Sidebar(i).id())
                .collect::<Vec<_>>();
            push_blocks(&mut out, &ids, SIDEBAR_BLOCK_PREFIX);
        }
        out
    }

    /// Schedules an editor for `target`; it opens after a few ticks.
    pub(crate) fn begin_edit(&mut self, target: EditTarget) {
        self.pending_editor = Some((target, EDITOR_DELAY_TICKS));
    }

    pub(crate) fn cancel_edit(&mut self) {
        self.pending_editor = None;
    }

    pub(crate) fn advance(&mut self) {
        if let Some((_, ticks)) = self.pending_editor.as_mut() {
            *ticks = ticks.saturating_sub(1);
        }
    }

    /// Returns the target once its editor has opened.
    pub(crate) fn take_open_editor(&mut self) -> Option<EditTarget> {
        match self.pending_editor {
            Some((target, 0)) => {
                self.pending_editor = None;
                Some(target)
            }
            _ => None,
        }
    }

    pub(crate) fn text_of(&self, target: EditTarget) -> Option<&str> {
        match target {
            EditTarget::Title(page) => self.pages.get(page).map(|p| p.title.as_str()),
            EditTarget::Block(page, block) => self
                .pages
                .get(page)
                .and_then(|p| p.blocks.get(block))
                .map(String::as_str),
            EditTarget::Sidebar(block) => self
                .sidebar()
                .and_then(|p| p.blocks.get(block))
                .map(String::as_str),
        }
    }

    pub(crate) fn set_text(&mut self, target: EditTarget, text: String) {
        let slot = match target {
            EditTarget::Title(page) => self.pages.get_mut(page).map(|p| &mut p.title),
            EditTarget::Block(page, block) => {
                self.pages.get_mut(page).and_then(|p| p.blocks.get_mut(block))
            }
            EditTarget::Sidebar(block) => {
                let page = self.sidebar_page;
                page.and_then(|i| self.pages.get_mut(i))
                    .and_then(|p| p.blocks.get_mut(block))
            }
        };
        if let Some(slot) = slot {
            *slot = text;
        }
    }
}

fn forced(target: Target, seq: &str) -> Candidate {
    match KeySeq::new(seq) {
        Ok(seq) => Candidate::forced(target.id(), seq),
        Err(_) => Candidate::from_text(target.id(), ""),
    }
}

fn push_blocks(out: &mut Vec<Candidate>, ids: &[CandidateId], prefix: &str) {
    match numbered_blocks(ids, ids.last(), prefix) {
        Ok(blocks) => out.extend(blocks),
        Err(err) => {
            tracing::error!(target: crate::logging::targets::TUI, %err, prefix, "cannot number blocks")
        }
    }
}
