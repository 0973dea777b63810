// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal demo host.
//!
//! An outline browser (ratatui + crossterm) over an in-memory document. It implements
//! [`HostAdapter`](crate::session::HostAdapter) the way a page integration would: tips are drawn
//! next to their targets, block activation opens an editor a few ticks later, and the editor
//! counts as a focused text entry.

use std::{
    error::Error,
    fmt, io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::config::{ConfigError, NavigatorConfig};
use crate::logging::targets;
use crate::session::{KeyDisposition, KeyInput, Modifiers, NavKey, Session, Tip};

mod document;
mod host;

use document::{Document, Target, View};
use host::DemoHost;

const TIP_COLOR: Color = Color::Yellow;
const TIP_TYPED_COLOR: Color = Color::DarkGray;
const FOCUS_COLOR: Color = Color::LightGreen;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const NAV_PANEL_WIDTH: u16 = 26;
const SIDEBAR_WIDTH: u16 = 34;
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Runs the demo until the user quits.
pub fn run(config: NavigatorConfig) -> Result<(), Box<dyn Error>> {
    let mut app = App::new(config)?;
    let mut terminal = TerminalSession::new()?;
    app.start();

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(app.poll_timeout())? {
            if let Event::Key(key) = event::read()? {
                app.handle_key_event(key);
            }
        }
        app.tick();
    }

    Ok(())
}

pub(crate) struct App {
    session: Session<DemoHost>,
    should_quit: bool,
    last_tick: Instant,
}

impl App {
    pub(crate) fn new(config: NavigatorConfig) -> Result<Self, ConfigError> {
        let host = DemoHost::new(Document::demo(), config.line_scroll);
        Ok(Self {
            session: Session::new(host, config)?,
            should_quit: false,
            last_tick: Instant::now(),
        })
    }

    fn start(&mut self) {
        if let Err(err) = self.session.on_startup() {
            self.report(err);
        }
    }

    fn host(&self) -> &DemoHost {
        self.session.adapter()
    }

    fn poll_timeout(&self) -> Duration {
        if self.host().is_waiting_for_editor() {
            self.host().retry_delay()
        } else {
            IDLE_POLL
        }
    }

    pub(crate) fn handle_key_event(&mut self, key: KeyEvent) {
        let input = key_input(&key);
        if key.kind == KeyEventKind::Release {
            // The demo has no key-up handlers of its own.
            let _ = self.session.handle_key_release(input.key);
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.session.handle_key(input) {
            Ok(KeyDisposition::Suppress) => {}
            Ok(KeyDisposition::PassThrough) => self.host_key(key),
            Err(err) => self.report(err),
        }
        self.pump();
    }

    /// Keys navigation let through, handled as the page itself would.
    fn host_key(&mut self, key: KeyEvent) {
        if self.host().editor().is_some() {
            match key.code {
                KeyCode::Esc => self.leave_editor(false),
                KeyCode::Enter => self.leave_editor(true),
                KeyCode::Backspace => self.session.adapter_mut().editor_backspace(),
                KeyCode::Char(ch) => self.session.adapter_mut().editor_input(ch),
                _ => {}
            }
            return;
        }

        if key.code == KeyCode::Char('q') {
            self.should_quit = true;
        }
    }

    fn leave_editor(&mut self, commit: bool) {
        self.session.adapter_mut().close_editor(commit);
        if let Err(err) = self.session.on_focus_cleared() {
            self.report(err);
        }
    }

    fn tick(&mut self) {
        let delay = self.host().retry_delay();
        if self.last_tick.elapsed() >= delay {
            self.session.adapter_mut().tick();
            self.last_tick = Instant::now();
        }
        self.pump();
    }

    fn pump(&mut self) {
        if let Err(err) = self.session.pump_changes() {
            self.report(err);
        }
    }

    fn report(&mut self, err: impl fmt::Display) {
        tracing::warn!(target: targets::TUI, %err, "navigation error");
        self.session.adapter_mut().set_status(err.to_string());
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let [body, footer] = split_footer(frame.size());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(NAV_PANEL_WIDTH),
            Constraint::Min(10),
            Constraint::Length(SIDEBAR_WIDTH),
        ])
        .split(body);

    let main_block = Block::default().borders(Borders::ALL);
    let sidebar_block = Block::default().borders(Borders::ALL);
    let main_inner = main_block.inner(columns[1]);
    let sidebar_inner = sidebar_block.inner(columns[2]);
    app.session
        .adapter_mut()
        .set_viewports(main_inner.height, sidebar_inner.height);

    let host = app.host();
    let document = host.document();
    let (main_scroll, sidebar_scroll) = host.scroll_offsets();

    let nav = Paragraph::new(nav_lines(host)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Keytip")
            .border_style(panel_border_style(app.session.is_active())),
    );
    frame.render_widget(nav, columns[0]);

    let main_title = match document.view() {
        View::Page(_) => "Page",
        View::Graph => "Graph Overview",
        View::AllPages => "All Pages",
    };
    let main = Paragraph::new(main_lines(host))
        .block(main_block.title(main_title))
        .scroll((main_scroll, 0));
    frame.render_widget(main, columns[1]);

    let sidebar_title = document
        .sidebar()
        .map_or_else(String::new, |page| page.title.clone());
    let sidebar = Paragraph::new(sidebar_lines(host))
        .block(sidebar_block.title(sidebar_title))
        .scroll((sidebar_scroll, 0));
    frame.render_widget(sidebar, columns[2]);

    frame.render_widget(Paragraph::new(footer_line(app)), footer);
}

fn split_footer(area: Rect) -> [Rect; 2] {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    [rows[0], rows[1]]
}

fn panel_border_style(navigating: bool) -> Style {
    if navigating {
        Style::default().fg(FOCUS_COLOR)
    } else {
        Style::default()
    }
}

fn nav_lines(host: &DemoHost) -> Vec<Line<'static>> {
    let document = host.document();
    let mut lines = vec![
        item_line("Daily Notes", host.tip_for(&Target::Daily.id())),
        item_line("Graph Overview", host.tip_for(&Target::Graph.id())),
        item_line("All Pages", host.tip_for(&Target::AllPages.id())),
        Line::default(),
    ];
    let marker = if document.starred_folded() { '▸' } else { '▾' };
    lines.push(item_line(
        &format!("{marker} Starred"),
        host.tip_for(&Target::ToggleStarred.id()),
    ));
    if !document.starred_folded() {
        for (i, page) in document.starred() {
            lines.push(item_line(
                &format!("  {}", page.title),
                host.tip_for(&Target::Starred(i).id()),
            ));
        }
    }
    lines
}

fn main_lines(host: &DemoHost) -> Vec<Line<'static>> {
    let document = host.document();
    match document.view() {
        View::Page(_) => {
            let Some(page) = document.current_page() else {
                return Vec::new();
            };
            let mut lines = vec![
                styled_item_line(
                    &page.title,
                    host.tip_for(&Target::Title.id()),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::default(),
            ];
            for (i, text) in page.blocks.iter().enumerate() {
                lines.push(item_line(
                    &format!("• {text}"),
                    host.tip_for(&Target::Block(i).id()),
                ));
            }
            lines
        }
        View::AllPages => document
            .pages()
            .iter()
            .enumerate()
            .map(|(i, page)| item_line(&page.title, host.tip_for(&Target::Page(i).id())))
            .collect(),
        View::Graph => {
            let starred = document.starred().count();
            vec![Line::from(format!(
                "{} pages, {starred} starred",
                document.pages().len()
            ))]
        }
    }
}

fn sidebar_lines(host: &DemoHost) -> Vec<Line<'static>> {
    let Some(page) = host.document().sidebar() else {
        return Vec::new();
    };
    page.blocks
        .iter()
        .enumerate()
        .map(|(i, text)| {
            item_line(
                &format!("• {text}"),
                host.tip_for(&Target::Sidebar(i).id()),
            )
        })
        .collect()
}

/// `label` preceded by its tip, if one is showing.
fn item_line(label: &str, tip: Option<&Tip>) -> Line<'static> {
    styled_item_line(label, tip, Style::default())
}

fn styled_item_line(label: &str, tip: Option<&Tip>, label_style: Style) -> Line<'static> {
    let mut spans = Vec::with_capacity(4);
    if let Some(tip) = tip {
        if !tip.typed.is_empty() {
            spans.push(Span::styled(
                tip.typed.to_string(),
                Style::default().fg(TIP_TYPED_COLOR).bg(TIP_COLOR),
            ));
        }
        spans.push(Span::styled(
            tip.remainder.to_string(),
            Style::default()
                .fg(Color::Black)
                .bg(TIP_COLOR)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(label.to_owned(), label_style));
    Line::from(spans)
}

fn footer_line(app: &App) -> Line<'static> {
    let host = app.host();
    if app.session.is_active() {
        return Line::from(vec![
            Span::styled("navigate ", Style::default().fg(FOOTER_LABEL_COLOR)),
            Span::styled(
                app.session.typed().to_owned(),
                Style::default().fg(FOOTER_KEY_COLOR),
            ),
        ]);
    }
    if let Some(editor) = host.editor() {
        return Line::from(vec![
            Span::styled("edit ", Style::default().fg(FOOTER_LABEL_COLOR)),
            Span::raw(editor.buffer.clone()),
            Span::styled("▏", Style::default().fg(FOOTER_KEY_COLOR)),
        ]);
    }
    if let Some(status) = host.status() {
        return Line::from(Span::styled(
            status.to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }

    let start = app.session.config().start_key.to_string();
    let mut spans = Vec::new();
    for (key, label) in [(start.as_str(), "navigate"), ("q", "quit")] {
        spans.push(Span::styled(key.to_owned(), Style::default().fg(FOOTER_KEY_COLOR)));
        spans.push(Span::styled(
            format!(" {label}  "),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }
    Line::from(spans)
}

/// Translates a crossterm key event for the session.
pub(crate) fn key_input(key: &KeyEvent) -> KeyInput {
    let nav = match key.code {
        KeyCode::Char(' ') => NavKey::Space,
        KeyCode::Char(ch) => NavKey::Char(ch),
        KeyCode::Enter => NavKey::Enter,
        KeyCode::Backspace => NavKey::Backspace,
        KeyCode::Esc => NavKey::Escape,
        KeyCode::Up => NavKey::ArrowUp,
        KeyCode::Down => NavKey::ArrowDown,
        KeyCode::Modifier(_) => NavKey::Modifier,
        _ => NavKey::Other,
    };
    let mods = key.modifiers;
    KeyInput {
        key: nav,
        modifiers: Modifiers {
            shift: mods.contains(KeyModifiers::SHIFT),
            alt: mods.contains(KeyModifiers::ALT),
            ctrl: mods.contains(KeyModifiers::CONTROL),
            meta: mods.intersects(KeyModifiers::SUPER | KeyModifiers::META),
        },
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    key_events: bool,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal(false);
            err
        })?;

        // Key releases are only reported with the enhanced keyboard protocol.
        let key_events = supports_keyboard_enhancement().unwrap_or(false)
            && execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .is_ok();

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal(key_events);
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal(key_events);
            err
        })?;

        Ok(Self {
            terminal,
            key_events,
        })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal(self.key_events);
    }
}

fn teardown_terminal(key_events: bool) {
    let mut stdout = io::stdout();
    if key_events {
        let _ = execute!(stdout, PopKeyboardEnhancementFlags);
    }
    let _ = disable_raw_mode();
    let _ = execute!(stdout, LeaveAlternateScreen);
}
