// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::ENTER_SYMBOL;

/// A key as the session sees it; hosts translate their native events into this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Char(char),
    Enter,
    Backspace,
    Escape,
    Space,
    ArrowUp,
    ArrowDown,
    /// Shift, Alt, Control or Meta pressed on its own.
    Modifier,
    Other,
}

impl NavKey {
    /// The character this key contributes to a typed sequence.
    pub fn typed_char(&self) -> Option<char> {
        match *self {
            Self::Char(ch) => {
                let mut lower = ch.to_lowercase();
                match (lower.next(), lower.next()) {
                    (Some(single), None) => Some(single),
                    _ => Some(ch),
                }
            }
            Self::Enter => Some(ENTER_SYMBOL),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        alt: false,
        ctrl: false,
        meta: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: NavKey,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: NavKey) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn char(ch: char) -> Self {
        Self::new(NavKey::Char(ch))
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }
}

/// Whether the host should let a key event through to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    Suppress,
    PassThrough,
}
