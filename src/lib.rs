// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keytip: keyboard-driven visual navigation.
//!
//! [`alloc`] assigns every visible target a short, prefix-free key sequence. [`session`] runs
//! navigation mode against a host through the [`session::HostAdapter`] trait. [`tui`] is a
//! terminal host used as a demo.

pub mod alloc;
pub mod config;
pub mod logging;
pub mod model;
pub mod retry;
pub mod session;
pub mod tui;
