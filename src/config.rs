// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Navigator settings.
//!
//! Hosts pass the user's settings as a JSON object. Missing keys take their defaults, unknown
//! keys are ignored so older hosts keep working.

use std::fmt;

use serde::Deserialize;

use crate::alloc::{Allocator, JumpKeys, JumpKeysError, DEFAULT_JUMP_KEYS, DEFAULT_MAX_PREFIX};
use crate::model::key_seq::is_sequence_char;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NavigatorConfig {
    /// Starts navigation when pressed outside a text input, or with Alt anywhere.
    pub start_key: char,
    pub max_prefix: usize,
    pub jump_keys: String,
    /// Enter navigation when a text input loses focus.
    pub activate_on_no_focus: bool,
    /// Enter navigation when the host finishes loading.
    pub activate_on_startup: bool,
    /// Handle scroll keys even when navigation is not active.
    pub scroll_outside_navigate_mode: bool,
    pub line_scroll: u16,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            start_key: 'g',
            max_prefix: DEFAULT_MAX_PREFIX,
            jump_keys: DEFAULT_JUMP_KEYS.to_owned(),
            activate_on_no_focus: true,
            activate_on_startup: true,
            scroll_outside_navigate_mode: true,
            line_scroll: 40,
        }
    }
}

impl NavigatorConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_prefix == 0 {
            return Err(ConfigError::ZeroMaxPrefix);
        }
        if !is_sequence_char(self.start_key) {
            return Err(ConfigError::InvalidStartKey(self.start_key));
        }
        JumpKeys::new(&self.jump_keys).map_err(ConfigError::JumpKeys)?;
        Ok(())
    }

    pub fn allocator(&self) -> Result<Allocator, ConfigError> {
        if self.max_prefix == 0 {
            return Err(ConfigError::ZeroMaxPrefix);
        }
        let jump_keys = JumpKeys::new(&self.jump_keys).map_err(ConfigError::JumpKeys)?;
        Ok(Allocator::new(self.max_prefix, jump_keys))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    ZeroMaxPrefix,
    InvalidStartKey(char),
    JumpKeys(JumpKeysError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid settings JSON: {err}"),
            Self::ZeroMaxPrefix => f.write_str("max-prefix must be at least 1"),
            Self::InvalidStartKey(ch) => write!(f, "start-key must be printable, got {ch:?}"),
            Self::JumpKeys(err) => write!(f, "invalid jump-keys: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::JumpKeys(err) => Some(err),
            Self::ZeroMaxPrefix | Self::InvalidStartKey(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, NavigatorConfig};
    use crate::alloc::JumpKeysError;

    #[test]
    fn empty_object_uses_defaults() {
        let config = NavigatorConfig::from_json_str("{}").expect("config");
        assert_eq!(config, NavigatorConfig::default());
    }

    #[test]
    fn host_setting_names_are_kebab_case() {
        let config = NavigatorConfig::from_json_str(
            r#"{
  "activate-on-no-focus": false,
  "activate-on-startup": false,
  "scroll-outside-navigate-mode": false,
  "start-key": "f",
  "some-future-setting": 3
}"#,
        )
        .expect("config");

        assert!(!config.activate_on_no_focus);
        assert!(!config.activate_on_startup);
        assert!(!config.scroll_outside_navigate_mode);
        assert_eq!(config.start_key, 'f');
        assert_eq!(config.max_prefix, 2);
    }

    #[test]
    fn rejects_zero_max_prefix() {
        let err = NavigatorConfig::from_json_str(r#"{"max-prefix": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroMaxPrefix));
    }

    #[test]
    fn rejects_duplicate_jump_keys() {
        let err = NavigatorConfig::from_json_str(r#"{"jump-keys": "asdfa"}"#).unwrap_err();
        match err {
            ConfigError::JumpKeys(JumpKeysError::Duplicate('a')) => {}
            other => panic!("expected duplicate jump key, got: {other:?}"),
        }
    }

    #[test]
    fn rejects_uppercase_jump_keys() {
        let err = NavigatorConfig::from_json_str(r#"{"jump-keys": "JK", "max-prefix": 1}"#)
            .unwrap_err();
        match err {
            ConfigError::JumpKeys(JumpKeysError::Uppercase('J')) => {}
            other => panic!("expected uppercase jump key, got: {other:?}"),
        }
    }

    #[test]
    fn rejects_whitespace_start_key() {
        let err = NavigatorConfig::from_json_str(r#"{"start-key": " "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStartKey(' ')));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = NavigatorConfig::from_json_str("{").unwrap_err();
        assert!(err.to_string().starts_with("invalid settings JSON"));
    }

    #[test]
    fn allocator_uses_configured_alphabet() {
        let config = NavigatorConfig {
            jump_keys: "jk".to_owned(),
            max_prefix: 1,
            ..NavigatorConfig::default()
        };
        let allocator = config.allocator().expect("allocator");
        assert_eq!(allocator.max_prefix(), 1);
        assert_eq!(allocator.jump_keys().chars(), &['j', 'k']);
    }
}
