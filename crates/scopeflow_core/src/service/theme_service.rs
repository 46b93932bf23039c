//! Light/dark theme preference.
//!
//! # Invariants
//! - Stored value is exactly `light` or `dark`; anything else is ignored.
//! - The preference is written back on load and on every toggle; write
//!   failures never change the in-memory theme.

use crate::repo::kv_repo::KvStore;
use log::warn;

/// Storage key of the theme preference.
pub const THEME_STORAGE_KEY: &str = "scopeflow-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Theme preference backed by local storage.
pub struct ThemeService<S: KvStore> {
    kv: S,
    theme: Theme,
}

impl<S: KvStore> ThemeService<S> {
    /// Reads the stored preference, defaulting to the environment's
    /// light/dark preference when unset, unreadable or invalid.
    pub fn load(kv: S, system_prefers_dark: bool) -> Self {
        let fallback = if system_prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        };
        let theme = match kv.get_item(THEME_STORAGE_KEY) {
            Ok(stored) => stored.as_deref().and_then(Theme::parse).unwrap_or(fallback),
            Err(err) => {
                warn!("event=theme_load module=theme status=fallback error={err}");
                fallback
            }
        };

        let service = Self { kv, theme };
        service.persist();
        service
    }

    pub fn current(&self) -> Theme {
        self.theme
    }

    /// Flips the theme and stores it; returns the new theme.
    pub fn toggle(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.persist();
        self.theme
    }

    fn persist(&self) {
        if let Err(err) = self.kv.set_item(THEME_STORAGE_KEY, self.theme.as_str()) {
            warn!("event=theme_persist module=theme status=error error={err}");
        }
    }
}
