//! Persisted light/dark preference, seeded from the platform's ambient signal.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use dark_light::Mode;
use tracing::warn;

use crate::storage::KeyValueStore;

/// Storage key holding the theme preference.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(anyhow!("Unknown theme '{}': expected light|dark", other)),
        }
    }
}

/// The platform's current light/dark signal, read once at initialization.
pub fn ambient_theme() -> Theme {
    match dark_light::detect() {
        Mode::Dark => Theme::Dark,
        Mode::Light | Mode::Default => Theme::Light,
    }
}

/// Persisted theme preference. A previously saved value wins; otherwise the
/// ambient signal seeds it. Toggling persists immediately.
#[derive(Debug)]
pub struct ThemePreference<S> {
    storage: S,
    theme: Theme,
}

impl<S: KeyValueStore> ThemePreference<S> {
    pub fn load(storage: S) -> Result<Self> {
        Self::load_with_ambient(storage, ambient_theme())
    }

    pub fn load_with_ambient(storage: S, ambient: Theme) -> Result<Self> {
        let saved = storage
            .get(THEME_KEY)
            .context("Failed to read theme preference")?;
        let theme = match saved.as_deref() {
            Some(text) => text.parse().unwrap_or_else(|_| {
                warn!(value = text, "Unrecognized stored theme; using ambient preference");
                ambient
            }),
            None => ambient,
        };
        let mut preference = Self { storage, theme };
        preference.persist()?;
        Ok(preference)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle(&mut self) -> Result<Theme> {
        self.theme = self.theme.toggled();
        self.persist()?;
        Ok(self.theme)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) -> Result<()> {
        self.storage
            .set(THEME_KEY, self.theme.as_str())
            .context("Failed to write theme preference")?;
        Ok(())
    }
}
