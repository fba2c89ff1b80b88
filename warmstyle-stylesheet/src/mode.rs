//! Theme modes and stylesheet media states.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two stylesheet variants a theme can ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light stylesheet.
    Light,
    /// Dark stylesheet.
    Dark,
}

impl ThemeMode {
    /// Both modes.
    pub const ALL: [ThemeMode; 2] = [ThemeMode::Light, ThemeMode::Dark];

    /// The mode the user is *not* in.
    pub fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// The value used in the mode tag attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl Display for ThemeMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that is neither `light` nor `dark`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown theme mode '{0}', expected 'light' or 'dark'")]
pub struct ParseModeError(pub String);

impl FromStr for ThemeMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// The `media` state of a stylesheet link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Media {
    /// `media="all"`: the rules are in effect.
    All,
    /// `media="not all"`: fetched and parsed, never applied.
    NotAll,
}

impl Media {
    /// The attribute value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::NotAll => "not all",
        }
    }

    /// Parse an attribute value. Anything but `not all` counts as applied.
    pub fn from_attribute(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("not all") {
            Self::NotAll
        } else {
            Self::All
        }
    }

    /// Returns `true` for [Media::All].
    pub fn is_applied(self) -> bool {
        self == Self::All
    }
}

impl Display for Media {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
