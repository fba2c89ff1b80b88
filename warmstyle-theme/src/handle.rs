//! # Theme Handles
//!
//! A [ThemeHandle] names a theme without carrying its tokens. Handles are what
//! theme pickers list and what the warm scheduler walks; the full token object
//! is obtained through a [ThemeResolver](crate::registry::ThemeResolver).
//!
//! ```rust
//! use warmstyle_theme::handle::ThemeHandle;
//!
//! let handle = ThemeHandle::new("synthwave");
//! assert_eq!(handle.id(), "synthwave");
//! assert_eq!(handle.to_string(), "synthwave");
//! ```

use std::borrow::Borrow;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// An opaque identifier for a theme.
///
/// Handles compare by their id string. Two handles with the same id always
/// resolve to the same theme object when a memoizing resolver such as
/// [ThemeRegistry](crate::registry::ThemeRegistry) is used.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeHandle {
    id: String,
}

impl ThemeHandle {
    /// Create a new theme handle from an id.
    pub fn new(id: impl ToString) -> Self {
        Self { id: id.to_string() }
    }

    /// Returns the id of the theme.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Display for ThemeHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

impl From<&str> for ThemeHandle {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ThemeHandle {
    fn from(id: String) -> Self {
        Self { id }
    }
}

impl Borrow<str> for ThemeHandle {
    fn borrow(&self) -> &str {
        &self.id
    }
}
