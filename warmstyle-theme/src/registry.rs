//! # Theme Registry
//!
//! The style cache never builds theme objects itself. It asks a
//! [ThemeResolver] to turn a [ThemeHandle] into a token object and to list the
//! themes a picker offers.
//!
//! Cache hits depend on theme *identity*, so a resolver should hand out the
//! same `Rc` for the same handle. [ThemeRegistry] does that: each theme is
//! built by its factory on first request and kept until
//! [invalidated](ThemeRegistry::invalidate).
//!
//! ```rust
//! use std::rc::Rc;
//! use warmstyle_theme::registry::{ThemeRegistry, ThemeResolver};
//!
//! let mut registry = ThemeRegistry::new();
//! registry.register("dark", || "#000");
//! registry.register("light", || "#fff");
//!
//! let dark = registry.resolve(&"dark".into()).unwrap();
//! assert!(Rc::ptr_eq(&dark, &registry.resolve(&"dark".into()).unwrap()));
//! assert_eq!(registry.list_selectable().len(), 2);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::handle::ThemeHandle;

/// Resolves theme handles to token objects.
pub trait ThemeResolver<T> {
    /// Resolve a handle, or `None` if the theme is unknown.
    fn resolve(&self, handle: &ThemeHandle) -> Option<Rc<T>>;

    /// Themes offered for selection, in display order.
    fn list_selectable(&self) -> Vec<ThemeHandle>;
}

/// A registry of theme factories that memoizes the themes it builds.
pub struct ThemeRegistry<T> {
    factories: IndexMap<ThemeHandle, Box<dyn Fn() -> T>>,
    resolved: RefCell<IndexMap<ThemeHandle, Rc<T>>>,
}

impl<T: 'static> ThemeRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: IndexMap::new(),
            resolved: RefCell::new(IndexMap::new()),
        }
    }

    /// Register a theme factory under `handle`, replacing any previous one.
    pub fn register(&mut self, handle: impl Into<ThemeHandle>, factory: impl Fn() -> T + 'static) {
        let handle = handle.into();
        self.resolved.borrow_mut().shift_remove(&handle);
        self.factories.insert(handle, Box::new(factory));
    }

    /// Returns `true` if a theme is registered under `handle`.
    pub fn contains(&self, handle: &ThemeHandle) -> bool {
        self.factories.contains_key(handle)
    }

    /// Forget the built object for `handle`; the next resolve builds a new one.
    ///
    /// Cached styles keyed on the old object stop matching.
    pub fn invalidate(&self, handle: &ThemeHandle) {
        if self.resolved.borrow_mut().shift_remove(handle).is_some() {
            log::debug!("Invalidated theme '{}'", handle);
        }
    }
}

impl<T: 'static> ThemeResolver<T> for ThemeRegistry<T> {
    fn resolve(&self, handle: &ThemeHandle) -> Option<Rc<T>> {
        if let Some(theme) = self.resolved.borrow().get(handle) {
            return Some(theme.clone());
        }

        let factory = self.factories.get(handle)?;
        let theme = Rc::new(factory());
        self.resolved
            .borrow_mut()
            .insert(handle.clone(), theme.clone());
        log::debug!("Resolved theme '{}'", handle);
        Some(theme)
    }

    fn list_selectable(&self) -> Vec<ThemeHandle> {
        self.factories.keys().cloned().collect()
    }
}

impl<T: 'static> Default for ThemeRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
