//! # Stylesheet Hosts
//!
//! The swapper never touches a DOM directly. It talks to a [StylesheetHost]:
//! something that owns `<link rel="stylesheet">` elements in a document head,
//! can flip their `media`, tell whether their sheet has been parsed and call
//! back once it has.
//!
//! Links managed here carry two attributes that other code may observe:
//!
//! - [MODE_ATTRIBUTE] (`data-theme-mode`): the mode the link serves
//! - [WARM_ATTRIBUTE] (`data-theme-warm`): present on a link that was
//!   preloaded for the opposite mode and has not been applied yet

use std::fmt::Debug;

use warmstyle_theme::config::StylesheetConfig;

use crate::mode::{Media, ThemeMode};

/// Attribute naming the mode a link serves.
pub const MODE_ATTRIBUTE: &str = "data-theme-mode";

/// Attribute marking a preloaded, not yet applied link.
pub const WARM_ATTRIBUTE: &str = "data-theme-warm";

/// Callback fired once when a link's stylesheet finishes loading.
pub type LoadCallback = Box<dyn FnOnce()>;

/// A document head holding theme stylesheet links.
pub trait StylesheetHost {
    /// Handle to one link element.
    type Link: Clone + Debug;

    /// The link tagged with `mode`, if any.
    fn find_tagged(&self, mode: ThemeMode) -> Option<Self::Link>;

    /// An untagged stylesheet link whose href contains `href`.
    fn find_untagged_by_href(&self, href: &str) -> Option<Self::Link>;

    /// Tag `link` as serving `mode`.
    fn tag(&self, link: &Self::Link, mode: ThemeMode);

    /// Set or clear the warm marker.
    fn set_warm(&self, link: &Self::Link, warm: bool);

    /// Returns `true` if the warm marker is set.
    fn is_warm(&self, link: &Self::Link) -> bool;

    /// Create a link tagged with `mode` as the first child of the head.
    ///
    /// Returns `None` if the document refused the element.
    fn create_link(&self, href: &str, mode: ThemeMode, media: Media) -> Option<Self::Link>;

    /// The current media of `link`.
    fn media(&self, link: &Self::Link) -> Media;

    /// Change the media of `link`.
    fn set_media(&self, link: &Self::Link, media: Media);

    /// Returns `true` once the browser has parsed the link's stylesheet.
    fn is_loaded(&self, link: &Self::Link) -> bool;

    /// Call `callback` once when `link` finishes loading.
    fn on_load(&self, link: &Self::Link, callback: LoadCallback);
}

/// Resolves the stylesheet asset of a mode.
pub trait StylesheetAssets {
    /// The href of `mode`'s stylesheet, or `None` if none is configured.
    fn href(&self, mode: ThemeMode) -> Option<String>;
}

impl StylesheetAssets for StylesheetConfig {
    fn href(&self, mode: ThemeMode) -> Option<String> {
        match mode {
            ThemeMode::Light => self.light_href.clone(),
            ThemeMode::Dark => self.dark_href.clone(),
        }
    }
}
