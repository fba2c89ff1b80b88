#![warn(missing_docs)]

//! # Theme Stylesheets
//!
//! Light and dark theme stylesheets swapped without a frame of unstyled
//! content, and the opposite mode preloaded while the user is idle.
//!
//! - **[StylesheetSwapper](swapper::StylesheetSwapper)**: one link per mode,
//!   swaps keep the old sheet applied until the new one has loaded
//! - **[StylesheetWarmer](warmer::StylesheetWarmer)**: defers creation of the
//!   opposite mode's link to an idle slice
//! - **[StylesheetHost](host::StylesheetHost)**: the document abstraction,
//!   implemented by [VirtualDocument](virtual_document::VirtualDocument) and,
//!   with the `web` feature, by `WebDocument`
//!
//! ```rust
//! use std::rc::Rc;
//! use warmstyle_theme::config::StylesheetConfig;
//! use warmstyle_stylesheet::mode::ThemeMode;
//! use warmstyle_stylesheet::swapper::{StylesheetSwapper, SwapOutcome};
//! use warmstyle_stylesheet::virtual_document::VirtualDocument;
//!
//! let config = StylesheetConfig::default().with_hrefs("/light.css", "/dark.css");
//! let doc = Rc::new(VirtualDocument::loading_instantly());
//! let swapper = StylesheetSwapper::from_config(doc.clone(), &config);
//!
//! swapper.initialize(ThemeMode::Light);
//! assert_eq!(swapper.change_mode(ThemeMode::Dark), SwapOutcome::Completed);
//! assert_eq!(doc.applied().len(), 1);
//! ```

/// Contains the document abstraction.
pub mod host;
/// Contains [mode::ThemeMode] and [mode::Media].
pub mod mode;
/// Contains the [swapper::StylesheetSwapper].
pub mod swapper;
/// Contains the swap plan.
pub mod transition;
/// Contains the in-memory document.
pub mod virtual_document;
/// Contains the [warmer::StylesheetWarmer].
pub mod warmer;
/// Contains the browser document host.
#[cfg(feature = "web")]
pub mod web;

pub use mode::ThemeMode;
