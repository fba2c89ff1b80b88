#![warn(missing_docs)]

//! # Theme Style Cache
//!
//! Memoized style computation for themed UIs, with idle-time warming for
//! themes the user has not selected yet.
//!
//! ## Overview
//!
//! - **[StyleFn](style_fn::StyleFn)**: a style function with a stable identity
//! - **[StyleCacheService](service::StyleCacheService)**: the per-function
//!   memoization tables plus usage tracking, the entry point for render code
//! - **[UsageTracker](usage::UsageTracker)**: which functions are stable and
//!   with which arguments they were called
//! - **[CacheWarmer](warmer::CacheWarmer)**: replays stable functions against
//!   another theme
//! - **[IdleWarmScheduler](scheduler::IdleWarmScheduler)**: warms a list of
//!   themes one idle slice at a time, cancellable
//! - **[ThemeRegistry](registry::ThemeRegistry)**: resolves theme handles to
//!   token objects with stable identity
//! - **[WarmConfig](config::WarmConfig)**: bounds and asset locations
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use warmstyle_theme::service::StyleCacheService;
//! use warmstyle_theme::style_fn::StyleFn;
//!
//! struct Tokens { radius: u32 }
//!
//! let corner = StyleFn::new("corner", |theme: &Tokens, round: &bool| {
//!     if *round { theme.radius * 2 } else { theme.radius }
//! });
//!
//! let service = StyleCacheService::default();
//! let theme = Rc::new(Tokens { radius: 4 });
//!
//! let first = service.get_or_compute(&corner, &theme, true);
//! let second = service.get_or_compute(&corner, &theme, true);
//! assert!(Rc::ptr_eq(&first, &second));
//! ```
//!
//! ## Threading
//!
//! The whole crate is single-threaded (`Rc`, `RefCell`), matching the UI
//! thread it serves. Nothing here blocks.

/// Contains identity comparison of style function arguments.
pub mod args;
/// Contains the per-function memoization tables.
pub mod cache;
/// Contains the [config::WarmConfig] struct.
pub mod config;
/// Contains the [error::StyleError] type.
pub mod error;
/// Contains the [handle::ThemeHandle] struct.
pub mod handle;
/// Contains theme resolution and the [registry::ThemeRegistry].
pub mod registry;
/// Contains the idle scheduling primitive and the warm scheduler.
pub mod scheduler;
/// Contains the [service::StyleCacheService].
pub mod service;
/// Contains the [style_fn::StyleFn] handle.
pub mod style_fn;
/// Contains usage tracking of style functions.
pub mod usage;
/// Contains the [warmer::CacheWarmer].
pub mod warmer;
/// Contains the browser idle scheduler.
#[cfg(feature = "web")]
pub mod web;

pub use error::{StyleError, StyleResult};
