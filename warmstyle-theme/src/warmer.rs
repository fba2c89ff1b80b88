//! # Cache Warming
//!
//! [CacheWarmer] replays every stable style function against a theme the user
//! has not rendered yet, crossed with each argument tuple recorded for that
//! function. Results land in the cache and are otherwise discarded, so the
//! next real render in that theme is a cache hit.
//!
//! Warming is synchronous and cheap per theme; spreading it over many themes
//! without blocking the main thread is the job of the
//! [IdleWarmScheduler](crate::scheduler::IdleWarmScheduler).
//!
//! Warmed entries share each function's bounded table with the theme on
//! screen. A function with `n` recorded tuples warmed for `k` themes needs
//! `n * (k + 1)` entries; beyond the configured
//! [capacity](crate::config::CacheConfig::capacity) the oldest entries are
//! evicted, which may include those of the active theme. Size the capacity to
//! the number of selectable themes when that matters.

use std::rc::Rc;

use crate::error::{StyleError, StyleResult};
use crate::handle::ThemeHandle;
use crate::registry::ThemeResolver;
use crate::service::StyleCacheService;

/// Summary of one warm pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarmReport {
    /// Stable functions replayed.
    pub functions: usize,
    /// Argument tuples replayed across those functions.
    pub replays: usize,
    /// Replays that missed the cache and computed a new value.
    pub computed: usize,
}

/// Replays recorded style calls against a target theme.
pub struct CacheWarmer<'a, T> {
    service: &'a StyleCacheService<T>,
}

impl<'a, T: 'static> CacheWarmer<'a, T> {
    /// Create a warmer over `service`.
    pub fn new(service: &'a StyleCacheService<T>) -> Self {
        Self { service }
    }

    /// Warm the cache for `theme`.
    ///
    /// A panic inside a style function stops the pass; entries computed
    /// before it stay cached.
    pub fn warm(&self, theme: &Rc<T>) -> WarmReport {
        let replays = self.service.usage().replays();
        let mut report = WarmReport::default();
        let _warming = self.service.begin_warming();

        for (name, replay) in replays {
            let (replayed, computed) = replay(self.service, theme);
            log::trace!("Warmed '{}': {} replayed, {} computed", name, replayed, computed);
            report.functions += 1;
            report.replays += replayed;
            report.computed += computed;
        }

        if report.functions == 0 {
            log::debug!("No stable style functions recorded yet, nothing to warm");
        }
        report
    }

    /// Resolve `handle` and warm the cache for it.
    pub fn warm_handle(
        &self,
        resolver: &dyn ThemeResolver<T>,
        handle: &ThemeHandle,
    ) -> StyleResult<WarmReport> {
        let theme = resolver
            .resolve(handle)
            .ok_or_else(|| StyleError::not_found(handle.clone()))?;
        let report = self.warm(&theme);
        log::debug!(
            "Warmed theme '{}': {} functions, {} new entries",
            handle,
            report.functions,
            report.computed
        );
        Ok(report)
    }
}
