//! # Style Cache Service
//!
//! [StyleCacheService] owns the [StyleCache] and the [UsageTracker] and is the
//! single entry point render code goes through. Build one at application start
//! and share it by `Rc` with the render integration and the warm scheduler.
//!
//! Everything here runs on one thread. No `RefCell` borrow is held while a
//! style function executes, so a style function may itself request *other*
//! cached styles. Re-entering the cache for the exact key currently being
//! computed is a bug in the style function and panics with a descriptive
//! message instead of recursing forever.

use std::any::Any;
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use crate::args::StyleArgs;
use crate::cache::StyleCache;
use crate::config::CacheConfig;
use crate::style_fn::{StyleFn, StyleFnId};
use crate::usage::UsageTracker;
use crate::warmer::{CacheWarmer, WarmReport};

struct InFlight<T> {
    id: StyleFnId,
    theme: Rc<T>,
    args: Box<dyn Any>,
}

/// Pops the in-flight marker when the computation finishes or unwinds.
struct InFlightGuard<'a, T> {
    stack: &'a RefCell<Vec<InFlight<T>>>,
}

impl<T> Drop for InFlightGuard<'_, T> {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}

/// Marks a warm pass in progress until dropped, including on unwind.
pub(crate) struct WarmingGuard<'a> {
    depth: &'a Cell<u32>,
}

impl Drop for WarmingGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

/// Memoized style computation with usage tracking.
pub struct StyleCacheService<T> {
    cache: RefCell<StyleCache<T>>,
    usage: RefCell<UsageTracker<T>>,
    in_flight: RefCell<Vec<InFlight<T>>>,
    warming: Cell<u32>,
}

impl<T: 'static> StyleCacheService<T> {
    /// Create a service using the bounds from `config`.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            cache: RefCell::new(StyleCache::new(config.capacity)),
            usage: RefCell::new(UsageTracker::new(
                config.history_capacity,
                config.stable_threshold,
            )),
            in_flight: RefCell::new(Vec::new()),
            warming: Cell::new(0),
        }
    }

    /// Return the cached value for `(theme, args)`, computing it on a miss.
    ///
    /// Every call is recorded with the usage tracker so that stable functions
    /// can later be warmed for other themes. Calls made by style functions
    /// while a warm pass replays them are not recorded.
    pub fn get_or_compute<A: StyleArgs, V: 'static>(
        &self,
        func: &StyleFn<T, A, V>,
        theme: &Rc<T>,
        args: A,
    ) -> Rc<V> {
        if self.warming.get() == 0 {
            self.usage.borrow_mut().record_usage(func, &args);
        }
        self.compute_cached(func, theme, args).0
    }

    /// Lookup-or-compute without touching the usage tracker.
    ///
    /// Returns the value and whether it had to be computed.
    pub(crate) fn compute_cached<A: StyleArgs, V: 'static>(
        &self,
        func: &StyleFn<T, A, V>,
        theme: &Rc<T>,
        args: A,
    ) -> (Rc<V>, bool) {
        if let Some(value) = self.cache.borrow().lookup(func, theme, &args) {
            log::trace!("Style cache hit for '{}'", func.name());
            return (value, false);
        }

        let _guard = self.enter(func, theme, &args);
        let value = Rc::new(func.call(theme, &args));
        self.cache
            .borrow_mut()
            .insert(func, theme.clone(), args, value.clone());
        log::debug!("Computed style '{}'", func.name());
        (value, true)
    }

    pub(crate) fn begin_warming(&self) -> WarmingGuard<'_> {
        self.warming.set(self.warming.get() + 1);
        WarmingGuard {
            depth: &self.warming,
        }
    }

    fn enter<A: StyleArgs, V: 'static>(
        &self,
        func: &StyleFn<T, A, V>,
        theme: &Rc<T>,
        args: &A,
    ) -> InFlightGuard<'_, T> {
        let reentered = self.in_flight.borrow().iter().any(|frame| {
            frame.id == func.id()
                && Rc::ptr_eq(&frame.theme, theme)
                && frame
                    .args
                    .downcast_ref::<A>()
                    .is_some_and(|seen| seen.same_as(args))
        });
        if reentered {
            panic!(
                "style function '{}' re-entered the style cache for the arguments it is computing",
                func.name()
            );
        }

        self.in_flight.borrow_mut().push(InFlight {
            id: func.id(),
            theme: theme.clone(),
            args: Box::new(args.clone()),
        });
        InFlightGuard {
            stack: &self.in_flight,
        }
    }

    /// Replay every stable style function against `theme`.
    ///
    /// Shorthand for [CacheWarmer::warm].
    pub fn warm(&self, theme: &Rc<T>) -> WarmReport {
        CacheWarmer::new(self).warm(theme)
    }

    /// Read access to the memoization tables.
    pub fn cache(&self) -> Ref<'_, StyleCache<T>> {
        self.cache.borrow()
    }

    /// Read access to the usage tracker.
    pub fn usage(&self) -> Ref<'_, UsageTracker<T>> {
        self.usage.borrow()
    }

    /// Release cache tables and usage records of dropped style functions.
    pub fn prune(&self) -> usize {
        let released = self.cache.borrow_mut().prune();
        self.usage.borrow_mut().prune();
        released
    }

    /// Drop every cached value. Usage records are kept so warming still works.
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}

impl<T: 'static> Default for StyleCacheService<T> {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Theme {
        base: u32,
    }

    #[test]
    fn test_hit_returns_same_allocation() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let func = StyleFn::new("size", move |theme: &Theme, scale: &u32| {
            counter.set(counter.get() + 1);
            theme.base * scale
        });
        let service = StyleCacheService::default();
        let theme = Rc::new(Theme { base: 4 });

        let first = service.get_or_compute(&func, &theme, 2);
        let second = service.get_or_compute(&func, &theme, 2);

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(*first, 8);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_new_theme_object_recomputes() {
        let func = StyleFn::new("size", |theme: &Theme, _: &()| theme.base);
        let service = StyleCacheService::default();

        let a = service.get_or_compute(&func, &Rc::new(Theme { base: 1 }), ());
        let b = service.get_or_compute(&func, &Rc::new(Theme { base: 1 }), ());

        assert!(!Rc::ptr_eq(&a, &b));
        assert_eq!(service.cache().entry_count(func.id()), 2);
    }

    #[test]
    fn test_nested_lookup_of_other_function() {
        let service = Rc::new(StyleCacheService::<Theme>::default());
        let inner = StyleFn::new("inner", |theme: &Theme, _: &()| theme.base + 1);
        let outer = {
            let service = Rc::downgrade(&service);
            let inner = inner.clone();
            StyleFn::new("outer", move |theme: &Theme, _: &()| {
                let nested = service
                    .upgrade()
                    .map(|service| *service.get_or_compute(&inner, &Rc::new(Theme { base: theme.base }), ()))
                    .unwrap_or_default();
                nested * 10
            })
        };

        let theme = Rc::new(Theme { base: 1 });
        assert_eq!(*service.get_or_compute(&outer, &theme, ()), 20);
    }

    #[test]
    fn test_warm_does_not_record_nested_calls() {
        let service = Rc::new(StyleCacheService::<Theme>::default());
        let inner = StyleFn::new("inner", |theme: &Theme, _: &()| theme.base + 1);
        let outer = {
            let service = Rc::downgrade(&service);
            let inner = inner.clone();
            StyleFn::new("outer", move |theme: &Theme, _: &()| {
                let nested = service
                    .upgrade()
                    .map(|service| *service.get_or_compute(&inner, &Rc::new(Theme { base: theme.base }), ()))
                    .unwrap_or_default();
                nested * 10
            })
        };

        let dark = Rc::new(Theme { base: 1 });
        service.get_or_compute(&outer, &dark, ());
        service.get_or_compute(&outer, &dark, ());
        assert!(service.usage().is_stable(outer.id()));
        assert_eq!(service.usage().call_count(inner.id()), 1);

        let light = Rc::new(Theme { base: 2 });
        let report = service.warm(&light);

        assert_eq!(report.computed, 1);
        assert_eq!(service.usage().call_count(inner.id()), 1);
        assert!(!service.usage().is_stable(inner.id()));
        assert_eq!(service.usage().call_count(outer.id()), 2);
    }

    #[test]
    #[should_panic(expected = "re-entered the style cache")]
    fn test_same_key_reentry_panics() {
        let service = Rc::new(StyleCacheService::<Theme>::default());
        let slot: Rc<RefCell<Option<StyleFn<Theme, (), u32>>>> = Rc::new(RefCell::new(None));
        let theme = Rc::new(Theme { base: 1 });

        let func = {
            let service = service.clone();
            let slot = slot.clone();
            let theme = theme.clone();
            StyleFn::new("cyclic", move |_: &Theme, _: &()| {
                let again = slot.borrow().clone();
                again.map_or(0, |func| *service.get_or_compute(&func, &theme, ()))
            })
        };
        *slot.borrow_mut() = Some(func.clone());

        service.get_or_compute(&func, &theme, ());
    }

    #[test]
    fn test_panicking_function_leaves_no_entry() {
        let service = StyleCacheService::default();
        let func = StyleFn::new("boom", |_: &Theme, fail: &bool| {
            if *fail {
                panic!("boom");
            }
            1u32
        });
        let theme = Rc::new(Theme { base: 0 });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            service.get_or_compute(&func, &theme, true);
        }));
        assert!(result.is_err());
        assert_eq!(service.cache().entry_count(func.id()), 0);
        assert_eq!(*service.get_or_compute(&func, &theme, false), 1);
    }
}
