//! # Theme Runtime
//!
//! [ThemeRuntime] wires the style cache, the warm scheduler and the
//! stylesheet swapper to one document and one theme resolver. It is what a
//! UI layer holds on to: render code calls
//! [use_memoized_style](ThemeRuntime::use_memoized_style), the theme picker
//! calls [open_theme_picker](ThemeRuntime::open_theme_picker) and
//! [close_theme_picker](ThemeRuntime::close_theme_picker), and the mode
//! toggle calls [change_theme_mode](ThemeRuntime::change_theme_mode).
//!
//! Which theme is active is decided outside the runtime and reported through
//! [set_active_theme](ThemeRuntime::set_active_theme).

use std::cell::RefCell;
use std::rc::Rc;

use warmstyle_stylesheet::host::StylesheetHost;
use warmstyle_stylesheet::mode::ThemeMode;
use warmstyle_stylesheet::swapper::{StylesheetSwapper, SwapOutcome};
use warmstyle_stylesheet::warmer::StylesheetWarmer;
use warmstyle_theme::args::StyleArgs;
use warmstyle_theme::config::WarmConfig;
use warmstyle_theme::handle::ThemeHandle;
use warmstyle_theme::registry::ThemeResolver;
use warmstyle_theme::scheduler::{CancelToken, IdleScheduler, IdleWarmScheduler, WarmRun};
use warmstyle_theme::service::StyleCacheService;
use warmstyle_theme::style_fn::StyleFn;
use warmstyle_theme::warmer::{CacheWarmer, WarmReport};
use warmstyle_theme::{StyleError, StyleResult};

struct ActiveTheme<T> {
    handle: ThemeHandle,
    theme: Rc<T>,
}

/// Style cache, theme warming and stylesheet swapping for one document.
pub struct ThemeRuntime<T: 'static, H: StylesheetHost + 'static> {
    service: Rc<StyleCacheService<T>>,
    resolver: Rc<dyn ThemeResolver<T>>,
    warm_scheduler: IdleWarmScheduler<T>,
    swapper: Rc<StylesheetSwapper<H>>,
    stylesheet_warmer: StylesheetWarmer<H>,
    active: RefCell<ActiveTheme<T>>,
    picker_run: RefCell<Option<WarmRun>>,
}

impl<T: 'static, H: StylesheetHost + 'static> ThemeRuntime<T, H> {
    /// Create a runtime rendering `initial` into `host`.
    ///
    /// Fails if `resolver` does not know `initial`.
    pub fn new(
        config: &WarmConfig,
        resolver: Rc<dyn ThemeResolver<T>>,
        host: Rc<H>,
        scheduler: Rc<dyn IdleScheduler>,
        initial: impl Into<ThemeHandle>,
    ) -> StyleResult<Self> {
        let handle = initial.into();
        let theme = resolver
            .resolve(&handle)
            .ok_or_else(|| StyleError::not_found(handle.clone()))?;

        let service = Rc::new(StyleCacheService::new(&config.cache));
        let warm_scheduler =
            IdleWarmScheduler::new(service.clone(), resolver.clone(), scheduler.clone());
        let swapper = Rc::new(StylesheetSwapper::from_config(host, &config.stylesheet));
        let stylesheet_warmer = StylesheetWarmer::new(swapper.clone(), scheduler);

        log::debug!("Theme runtime started with '{}'", handle);
        Ok(Self {
            service,
            resolver,
            warm_scheduler,
            swapper,
            stylesheet_warmer,
            active: RefCell::new(ActiveTheme { handle, theme }),
            picker_run: RefCell::new(None),
        })
    }

    /// Compute `func` for the active theme, or return the cached value.
    pub fn use_memoized_style<A: StyleArgs, V: 'static>(
        &self,
        func: &StyleFn<T, A, V>,
        args: A,
    ) -> Rc<V> {
        let theme = self.active.borrow().theme.clone();
        self.service.get_or_compute(func, &theme, args)
    }

    /// Warm the cache for the theme behind `handle` right away.
    pub fn warm_styles_for_theme(&self, handle: &ThemeHandle) -> StyleResult<WarmReport> {
        CacheWarmer::new(&self.service).warm_handle(&*self.resolver, handle)
    }

    /// Start warming every selectable theme but the active one in idle time.
    ///
    /// A run left over from a previous opening is cancelled first.
    pub fn open_theme_picker(&self) -> WarmRun {
        self.close_theme_picker();

        let active = self.active_theme();
        let themes: Vec<_> = self
            .resolver
            .list_selectable()
            .into_iter()
            .filter(|handle| *handle != active)
            .collect();
        let run = self.warm_scheduler.start(themes);
        *self.picker_run.borrow_mut() = Some(run.clone());
        run
    }

    /// Cancel the warm run of the theme picker, if one is in progress.
    pub fn close_theme_picker(&self) {
        if let Some(run) = self.picker_run.borrow_mut().take() {
            run.cancel();
        }
    }

    /// Switch the document to the stylesheet of `mode`.
    pub fn change_theme_mode(&self, mode: ThemeMode) -> SwapOutcome {
        self.swapper.change_mode(mode)
    }

    /// The current stylesheet mode, once one has been applied.
    pub fn theme_mode(&self) -> Option<ThemeMode> {
        self.swapper.current_mode()
    }

    /// Preload the stylesheet of the mode the user is not in.
    ///
    /// Returns `None` before any mode has been applied.
    pub fn warm_opposite_stylesheet(&self) -> Option<CancelToken> {
        let mode = self.swapper.current_mode()?;
        Some(self.stylesheet_warmer.warm_opposite(mode))
    }

    /// Make `handle` the theme [use_memoized_style](Self::use_memoized_style) renders with.
    pub fn set_active_theme(&self, handle: impl Into<ThemeHandle>) -> StyleResult<()> {
        let handle = handle.into();
        let theme = self
            .resolver
            .resolve(&handle)
            .ok_or_else(|| StyleError::not_found(handle.clone()))?;
        log::debug!("Active theme is now '{}'", handle);
        *self.active.borrow_mut() = ActiveTheme { handle, theme };
        Ok(())
    }

    /// Handle of the active theme.
    pub fn active_theme(&self) -> ThemeHandle {
        self.active.borrow().handle.clone()
    }

    /// The style cache service.
    pub fn service(&self) -> &Rc<StyleCacheService<T>> {
        &self.service
    }

    /// The stylesheet swapper.
    pub fn swapper(&self) -> &Rc<StylesheetSwapper<H>> {
        &self.swapper
    }
}

impl<T: 'static, H: StylesheetHost + 'static> Drop for ThemeRuntime<T, H> {
    fn drop(&mut self) {
        self.close_theme_picker();
    }
}
