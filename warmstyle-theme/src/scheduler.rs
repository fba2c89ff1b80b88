//! # Idle Scheduling
//!
//! Warming every selectable theme at once would stall the main thread, so the
//! work is spread over idle slices: one theme per slice, front to back.
//!
//! The yield point is abstracted as [IdleScheduler]: `schedule(task)` runs the
//! task at some later idle moment and returns a [CancelToken]. Three
//! implementations exist:
//!
//! - [ManualScheduler]: a queue the host drains explicitly. Deterministic,
//!   used by tests and by hosts with their own frame loop.
//! - [LocalTimerScheduler]: a `smol` local executor running each task after a
//!   (zero by default) timer, the classic `setTimeout(0)` fallback.
//! - `BrowserIdleScheduler` (feature `web`): `requestIdleCallback`, falling
//!   back to `setTimeout` where the browser lacks it.
//!
//! Cancellation is cooperative. A cancelled task that is already queued still
//! gets popped, checks its token and returns without doing anything.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use smol::LocalExecutor;

use crate::handle::ThemeHandle;
use crate::registry::ThemeResolver;
use crate::service::StyleCacheService;
use crate::warmer::CacheWarmer;

/// A unit of deferred work.
pub type IdleTask = Box<dyn FnOnce()>;

/// Cancels a scheduled task. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the task. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Returns `true` once [cancel](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// A primitive that defers work to an idle moment.
pub trait IdleScheduler {
    /// Run `task` later. The returned token prevents it from running.
    fn schedule(&self, task: IdleTask) -> CancelToken;
}

/// A scheduler whose queue is drained by the host.
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<VecDeque<(CancelToken, IdleTask)>>,
}

impl ManualScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued tasks that have not been cancelled.
    pub fn pending(&self) -> usize {
        self.queue
            .borrow()
            .iter()
            .filter(|(token, _)| !token.is_cancelled())
            .count()
    }

    /// Run the oldest queued task. Returns `false` if the queue was empty.
    pub fn run_next(&self) -> bool {
        let Some((token, task)) = self.queue.borrow_mut().pop_front() else {
            return false;
        };
        if !token.is_cancelled() {
            task();
        }
        true
    }

    /// Run tasks until the queue is empty, including tasks scheduled by tasks.
    ///
    /// Returns how many tasks were popped.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }
}

impl IdleScheduler for ManualScheduler {
    fn schedule(&self, task: IdleTask) -> CancelToken {
        let token = CancelToken::new();
        self.queue.borrow_mut().push_back((token.clone(), task));
        token
    }
}

/// A scheduler running each task on a `smol` local executor after a delay.
pub struct LocalTimerScheduler {
    executor: Rc<LocalExecutor<'static>>,
    delay: Duration,
}

impl LocalTimerScheduler {
    /// Create a scheduler with its own executor.
    pub fn new(delay: Duration) -> Self {
        Self::with_executor(Rc::new(LocalExecutor::new()), delay)
    }

    /// Create a scheduler spawning onto an executor the host already drives.
    pub fn with_executor(executor: Rc<LocalExecutor<'static>>, delay: Duration) -> Self {
        Self { executor, delay }
    }

    /// The executor tasks are spawned on.
    pub fn executor(&self) -> &Rc<LocalExecutor<'static>> {
        &self.executor
    }

    /// Block the current thread until every spawned task has finished.
    pub fn block_until_idle(&self) {
        smol::block_on(async {
            while !self.executor.is_empty() {
                self.executor.tick().await;
            }
        });
    }
}

impl IdleScheduler for LocalTimerScheduler {
    fn schedule(&self, task: IdleTask) -> CancelToken {
        let token = CancelToken::new();
        let guard = token.clone();
        let delay = self.delay;
        self.executor
            .spawn(async move {
                smol::Timer::after(delay).await;
                if !guard.is_cancelled() {
                    task();
                }
            })
            .detach();
        token
    }
}

#[derive(Default)]
struct RunState {
    cancelled: Cell<bool>,
    finished: Cell<bool>,
    pending: RefCell<Option<CancelToken>>,
    warmed: RefCell<Vec<ThemeHandle>>,
    skipped: RefCell<Vec<ThemeHandle>>,
}

/// Handle to one warm schedule run.
///
/// Clones observe and control the same run.
#[derive(Clone)]
pub struct WarmRun {
    state: Rc<RunState>,
}

impl WarmRun {
    /// Stop the run. Already queued steps exit without side effects.
    pub fn cancel(&self) {
        if self.state.cancelled.replace(true) {
            return;
        }
        if let Some(token) = self.state.pending.borrow_mut().take() {
            token.cancel();
        }
        log::debug!(
            "Warm run cancelled after {} theme(s)",
            self.state.warmed.borrow().len()
        );
    }

    /// Returns `true` if [cancel](Self::cancel) was called.
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.get()
    }

    /// Returns `true` once every theme in the list was processed.
    pub fn is_finished(&self) -> bool {
        self.state.finished.get()
    }

    /// Themes warmed so far, in order.
    pub fn warmed(&self) -> Vec<ThemeHandle> {
        self.state.warmed.borrow().clone()
    }

    /// Themes skipped because the resolver did not know them.
    pub fn skipped(&self) -> Vec<ThemeHandle> {
        self.state.skipped.borrow().clone()
    }
}

struct RunDriver<T> {
    service: Rc<StyleCacheService<T>>,
    resolver: Rc<dyn ThemeResolver<T>>,
    scheduler: Rc<dyn IdleScheduler>,
    queue: RefCell<VecDeque<ThemeHandle>>,
    state: Rc<RunState>,
}

impl<T: 'static> RunDriver<T> {
    fn schedule_next(self: &Rc<Self>) {
        if self.state.cancelled.get() {
            return;
        }
        if self.queue.borrow().is_empty() {
            self.state.finished.set(true);
            log::debug!(
                "Warm run finished, {} theme(s) warmed",
                self.state.warmed.borrow().len()
            );
            return;
        }

        let driver = self.clone();
        let token = self.scheduler.schedule(Box::new(move || driver.step()));
        *self.state.pending.borrow_mut() = Some(token);
    }

    fn step(self: Rc<Self>) {
        if self.state.cancelled.get() {
            return;
        }
        self.state.pending.borrow_mut().take();

        let Some(handle) = self.queue.borrow_mut().pop_front() else {
            self.state.finished.set(true);
            return;
        };

        match self.resolver.resolve(&handle) {
            Some(theme) => {
                let report = CacheWarmer::new(&self.service).warm(&theme);
                log::debug!(
                    "Idle warm of '{}': {} new entries",
                    handle,
                    report.computed
                );
                self.state.warmed.borrow_mut().push(handle);
            },
            None => {
                log::warn!("Skipping warm of unknown theme '{}'", handle);
                self.state.skipped.borrow_mut().push(handle);
            },
        }

        self.schedule_next();
    }
}

/// Warms a list of themes, one per idle slice.
pub struct IdleWarmScheduler<T> {
    service: Rc<StyleCacheService<T>>,
    resolver: Rc<dyn ThemeResolver<T>>,
    scheduler: Rc<dyn IdleScheduler>,
}

impl<T: 'static> IdleWarmScheduler<T> {
    /// Create a warm scheduler.
    pub fn new(
        service: Rc<StyleCacheService<T>>,
        resolver: Rc<dyn ThemeResolver<T>>,
        scheduler: Rc<dyn IdleScheduler>,
    ) -> Self {
        Self {
            service,
            resolver,
            scheduler,
        }
    }

    /// Start warming `themes` in order. Nothing runs until the first idle slice.
    pub fn start(&self, themes: impl IntoIterator<Item = ThemeHandle>) -> WarmRun {
        let state = Rc::new(RunState::default());
        let driver = Rc::new(RunDriver {
            service: self.service.clone(),
            resolver: self.resolver.clone(),
            scheduler: self.scheduler.clone(),
            queue: RefCell::new(themes.into_iter().collect()),
            state: state.clone(),
        });
        log::debug!("Starting warm run over {} theme(s)", driver.queue.borrow().len());
        driver.schedule_next();
        WarmRun { state }
    }
}
