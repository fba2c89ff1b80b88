//! # Usage Tracking
//!
//! Records how often each style function is invoked and with which extra
//! arguments, so the [CacheWarmer](crate::warmer::CacheWarmer) can later
//! replay those calls against themes the user has not selected yet.
//!
//! A function becomes *stable* once it has been called twice. Components
//! normally render at least twice (mount plus one update), while a component
//! that renders once and disappears should not have its arguments kept around
//! or warmed into the cache.
//!
//! Only stable functions keep an argument history. The history is bounded
//! (ten tuples by default, oldest dropped first) and skips tuples that are
//! identical to one already recorded. Tuples seen before the function turns
//! stable are parked in a pending buffer with the same bound and move into the
//! history once it does; otherwise a function called with `true` then `false`
//! would only ever warm `false`.

use std::any::Any;
use std::collections::VecDeque;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};

use crate::args::StyleArgs;
use crate::service::StyleCacheService;
use crate::style_fn::{StyleFn, StyleFnId, WeakStyleFn};

/// Default number of argument tuples remembered per stable function.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Default number of calls after which a function is considered stable.
pub const DEFAULT_STABLE_THRESHOLD: u32 = 2;

struct UsageRecord<A> {
    calls: u32,
    pending: VecDeque<A>,
    history: VecDeque<A>,
}

impl<A: StyleArgs> UsageRecord<A> {
    fn new() -> Self {
        Self {
            calls: 0,
            pending: VecDeque::new(),
            history: VecDeque::new(),
        }
    }

    fn remember(&mut self, args: A, capacity: usize) {
        push_distinct(&mut self.history, args, capacity);
    }

    fn park(&mut self, args: A, capacity: usize) {
        push_distinct(&mut self.pending, args, capacity);
    }

    fn promote(&mut self, capacity: usize) {
        for args in std::mem::take(&mut self.pending) {
            self.remember(args, capacity);
        }
    }
}

fn push_distinct<A: StyleArgs>(buffer: &mut VecDeque<A>, args: A, capacity: usize) {
    if buffer.iter().any(|seen| seen.same_as(&args)) {
        return;
    }
    buffer.push_back(args);
    while buffer.len() > capacity {
        buffer.pop_front();
    }
}

/// One replay job produced for the warmer: runs every recorded tuple of a
/// single function against a theme and reports `(replayed, computed)`.
pub(crate) type ReplayFn<T> = Box<dyn Fn(&StyleCacheService<T>, &Rc<T>) -> (usize, usize)>;

trait TrackedFunction<T> {
    fn calls(&self) -> u32;
    fn history_len(&self) -> usize;
    fn is_alive(&self) -> bool;
    fn name(&self) -> &'static str;
    fn replay(&self) -> Option<ReplayFn<T>>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Tracked<T, A, V> {
    func: WeakStyleFn<T, A, V>,
    name: &'static str,
    record: UsageRecord<A>,
}

impl<T: 'static, A: StyleArgs, V: 'static> TrackedFunction<T> for Tracked<T, A, V> {
    fn calls(&self) -> u32 {
        self.record.calls
    }

    fn history_len(&self) -> usize {
        self.record.history.len()
    }

    fn is_alive(&self) -> bool {
        self.func.is_alive()
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn replay(&self) -> Option<ReplayFn<T>> {
        let func = self.func.upgrade()?;
        let history: Vec<A> = self.record.history.iter().cloned().collect();
        Some(Box::new(move |service: &StyleCacheService<T>, theme: &Rc<T>| {
            let mut computed = 0;
            for args in &history {
                if service.compute_cached(&func, theme, args.clone()).1 {
                    computed += 1;
                }
            }
            (history.len(), computed)
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Tracks invocation counts and argument histories per style function.
pub struct UsageTracker<T> {
    functions: IndexMap<StyleFnId, Box<dyn TrackedFunction<T>>>,
    stable: IndexSet<StyleFnId>,
    history_capacity: usize,
    stable_threshold: u32,
}

impl<T: 'static> UsageTracker<T> {
    /// Create a tracker with explicit bounds.
    pub fn new(history_capacity: usize, stable_threshold: u32) -> Self {
        Self {
            functions: IndexMap::new(),
            stable: IndexSet::new(),
            history_capacity: history_capacity.max(1),
            stable_threshold: stable_threshold.max(1),
        }
    }

    /// Record one invocation of `func` with the non-theme arguments `args`.
    ///
    /// Returns `true` if the function is stable after this call.
    pub fn record_usage<A: StyleArgs, V: 'static>(
        &mut self,
        func: &StyleFn<T, A, V>,
        args: &A,
    ) -> bool {
        let threshold = self.stable_threshold;
        let capacity = self.history_capacity;
        let entry = self.functions.entry(func.id()).or_insert_with(|| {
            Box::new(Tracked {
                func: func.downgrade(),
                name: func.name(),
                record: UsageRecord::<A>::new(),
            }) as Box<dyn TrackedFunction<T>>
        });

        let Some(tracked) = entry.as_any_mut().downcast_mut::<Tracked<T, A, V>>() else {
            return false;
        };
        let record = &mut tracked.record;
        record.calls = record.calls.saturating_add(1);

        if record.calls < threshold {
            record.park(args.clone(), capacity);
            return false;
        }

        if record.calls == threshold {
            log::debug!("Style function '{}' is now stable", func.name());
            record.promote(capacity);
            self.stable.insert(func.id());
        }

        record.remember(args.clone(), capacity);
        true
    }

    /// Returns `true` if the function has reached the stability threshold.
    pub fn is_stable(&self, id: StyleFnId) -> bool {
        self.stable.contains(&id)
    }

    /// Stable functions in the order they became stable.
    pub fn stable_functions(&self) -> impl Iterator<Item = StyleFnId> + '_ {
        self.stable.iter().copied()
    }

    /// Number of stable functions.
    pub fn stable_count(&self) -> usize {
        self.stable.len()
    }

    /// Number of recorded invocations of one function.
    pub fn call_count(&self, id: StyleFnId) -> u32 {
        self.functions.get(&id).map_or(0, |tracked| tracked.calls())
    }

    /// Number of argument tuples remembered for one function.
    pub fn history_len(&self, id: StyleFnId) -> usize {
        self.functions.get(&id).map_or(0, |tracked| tracked.history_len())
    }

    /// The argument tuples remembered for `func`, oldest first.
    pub fn recorded_args<A: StyleArgs, V: 'static>(&self, func: &StyleFn<T, A, V>) -> Vec<A> {
        self.functions
            .get(&func.id())
            .and_then(|tracked| tracked.as_any().downcast_ref::<Tracked<T, A, V>>())
            .map(|tracked| tracked.record.history.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Replay jobs for every stable function that is still alive.
    pub(crate) fn replays(&self) -> Vec<(&'static str, ReplayFn<T>)> {
        self.stable
            .iter()
            .filter_map(|id| self.functions.get(id))
            .filter_map(|tracked| tracked.replay().map(|replay| (tracked.name(), replay)))
            .collect()
    }

    /// Forget functions whose handles were all dropped. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.functions.len();
        self.functions.retain(|_, tracked| tracked.is_alive());
        let functions = &self.functions;
        self.stable.retain(|id| functions.contains_key(id));
        before - self.functions.len()
    }
}

impl<T: 'static> Default for UsageTracker<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY, DEFAULT_STABLE_THRESHOLD)
    }
}
