//! # Style Cache
//!
//! Per-function memoization tables keyed by `(theme, args)`.
//!
//! Each [StyleFn] gets its own bounded table, created lazily on first insert.
//! Lookups compare the theme by `Rc` address and the arguments with
//! [StyleArgs::same_as], scanning the table linearly: tables are small
//! (ten entries by default) and identity checks are cheap.
//!
//! When a table exceeds its capacity the least recently *populated* entry is
//! evicted. Hits do not refresh an entry's position.
//!
//! Values are stored as `Rc<V>` and handed out by cloning the `Rc`, so two
//! lookups of the same key return the same allocation.

use std::any::Any;
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::args::StyleArgs;
use crate::style_fn::{StyleFn, StyleFnId, WeakStyleFn};

/// Default number of entries retained per style function.
pub const DEFAULT_CACHE_CAPACITY: usize = 10;

struct MemoEntry<T, A, V> {
    theme: Rc<T>,
    args: A,
    value: Rc<V>,
}

struct MemoTable<T, A, V> {
    func: WeakStyleFn<T, A, V>,
    name: &'static str,
    entries: VecDeque<MemoEntry<T, A, V>>,
    capacity: usize,
}

impl<T: 'static, A: StyleArgs, V: 'static> MemoTable<T, A, V> {
    fn new(func: &StyleFn<T, A, V>, capacity: usize) -> Self {
        Self {
            func: func.downgrade(),
            name: func.name(),
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CACHE_CAPACITY) + 1),
            capacity,
        }
    }

    fn lookup(&self, theme: &Rc<T>, args: &A) -> Option<Rc<V>> {
        self.entries
            .iter()
            .find(|entry| Rc::ptr_eq(&entry.theme, theme) && entry.args.same_as(args))
            .map(|entry| entry.value.clone())
    }

    /// Insert a freshly computed value. Returns `true` if an entry was evicted.
    fn insert(&mut self, theme: Rc<T>, args: A, value: Rc<V>) -> bool {
        self.entries.push_back(MemoEntry { theme, args, value });
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
            true
        } else {
            false
        }
    }
}

trait ErasedTable {
    fn len(&self) -> usize;
    fn is_alive(&self) -> bool;
    fn name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static, A: StyleArgs, V: 'static> ErasedTable for MemoTable<T, A, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_alive(&self) -> bool {
        self.func.is_alive()
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Memoization tables for every style function seen, keyed by function identity.
pub struct StyleCache<T> {
    tables: IndexMap<StyleFnId, Box<dyn ErasedTable>>,
    capacity: usize,
    _theme: PhantomData<fn(&T)>,
}

impl<T: 'static> StyleCache<T> {
    /// Create an empty cache retaining at most `capacity` entries per function.
    pub fn new(capacity: usize) -> Self {
        Self {
            tables: IndexMap::new(),
            capacity: capacity.max(1),
            _theme: PhantomData,
        }
    }

    /// Returns the per-function capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Look up a cached value without computing anything.
    pub fn lookup<A: StyleArgs, V: 'static>(
        &self,
        func: &StyleFn<T, A, V>,
        theme: &Rc<T>,
        args: &A,
    ) -> Option<Rc<V>> {
        self.tables
            .get(&func.id())
            .and_then(|table| table.as_any().downcast_ref::<MemoTable<T, A, V>>())
            .and_then(|table| table.lookup(theme, args))
    }

    /// Store a computed value, evicting the oldest entry of that function if needed.
    pub fn insert<A: StyleArgs, V: 'static>(
        &mut self,
        func: &StyleFn<T, A, V>,
        theme: Rc<T>,
        args: A,
        value: Rc<V>,
    ) {
        let capacity = self.capacity;
        let table = self
            .tables
            .entry(func.id())
            .or_insert_with(|| Box::new(MemoTable::new(func, capacity)));

        if table.as_any().downcast_ref::<MemoTable<T, A, V>>().is_none() {
            *table = Box::new(MemoTable::new(func, capacity));
        }

        if let Some(table) = table.as_any_mut().downcast_mut::<MemoTable<T, A, V>>() {
            if table.insert(theme, args, value) {
                log::debug!(
                    "Style cache for '{}' full, evicted oldest entry",
                    func.name()
                );
            }
        }
    }

    /// Returns `true` if a value is cached for this exact key.
    pub fn contains<A: StyleArgs, V: 'static>(
        &self,
        func: &StyleFn<T, A, V>,
        theme: &Rc<T>,
        args: &A,
    ) -> bool {
        self.lookup(func, theme, args).is_some()
    }

    /// Number of entries cached for one function.
    pub fn entry_count(&self, id: StyleFnId) -> usize {
        self.tables.get(&id).map_or(0, |table| table.len())
    }

    /// Number of entries cached across all functions.
    pub fn total_entries(&self) -> usize {
        self.tables.values().map(|table| table.len()).sum()
    }

    /// Number of functions with a table.
    pub fn function_count(&self) -> usize {
        self.tables.len()
    }

    /// Drop every cached value.
    pub fn clear(&mut self) {
        self.tables.clear();
    }

    /// Drop the tables of style functions whose handles were all dropped.
    ///
    /// Returns the number of tables released.
    pub fn prune(&mut self) -> usize {
        let before = self.tables.len();
        self.tables.retain(|_, table| {
            let alive = table.is_alive();
            if !alive {
                log::debug!("Releasing style cache of dropped function '{}'", table.name());
            }
            alive
        });
        before - self.tables.len()
    }
}

impl<T: 'static> Default for StyleCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
