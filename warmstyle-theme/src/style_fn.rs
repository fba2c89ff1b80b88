//! # Style Functions
//!
//! A [StyleFn] wraps a pure function `(theme, args) -> value` together with a
//! unique [StyleFnId]. The id is what the cache and the usage tracker group
//! calls by: clones of one handle share it, while two handles built from the
//! same closure are unrelated.
//!
//! Create a style function once per call site and keep it around (a field, a
//! `thread_local!`, a struct built at startup), never inside a render pass:
//! a new handle per render would never hit the cache.
//!
//! ```rust
//! use std::rc::Rc;
//! use warmstyle_theme::style_fn::StyleFn;
//!
//! struct Tokens { spacing: u32 }
//!
//! let padding = StyleFn::new("padding", |theme: &Tokens, dense: &bool| {
//!     if *dense { theme.spacing } else { theme.spacing * 2 }
//! });
//! let again = padding.clone();
//! assert_eq!(padding.id(), again.id());
//! ```

use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::args::StyleArgs;

static NEXT_STYLE_FN_ID: AtomicU64 = AtomicU64::new(1);

/// The identity of a style function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleFnId(u64);

impl StyleFnId {
    fn next() -> Self {
        Self(NEXT_STYLE_FN_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

struct StyleFnInner<T, A, V> {
    id: StyleFnId,
    name: &'static str,
    func: Box<dyn Fn(&T, &A) -> V>,
}

/// A style-producing function with a stable identity.
pub struct StyleFn<T, A, V> {
    inner: Rc<StyleFnInner<T, A, V>>,
}

impl<T: 'static, A: StyleArgs, V: 'static> StyleFn<T, A, V> {
    /// Wrap `func` under a new identity. `name` is only used for logging.
    pub fn new(name: &'static str, func: impl Fn(&T, &A) -> V + 'static) -> Self {
        Self {
            inner: Rc::new(StyleFnInner {
                id: StyleFnId::next(),
                name,
                func: Box::new(func),
            }),
        }
    }

    /// Returns the identity of this function.
    pub fn id(&self) -> StyleFnId {
        self.inner.id
    }

    /// Returns the name given at creation.
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Invoke the function directly, bypassing any cache.
    pub fn call(&self, theme: &T, args: &A) -> V {
        (self.inner.func)(theme, args)
    }

    pub(crate) fn downgrade(&self) -> WeakStyleFn<T, A, V> {
        WeakStyleFn {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl<T, A, V> Clone for StyleFn<T, A, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, A, V> Debug for StyleFn<T, A, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleFn")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .finish()
    }
}

/// A non-owning reference to a [StyleFn].
///
/// The cache and the tracker hold style functions weakly so that dropping the
/// last handle lets [prune](crate::service::StyleCacheService::prune) release
/// everything recorded for it.
pub(crate) struct WeakStyleFn<T, A, V> {
    inner: Weak<StyleFnInner<T, A, V>>,
}

impl<T, A, V> WeakStyleFn<T, A, V> {
    pub(crate) fn upgrade(&self) -> Option<StyleFn<T, A, V>> {
        self.inner.upgrade().map(|inner| StyleFn { inner })
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
