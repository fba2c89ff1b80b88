//! # Style Arguments
//!
//! Extra arguments passed to a style function next to the theme. Cache lookups
//! compare them element by element with *identity* semantics, never deeply:
//! primitives and strings compare by value, shared pointers compare by address.
//! Passing a freshly allocated `Rc` on every render therefore always misses the
//! cache. Pass primitives, or reuse the same `Rc`.
//!
//! Floats follow `Object.is` semantics and compare by bit pattern, so `NaN`
//! matches itself while `0.0` and `-0.0` are different arguments.

use std::rc::Rc;
use std::sync::Arc;

/// Identity comparison for style function arguments.
pub trait StyleArgs: Clone + 'static {
    /// Returns `true` if both argument tuples are identical element by element.
    fn same_as(&self, other: &Self) -> bool;
}

macro_rules! impl_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl StyleArgs for $ty {
                #[inline]
                fn same_as(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_by_value!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    &'static str,
    String,
);

impl StyleArgs for f32 {
    #[inline]
    fn same_as(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl StyleArgs for f64 {
    #[inline]
    fn same_as(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl<T: ?Sized + 'static> StyleArgs for Rc<T> {
    #[inline]
    fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized + 'static> StyleArgs for Arc<T> {
    #[inline]
    fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: StyleArgs> StyleArgs for Option<T> {
    fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same_as(b),
            (None, None) => true,
            _ => false,
        }
    }
}

macro_rules! impl_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: StyleArgs),+> StyleArgs for ($($name,)+) {
            fn same_as(&self, other: &Self) -> bool {
                $(self.$idx.same_as(&other.$idx))&&+
            }
        }
    };
}

impl_tuple!(A: 0);
impl_tuple!(A: 0, B: 1);
impl_tuple!(A: 0, B: 1, C: 2);
impl_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
