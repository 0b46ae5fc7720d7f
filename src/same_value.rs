use std::{rc::Rc, sync::Arc};

/// Derive [`SameValue`](trait@SameValue) by comparing every field with `SameValue`.
///
/// Enums compare equal only when both values are the same variant with the same field values.
/// Unions are not supported.
pub use sigtrack_macros::SameValue;


/// Equality used to decide whether a write changes a signal.
///
/// The semantics are those of JavaScript's `Object.is`:
///
/// - Floating point numbers: `NaN` is the same value as `NaN`, and `0.0` is not the same value as `-0.0`.
/// - `Rc<T>` and `Arc<T>`: same only if both point to the same allocation.
/// - Other primitives, strings and containers: compared by value, element by element.
pub trait SameValue {
    fn same_value(&self, other: &Self) -> bool;
}

macro_rules! impl_same_value_by_eq {
    ($($t:ty),* $(,)?) => {
        $(
            impl SameValue for $t {
                #[inline]
                fn same_value(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_same_value_by_eq!(
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
    str,
    String,
    std::time::Duration,
);

macro_rules! impl_same_value_for_float {
    ($($t:ty),*) => {
        $(
            impl SameValue for $t {
                #[inline]
                fn same_value(&self, other: &Self) -> bool {
                    if self.is_nan() {
                        other.is_nan()
                    } else {
                        self.to_bits() == other.to_bits()
                    }
                }
            }
        )*
    };
}

impl_same_value_for_float!(f32, f64);

impl<T: SameValue + ?Sized> SameValue for &T {
    fn same_value(&self, other: &Self) -> bool {
        T::same_value(*self, *other)
    }
}
impl<T: SameValue + ?Sized> SameValue for Box<T> {
    fn same_value(&self, other: &Self) -> bool {
        T::same_value(self, other)
    }
}
impl<T: ?Sized> SameValue for Rc<T> {
    fn same_value(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}
impl<T: ?Sized> SameValue for Arc<T> {
    fn same_value(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: SameValue> SameValue for Option<T> {
    fn same_value(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same_value(b),
            (None, None) => true,
            _ => false,
        }
    }
}
impl<T: SameValue, E: SameValue> SameValue for Result<T, E> {
    fn same_value(&self, other: &Self) -> bool {
        match (self, other) {
            (Ok(a), Ok(b)) => a.same_value(b),
            (Err(a), Err(b)) => a.same_value(b),
            _ => false,
        }
    }
}

impl<T: SameValue> SameValue for [T] {
    fn same_value(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.same_value(b))
    }
}
impl<T: SameValue, const N: usize> SameValue for [T; N] {
    fn same_value(&self, other: &Self) -> bool {
        self[..].same_value(&other[..])
    }
}
impl<T: SameValue> SameValue for Vec<T> {
    fn same_value(&self, other: &Self) -> bool {
        self[..].same_value(&other[..])
    }
}

macro_rules! impl_same_value_for_tuple {
    ($(($($i:tt $t:ident),*)),* $(,)?) => {
        $(
            impl<$($t: SameValue),*> SameValue for ($($t,)*) {
                fn same_value(&self, other: &Self) -> bool {
                    $(self.$i.same_value(&other.$i))&&*
                }
            }
        )*
    };
}

impl_same_value_for_tuple!(
    (0 T0),
    (0 T0, 1 T1),
    (0 T0, 1 T1, 2 T2),
    (0 T0, 1 T1, 2 T2, 3 T3),
    (0 T0, 1 T1, 2 T2, 3 T3, 4 T4),
    (0 T0, 1 T1, 2 T2, 3 T3, 4 T4, 5 T5),
);
