//! A witness value that may be unknown.
//!
//! Values are unknown during key generation, and for cells that depend on
//! challenges that have not been squeezed yet.

use crate::error::SynthesisError;
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Value<V> {
    inner: Option<V>,
}

impl<V> Value<V> {
    pub const fn unknown() -> Self {
        Self { inner: None }
    }

    pub const fn known(value: V) -> Self {
        Self { inner: Some(value) }
    }

    pub fn is_unknown(&self) -> bool {
        self.inner.is_none()
    }

    /// Returns the wrapped value, failing when it is unknown.
    pub fn assign(self) -> Result<V, SynthesisError> {
        self.inner.ok_or(SynthesisError::UnknownValue)
    }

    pub fn as_ref(&self) -> Value<&V> {
        Value {
            inner: self.inner.as_ref(),
        }
    }

    pub fn map<W, F: FnOnce(V) -> W>(self, f: F) -> Value<W> {
        Value {
            inner: self.inner.map(f),
        }
    }

    pub fn and_then<W, F: FnOnce(V) -> Value<W>>(self, f: F) -> Value<W> {
        match self.inner {
            Some(v) => f(v),
            None => Value::unknown(),
        }
    }

    pub fn zip<W>(self, other: Value<W>) -> Value<(V, W)> {
        Value {
            inner: self.inner.zip(other.inner),
        }
    }
}

impl<V: Copy> Value<&V> {
    pub fn copied(self) -> Value<V> {
        Value {
            inner: self.inner.copied(),
        }
    }
}

impl<V: Neg<Output = O>, O> Neg for Value<V> {
    type Output = Value<O>;

    fn neg(self) -> Self::Output {
        self.map(|v| -v)
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident) => {
        impl<V: $trait<Output = O>, O> $trait for Value<V> {
            type Output = Value<O>;

            fn $method(self, rhs: Self) -> Self::Output {
                self.zip(rhs).map(|(a, b)| a.$method(b))
            }
        }

        impl<V: $trait<Output = O>, O> $trait<V> for Value<V> {
            type Output = Value<O>;

            fn $method(self, rhs: V) -> Self::Output {
                self.map(|a| a.$method(rhs))
            }
        }
    };
}

impl_binop!(Add, add);
impl_binop!(Sub, sub);
impl_binop!(Mul, mul);
