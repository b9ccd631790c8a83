//! Field kinds.
//!
//! Every bindable field exposes itself as a [`Slot`]: a mutable, kind-tagged
//! view the coercer dispatches on. Scalars, `Option<T>`, `Vec<T>` and
//! `Box<T>` get their [`Field`] impls here; records get theirs from
//! `#[derive(Record)]`.
//!
//! Types that can never be filled from a single string (arrays, maps,
//! channels, dynamically typed values) still implement [`Field`] so that a
//! record containing them compiles. Binding such a field reports
//! [`CoerceError::UnsupportedType`](crate::CoerceError::UnsupportedType).

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc;

use crate::complex::{Complex128, Complex64};
use crate::directive::Options;
use crate::error::{BindError, CoerceError, Error};
use crate::source::{Env, KeyGetter};

/// Mutable view of one field, tagged with its kind.
pub enum Slot<'a> {
    Bool(&'a mut bool),
    Str(&'a mut String),
    Char(&'a mut char),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
    F32(&'a mut f32),
    F64(&'a mut f64),
    Complex64(&'a mut Complex64),
    Complex128(&'a mut Complex128),
    /// `Option<T>`: filled by allocating a `T` and wrapping it.
    Optional(&'a mut dyn Nullable),
    /// `Vec<T>`: filled by splitting the raw value.
    List(&'a mut dyn Sequence),
    /// A nested record, walked by the binder.
    Record(&'a mut dyn Record),
    /// A kind that cannot be bound, with its name.
    Unsupported(&'static str),
}

impl Slot<'_> {
    /// Short name of the slot's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Slot::Bool(_) => "bool",
            Slot::Str(_) => "string",
            Slot::Char(_) => "char",
            Slot::I8(_) => "i8",
            Slot::I16(_) => "i16",
            Slot::I32(_) => "i32",
            Slot::I64(_) => "i64",
            Slot::Isize(_) => "isize",
            Slot::U8(_) => "u8",
            Slot::U16(_) => "u16",
            Slot::U32(_) => "u32",
            Slot::U64(_) => "u64",
            Slot::Usize(_) => "usize",
            Slot::F32(_) => "f32",
            Slot::F64(_) => "f64",
            Slot::Complex64(_) => "complex64",
            Slot::Complex128(_) => "complex128",
            Slot::Optional(_) => "optional",
            Slot::List(_) => "list",
            Slot::Record(_) => "record",
            Slot::Unsupported(kind) => kind,
        }
    }
}

/// A value the binder can write into.
pub trait Field {
    /// Borrow the value as a kind-tagged slot.
    fn slot(&mut self) -> Slot<'_>;
}

/// A struct whose fields are bound one by one.
///
/// Implemented by `#[derive(Record)]`.
pub trait Record {
    /// Bind every field, in declaration order, from `source`.
    ///
    /// Stops at the first failing field.
    fn bind_fields(&mut self, source: &dyn KeyGetter) -> Result<(), BindError>;

    /// Build a default record and fill it from the process environment.
    ///
    /// # Errors
    ///
    /// See [`load`](crate::load).
    fn from_env() -> Result<Self, Error>
    where
        Self: Sized + Default,
    {
        let mut record = Self::default();
        record.load_from(&Env)?;
        Ok(record)
    }

    /// Fill this record from `source`.
    ///
    /// # Errors
    ///
    /// See [`load_with`](crate::load_with).
    fn load_from<S>(&mut self, source: &S) -> Result<(), Error>
    where
        Self: Sized,
        S: KeyGetter + ?Sized,
    {
        let source: &dyn KeyGetter = &source;
        crate::bind::bind_record(source, self).map_err(Error::from)
    }
}

/// An optional wrapper that can be filled from a raw value.
pub trait Nullable {
    /// Allocate the inner value, coerce `raw` into it, then store it.
    fn fill(&mut self, raw: &str, options: &Options) -> Result<(), CoerceError>;
}

/// A list that can be filled from a separated raw value.
pub trait Sequence {
    /// Split `raw` and coerce every piece into a fresh element.
    fn fill(&mut self, raw: &str, options: &Options) -> Result<(), CoerceError>;
}

macro_rules! impl_field {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Field for $ty {
                fn slot(&mut self) -> Slot<'_> {
                    Slot::$variant(self)
                }
            }
        )*
    };
}

impl_field! {
    bool => Bool,
    String => Str,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    Complex64 => Complex64,
    Complex128 => Complex128,
}

impl<T: Field + Default> Field for Option<T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Optional(self)
    }
}

impl<T: Field + Default> Field for Vec<T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::List(self)
    }
}

impl<T: Field + ?Sized> Field for Box<T> {
    fn slot(&mut self) -> Slot<'_> {
        (**self).slot()
    }
}

macro_rules! impl_unsupported {
    ($kind:literal => $([$($generics:tt)*] $ty:ty),* $(,)?) => {
        $(
            impl<$($generics)*> Field for $ty {
                fn slot(&mut self) -> Slot<'_> {
                    Slot::Unsupported($kind)
                }
            }
        )*
    };
}

impl_unsupported!("map" =>
    [K, V, S] HashMap<K, V, S>,
    [K, V] BTreeMap<K, V>,
);

impl_unsupported!("channel" =>
    [T] mpsc::Sender<T>,
    [T] mpsc::SyncSender<T>,
    [T] mpsc::Receiver<T>,
);

impl_unsupported!("dynamic" =>
    [] serde_json::Value,
    [] dyn Any,
    [] dyn Any + Send,
    [] dyn Any + Send + Sync,
);

impl<T, const N: usize> Field for [T; N] {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Unsupported("array")
    }
}
