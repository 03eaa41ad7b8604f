#![doc = include_str!("../README.md")]

mod error;
mod value;

pub use crate::error::ScanError;
pub use crate::value::SqlValue;

/// A type that can be loaded from a database column value.
pub trait Scan {
    /// Replaces the contents of `self` with the value read from `src`.
    fn scan(&mut self, src: &SqlValue) -> Result<(), ScanError>;
}

/// A type that can be stored in a database column.
pub trait Value {
    /// Returns the column representation of `self`.
    fn value(&self) -> SqlValue;
}

/// `NULL` clears the option; any other value is scanned into the held (or a default) value.
impl<T> Scan for Option<T>
where
    T: Scan + Default,
{
    fn scan(&mut self, src: &SqlValue) -> Result<(), ScanError> {
        if src.is_null() {
            *self = None;
            return Ok(());
        }
        self.get_or_insert_with(T::default).scan(src)
    }
}

impl<T> Value for Option<T>
where
    T: Value,
{
    fn value(&self) -> SqlValue {
        match self {
            Some(inner) => inner.value(),
            None => SqlValue::Null,
        }
    }
}
