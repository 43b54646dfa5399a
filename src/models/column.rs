//! Column descriptors.
//!
//! A descriptor is a named, typed marker a model declares for each persisted
//! field. Descriptors are immutable and know nothing about the model that
//! owns them, so the same name may appear on unrelated models.

use crate::models::value::Value;
use serde::Serialize;
use std::marker::PhantomData;

/// Kind of column a descriptor represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Plain,
    Numeric,
    Text,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Numeric => write!(f, "numeric"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Static description of one declared column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
    /// Rust type name of the declared value type
    pub value_type: &'static str,
}

/// Implemented by every column kind.
pub trait ColumnDescriptor: Send + Sync {
    fn name(&self) -> &'static str;

    fn kind(&self) -> ColumnKind;

    fn value_type(&self) -> &'static str;

    fn info(&self) -> ColumnInfo {
        ColumnInfo {
            name: self.name().to_string(),
            kind: self.kind(),
            value_type: self.value_type(),
        }
    }
}

/// A descriptor whose value type is known statically.
///
/// `ColumnSet::bind` requires the accessor to return exactly this type.
pub trait TypedColumn: ColumnDescriptor {
    type FieldType: Into<Value> + 'static;
}

/// Marker for types a `NumericColumn` may hold.
pub trait Numeric: Into<Value> + 'static {}

impl Numeric for i8 {}
impl Numeric for i16 {}
impl Numeric for i32 {}
impl Numeric for i64 {}
impl Numeric for u8 {}
impl Numeric for u16 {}
impl Numeric for u32 {}
impl Numeric for f32 {}
impl Numeric for f64 {}
impl<T: Numeric> Numeric for Option<T> {}

/// Marker for types a `TextColumn` may hold.
pub trait Textual: Into<Value> + 'static {}

impl Textual for String {}
impl Textual for Option<String> {}

/// A column of any value type.
#[derive(Debug)]
pub struct Column<V> {
    name: &'static str,
    _value: PhantomData<fn() -> V>,
}

impl<V> Column<V> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<V: Into<Value> + 'static> ColumnDescriptor for Column<V> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn kind(&self) -> ColumnKind {
        ColumnKind::Plain
    }

    fn value_type(&self) -> &'static str {
        std::any::type_name::<V>()
    }
}

impl<V: Into<Value> + 'static> TypedColumn for Column<V> {
    type FieldType = V;
}

/// A column holding a number.
#[derive(Debug)]
pub struct NumericColumn<V: Numeric> {
    inner: Column<V>,
}

impl<V: Numeric> NumericColumn<V> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            inner: Column::new(name),
        }
    }

    pub const fn name(&self) -> &'static str {
        self.inner.name()
    }
}

impl<V: Numeric> ColumnDescriptor for NumericColumn<V> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn kind(&self) -> ColumnKind {
        ColumnKind::Numeric
    }

    fn value_type(&self) -> &'static str {
        std::any::type_name::<V>()
    }
}

impl<V: Numeric> TypedColumn for NumericColumn<V> {
    type FieldType = V;
}

/// A column holding text.
#[derive(Debug)]
pub struct TextColumn<V: Textual = String> {
    inner: Column<V>,
}

impl<V: Textual> TextColumn<V> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            inner: Column::new(name),
        }
    }

    pub const fn name(&self) -> &'static str {
        self.inner.name()
    }
}

impl<V: Textual> ColumnDescriptor for TextColumn<V> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn kind(&self) -> ColumnKind {
        ColumnKind::Text
    }

    fn value_type(&self) -> &'static str {
        std::any::type_name::<V>()
    }
}

impl<V: Textual> TypedColumn for TextColumn<V> {
    type FieldType = V;
}

#[cfg(test)]
mod tests {
    use super::*;

    static ID: NumericColumn<Option<i64>> = NumericColumn::new("id_");
    static NAME: TextColumn = TextColumn::new("name");
    static AVATAR: Column<Vec<u8>> = Column::new("avatar");

    #[test]
    fn test_descriptor_name_and_kind() {
        assert_eq!(ID.name(), "id_");
        assert_eq!(ColumnDescriptor::kind(&ID), ColumnKind::Numeric);
        assert_eq!(ColumnDescriptor::kind(&NAME), ColumnKind::Text);
        assert_eq!(ColumnDescriptor::kind(&AVATAR), ColumnKind::Plain);
    }

    #[test]
    fn test_value_type_names() {
        assert!(ColumnDescriptor::value_type(&ID).contains("Option<i64>"));
        assert!(ColumnDescriptor::value_type(&NAME).ends_with("String"));
    }

    #[test]
    fn test_info() {
        let info = NAME.info();
        assert_eq!(info.name, "name");
        assert_eq!(info.kind, ColumnKind::Text);
    }

    #[test]
    fn test_descriptors_are_object_safe() {
        let all: [&dyn ColumnDescriptor; 3] = [&ID, &NAME, &AVATAR];
        let names: Vec<&str> = all.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["id_", "name", "avatar"]);
    }

    #[test]
    fn test_same_name_on_different_descriptors_is_independent() {
        let a: NumericColumn<i32> = NumericColumn::new("count");
        let b: Column<String> = Column::new("count");
        assert_eq!(a.name(), b.name());
        assert_ne!(ColumnDescriptor::kind(&a), ColumnDescriptor::kind(&b));
    }
}
