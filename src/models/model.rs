//! The model contract.
//!
//! A model type declares its columns once, through `Model::columns`. Each
//! `ColumnSet::bind` call pairs a descriptor with the accessor that reads the
//! field's value, so a column can never lose track of its data. Models that
//! expose their fields by name through `FieldReflect` may instead `declare`
//! bare descriptors and let the registry pair them with data fields.

use crate::models::column::{ColumnDescriptor, ColumnInfo, TypedColumn};
use crate::models::value::Value;
use std::any::Any;

/// A user-defined record type persisted as one table row.
pub trait Model: Any + Send + Sync + Sized {
    /// Simple name of the type, used to derive the table name.
    fn model_name() -> String {
        simple_type_name::<Self>()
    }

    /// Identifier of a persisted instance. `None` until the instance is saved.
    fn id(&self) -> Option<i64>;

    /// Declare the persisted columns, in order.
    fn columns(columns: &mut ColumnSet<Self>);
}

/// Name-based access to a model's instance data.
pub trait FieldReflect: Model {
    /// Names of the instance data fields, in declaration order.
    fn data_fields() -> &'static [&'static str];

    /// Current value of the named field, or `None` if it cannot be read.
    fn field_value(&self, name: &str) -> Option<Value>;
}

pub(crate) type BoundAccessor<M> = Box<dyn Fn(&M) -> Value + Send + Sync>;

pub(crate) enum AccessorSource<M> {
    /// Accessor supplied together with the descriptor
    Bound(BoundAccessor<M>),
    /// Resolved by name against `FieldReflect::data_fields`
    Reflected {
        data_fields: fn() -> &'static [&'static str],
        read: fn(&M, &str) -> Option<Value>,
    },
}

pub(crate) struct ColumnEntry<M> {
    pub(crate) info: ColumnInfo,
    pub(crate) source: AccessorSource<M>,
}

/// Ordered column declarations collected from `Model::columns`.
pub struct ColumnSet<M> {
    entries: Vec<ColumnEntry<M>>,
}

impl<M: Model> ColumnSet<M> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Declare a column together with the accessor for its field.
    ///
    /// ```ignore
    /// static ID: NumericColumn<Option<i64>> = NumericColumn::new("id_");
    ///
    /// fn columns(columns: &mut ColumnSet<Self>) {
    ///     columns.bind(&ID, |user| user.id_);
    /// }
    /// ```
    pub fn bind<D, F>(&mut self, column: &D, accessor: F) -> &mut Self
    where
        D: TypedColumn + ?Sized,
        F: Fn(&M) -> D::FieldType + Send + Sync + 'static,
    {
        self.entries.push(ColumnEntry {
            info: column.info(),
            source: AccessorSource::Bound(Box::new(move |model: &M| -> Value {
                accessor(model).into()
            })),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<ColumnEntry<M>> {
        self.entries
    }
}

impl<M: FieldReflect> ColumnSet<M> {
    /// Declare a column whose data field is looked up by name at registration.
    pub fn declare<D>(&mut self, column: &D) -> &mut Self
    where
        D: ColumnDescriptor + ?Sized,
    {
        self.entries.push(ColumnEntry {
            info: column.info(),
            source: AccessorSource::Reflected {
                data_fields: M::data_fields,
                read: M::field_value,
            },
        });
        self
    }
}

/// Simple name of a type: the last path segment, without generic arguments.
pub fn simple_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}
