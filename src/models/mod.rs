//! Data models for the model registry.
//!
//! This module re-exports the column descriptors, column values and the
//! model contract implemented by application types.

pub mod column;
pub mod model;
pub mod value;

// Re-export commonly used types
pub use column::{
    Column, ColumnDescriptor, ColumnInfo, ColumnKind, Numeric, NumericColumn, TextColumn, Textual,
    TypedColumn,
};
pub use model::{ColumnSet, FieldReflect, Model, simple_type_name};
pub use value::Value;
