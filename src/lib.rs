//! Model Registry Library
//!
//! This library derives and stores ORM metadata for model types: table
//! names, declared columns and bound field accessors, keyed by type.

pub mod config;
pub mod error;
pub mod models;
pub mod registry;

pub use config::{DbConfig, ReregisterPolicy};
pub use error::{RegistryError, RegistryResult};
pub use models::{ColumnSet, Model, Value};
pub use registry::{MetadataRecord, ModelRegistry};
