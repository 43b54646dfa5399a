//! Model metadata registry.
//!
//! This module provides:
//! - Table name derivation from model type names
//! - Metadata records with bound field accessors
//! - The registry that stores one record per model type

pub mod metadata_registry;
pub mod naming;
pub mod record;

pub use metadata_registry::ModelRegistry;
pub use naming::{MODEL_SUFFIX, derive_table_name};
pub use record::{FieldAccessor, MetadataRecord, ModelSummary};
