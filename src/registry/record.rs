//! Metadata records.
//!
//! A `MetadataRecord` is built completely before it is published to the
//! registry and is immutable afterwards.

use crate::config::{DatabaseBackend, DbConfig};
use crate::error::{RegistryError, RegistryResult};
use crate::models::model::{AccessorSource, ColumnSet, Model};
use crate::models::{ColumnInfo, Value};
use crate::registry::naming::validate_model_name;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Reads one column's value from a model instance.
///
/// Fails with `AccessorFailure` when the instance is not of the record's
/// model type or the field cannot be read.
pub type FieldAccessor = Arc<dyn Fn(&dyn Any) -> RegistryResult<Value> + Send + Sync>;

type IdAccessor = Arc<dyn Fn(&dyn Any) -> RegistryResult<Option<i64>> + Send + Sync>;

/// Derived description of one registered model type.
pub struct MetadataRecord {
    model_name: String,
    type_id: TypeId,
    table_name: String,
    column_names: Vec<String>,
    columns: Vec<ColumnInfo>,
    field_accessors: HashMap<String, FieldAccessor>,
    id_accessor: IdAccessor,
    config: Arc<DbConfig>,
    registered_at: DateTime<Utc>,
}

/// Serializable view of a record.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub model: String,
    pub table_name: String,
    pub columns: Vec<ColumnInfo>,
    pub connection_id: String,
    pub backend: DatabaseBackend,
    pub registered_at: DateTime<Utc>,
}

impl MetadataRecord {
    /// Introspect `M` and build its record.
    pub(crate) fn build<M: Model>(config: Arc<DbConfig>) -> RegistryResult<Self> {
        let model_name = M::model_name();
        let table_name = validate_model_name(&model_name)?;

        let mut set = ColumnSet::<M>::new();
        M::columns(&mut set);

        let mut column_names = Vec::with_capacity(set.len());
        let mut columns = Vec::with_capacity(set.len());
        let mut field_accessors = HashMap::with_capacity(set.len());

        for entry in set.into_entries() {
            let column = entry.info.name.clone();
            if field_accessors.contains_key(&column) {
                return Err(RegistryError::duplicate_column(&model_name, &column));
            }

            let accessor: FieldAccessor = match entry.source {
                AccessorSource::Bound(read) => {
                    let (model, col) = (model_name.clone(), column.clone());
                    Arc::new(move |instance: &dyn Any| -> RegistryResult<Value> {
                        let instance = downcast::<M>(instance, &model, &col)?;
                        Ok(read(instance))
                    })
                }
                AccessorSource::Reflected { data_fields, read } => {
                    if !data_fields().iter().any(|field| *field == column) {
                        return Err(RegistryError::missing_data_field(&model_name, &column));
                    }
                    let (model, col) = (model_name.clone(), column.clone());
                    Arc::new(move |instance: &dyn Any| -> RegistryResult<Value> {
                        let instance = downcast::<M>(instance, &model, &col)?;
                        read(instance, &col).ok_or_else(|| {
                            RegistryError::accessor(&model, &col, "data field could not be read")
                        })
                    })
                }
            };

            debug!(
                model = %model_name,
                column = %column,
                kind = %entry.info.kind,
                value_type = entry.info.value_type,
                "Bound column accessor"
            );

            field_accessors.insert(column.clone(), accessor);
            column_names.push(column);
            columns.push(entry.info);
        }

        let id_model = model_name.clone();
        let id_accessor: IdAccessor =
            Arc::new(move |instance: &dyn Any| -> RegistryResult<Option<i64>> {
                Ok(downcast::<M>(instance, &id_model, "id")?.id())
            });

        Ok(Self {
            model_name,
            type_id: TypeId::of::<M>(),
            table_name,
            column_names,
            columns,
            field_accessors,
            id_accessor,
            config,
            registered_at: Utc::now(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Column descriptions in declaration order.
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn field_accessors(&self) -> &HashMap<String, FieldAccessor> {
        &self.field_accessors
    }

    pub fn field_accessor(&self, column: &str) -> Option<&FieldAccessor> {
        self.field_accessors.get(column)
    }

    pub fn config(&self) -> &Arc<DbConfig> {
        &self.config
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Read one column's current value from an instance.
    pub fn read(&self, instance: &dyn Any, column: &str) -> RegistryResult<Value> {
        let accessor = self
            .field_accessors
            .get(column)
            .ok_or_else(|| RegistryError::column_not_found(&self.model_name, column))?;
        accessor(instance)
    }

    /// Read every column of an instance, in declaration order.
    pub fn row_values(&self, instance: &dyn Any) -> RegistryResult<Vec<(String, Value)>> {
        self.column_names
            .iter()
            .map(|column| Ok((column.clone(), self.read(instance, column)?)))
            .collect()
    }

    /// Identifier of an instance, `None` if it has not been persisted.
    pub fn instance_id(&self, instance: &dyn Any) -> RegistryResult<Option<i64>> {
        (self.id_accessor)(instance)
    }

    pub fn is_persisted(&self, instance: &dyn Any) -> RegistryResult<bool> {
        Ok(self.instance_id(instance)?.is_some())
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            model: self.model_name.clone(),
            table_name: self.table_name.clone(),
            columns: self.columns.clone(),
            connection_id: self.config.id.clone(),
            backend: self.config.backend,
            registered_at: self.registered_at,
        }
    }
}

impl std::fmt::Debug for MetadataRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataRecord")
            .field("model_name", &self.model_name)
            .field("table_name", &self.table_name)
            .field("column_names", &self.column_names)
            .field("config", &self.config.id)
            .field("registered_at", &self.registered_at)
            .finish_non_exhaustive()
    }
}

fn downcast<'a, M: Model>(
    instance: &'a dyn Any,
    model: &str,
    column: &str,
) -> RegistryResult<&'a M> {
    instance
        .downcast_ref::<M>()
        .ok_or_else(|| RegistryError::accessor(model, column, format!("instance is not a {model}")))
}
