//! Metadata registry for model types.
//!
//! This module stores one `MetadataRecord` per registered model type. The
//! registry is created explicitly at startup, shared by reference or `Arc`
//! with query and persistence code, and only ever grows.

use crate::config::{DbConfig, ReregisterPolicy};
use crate::error::{RegistryError, RegistryResult};
use crate::models::Model;
use crate::registry::record::{MetadataRecord, ModelSummary};
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Process-wide store of model metadata, keyed by model type.
///
/// Cloning yields a handle to the same store.
#[derive(Clone)]
pub struct ModelRegistry {
    records: Arc<RwLock<HashMap<TypeId, Arc<MetadataRecord>>>>,
    policy: ReregisterPolicy,
}

impl ModelRegistry {
    /// Create an empty registry that overwrites on re-registration.
    pub fn new() -> Self {
        Self::with_policy(ReregisterPolicy::default())
    }

    pub fn with_policy(policy: ReregisterPolicy) -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            policy,
        }
    }

    pub fn policy(&self) -> ReregisterPolicy {
        self.policy
    }

    /// Register a model type.
    ///
    /// The record is fully built before the registry lock is taken, so a
    /// failed registration leaves the registry untouched and readers never
    /// observe a partial record.
    pub fn register<M: Model>(
        &self,
        config: impl Into<Arc<DbConfig>>,
    ) -> RegistryResult<Arc<MetadataRecord>> {
        let record = match MetadataRecord::build::<M>(config.into()) {
            Ok(record) => Arc::new(record),
            Err(err) => {
                warn!(error = %err, "Model registration failed");
                return Err(err);
            }
        };
        let type_id = TypeId::of::<M>();

        {
            let mut records = self.records.write();
            if records.contains_key(&type_id) {
                match self.policy {
                    ReregisterPolicy::Reject => {
                        warn!(
                            model = %record.model_name(),
                            "Rejected duplicate model registration"
                        );
                        return Err(RegistryError::already_registered(record.model_name()));
                    }
                    ReregisterPolicy::Overwrite => {
                        warn!(
                            model = %record.model_name(),
                            "Model already registered, replacing metadata"
                        );
                    }
                }
            }
            records.insert(type_id, Arc::clone(&record));
        }

        info!(
            model = %record.model_name(),
            table = %record.table_name(),
            columns = record.column_names().len(),
            connection_id = %record.config().id,
            "Model registered"
        );

        Ok(record)
    }

    /// Get the metadata for a model type. Never registers.
    pub fn lookup<M: Model>(&self) -> Option<Arc<MetadataRecord>> {
        self.lookup_type_id(TypeId::of::<M>())
    }

    pub fn lookup_type_id(&self, type_id: TypeId) -> Option<Arc<MetadataRecord>> {
        self.records.read().get(&type_id).cloned()
    }

    /// Get the metadata for a model type, failing if it was never registered.
    pub fn require<M: Model>(&self) -> RegistryResult<Arc<MetadataRecord>> {
        self.lookup::<M>()
            .ok_or_else(|| RegistryError::not_registered(M::model_name()))
    }

    pub fn is_registered<M: Model>(&self) -> bool {
        self.records.read().contains_key(&TypeId::of::<M>())
    }

    /// Get the number of registered model types.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Summaries of all registered models, sorted by table name.
    pub fn list_all(&self) -> Vec<ModelSummary> {
        let mut summaries: Vec<ModelSummary> = self
            .records
            .read()
            .values()
            .map(|record| record.summary())
            .collect();
        summaries.sort_by(|a, b| {
            a.table_name
                .cmp(&b.table_name)
                .then_with(|| a.model.cmp(&b.model))
        });
        summaries
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.len())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnSet, NumericColumn};

    struct Counter {
        hits: i64,
    }

    static COUNTER_HITS: NumericColumn<i64> = NumericColumn::new("hits");

    impl Model for Counter {
        fn id(&self) -> Option<i64> {
            None
        }

        fn columns(columns: &mut ColumnSet<Self>) {
            columns.bind(&COUNTER_HITS, |counter| counter.hits);
        }
    }

    fn config(url: &str) -> DbConfig {
        DbConfig::parse(url).unwrap()
    }

    #[test]
    fn test_registry_creation() {
        let registry = ModelRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.policy(), ReregisterPolicy::Overwrite);
    }

    #[test]
    fn test_lookup_before_register_is_absent() {
        let registry = ModelRegistry::new();
        assert!(registry.lookup::<Counter>().is_none());
        assert!(!registry.is_registered::<Counter>());
        assert!(registry.lookup::<Counter>().is_none());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_require_reports_not_registered() {
        let registry = ModelRegistry::new();
        let err = registry.require::<Counter>().unwrap_err();
        assert_eq!(err, RegistryError::not_registered("Counter"));
    }

    #[test]
    fn test_register_then_lookup() {
        let registry = ModelRegistry::new();
        let registered = registry
            .register::<Counter>(config("postgres://host/stats"))
            .unwrap();
        let found = registry.lookup::<Counter>().unwrap();
        assert!(Arc::ptr_eq(&registered, &found));
        assert_eq!(found.table_name(), "counter");
        assert_eq!(found.read(&Counter { hits: 9 }, "hits").unwrap().as_i64(), Some(9));
    }

    #[test]
    fn test_clones_share_state() {
        let registry = ModelRegistry::new();
        let handle = registry.clone();
        handle
            .register::<Counter>(config("postgres://host/stats"))
            .unwrap();
        assert!(registry.is_registered::<Counter>());
    }

    #[test]
    fn test_overwrite_replaces_config() {
        let registry = ModelRegistry::new();
        registry
            .register::<Counter>(config("postgres://host/first"))
            .unwrap();
        registry
            .register::<Counter>(config("postgres://host/second"))
            .unwrap();
        assert_eq!(registry.len(), 1);
        let record = registry.lookup::<Counter>().unwrap();
        assert_eq!(record.config().id, "second");
        assert_eq!(record.column_names(), ["hits"]);
    }

    #[test]
    fn test_reject_keeps_first_record() {
        let registry = ModelRegistry::with_policy(ReregisterPolicy::Reject);
        registry
            .register::<Counter>(config("postgres://host/first"))
            .unwrap();
        let err = registry
            .register::<Counter>(config("postgres://host/second"))
            .unwrap_err();
        assert_eq!(err, RegistryError::already_registered("Counter"));
        assert_eq!(registry.lookup::<Counter>().unwrap().config().id, "first");
    }

    #[test]
    fn test_register_accepts_shared_config() {
        let registry = ModelRegistry::new();
        let shared = Arc::new(config("mysql://host/app"));
        let record = registry.register::<Counter>(Arc::clone(&shared)).unwrap();
        assert!(Arc::ptr_eq(record.config(), &shared));
    }

    #[test]
    fn test_list_all() {
        let registry = ModelRegistry::new();
        assert!(registry.list_all().is_empty());
        registry
            .register::<Counter>(config("postgres://host/stats"))
            .unwrap();
        let summaries = registry.list_all();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].model, "Counter");
        assert_eq!(summaries[0].connection_id, "stats");
    }
}
