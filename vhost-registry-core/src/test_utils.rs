//! Test helper module
//!
//! Provides mock implementations and convenient test factory methods.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::{DomainNegotiator, DomainRegistry, ServiceContext};
use crate::traits::{AliasResolver, NoAliases, RecordStore, RequestContext};
use crate::types::DomainRecord;

// ===== MockRecordStore =====

pub struct MockRecordStore {
    records: RwLock<HashMap<String, DomainRecord>>,
    /// If Some, every save returns this error
    save_error: RwLock<Option<String>>,
    /// If Some(n), the next n saves succeed and the one after fails
    fail_after: RwLock<Option<u32>>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            save_error: RwLock::new(None),
            fail_after: RwLock::new(None),
        }
    }

    pub async fn set_save_error(&self, err: Option<String>) {
        *self.save_error.write().await = err;
    }

    pub async fn fail_after(&self, saves: u32) {
        *self.fail_after.write().await = Some(saves);
    }

    /// Seeds a record directly into the backing map, bypassing `save`.
    pub async fn insert(&self, record: DomainRecord) {
        self.records.write().await.insert(record.id.clone(), record);
    }

    /// Reads the persisted state of one record.
    pub async fn saved(&self, id: &str) -> Option<DomainRecord> {
        self.records.read().await.get(id).cloned()
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn load(&self) -> CoreResult<Vec<DomainRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn save(&self, record: &DomainRecord) -> CoreResult<()> {
        if let Some(ref msg) = *self.save_error.read().await {
            return Err(CoreError::Storage(msg.clone()));
        }
        let mut fail_after = self.fail_after.write().await;
        if let Some(remaining) = *fail_after {
            if remaining == 0 {
                return Err(CoreError::Storage("injected save failure".to_string()));
            }
            *fail_after = Some(remaining - 1);
        }
        drop(fail_after);

        self.records
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        self.records.write().await.remove(id);
        Ok(())
    }
}

// ===== Factory methods =====

/// Creates an enabled, non-default test record.
pub fn test_record(id: &str, hostname: &str, weight: i32) -> DomainRecord {
    DomainRecord::new(id.to_string(), hostname, weight)
}

/// Creates an empty registry over a mock store with no aliases.
pub fn create_test_registry() -> (Arc<DomainRegistry>, Arc<MockRecordStore>) {
    create_test_registry_with_aliases(Arc::new(NoAliases))
}

/// Creates an empty registry over a mock store with the given aliases.
pub fn create_test_registry_with_aliases(
    aliases: Arc<dyn AliasResolver>,
) -> (Arc<DomainRegistry>, Arc<MockRecordStore>) {
    let store = Arc::new(MockRecordStore::new());
    let ctx = Arc::new(ServiceContext::new(store.clone(), aliases));
    (Arc::new(DomainRegistry::new(ctx)), store)
}

/// Creates a registry pre-loaded with the given records.
pub async fn seeded_registry(
    records: Vec<DomainRecord>,
) -> (Arc<DomainRegistry>, Arc<MockRecordStore>) {
    let (registry, store) = create_test_registry();
    for record in records {
        store.insert(record).await;
    }
    registry.load().await.unwrap();
    (registry, store)
}

/// Creates a negotiator over a seeded registry and a fixed request context.
pub async fn seeded_negotiator(
    records: Vec<DomainRecord>,
    context: impl RequestContext + 'static,
) -> DomainNegotiator {
    let (registry, _store) = seeded_registry(records).await;
    DomainNegotiator::new(registry, Arc::new(context))
}
