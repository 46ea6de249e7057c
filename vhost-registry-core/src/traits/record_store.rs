//! Record persistence abstraction

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CoreResult;
use crate::types::DomainRecord;

/// Domain record storage trait.
///
/// The store is transactional per record; multi-record atomicity (the
/// default swap) is the registry's own responsibility.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Loads the full set of records.
    async fn load(&self) -> CoreResult<Vec<DomainRecord>>;

    /// Saves one record (new or update).
    async fn save(&self, record: &DomainRecord) -> CoreResult<()>;

    /// Deletes one record by id.
    async fn delete(&self, id: &str) -> CoreResult<()>;
}

/// In-memory record store.
///
/// Default implementation, available on all platforms.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<HashMap<String, DomainRecord>>>,
}

impl InMemoryRecordStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn load(&self) -> CoreResult<Vec<DomainRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn save(&self, record: &DomainRecord) -> CoreResult<()> {
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
