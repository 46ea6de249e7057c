//! Domain record registry

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::AliasResolver;
use crate::types::{normalize_hostname, validate_hostname, CreateDomainRequest, DomainRecord};

/// Process-wide registry of domain records.
///
/// Holds the in-memory record set behind a single lock; mutations hold the
/// write guard across the whole check-persist-commit sequence, so the
/// default swap is never observable half-done. A storage failure leaves the
/// in-memory state untouched.
pub struct DomainRegistry {
    ctx: Arc<ServiceContext>,
    records: RwLock<HashMap<String, DomainRecord>>,
}

impl DomainRegistry {
    /// Creates an empty registry over the given collaborators.
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            ctx,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Alias configuration handed to the matcher.
    #[must_use]
    pub fn alias_resolver(&self) -> Arc<dyn AliasResolver> {
        self.ctx.alias_resolver.clone()
    }

    /// Replaces the cache from the store (called at startup).
    pub async fn load(&self) -> CoreResult<usize> {
        let loaded = self.ctx.record_store.load().await?;
        let mut records = HashMap::with_capacity(loaded.len());
        for mut record in loaded {
            // match_type is negotiation-scoped and never valid on load
            record.match_type = None;
            records.insert(record.id.clone(), record);
        }
        let count = records.len();
        *self.records.write().await = records;
        log::info!("Loaded {count} domain records");
        Ok(count)
    }

    /// Candidate ordering rule: enabled records only, weight ascending,
    /// hostname ascending for ties.
    fn sorted_enabled(records: &HashMap<String, DomainRecord>) -> Vec<DomainRecord> {
        let mut enabled: Vec<DomainRecord> = records.values().filter(|r| r.status).cloned().collect();
        enabled.sort_by(|a, b| a.weight.cmp(&b.weight).then_with(|| a.hostname.cmp(&b.hostname)));
        enabled
    }

    /// Enabled records, sorted by weight then hostname.
    pub async fn all_enabled(&self) -> Vec<DomainRecord> {
        Self::sorted_enabled(&*self.records.read().await)
    }

    /// Looks a record up by id.
    pub async fn by_id(&self, id: &str) -> Option<DomainRecord> {
        self.records.read().await.get(id).cloned()
    }

    /// Case-insensitive exact hostname lookup.
    ///
    /// When an enabled and a disabled record carry the same hostname, the
    /// enabled one wins; only enabled hostnames are unique.
    pub async fn by_hostname(&self, host: &str) -> Option<DomainRecord> {
        let host = normalize_hostname(host);
        let records = self.records.read().await;
        records
            .values()
            .find(|r| r.status && r.matches_hostname(&host))
            .or_else(|| records.values().find(|r| r.matches_hostname(&host)))
            .cloned()
    }

    /// The enabled record flagged as default, if any.
    ///
    /// A disabled record never acts as default, so disabling the default
    /// leaves the registry without one until another record is promoted.
    pub async fn default_record(&self) -> Option<DomainRecord> {
        self.records
            .read()
            .await
            .values()
            .find(|r| r.status && r.is_default)
            .cloned()
    }

    /// Consistent negotiation snapshot: enabled candidates plus the default
    /// record, taken under one read guard.
    pub async fn negotiation_snapshot(&self) -> (Vec<DomainRecord>, Option<DomainRecord>) {
        let records = self.records.read().await;
        let enabled = Self::sorted_enabled(&records);
        let default = enabled.iter().find(|r| r.is_default).cloned();
        (enabled, default)
    }

    /// Registers a new record.
    ///
    /// The hostname is normalized and validated, and must not collide with
    /// an enabled record. The first record ever registered becomes the
    /// default.
    pub async fn create_record(&self, request: CreateDomainRequest) -> CoreResult<DomainRecord> {
        let hostname = normalize_hostname(&request.hostname);
        validate_hostname(&hostname)?;

        let mut records = self.records.write().await;
        if records.values().any(|r| r.status && r.matches_hostname(&hostname)) {
            return Err(CoreError::HostnameExists(hostname));
        }

        let mut record = DomainRecord::new(uuid::Uuid::new_v4().to_string(), &hostname, request.weight);
        record.https = request.https;
        record.is_default = records.is_empty();

        self.ctx.record_store.save(&record).await?;
        records.insert(record.id.clone(), record.clone());
        log::info!("Registered domain record {} ({})", record.id, record.hostname);
        Ok(record)
    }

    /// Deletes a record. The current default cannot be deleted; promote
    /// another record first.
    pub async fn delete_record(&self, id: &str) -> CoreResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .get(id)
            .ok_or_else(|| CoreError::RecordNotFound(id.to_string()))?;
        if record.is_default {
            return Err(CoreError::Validation(
                "The default domain record cannot be deleted".to_string(),
            ));
        }

        self.ctx.record_store.delete(id).await?;
        records.remove(id);
        log::info!("Deleted domain record {id}");
        Ok(())
    }

    /// Promotes a record to default, demoting the current default in the
    /// same conceptual transaction.
    ///
    /// The write guard spans both persists and the commit, so no reader
    /// ever observes zero or two defaults once one exists. The demotion is
    /// persisted first; if persisting the promotion fails, the demotion is
    /// compensated and the error surfaces with memory unchanged.
    pub async fn set_default(&self, id: &str) -> CoreResult<()> {
        let mut records = self.records.write().await;
        let target = records
            .get(id)
            .ok_or_else(|| CoreError::RecordNotFound(id.to_string()))?;
        if !target.status {
            return Err(CoreError::RecordDisabled(id.to_string()));
        }
        if target.is_default {
            return Ok(());
        }

        let mut promoted = target.clone();
        promoted.is_default = true;
        promoted.touch();

        let demoted = records
            .values()
            .find(|r| r.is_default)
            .map(|current| {
                let mut demoted = current.clone();
                demoted.is_default = false;
                demoted.touch();
                demoted
            });

        if let Some(ref demoted) = demoted {
            self.ctx.record_store.save(demoted).await?;
        }
        if let Err(e) = self.ctx.record_store.save(&promoted).await {
            if let Some(demoted) = demoted {
                let mut restored = demoted;
                restored.is_default = true;
                if let Err(rollback_err) = self.ctx.record_store.save(&restored).await {
                    log::error!(
                        "Failed to restore default flag on {} after aborted promotion: {rollback_err}",
                        restored.id
                    );
                }
            }
            return Err(e);
        }

        if let Some(demoted) = demoted {
            records.insert(demoted.id.clone(), demoted);
        }
        records.insert(promoted.id.clone(), promoted);
        log::info!("Domain record {id} set as default");
        Ok(())
    }

    /// Toggles a record's enabled state.
    ///
    /// Re-enabling fails with [`CoreError::HostnameExists`] when another
    /// enabled record took the hostname in the meantime; hostnames stay
    /// unique across enabled records. Disabling the current default is
    /// permitted and leaves the registry without a default; no other record
    /// is auto-promoted.
    pub async fn set_enabled(&self, id: &str, enabled: bool) -> CoreResult<()> {
        let mut records = self.records.write().await;
        let current = records
            .get(id)
            .ok_or_else(|| CoreError::RecordNotFound(id.to_string()))?;
        if current.status == enabled {
            return Ok(());
        }
        if enabled
            && records
                .values()
                .any(|r| r.id != current.id && r.status && r.matches_hostname(&current.hostname))
        {
            return Err(CoreError::HostnameExists(current.hostname.clone()));
        }

        let mut updated = current.clone();
        updated.status = enabled;
        updated.touch();

        self.ctx.record_store.save(&updated).await?;
        if !enabled && updated.is_default {
            log::warn!("Disabled the default domain record {id}; the registry now has no default");
        }
        records.insert(updated.id.clone(), updated);
        log::info!(
            "Domain record {id} {}",
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(())
    }

    /// Records the last HTTP status observed by the response prober.
    pub async fn set_response(&self, id: &str, status: u16) -> CoreResult<()> {
        let mut records = self.records.write().await;
        let current = records
            .get(id)
            .ok_or_else(|| CoreError::RecordNotFound(id.to_string()))?;

        let mut updated = current.clone();
        updated.response = Some(status);
        updated.touch();

        self.ctx.record_store.save(&updated).await?;
        records.insert(updated.id.clone(), updated);
        Ok(())
    }

    /// Number of records, enabled or not.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the registry holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
