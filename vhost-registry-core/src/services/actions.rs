//! Externally triggered registry actions

use std::sync::Arc;

use crate::services::DomainRegistry;
use crate::types::{ActionOutcome, DomainOperation};

/// Dispatches the `default` / `enable` / `disable` operations against a
/// single record and reports back to the caller.
///
/// Success is judged by reading the record's state after the mutation, and
/// every outcome directs the caller back to the registry overview. Failure
/// detail goes to the log; the caller only sees a generic notice.
pub struct ActionService {
    registry: Arc<DomainRegistry>,
}

impl ActionService {
    /// Creates an action service over the shared registry.
    #[must_use]
    pub fn new(registry: Arc<DomainRegistry>) -> Self {
        Self { registry }
    }

    /// Applies one operation, identified by its token, to the record `id`.
    pub async fn apply(&self, id: &str, op: &str) -> ActionOutcome {
        let Ok(op) = op.parse::<DomainOperation>() else {
            log::warn!("Rejected unknown domain operation '{op}' on record {id}");
            return ActionOutcome::failure("The operation failed.");
        };

        let result = match op {
            DomainOperation::Default => self.registry.set_default(id).await,
            DomainOperation::Enable => self.registry.set_enabled(id, true).await,
            DomainOperation::Disable => self.registry.set_enabled(id, false).await,
        };

        if let Err(e) = result {
            if e.is_expected() {
                log::warn!("Domain action '{op}' on record {id} failed: {e}");
            } else {
                log::error!("Domain action '{op}' on record {id} failed: {e}");
            }
            return ActionOutcome::failure("The operation failed.");
        }

        // Success is what the record reads afterwards, not what the
        // mutation reported.
        let verified = match self.registry.by_id(id).await {
            Some(record) => match op {
                DomainOperation::Default => record.is_default,
                DomainOperation::Enable => record.status,
                DomainOperation::Disable => !record.status,
            },
            None => false,
        };
        if !verified {
            log::warn!("Domain action '{op}' on record {id} did not take effect");
            return ActionOutcome::failure("The operation failed.");
        }

        log::info!("Domain action '{op}' applied to record {id}");
        match op {
            DomainOperation::Default => ActionOutcome::success("Domain record set as default"),
            DomainOperation::Enable => ActionOutcome::success("Domain record has been enabled."),
            DomainOperation::Disable => ActionOutcome::success("Domain record has been disabled."),
        }
    }
}
