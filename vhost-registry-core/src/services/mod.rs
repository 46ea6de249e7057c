//! Business logic service layer

mod actions;
mod matcher;
mod negotiator;
mod registry;

pub use actions::ActionService;
pub use matcher::match_host;
pub use negotiator::DomainNegotiator;
pub use registry::DomainRegistry;

use std::sync::Arc;

use crate::traits::{AliasResolver, RecordStore};

/// Service context - holds all collaborator dependencies.
///
/// The platform layer creates this context and injects its storage and
/// alias configuration implementations.
pub struct ServiceContext {
    /// Record persistence store
    pub record_store: Arc<dyn RecordStore>,
    /// Alias equivalence configuration
    pub alias_resolver: Arc<dyn AliasResolver>,
}

impl ServiceContext {
    /// Creates a service context.
    #[must_use]
    pub fn new(record_store: Arc<dyn RecordStore>, alias_resolver: Arc<dyn AliasResolver>) -> Self {
        Self {
            record_store,
            alias_resolver,
        }
    }
}
