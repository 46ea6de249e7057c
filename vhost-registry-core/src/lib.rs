//! Virtual Host Registry Core Library
//!
//! Provides the core logic for virtual host management, including:
//! - Domain record registry with a single-default invariant (`DomainRegistry`)
//! - Per-request host negotiation (`DomainNegotiator`)
//! - Admin action dispatch (`ActionService`)
//!
//! The library is platform-independent: persistence, alias configuration
//! and the transport layer are abstracted through traits and injected by
//! the embedding application.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{ActionService, DomainNegotiator, DomainRegistry, ServiceContext};
pub use traits::{AliasResolver, RecordStore, RequestContext};
pub use types::{DomainRecord, MatchType};
