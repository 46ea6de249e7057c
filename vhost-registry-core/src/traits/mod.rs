//! Collaborator abstraction trait definitions

mod alias_resolver;
mod record_store;
mod request_context;

pub use alias_resolver::{AliasResolver, AliasTable, NoAliases};
pub use record_store::{InMemoryRecordStore, RecordStore};
pub use request_context::{FixedRequestContext, RequestContext};
