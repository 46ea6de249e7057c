//! Type definitions module

mod operation;
mod record;

pub use operation::{ActionOutcome, DomainOperation, OVERVIEW_ROUTE};
pub use record::{
    normalize_hostname, validate_hostname, CreateDomainRequest, DomainRecord, MatchType,
};
