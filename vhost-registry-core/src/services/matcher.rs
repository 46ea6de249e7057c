//! Pure host-to-record matching

use crate::traits::AliasResolver;
use crate::types::{normalize_hostname, DomainRecord, MatchType};

/// Resolves a raw host string against weight-ordered candidate records.
///
/// Passes, in order: exact hostname match, alias match via the resolver
/// predicate, fallback to the default record. The first hit in the
/// candidate order wins; the alias pass only runs when the exact pass found
/// nothing, so an exact match always beats an alias at any weight.
///
/// The returned clone carries the match classification; a fallback hit is
/// classified [`MatchType::None`] so callers can tell "resolved via
/// fallback" from a real match. Returns `None` when nothing matches and no
/// default exists, which callers must treat as a configuration error.
#[must_use]
pub fn match_host(
    host: &str,
    candidates: &[DomainRecord],
    aliases: &dyn AliasResolver,
    fallback: Option<&DomainRecord>,
) -> Option<DomainRecord> {
    let host = normalize_hostname(host);

    if let Some(record) = candidates.iter().find(|r| r.matches_hostname(&host)) {
        let mut record = record.clone();
        record.match_type = Some(MatchType::Exact);
        return Some(record);
    }

    if let Some(record) = candidates
        .iter()
        .find(|r| aliases.is_alias_of(&r.hostname, &host))
    {
        let mut record = record.clone();
        record.match_type = Some(MatchType::Alias);
        return Some(record);
    }

    fallback.map(|r| {
        let mut record = r.clone();
        record.match_type = Some(MatchType::None);
        record
    })
}
