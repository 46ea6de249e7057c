//! Hostname alias equivalence abstraction

use std::collections::HashMap;

use regex::Regex;

use crate::error::{CoreError, CoreResult};
use crate::types::normalize_hostname;

/// Alias equivalence predicate consumed by the matcher.
///
/// The alias table itself is registry configuration; the matcher only needs
/// the boolean answer.
pub trait AliasResolver: Send + Sync {
    /// Whether `host` counts as an alias of the record registered under
    /// `candidate_hostname`. Both inputs are normalized hostnames.
    fn is_alias_of(&self, candidate_hostname: &str, host: &str) -> bool;
}

/// Null resolver: no hostname has aliases.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAliases;

impl AliasResolver for NoAliases {
    fn is_alias_of(&self, _candidate_hostname: &str, _host: &str) -> bool {
        false
    }
}

/// Pattern table keyed by canonical hostname.
///
/// Patterns are hostname literals with `*` wildcards, e.g. `*.example.com`
/// or `example.com:*`, compiled to anchored regexes at registration time.
#[derive(Debug, Default)]
pub struct AliasTable {
    patterns: HashMap<String, Vec<Regex>>,
}

impl AliasTable {
    /// Creates an empty alias table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an alias pattern for a canonical hostname.
    pub fn add_alias(&mut self, hostname: &str, pattern: &str) -> CoreResult<()> {
        let pattern = normalize_hostname(pattern);
        if pattern.is_empty() {
            return Err(CoreError::Validation(
                "Alias pattern cannot be empty".to_string(),
            ));
        }

        let regex = format!("^{}$", regex::escape(&pattern).replace(r"\*", "[a-z0-9.:-]*"));
        let regex = Regex::new(&regex)
            .map_err(|e| CoreError::Validation(format!("Invalid alias pattern '{pattern}': {e}")))?;

        self.patterns
            .entry(normalize_hostname(hostname))
            .or_default()
            .push(regex);
        Ok(())
    }
}

impl AliasResolver for AliasTable {
    fn is_alias_of(&self, candidate_hostname: &str, host: &str) -> bool {
        self.patterns
            .get(candidate_hostname)
            .is_some_and(|patterns| patterns.iter().any(|p| p.is_match(host)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_aliases_never_matches() {
        assert!(!NoAliases.is_alias_of("a.example.com", "a.example.com"));
    }

    #[test]
    fn literal_alias_matches() {
        let mut table = AliasTable::new();
        table.add_alias("a.example.com", "a.example.org").unwrap();

        assert!(table.is_alias_of("a.example.com", "a.example.org"));
        assert!(!table.is_alias_of("a.example.com", "b.example.org"));
        assert!(!table.is_alias_of("b.example.com", "a.example.org"));
    }

    #[test]
    fn port_wildcard_matches_any_port() {
        let mut table = AliasTable::new();
        table.add_alias("a.example.com", "a.example.com:*").unwrap();

        assert!(table.is_alias_of("a.example.com", "a.example.com:8080"));
        assert!(table.is_alias_of("a.example.com", "a.example.com:443"));
        assert!(!table.is_alias_of("a.example.com", "b.example.com:8080"));
    }

    #[test]
    fn subdomain_wildcard_matches() {
        let mut table = AliasTable::new();
        table.add_alias("example.com", "*.example.com").unwrap();

        assert!(table.is_alias_of("example.com", "www.example.com"));
        assert!(table.is_alias_of("example.com", "a.b.example.com"));
        assert!(!table.is_alias_of("example.com", "example.org"));
    }

    #[test]
    fn empty_pattern_is_rejected() {
        let mut table = AliasTable::new();
        assert!(table.add_alias("example.com", "").is_err());
    }
}
