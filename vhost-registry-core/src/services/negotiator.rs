//! Request-scoped active domain negotiation

use std::sync::Arc;

use url::Url;

use crate::error::{CoreError, CoreResult};
use crate::services::{match_host, DomainRegistry};
use crate::traits::RequestContext;
use crate::types::DomainRecord;

/// Resolves and caches the active domain record for one request.
///
/// Owned by a single request worker; the cache is request-scoped state and
/// is never shared across requests. Matching runs once per request and is
/// re-evaluated only on explicit reset or override.
pub struct DomainNegotiator {
    registry: Arc<DomainRegistry>,
    context: Arc<dyn RequestContext>,
    http_host: Option<String>,
    active: Option<DomainRecord>,
}

impl DomainNegotiator {
    /// Creates a negotiator for one request.
    #[must_use]
    pub fn new(registry: Arc<DomainRegistry>, context: Arc<dyn RequestContext>) -> Self {
        Self {
            registry,
            context,
            http_host: None,
            active: None,
        }
    }

    /// Stores the raw inbound host; does not trigger matching.
    pub fn set_http_host(&mut self, host: &str) {
        self.http_host = Some(host.to_string());
    }

    /// The raw inbound host, if one was stored or negotiated.
    #[must_use]
    pub fn http_host(&self) -> Option<&str> {
        self.http_host.as_deref()
    }

    /// Stores the request host and invalidates the cached record when the
    /// host changed or `reset` was requested.
    pub fn set_request_domain(&mut self, host: &str, reset: bool) {
        let changed = self.http_host.as_deref() != Some(host);
        self.http_host = Some(host.to_string());
        if reset || changed {
            self.active = None;
        }
    }

    /// Determines the hostname to negotiate with, deriving it from the
    /// transport context when none was set explicitly.
    fn negotiate_active_hostname(&mut self) -> CoreResult<String> {
        if self.http_host.is_none() {
            self.http_host = self.context.http_host();
        }
        self.http_host
            .clone()
            .ok_or_else(|| CoreError::UnresolvedHost("request carries no host header".to_string()))
    }

    /// The active domain record for this request.
    ///
    /// Cold cache (or `reset`): negotiates the hostname, matches it against
    /// a registry snapshot, caches and returns the result. Warm cache:
    /// returns the cached record without re-matching. Fails with
    /// [`CoreError::UnresolvedHost`] when nothing matches and no default
    /// record exists; that is a configuration error the caller must handle,
    /// never a silent pick.
    pub async fn get_active_domain(&mut self, reset: bool) -> CoreResult<DomainRecord> {
        if reset {
            self.active = None;
        }
        if let Some(ref active) = self.active {
            return Ok(active.clone());
        }

        let host = self.negotiate_active_hostname()?;
        let (candidates, fallback) = self.registry.negotiation_snapshot().await;
        let resolver = self.registry.alias_resolver();

        let record = match_host(&host, &candidates, resolver.as_ref(), fallback.as_ref())
            .ok_or_else(|| CoreError::UnresolvedHost(host.clone()))?;
        log::debug!(
            "Host {host} negotiated to record {} ({:?})",
            record.id,
            record.match_type
        );

        self.active = Some(record.clone());
        Ok(record)
    }

    /// Id of the cached active record, if resolved.
    #[must_use]
    pub fn get_active_id(&self) -> Option<String> {
        self.active.as_ref().map(|r| r.id.clone())
    }

    /// Explicit override: marks the given record active without matching.
    pub fn set_active_domain(&mut self, record: DomainRecord) {
        self.active = Some(record);
    }

    fn active(&self) -> CoreResult<&DomainRecord> {
        self.active
            .as_ref()
            .ok_or_else(|| CoreError::UnresolvedHost("no active domain resolved".to_string()))
    }

    /// Scheme of the active record, `http`/`https`, optionally with `://`.
    pub fn active_scheme(&self, add_suffix: bool) -> CoreResult<String> {
        Ok(self.active()?.scheme(add_suffix))
    }

    /// Base path of the active record, e.g. `http://one.example.com/`.
    pub fn active_path(&self) -> CoreResult<Url> {
        self.active()?.base_url()
    }

    /// Current request URL on the active record, using the ambient path.
    pub fn active_url(&self) -> CoreResult<Url> {
        self.active()?.url_for_path(&self.context.request_path())
    }

    /// Redirect code of the active record, when one is configured.
    pub fn active_redirect(&self) -> CoreResult<Option<u16>> {
        Ok(self.active()?.redirect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{seeded_negotiator, seeded_registry, test_record};
    use crate::traits::FixedRequestContext;
    use crate::types::MatchType;

    #[tokio::test]
    async fn negotiates_exact_match_from_context_host() {
        let mut negotiator = seeded_negotiator(
            vec![test_record("1", "one.example.com", 1)],
            FixedRequestContext::new("one.example.com", "/user/1"),
        )
        .await;

        let active = negotiator.get_active_domain(false).await.unwrap();
        assert_eq!(active.id, "1");
        assert_eq!(active.match_type, Some(MatchType::Exact));
        assert_eq!(negotiator.get_active_id(), Some("1".to_string()));
        assert_eq!(negotiator.http_host(), Some("one.example.com"));
    }

    #[tokio::test]
    async fn explicit_host_overrides_context() {
        let mut negotiator = seeded_negotiator(
            vec![
                test_record("1", "one.example.com", 1),
                test_record("2", "two.example.com", 2),
            ],
            FixedRequestContext::new("one.example.com", "/"),
        )
        .await;

        negotiator.set_request_domain("two.example.com", false);
        let active = negotiator.get_active_domain(false).await.unwrap();
        assert_eq!(active.id, "2");
    }

    #[tokio::test]
    async fn falls_back_to_default_with_none_classification() {
        let mut default = test_record("9", "default.example.com", 0);
        default.is_default = true;
        let mut negotiator = seeded_negotiator(
            vec![default, test_record("1", "one.example.com", 1)],
            FixedRequestContext::new("unknown.test", "/"),
        )
        .await;

        let active = negotiator.get_active_domain(false).await.unwrap();
        assert_eq!(active.id, "9");
        assert_eq!(active.match_type, Some(MatchType::None));
    }

    #[tokio::test]
    async fn no_match_and_no_default_is_a_configuration_error() {
        let mut negotiator = seeded_negotiator(
            vec![test_record("1", "one.example.com", 1)],
            FixedRequestContext::new("unknown.test", "/"),
        )
        .await;

        let result = negotiator.get_active_domain(false).await;
        assert!(matches!(result, Err(CoreError::UnresolvedHost(_))));
    }

    #[tokio::test]
    async fn missing_host_everywhere_is_unresolved() {
        let mut negotiator = seeded_negotiator(
            vec![test_record("1", "one.example.com", 1)],
            FixedRequestContext::hostless("/"),
        )
        .await;

        let result = negotiator.get_active_domain(false).await;
        assert!(matches!(result, Err(CoreError::UnresolvedHost(_))));
    }

    #[tokio::test]
    async fn cache_is_idempotent_until_reset() {
        let (registry, _store) = seeded_registry(vec![
            test_record("1", "one.example.com", 1),
            test_record("2", "two.example.com", 2),
        ])
        .await;
        let context = Arc::new(FixedRequestContext::new("one.example.com", "/"));
        let mut negotiator = DomainNegotiator::new(registry.clone(), context);

        let first = negotiator.get_active_domain(false).await.unwrap();
        assert_eq!(first.id, "1");

        // Mutating the registry does not disturb the request-scoped cache.
        registry.set_enabled("1", false).await.unwrap();
        let cached = negotiator.get_active_domain(false).await.unwrap();
        assert_eq!(cached.id, "1");

        // Explicit reset re-matches against the current registry state.
        registry.set_default("2").await.unwrap();
        let rematched = negotiator.get_active_domain(true).await.unwrap();
        assert_eq!(rematched.id, "2");
        assert_eq!(rematched.match_type, Some(MatchType::None));
    }

    #[tokio::test]
    async fn changing_the_request_host_invalidates_the_cache() {
        let mut negotiator = seeded_negotiator(
            vec![
                test_record("1", "one.example.com", 1),
                test_record("2", "two.example.com", 2),
            ],
            FixedRequestContext::new("one.example.com", "/"),
        )
        .await;

        assert_eq!(negotiator.get_active_domain(false).await.unwrap().id, "1");
        negotiator.set_request_domain("two.example.com", false);
        assert_eq!(negotiator.get_active_domain(false).await.unwrap().id, "2");
    }

    #[tokio::test]
    async fn set_active_domain_bypasses_matching() {
        let mut negotiator = seeded_negotiator(
            vec![test_record("1", "one.example.com", 1)],
            FixedRequestContext::new("one.example.com", "/"),
        )
        .await;

        negotiator.set_active_domain(test_record("7", "override.example.com", 0));
        let active = negotiator.get_active_domain(false).await.unwrap();
        assert_eq!(active.id, "7");
    }

    #[tokio::test]
    async fn derived_accessors_follow_the_active_record() {
        let mut record = test_record("1", "one.example.com", 1);
        record.https = true;
        record.set_redirect(301).unwrap();
        let mut negotiator = seeded_negotiator(
            vec![record],
            FixedRequestContext::new("one.example.com", "/user/1"),
        )
        .await;

        // Accessors require a resolved record.
        assert!(negotiator.active_url().is_err());

        negotiator.get_active_domain(false).await.unwrap();
        assert_eq!(negotiator.active_scheme(true).unwrap(), "https://");
        assert_eq!(negotiator.active_scheme(false).unwrap(), "https");
        assert_eq!(
            negotiator.active_path().unwrap().as_str(),
            "https://one.example.com/"
        );
        assert_eq!(
            negotiator.active_url().unwrap().as_str(),
            "https://one.example.com/user/1"
        );
        assert_eq!(negotiator.active_redirect().unwrap(), Some(301));
    }
}
