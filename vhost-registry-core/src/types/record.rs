//! Domain record type definitions

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CoreError, CoreResult};

/// Redirect codes a record may carry.
const VALID_REDIRECTS: &[u16] = &[301, 302];

/// How the negotiator resolved a record for the request host.
///
/// `None` marks a record that was picked as the fallback default, which
/// downstream logic (e.g. redirect suppression) treats differently from a
/// real match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Resolved via the fallback default record
    None,
    /// Hostname matched a record exactly
    Exact,
    /// Hostname matched through the alias table
    Alias,
}

/// One registered virtual host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    /// Stable opaque identifier, immutable after creation
    pub id: String,

    /// Canonical hostname, `host[:port]`, stored lower-case
    pub hostname: String,

    /// Sort key; lower sorts first
    #[serde(default)]
    pub weight: i32,

    /// Enabled flag
    pub status: bool,

    /// Default-record flag; at most one record carries it
    #[serde(default)]
    pub is_default: bool,

    /// Whether links to this host use https
    #[serde(default)]
    pub https: bool,

    /// Redirect code (301 or 302); when set, consumers must redirect
    /// rather than serve directly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<u16>,

    /// Last HTTP status observed by the external response prober
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<u16>,

    /// Set by the negotiator for the current request only; never persisted
    #[serde(skip)]
    pub match_type: Option<MatchType>,

    /// Open metadata, kept apart from the invariant-bearing fields
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub annotations: HashMap<String, String>,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl DomainRecord {
    /// Creates a new enabled, non-default record with a normalized hostname.
    #[must_use]
    pub fn new(id: String, hostname: &str, weight: i32) -> Self {
        let now = Utc::now();
        Self {
            id,
            hostname: normalize_hostname(hostname),
            weight,
            status: true,
            is_default: false,
            https: false,
            redirect: None,
            response: None,
            match_type: None,
            annotations: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive hostname comparison against a normalized host.
    #[must_use]
    pub fn matches_hostname(&self, host: &str) -> bool {
        self.hostname.eq_ignore_ascii_case(host)
    }

    /// Returns the link scheme, `https` or `http`, optionally with `://`.
    #[must_use]
    pub fn scheme(&self, add_suffix: bool) -> String {
        let scheme = if self.https { "https" } else { "http" };
        if add_suffix {
            format!("{scheme}://")
        } else {
            scheme.to_string()
        }
    }

    /// Base URL of the record, e.g. `http://one.example.com/`.
    pub fn base_url(&self) -> CoreResult<Url> {
        Url::parse(&format!("{}{}/", self.scheme(true), self.hostname))
            .map_err(|e| CoreError::Validation(format!("Invalid hostname URL: {e}")))
    }

    /// URL for a request path on this record, e.g. `http://one.example.com/user`.
    pub fn url_for_path(&self, path: &str) -> CoreResult<Url> {
        self.base_url()?
            .join(path.trim_start_matches('/'))
            .map_err(|e| CoreError::Validation(format!("Invalid request path: {e}")))
    }

    /// Sets a redirect code; only 301 and 302 are accepted.
    pub fn set_redirect(&mut self, code: u16) -> CoreResult<()> {
        if !VALID_REDIRECTS.contains(&code) {
            return Err(CoreError::Validation(format!(
                "Invalid redirect code: {code}. Must be one of: 301, 302"
            )));
        }
        self.redirect = Some(code);
        self.touch();
        Ok(())
    }

    /// Clears the redirect.
    pub fn clear_redirect(&mut self) {
        self.redirect = None;
        self.touch();
    }

    /// Refreshes the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Request payload for registering a new record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDomainRequest {
    pub hostname: String,

    #[serde(default)]
    pub weight: i32,

    #[serde(default)]
    pub https: bool,
}

/// Normalizes a host string: lower-case, one trailing dot stripped.
#[must_use]
pub fn normalize_hostname(host: &str) -> String {
    let mut host = host.trim().to_ascii_lowercase();
    if host.ends_with('.') {
        host.pop();
    }
    host
}

/// Validates a canonical `host[:port]` string.
///
/// Labels are non-empty, at most 63 chars of `[a-z0-9-]`, no leading or
/// trailing hyphen; the optional port is numeric. Expects already-normalized
/// (lower-case) input.
pub fn validate_hostname(hostname: &str) -> CoreResult<()> {
    let (host, port) = match hostname.rsplit_once(':') {
        Some((h, p)) => (h, Some(p)),
        None => (hostname, None),
    };

    if host.is_empty() || host.len() > 253 {
        return Err(CoreError::Validation(format!(
            "Invalid hostname length: '{hostname}'"
        )));
    }

    for label in host.split('.') {
        if label.is_empty() || label.len() > 63 {
            return Err(CoreError::Validation(format!(
                "Invalid hostname label in '{hostname}'"
            )));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(CoreError::Validation(format!(
                "Hostname label cannot start or end with '-': '{hostname}'"
            )));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(CoreError::Validation(format!(
                "Hostname may only contain lower-case letters, digits, dots and hyphens: '{hostname}'"
            )));
        }
    }

    if let Some(port) = port {
        if port.is_empty() || port.parse::<u16>().is_err() {
            return Err(CoreError::Validation(format!(
                "Invalid port in hostname: '{hostname}'"
            )));
        }
    }

    Ok(())
}
