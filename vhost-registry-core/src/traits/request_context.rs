//! Transport layer abstraction

/// Ambient request data supplied by the transport layer.
///
/// Used by the negotiator when no host was set explicitly, and by the
/// derived URL accessors for the current request path.
pub trait RequestContext: Send + Sync {
    /// Raw host header of the current request, if any.
    fn http_host(&self) -> Option<String>;

    /// Path of the current request, e.g. `/user/1`.
    fn request_path(&self) -> String;
}

/// Fixed request context for embedding and tests.
#[derive(Debug, Clone)]
pub struct FixedRequestContext {
    host: Option<String>,
    path: String,
}

impl FixedRequestContext {
    /// Creates a context with a known host and path.
    #[must_use]
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            path: path.into(),
        }
    }

    /// Creates a context with no host header (e.g. an HTTP/1.0 request).
    #[must_use]
    pub fn hostless(path: impl Into<String>) -> Self {
        Self {
            host: None,
            path: path.into(),
        }
    }
}

impl RequestContext for FixedRequestContext {
    fn http_host(&self) -> Option<String> {
        self.host.clone()
    }

    fn request_path(&self) -> String {
        self.path.clone()
    }
}
