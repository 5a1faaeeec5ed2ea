/// Failure kinds a provider query can produce. The resolver treats every
/// variant the same way: the provider is down for this cycle.
#[derive(Debug)]
pub enum ProviderError {
    /// No credential configured, or the service rejected it.
    Unavailable(String),
    /// The request did not complete within the client timeout.
    Timeout(String),
    /// HTTP 429 from the provider.
    RateLimited,
    /// Unexpected status or a body that did not match the wire schema.
    Upstream(String),
}

impl ProviderError {
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Unavailable(_) => "unavailable",
            ProviderError::Timeout(_) => "timeout",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::Upstream(_) => "upstream_error",
        }
    }

    /// Map a transport-level failure onto the taxonomy.
    pub fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(err.to_string())
        } else {
            ProviderError::Upstream(err.to_string())
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ProviderError::Unavailable(detail) => write!(f, "Provider unavailable: {}", detail),
            ProviderError::Timeout(detail) => write!(f, "Provider timed out: {}", detail),
            ProviderError::RateLimited => write!(f, "Provider rate limited the request"),
            ProviderError::Upstream(detail) => write!(f, "Provider error: {}", detail),
        }
    }
}
