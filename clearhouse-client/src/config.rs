//! Store client configuration

/// Configuration for connecting to the hosted table store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Project base URL (e.g. "https://abc.example.co")
    pub base_url: String,

    /// Project API key, sent on every request
    pub api_key: String,

    /// Bearer token; falls back to the API key until a user signs in
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl StoreConfig {
    /// Create a new configuration
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            token: None,
            timeout: 30,
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP table store from this configuration
    pub fn build(&self) -> super::HttpTableStore {
        super::HttpTableStore::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = StoreConfig::new("https://abc.example.co", "anon");
        assert_eq!(config.timeout, 30);
        assert!(config.token.is_none());

        let config = config.with_token("jwt").with_timeout(5);
        assert_eq!(config.token.as_deref(), Some("jwt"));
        assert_eq!(config.timeout, 5);
    }
}
