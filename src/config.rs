//! Client configuration.

/// How the client reaches the backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL prefixed to every endpoint path (no trailing slash).
    pub base_url: String,
    /// Use the in-memory mock backend instead of the live API.
    pub use_mock: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            use_mock: false,
        }
    }
}

impl ClientConfig {
    /// Read configuration from the environment.
    ///
    /// `TASKDECK_API_URL` sets the base URL; `TASKDECK_USE_MOCK=true` (or
    /// `1`) selects the mock backend for development without a server.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = std::env::var("TASKDECK_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);
        let use_mock = std::env::var("TASKDECK_USE_MOCK")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        Self { base_url, use_mock }
    }

    /// Builder: point at a different base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builder: toggle mock mode.
    pub fn with_mock(mut self, use_mock: bool) -> Self {
        self.use_mock = use_mock;
        self
    }
}
