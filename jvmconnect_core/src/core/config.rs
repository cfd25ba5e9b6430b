use std::time::Duration;

use serde::{Deserialize, Deserializer};
use url::Url;

/// Storage key the browser console keeps its connection list under.
pub const DEFAULT_STORAGE_KEY: &str = "jvmConnect";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_JOLOKIA_SUFFIX: &str = "/jolokia";

/// Settings for one [`Registry`](crate::core::registry::Registry).
///
/// Deserializes from e.g.
/// `{ "storageKey": "jvmConnect", "probeTimeoutMs": 3000, "pageUrl": "http://localhost:8080/hawtio/jvm/connect", "routePath": "/jvm/connect" }`
/// with every field optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistryConfig {
    /// Document the profile list lives under.
    pub storage_key: String,
    /// Ceiling for a single probe, including connect and response.
    #[serde(rename = "probeTimeoutMs", deserialize_with = "millis")]
    pub probe_timeout: Duration,
    /// URL of the page hosting the console. Drives default options,
    /// proxied connections and navigation.
    pub page_url: Option<Url>,
    /// In-app route part of `page_url`; everything before it is the context path.
    pub route_path: Option<String>,
    /// Appended to the context path by `default_options`.
    pub jolokia_suffix: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            page_url: None,
            route_path: None,
            jolokia_suffix: DEFAULT_JOLOKIA_SUFFIX.to_string(),
        }
    }
}

impl RegistryConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_page_url(mut self, url: Url) -> Self {
        self.page_url = Some(url);
        self
    }

    pub fn with_route_path(mut self, route: impl Into<String>) -> Self {
        self.route_path = Some(route.into());
        self
    }
}

fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_millis)
}
