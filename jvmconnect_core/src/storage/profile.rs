use serde::de::{Error as _, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A user-named connection to a remote Jolokia agent.
///
/// Keys are camelCase so stored documents look like:
/// `{ "name":"broker", "scheme":"https", "host":"mq1", "port":8778, "path":"/jolokia" }`
///
/// Keys this type does not know about are kept in `extra` and written back
/// unchanged on save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionProfile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Older consoles stored the port as text; both forms load.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "port")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Full agent URL. Takes precedence over scheme/host/port/path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jolokia_url: Option<String>,
    /// Reach the agent through the hosting console's `/proxy` endpoint.
    #[serde(
        default,
        skip_serializing_if = "std::ops::Not::not",
        deserialize_with = "null_as_default"
    )]
    pub use_proxy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Result of the last probe. `None` until probed; never stored.
    #[serde(default, skip_serializing, deserialize_with = "discard")]
    pub reachable: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConnectionProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn with_jolokia_url(mut self, url: impl Into<String>) -> Self {
        self.jolokia_url = Some(url.into());
        self
    }

    /// Returns the unique, human-readable identifier.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Stored documents keep explicit `null`s for fields that were never set.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredPort {
    Number(u16),
    Text(String),
}

fn port<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u16>, D::Error> {
    match Option::<StoredPort>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StoredPort::Number(port)) => Ok(Some(port)),
        Some(StoredPort::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(StoredPort::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid port '{text}'"))),
    }
}

/// Consumes a stored `reachable` value so it neither loads nor lands in `extra`.
fn discard<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    IgnoredAny::deserialize(deserializer)?;
    Ok(None)
}
