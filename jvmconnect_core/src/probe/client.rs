use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};
use url::Url;

pub const JSON_MIME_TYPE: &str = "application/json";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// One POST to a remote agent.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub url: Url,
    pub mime_type: &'static str,
    pub credentials: Option<Credentials>,
    pub body: Value,
}

impl ProbeRequest {
    /// A Jolokia `version` request: read-only and cheap on every agent.
    pub fn version(url: Url) -> Self {
        Self {
            url,
            mime_type: JSON_MIME_TYPE,
            credentials: None,
            body: json!({ "type": "version" }),
        }
    }

    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        });
        self
    }
}

/// A 2xx answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResponse {
    /// Parsed JSON body, `Value::Null` when the body was not JSON.
    pub body: Value,
}

/// Anything that is not a 2xx answer.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeFailure {
    /// The agent answered with a non-success status.
    Http {
        status: u16,
        body: Option<Value>,
        /// Header names are lower-case.
        headers: HashMap<String, String>,
    },
    /// No usable answer: refused, DNS, TLS, timeout, reset.
    Transport(String),
}

impl ProbeFailure {
    pub fn status(&self) -> Option<u16> {
        match self {
            ProbeFailure::Http { status, .. } => Some(*status),
            ProbeFailure::Transport(_) => None,
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        match self {
            ProbeFailure::Http { headers, .. } => headers
                .get(&name.to_ascii_lowercase())
                .map(String::as_str),
            ProbeFailure::Transport(_) => None,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            ProbeFailure::Http { body, .. } => body.as_ref(),
            ProbeFailure::Transport(_) => None,
        }
    }
}

/// Speaks the agent's JSON-over-HTTP protocol for exactly one exchange.
#[async_trait]
pub trait ProbeClient: Send + Sync {
    async fn execute(&self, request: &ProbeRequest) -> Result<ProbeResponse, ProbeFailure>;
}

#[async_trait]
impl<T: ProbeClient + ?Sized> ProbeClient for std::sync::Arc<T> {
    async fn execute(&self, request: &ProbeRequest) -> Result<ProbeResponse, ProbeFailure> {
        (**self).execute(request).await
    }
}
