use std::time::Duration;

use log::{debug, warn};
use serde_json::Value;
use tokio::time::timeout;
use url::Url;

use super::client::{ProbeClient, ProbeFailure, ProbeRequest, ProbeResponse};
use super::verdict::ReachabilityVerdict;
use crate::core::config::DEFAULT_PROBE_TIMEOUT;
use crate::endpoint::connection_url;
use crate::storage::profile::ConnectionProfile;

/// Header newer consoles use to say why a request was forbidden.
pub const FORBIDDEN_REASON_HEADER: &str = "Hawtio-Forbidden-Reason";
pub const HOST_NOT_ALLOWED: &str = "HOST_NOT_ALLOWED";

/// Sends liveness and credential checks to remote agents.
///
/// Every call performs at most one request, bounded by the configured
/// timeout, and always resolves to a value.
pub struct Prober<C> {
    client: C,
    timeout: Duration,
    page_url: Option<Url>,
    route_path: Option<String>,
}

impl<C: ProbeClient> Prober<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            timeout: DEFAULT_PROBE_TIMEOUT,
            page_url: None,
            route_path: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Page the console runs on; needed for proxied and relative agent URLs.
    pub fn with_page(mut self, page_url: Option<Url>, route_path: Option<String>) -> Self {
        self.page_url = page_url;
        self.route_path = route_path;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn request_for(&self, profile: &ConnectionProfile) -> Option<ProbeRequest> {
        match connection_url(profile, self.page_url.as_ref(), self.route_path.as_deref()) {
            Ok(url) => Some(ProbeRequest::version(url)),
            Err(e) => {
                warn!("Connection '{}': cannot build agent URL: {}", profile.name, e);
                None
            }
        }
    }

    async fn send(&self, request: &ProbeRequest) -> Result<ProbeResponse, ProbeFailure> {
        match timeout(self.timeout, self.client.execute(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeFailure::Transport(format!(
                "no answer within {:?}",
                self.timeout
            ))),
        }
    }

    /// Checks whether the agent behind `profile` is there, without credentials.
    pub async fn probe(&self, profile: &ConnectionProfile) -> ReachabilityVerdict {
        let Some(request) = self.request_for(profile) else {
            return ReachabilityVerdict::failed();
        };

        let verdict = match self.send(&request).await {
            Ok(_) => ReachabilityVerdict::successful(),
            Err(failure) => classify(&failure),
        };
        debug!(
            "Probe of '{}' at {}: {}",
            profile.name, request.url, verdict
        );
        verdict
    }

    /// `true` only if the agent accepted `username`/`password`.
    ///
    /// Unlike [`probe`](Self::probe), a 401 or 403 here is a plain `false`.
    pub async fn check_credentials(
        &self,
        profile: &ConnectionProfile,
        username: &str,
        password: &str,
    ) -> bool {
        let Some(request) = self.request_for(profile) else {
            return false;
        };
        let request = request.with_credentials(username, password);

        match self.send(&request).await {
            Ok(_) => true,
            Err(failure) => {
                debug!(
                    "Credential check for '{}' as '{}' failed: {:?}",
                    profile.name,
                    username,
                    failure.status()
                );
                false
            }
        }
    }
}

/// Maps a failed exchange onto a verdict.
///
/// 401 and most 403s mean the agent exists and is guarding itself, which
/// counts as reachable. A 403 that names `HOST_NOT_ALLOWED` does not.
pub fn classify(failure: &ProbeFailure) -> ReachabilityVerdict {
    match failure.status() {
        Some(401) => ReachabilityVerdict::successful(),
        Some(403) if forbidden_reason_matches(failure, HOST_NOT_ALLOWED) => {
            ReachabilityVerdict::host_not_whitelisted()
        }
        Some(403) => ReachabilityVerdict::successful(),
        _ => ReachabilityVerdict::failed(),
    }
}

/// Older consoles report the reason in a JSON body, newer ones in a header.
/// The body wins when its reason is set to anything but `null`, `false`,
/// `0` or `""`.
fn forbidden_reason_matches(failure: &ProbeFailure, reason: &str) -> bool {
    if let Some(body_reason) = failure
        .body()
        .and_then(|body| body.get("reason"))
        .filter(|r| is_set(r))
    {
        return body_reason.as_str() == Some(reason);
    }
    failure.header(FORBIDDEN_REASON_HEADER) == Some(reason)
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
