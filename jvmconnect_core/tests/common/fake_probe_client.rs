//! A deterministic **in‑process stand‑in** for `jvmconnect_core::ProbeClient`.
//!
//! *  Script an answer per agent host with `answer(host, delay, outcome)`.
//! *  Hosts without a script behave like a closed port.
//! *  Every request the prober sent is kept in `requests` for assertions.
//!
//! It lets integration tests drive the real prober and registry (timeouts,
//! join-all, write-back) without opening a socket.

use std::{
    collections::HashMap,
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use jvmconnect_core::probe::{ProbeFailure, ProbeRequest, ProbeResponse};
use jvmconnect_core::ProbeClient;
use serde_json::{json, Value};

type Outcome = Result<ProbeResponse, ProbeFailure>;

#[derive(Default)]
pub struct FakeProbeClient {
    script: HashMap<String, (Duration, Outcome)>,
    /// Agent accepts only these credentials; anything else gets a 401.
    accepted: Option<(String, String)>,
    pub requests: Mutex<Vec<ProbeRequest>>,
}

impl FakeProbeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, host: &str, delay: Duration, outcome: Outcome) -> Self {
        self.script.insert(host.to_string(), (delay, outcome));
        self
    }

    pub fn accepting(mut self, username: &str, password: &str) -> Self {
        self.accepted = Some((username.to_string(), password.to_string()));
        self
    }

    pub fn sent(&self) -> Vec<ProbeRequest> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn ok() -> Outcome {
    Ok(ProbeResponse {
        body: json!({ "status": 200, "value": { "agent": "2.0.0" } }),
    })
}

pub fn status(code: u16) -> Outcome {
    Err(ProbeFailure::Http {
        status: code,
        body: None,
        headers: HashMap::new(),
    })
}

pub fn forbidden_with_body(body: Value) -> Outcome {
    Err(ProbeFailure::Http {
        status: 403,
        body: Some(body),
        headers: HashMap::new(),
    })
}

pub fn forbidden_with_header(reason: &str) -> Outcome {
    let headers = HashMap::from([("hawtio-forbidden-reason".to_string(), reason.to_string())]);
    Err(ProbeFailure::Http {
        status: 403,
        body: None,
        headers,
    })
}

pub fn refused() -> Outcome {
    Err(ProbeFailure::Transport("connection refused".into()))
}

#[async_trait]
impl ProbeClient for FakeProbeClient {
    async fn execute(&self, request: &ProbeRequest) -> Outcome {
        self.requests.lock().unwrap().push(request.clone());

        let host = request.url.host_str().unwrap_or_default().to_string();
        let Some((delay, outcome)) = self.script.get(&host).cloned() else {
            return refused();
        };
        tokio::time::sleep(delay).await;

        match (&self.accepted, &request.credentials) {
            (Some((user, pass)), Some(creds)) if outcome.is_ok() => {
                if &creds.username == user && &creds.password == pass {
                    outcome
                } else {
                    status(401)
                }
            }
            _ => outcome,
        }
    }
}
