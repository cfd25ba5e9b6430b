use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::Value;

use super::client::{ProbeClient, ProbeFailure, ProbeRequest, ProbeResponse};

/// [`ProbeClient`] over `reqwest`.
///
/// Redirects are not followed: a login redirect is not a reachable agent.
#[derive(Debug, Clone)]
pub struct HttpProbeClient {
    client: Client,
}

impl HttpProbeClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an already configured client (proxies, custom roots, ...).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn parse_body(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

#[async_trait]
impl ProbeClient for HttpProbeClient {
    async fn execute(&self, request: &ProbeRequest) -> Result<ProbeResponse, ProbeFailure> {
        let body = serde_json::to_vec(&request.body)
            .map_err(|e| ProbeFailure::Transport(format!("Unable to encode request: {e}")))?;
        let builder = self
            .client
            .post(request.url.clone())
            .header(CONTENT_TYPE, request.mime_type)
            .body(body);
        let builder = match &request.credentials {
            Some(creds) => builder.basic_auth(&creds.username, Some(&creds.password)),
            None => builder,
        };

        let resp = builder
            .send()
            .await
            .map_err(|e| ProbeFailure::Transport(e.to_string()))?;

        let status = resp.status();
        debug!("{} answered {}", request.url, status);

        if status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Ok(ProbeResponse {
                body: parse_body(&text).unwrap_or(Value::Null),
            });
        }

        let headers: HashMap<String, String> = resp
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let text = resp.text().await.unwrap_or_default();

        Err(ProbeFailure::Http {
            status: status.as_u16(),
            body: parse_body(&text),
            headers,
        })
    }
}
