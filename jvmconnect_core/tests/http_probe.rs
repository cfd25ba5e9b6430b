//! Drives `HttpProbeClient` against a real socket that answers once with a
//! canned HTTP response.

use jvmconnect_core::probe::verdict::{CONNECTION_FAILED, HOST_NOT_WHITELISTED};
use jvmconnect_core::{ConnectionProfile, HttpProbeClient, Prober};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
    time::{timeout, Duration},
};

mod common;
use common::init_test_logging;

/// Accepts one connection, answers with `response` and hands back the raw request.
async fn serve_once(response: String) -> (u16, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept should succeed");
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.expect("read should succeed");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request_complete(&request) {
                break;
            }
        }
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write should succeed");
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&request).into_owned()
    });

    (port, handle)
}

/// Headers received and, if announced, the whole body.
fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    raw.len() >= header_end + 4 + content_length
}

fn response(status_line: &str, extra_headers: &[&str], body: &str) -> String {
    let mut out = format!("HTTP/1.1 {status_line}\r\n");
    for header in extra_headers {
        out.push_str(header);
        out.push_str("\r\n");
    }
    out.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    ));
    out
}

fn local_agent(port: u16) -> ConnectionProfile {
    ConnectionProfile::new("local")
        .with_host("127.0.0.1")
        .with_port(port)
        .with_path("/jolokia")
}

fn prober() -> Prober<HttpProbeClient> {
    Prober::new(HttpProbeClient::new().expect("client should build"))
        .with_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn success_response_is_reachable_and_request_is_a_version_post() {
    init_test_logging();
    let (port, server) = serve_once(response(
        "200 OK",
        &["Content-Type: application/json"],
        r#"{"status":200,"value":{"agent":"1.7.2"}}"#,
    ))
    .await;

    let verdict = prober().probe(&local_agent(port)).await;
    let request = timeout(Duration::from_secs(5), server).await.unwrap().unwrap();

    assert!(verdict.ok);
    assert!(request.starts_with("POST /jolokia HTTP/1.1"), "got: {request}");
    assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
    assert!(request.contains(r#"{"type":"version"}"#));
    assert!(!request.to_ascii_lowercase().contains("authorization:"));
}

#[tokio::test]
async fn unauthorized_is_reachable() {
    let (port, _server) = serve_once(response(
        "401 Unauthorized",
        &["WWW-Authenticate: Basic realm=\"jolokia\""],
        "",
    ))
    .await;

    assert!(prober().probe(&local_agent(port)).await.ok);
}

#[tokio::test]
async fn forbidden_reason_header_means_not_whitelisted() {
    let (port, _server) = serve_once(response(
        "403 Forbidden",
        &["Hawtio-Forbidden-Reason: HOST_NOT_ALLOWED"],
        "",
    ))
    .await;

    let verdict = prober().probe(&local_agent(port)).await;

    assert!(!verdict.ok);
    assert_eq!(verdict.message, HOST_NOT_WHITELISTED);
}

#[tokio::test]
async fn forbidden_reason_body_means_not_whitelisted() {
    let (port, _server) = serve_once(response(
        "403 Forbidden",
        &["Content-Type: application/json"],
        r#"{"reason":"HOST_NOT_ALLOWED"}"#,
    ))
    .await;

    let verdict = prober().probe(&local_agent(port)).await;

    assert_eq!(verdict.message, HOST_NOT_WHITELISTED);
}

#[tokio::test]
async fn plain_forbidden_is_reachable() {
    let (port, _server) = serve_once(response("403 Forbidden", &[], "denied")).await;

    assert!(prober().probe(&local_agent(port)).await.ok);
}

#[tokio::test]
async fn server_error_fails() {
    let (port, _server) = serve_once(response("500 Internal Server Error", &[], "boom")).await;

    let verdict = prober().probe(&local_agent(port)).await;

    assert_eq!(verdict.message, CONNECTION_FAILED);
}

#[tokio::test]
async fn redirect_is_not_followed_and_fails() {
    let (port, _server) = serve_once(response(
        "302 Found",
        &["Location: http://127.0.0.1:1/login"],
        "",
    ))
    .await;

    assert!(!prober().probe(&local_agent(port)).await.ok);
}

#[tokio::test]
async fn closed_port_fails() {
    // Grab a free port, then release it so nothing listens there.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let verdict = prober().probe(&local_agent(port)).await;

    assert!(!verdict.ok);
    assert_eq!(verdict.message, CONNECTION_FAILED);
}

#[tokio::test]
async fn credentials_travel_as_basic_auth() {
    let (port, server) = serve_once(response("200 OK", &[], r#"{"status":200}"#)).await;

    let accepted = prober()
        .check_credentials(&local_agent(port), "admin", "admin")
        .await;
    let request = timeout(Duration::from_secs(5), server).await.unwrap().unwrap();

    assert!(accepted);
    // base64("admin:admin")
    assert!(
        request.contains("YWRtaW46YWRtaW4="),
        "basic auth header missing in: {request}"
    );
}

#[tokio::test]
async fn rejected_credentials_are_false() {
    let (port, _server) = serve_once(response("401 Unauthorized", &[], "")).await;

    assert!(
        !prober()
            .check_credentials(&local_agent(port), "admin", "wrong")
            .await
    );
}
