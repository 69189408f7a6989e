//! Integration tests for [`HttpAuthenticator`] against a local HTTP server.
//!
//! The server is a bare `TcpListener` that reads one request, hands the
//! raw text back to the test, and answers with a canned body. That is
//! enough to check the form encoding and the response handling without
//! touching the real login server.

#![cfg(feature = "http")]

use showdown_session::{Authenticator, Credentials, HttpAuthenticator, SessionError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves exactly one request. Returns the URL to post to and a handle
/// yielding the raw request text.
async fn serve_once(response_body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("should accept");
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = stream.read(&mut chunk).await.expect("read");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if request_complete(&buf) {
                break;
            }
        }

        let reply = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            response_body.len(),
            response_body
        );
        stream.write_all(reply.as_bytes()).await.expect("write");
        stream.shutdown().await.ok();

        String::from_utf8(buf).expect("request should be utf-8")
    });

    (format!("http://{addr}/~~showdown/action.php"), handle)
}

/// `true` once the headers and a `content-length` worth of body are in.
fn request_complete(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let Some((head, body)) = text.split_once("\r\n\r\n") else {
        return false;
    };
    let length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    body.len() >= length
}

#[tokio::test]
async fn test_login_posts_form_and_returns_assertion() {
    let (url, server) =
        serve_once(r#"]{"actionsuccess":true,"assertion":"sig-for-bot"}"#).await;
    let auth = HttpAuthenticator::with_url(url);

    let assertion = auth
        .login("4|abc123", &Credentials::new("Bot", "p@ss word"))
        .await
        .expect("login should succeed");
    assert_eq!(assertion.as_str(), "sig-for-bot");

    let request = server.await.expect("server task");
    assert!(request.starts_with("POST /~~showdown/action.php"), "got: {request}");
    assert!(
        request
            .to_ascii_lowercase()
            .contains("content-type: application/x-www-form-urlencoded"),
        "got: {request}"
    );
    let body = request.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or("");
    assert_eq!(body, "act=login&name=Bot&pass=p%40ss+word&challstr=4%7Cabc123");
}

#[tokio::test]
async fn test_login_rejected_is_auth_failed() {
    let (url, _server) = serve_once(r#"]{"actionsuccess":false}"#).await;
    let auth = HttpAuthenticator::with_url(url);

    let result = auth.login("4|abc", &Credentials::new("Bot", "wrong")).await;

    assert!(
        matches!(result, Err(SessionError::AuthFailed(_))),
        "expected AuthFailed, got {result:?}"
    );
}

#[tokio::test]
async fn test_login_unreachable_server_is_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let auth = HttpAuthenticator::with_url(format!("http://{addr}/action.php"));

    let result = auth.login("4|abc", &Credentials::new("Bot", "x")).await;

    assert!(matches!(result, Err(SessionError::Http(_))));
}
