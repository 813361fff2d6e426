//! One-shot HTTP responder for exercising `ApiClient` end to end.

use std::sync::Arc;
use std::time::Duration;
use reqwest::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;
use crate::domain::{Session, User};
use crate::session::{MemorySessionStorage, SessionClient, SessionService};
use super::ApiClient;

/// Serves a single request with `status` and a JSON `body`. The handle
/// resolves to the raw request text (head and body).
pub(crate) async fn serve_once(status: u16, body: &'static str) -> (Url, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let raw = read_request(&mut socket).await;
        let reason = StatusCode::from_u16(status).ok().and_then(|s| s.canonical_reason()).unwrap_or("Unknown");
        let response = format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        raw
    });
    (Url::parse(&format!("http://{addr}/api")).unwrap(), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// An `ApiClient` whose session holds `token`, or no session at all.
pub(crate) async fn api_client(url: Url, token: Option<&str>) -> (ApiClient, SessionClient) {
    let storage = match token {
        Some(token) => MemorySessionStorage::with_session(Session::new(User::new("u1", "Asha", "a@b.c"), token)),
        None => MemorySessionStorage::default(),
    };
    let (service, session) = SessionService::start(4, Arc::new(storage)).await;
    tokio::spawn(service.run());
    let client = ApiClient::new(url, Duration::from_secs(5), Arc::new(session.clone())).unwrap();
    (client, session)
}
