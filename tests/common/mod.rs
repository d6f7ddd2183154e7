//! Shared utilities for integration testing.

use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use client_resilience::config::ResilienceConfig;
use client_resilience::http::{ApiRequest, ClientError, ClientResult, HttpTransport, RawResponse};
use reqwest::header::HeaderValue;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A canned reply for the programmable backend.
#[allow(dead_code)]
pub struct MockReply {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

#[allow(dead_code)]
impl MockReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn header(mut self, name: &'static str, value: impl ToString) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the raw request head (request line + headers) and returns
/// the reply to send.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MockReply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]).to_string();

                        let reply = f(head).await;
                        let status_text = match reply.status {
                            200 => "200 OK",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            504 => "504 Gateway Timeout",
                            _ => "200 OK",
                        };

                        let mut response = format!("HTTP/1.1 {}\r\n", status_text);
                        for (name, value) in &reply.headers {
                            response.push_str(&format!("{}: {}\r\n", name, value));
                        }
                        response.push_str(&format!(
                            "Content-Type: application/json\r\n\
                             Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                            reply.body.len(),
                            reply.body
                        ));
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// In-memory transport that replays a script of responses.
///
/// Once the script runs out, the last entry is repeated.
#[allow(dead_code)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<ClientResult<RawResponse>>>,
    last: Mutex<Option<ClientResult<RawResponse>>>,
    calls: AtomicU32,
    seen: Mutex<Vec<ApiRequest>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new(script: Vec<ClientResult<RawResponse>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            calls: AtomicU32::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<ApiRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: &ApiRequest) -> ClientResult<RawResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.clone());

        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match next {
            Some(outcome) => {
                *last = Some(outcome.clone());
                outcome
            }
            None => last
                .clone()
                .unwrap_or_else(|| Err(ClientError::Transport("script is empty".into()))),
        }
    }
}

/// A 200 response with a JSON body.
#[allow(dead_code)]
pub fn ok_json(body: &str) -> ClientResult<RawResponse> {
    Ok(RawResponse::new(200, body))
}

/// A response carrying rate limit headers.
#[allow(dead_code)]
pub fn with_rate_limit(
    status: u16,
    body: &str,
    limit: u32,
    remaining: u32,
    reset: f64,
) -> ClientResult<RawResponse> {
    let mut response = RawResponse::new(status, body);
    response.headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
    response.headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
    response.headers.insert(
        "x-ratelimit-reset",
        HeaderValue::from_str(&reset.to_string()).unwrap(),
    );
    Ok(response)
}

/// A config with fast retries suitable for tests.
#[allow(dead_code)]
pub fn test_config() -> ResilienceConfig {
    let mut config = ResilienceConfig::default();
    config.rate_limit.limit = 100;
    config.rate_limit.window_secs = 1;
    config.retries.max_retries = 3;
    config.retries.base_delay_ms = 10;
    config.retries.max_delay_ms = 100;
    config.cache.default_ttl_secs = 60;
    config.cache.max_size = 10;
    config
}
