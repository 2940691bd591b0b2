//! Shared utilities for integration testing.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One scripted reply from the mock agent.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub index: Option<String>,
    pub body: String,
}

impl MockReply {
    pub fn ok(index: u64, body: impl Into<String>) -> Self {
        Self {
            status: 200,
            index: Some(index.to_string()),
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            index: None,
            body: String::new(),
        }
    }
}

/// A programmable stand-in for a Consul agent.
///
/// Replies are served in order. Once the script is exhausted the connection is
/// held open without an answer, like a blocking query with nothing to report.
pub struct MockConsul {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockConsul {
    /// Request lines received so far, e.g. `GET /v1/kv/service/hello/language?index=1&wait=300s`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

pub async fn start_mock_consul(script: Vec<MockReply>) -> MockConsul {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let script = Arc::new(Mutex::new(VecDeque::from(script)));
    let requests = Arc::new(Mutex::new(Vec::new()));

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            let (socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };
            let script = script.clone();
            let recorded = recorded.clone();
            tokio::spawn(async move {
                serve_connection(socket, script, recorded).await;
            });
        }
    });

    MockConsul { addr, requests }
}

async fn serve_connection(
    mut socket: TcpStream,
    script: Arc<Mutex<VecDeque<MockReply>>>,
    recorded: Arc<Mutex<Vec<String>>>,
) {
    loop {
        let Some(request_line) = read_request_head(&mut socket).await else {
            return;
        };
        recorded.lock().unwrap().push(request_line);

        let reply = script.lock().unwrap().pop_front();
        let Some(reply) = reply else {
            // Hold the long poll open until the client gives up
            std::future::pending::<()>().await;
            return;
        };

        let mut response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n",
            reply.status,
            reason(reply.status),
            reply.body.len()
        );
        if let Some(index) = &reply.index {
            response.push_str(&format!("X-Consul-Index: {}\r\n", index));
        }
        response.push_str("\r\n");
        response.push_str(&reply.body);

        if socket.write_all(response.as_bytes()).await.is_err() {
            return;
        }
    }
}

/// Read up to the end of the request headers and return the request line.
async fn read_request_head(socket: &mut TcpStream) -> Option<String> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.ok()?;
        if n == 0 {
            return None;
        }
        head.extend_from_slice(&buf[..n]);
    }
    let text = String::from_utf8_lossy(&head);
    text.lines().next().map(|line| {
        // "GET /path HTTP/1.1" -> "GET /path"
        line.rsplit_once(' ').map(|(req, _)| req).unwrap_or(line).to_string()
    })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
