//! Minimal HTTP/1.1 client over a raw TCP socket.

use std::net::SocketAddr;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Timeout for a single read.
#[allow(dead_code)]
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

fn request(path: &str, close: bool) -> String {
    let connection = if close { "close" } else { "keep-alive" };
    format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: {connection}\r\n\r\n")
}

/// Sends a GET and returns the status code and the body.
#[allow(dead_code)]
pub async fn get(addr: SocketAddr, path: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream
        .write_all(request(path, true).as_bytes())
        .await
        .expect("write request");

    let mut raw = String::new();
    tokio::time::timeout(READ_TIMEOUT, stream.read_to_string(&mut raw))
        .await
        .expect("response timed out")
        .expect("read response");

    let (head, body) = raw.split_once("\r\n\r\n").expect("header terminator");
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("status code");
    (status, body.to_owned())
}

/// GET returning a JSON body; panics unless the status is 200.
#[allow(dead_code)]
pub async fn get_json(addr: SocketAddr, path: &str) -> Value {
    let (status, body) = get(addr, path).await;
    assert_eq!(status, 200, "GET {path}: {body}");
    serde_json::from_str(&body).expect("JSON body")
}

/// An open `/events` connection.
pub struct EventStreamClient {
    reader: BufReader<TcpStream>,
}

#[allow(dead_code)]
impl EventStreamClient {
    /// Connects and consumes the response headers.
    pub async fn connect(addr: SocketAddr) -> Self {
        let mut stream = TcpStream::connect(addr).await.expect("connect");
        stream
            .write_all(request("/events", false).as_bytes())
            .await
            .expect("write request");

        let mut reader = BufReader::new(stream);
        let mut status = String::new();
        reader.read_line(&mut status).await.expect("status line");
        assert!(status.contains(" 200 "), "unexpected status: {status}");

        loop {
            let mut line = String::new();
            reader.read_line(&mut line).await.expect("header line");
            if line == "\r\n" {
                break;
            }
        }
        Self { reader }
    }

    /// Next `data:` payload, skipping chunk-size and `event:` lines.
    pub async fn next_data(&mut self) -> Option<Value> {
        loop {
            let mut line = String::new();
            let read = tokio::time::timeout(READ_TIMEOUT, self.reader.read_line(&mut line))
                .await
                .expect("timed out waiting for stream data")
                .ok()?;
            if read == 0 {
                return None;
            }
            if let Some(data) = line.trim_end().strip_prefix("data: ") {
                return Some(serde_json::from_str(data).expect("JSON data line"));
            }
        }
    }

    /// Next `event:` name.
    pub async fn next_event_name(&mut self) -> Option<String> {
        loop {
            let mut line = String::new();
            let read = tokio::time::timeout(READ_TIMEOUT, self.reader.read_line(&mut line))
                .await
                .expect("timed out waiting for stream data")
                .ok()?;
            if read == 0 {
                return None;
            }
            if let Some(name) = line.trim_end().strip_prefix("event: ") {
                return Some(name.to_owned());
            }
        }
    }

    /// Reads until the server closes the connection.
    pub async fn wait_closed(&mut self) {
        let mut rest = Vec::new();
        tokio::time::timeout(READ_TIMEOUT, self.reader.read_to_end(&mut rest))
            .await
            .expect("stream did not close")
            .expect("read to end");
    }
}
