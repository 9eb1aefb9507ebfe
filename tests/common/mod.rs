//! Shared helpers for integration tests

#![allow(dead_code)]

use fanout_logger::{LoggerError, Result, Transport};
use parking_lot::Mutex;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// A request received by [`Collector`]
#[derive(Debug, Clone)]
pub struct Received {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Minimal HTTP collector answering every request with a fixed status
pub struct Collector {
    pub url: String,
    received: Arc<Mutex<Vec<Received>>>,
}

impl Collector {
    pub fn start(status: u16, response_body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind collector");
        let addr = listener.local_addr().expect("local addr");
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let Some(request) = read_request(&mut stream) else {
                    continue;
                };
                sink.lock().push(request);

                let response = format!(
                    "HTTP/1.1 {} Status\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    response_body.len(),
                    response_body
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self {
            url: format!("http://{}/inputs/token/tag/tests", addr),
            received,
        }
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().clone()
    }

    /// Wait until at least `count` requests arrived
    pub fn wait_for(&self, count: usize, timeout: Duration) -> Vec<Received> {
        let start = std::time::Instant::now();
        while self.received.lock().len() < count && start.elapsed() < timeout {
            thread::sleep(Duration::from_millis(10));
        }
        self.received()
    }
}

fn read_request(stream: &mut std::net::TcpStream) -> Option<Received> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut content_length = 0usize;
    let mut content_type = None;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).ok()?;
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            let value = value.trim();
            match name.to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.parse().unwrap_or(0),
                "content-type" => content_type = Some(value.to_string()),
                _ => {}
            }
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).ok()?;

    Some(Received {
        method,
        path,
        content_type,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// In-process transport recording every post
#[derive(Default)]
pub struct RecordingTransport {
    pub posts: Mutex<Vec<(String, String)>>,
    pub delay: Duration,
    pub fail_with: Option<u16>,
}

impl RecordingTransport {
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn bodies(&self) -> Vec<String> {
        self.posts.lock().iter().map(|(_, body)| body.clone()).collect()
    }
}

impl Transport for RecordingTransport {
    fn post(&self, url: &str, body: &str) -> Result<()> {
        thread::sleep(self.delay);
        self.posts.lock().push((url.to_string(), body.to_string()));
        match self.fail_with {
            Some(status) => Err(LoggerError::remote_status(status, "rejected")),
            None => Ok(()),
        }
    }
}
