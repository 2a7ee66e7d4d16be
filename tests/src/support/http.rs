//! Minimal HTTP/1.1 listener standing in for the vCPE manager.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Respond { status: u16, body: &'static str },
    /// Read the request, never answer.
    Hang,
}

pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    task: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(behavior: Behavior) -> anyhow::Result<Self> {
        let listener: TcpListener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let requests: Arc<Mutex<Vec<CapturedRequest>>> = Arc::new(Mutex::new(Vec::new()));

        let captured = requests.clone();
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let captured = captured.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, behavior, captured).await;
                });
            }
        });

        Ok(Self { addr, requests, task })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<CapturedRequest> {
        self.requests().into_iter().filter(|r| r.method == "POST").collect()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Address on which nothing listens.
pub async fn refused_url() -> anyhow::Result<String> {
    let listener: TcpListener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

async fn serve(
    mut stream: TcpStream,
    behavior: Behavior,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
) -> anyhow::Result<()> {
    let request: CapturedRequest = read_request(&mut stream).await?;
    captured.lock().unwrap().push(request);

    match behavior {
        Behavior::Respond { status, body } => {
            let response: String = format!(
                "HTTP/1.1 {status} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                reason(status),
                body.len()
            );
            stream.write_all(response.as_bytes()).await?;
            stream.shutdown().await?;
        }
        Behavior::Hang => {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
    }
    Ok(())
}

async fn read_request(stream: &mut TcpStream) -> anyhow::Result<CapturedRequest> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut chunk: [u8; 1024] = [0; 1024];

    let header_end: usize = loop {
        if let Some(pos) = find(&buffer, b"\r\n\r\n") {
            break pos + 4;
        }
        let read: usize = stream.read(&mut chunk).await?;
        anyhow::ensure!(read > 0, "connection closed before headers");
        buffer.extend_from_slice(&chunk[..read]);
    };

    let head: String = String::from_utf8_lossy(&buffer[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line: &str = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method: String = parts.next().unwrap_or_default().to_string();
    let path: String = parts.next().unwrap_or_default().to_string();

    let mut content_type: Option<String> = None;
    let mut content_length: usize = 0;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        match name.trim().to_ascii_lowercase().as_str() {
            "content-type" => content_type = Some(value.trim().to_string()),
            "content-length" => content_length = value.trim().parse()?,
            _ => {}
        }
    }

    while buffer.len() < header_end + content_length {
        let read: usize = stream.read(&mut chunk).await?;
        anyhow::ensure!(read > 0, "connection closed before body");
        buffer.extend_from_slice(&chunk[..read]);
    }
    let body: String =
        String::from_utf8_lossy(&buffer[header_end..header_end + content_length]).into_owned();

    Ok(CapturedRequest {
        method,
        path,
        content_type,
        body,
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
