//! HttpSource against a throwaway local HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use dinocrack_core::{FetchConfig, PasswordSource};
use dinocrack_fetch::{FetchError, HttpSource};

/// Every third request gets a 500, the rest a fresh password.
/// Requests to `/hang` never get an answer.
async fn spawn_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let counter = Arc::clone(&counter);
            tokio::spawn(handle(stream, counter));
        }
    });
    addr
}

async fn handle(mut stream: TcpStream, counter: Arc<AtomicUsize>) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let head = String::from_utf8_lossy(&request);
    if head.starts_with("GET /hang") {
        tokio::time::sleep(Duration::from_secs(60)).await;
        return;
    }
    let n = counter.fetch_add(1, Ordering::SeqCst);
    let (status, body) = if head.starts_with("GET /empty") {
        ("200 OK", "  \n".to_string())
    } else if n % 3 == 2 {
        ("500 Internal Server Error", "oops".to_string())
    } else {
        ("200 OK", format!("wildL!on{:02}\n", n % 100))
    };
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn source(addr: SocketAddr, path: &str) -> HttpSource {
    let config = FetchConfig {
        url: format!("http://{addr}{path}"),
        workers: 3,
        ..FetchConfig::default()
    };
    HttpSource::new(&config).unwrap()
}

#[tokio::test]
async fn non_200_responses_count_as_failures() {
    let addr = spawn_server().await;
    let outcome = source(addr, "/password/strong").fetch(6).await;

    assert_eq!(outcome.passwords.len(), 4);
    assert_eq!(outcome.failed, 2);
    assert!(!outcome.timed_out);
    assert!(outcome.passwords.iter().all(|p| p.starts_with("wildL!on")));
}

#[tokio::test]
async fn fetch_one_reports_status() {
    let addr = spawn_server().await;
    let source = source(addr, "/password/strong");

    assert!(source.fetch_one().await.is_ok());
    assert!(source.fetch_one().await.is_ok());
    assert!(matches!(
        source.fetch_one().await,
        Err(FetchError::Status(status)) if status.as_u16() == 500
    ));
}

#[tokio::test]
async fn blank_body_is_a_failure() {
    let addr = spawn_server().await;
    let outcome = source(addr, "/empty").fetch(2).await;
    assert!(outcome.passwords.is_empty());
    assert_eq!(outcome.failed, 2);
}

#[tokio::test]
async fn request_timeout_counts_as_failure() {
    let addr = spawn_server().await;
    let source = source(addr, "/hang")
        .with_timeouts(Duration::from_millis(200), Duration::from_secs(10));
    let outcome = source.fetch(2).await;
    assert_eq!(outcome.failed, 2);
    assert!(!outcome.timed_out);
}

#[tokio::test]
async fn collector_gives_up_when_nothing_arrives() {
    let addr = spawn_server().await;
    let source = source(addr, "/hang")
        .with_timeouts(Duration::from_secs(30), Duration::from_millis(200));
    let outcome = source.fetch(3).await;
    assert!(outcome.timed_out);
    assert!(outcome.passwords.is_empty());
    assert_eq!(outcome.failed, 0);
}
