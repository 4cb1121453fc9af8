//! Test helpers: local HTTP servers standing in for the geocoding service.

use std::sync::Arc;
use std::time::Duration;

use compass_map_lib::config::GeocoderConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};

pub const TEST_KEY: &str = "test-key";

/// A canned response server that accepts exactly one connection.
pub struct OneShotServer {
    pub config: GeocoderConfig,
    /// Request line received by the server, e.g. `GET /v1/forward?... HTTP/1.1`
    pub request_line: oneshot::Receiver<String>,
}

/// Serve `body` as `application/json` to the first client that connects.
pub async fn serve_once(body: &'static str) -> OneShotServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");

        let first_line = read_request_line(&mut socket).await;
        let _ = tx.send(first_line);
        write_json(&mut socket, body).await;
    });

    OneShotServer {
        config: GeocoderConfig {
            base_url: format!("http://{addr}/v1/forward"),
            access_key: TEST_KEY.to_string(),
        },
        request_line: rx,
    }
}

async fn read_request_line(socket: &mut TcpStream) -> String {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.expect("read request");
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
    }
    let text = String::from_utf8_lossy(&request);
    text.lines().next().unwrap_or_default().to_string()
}

async fn write_json(socket: &mut TcpStream, body: &str) {
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    socket
        .write_all(response.as_bytes())
        .await
        .expect("write response");
    let _ = socket.shutdown().await;
}

/// Config pointing at a local port nothing listens on.
pub async fn unreachable_config() -> GeocoderConfig {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    GeocoderConfig {
        base_url: format!("http://{addr}/v1/forward"),
        access_key: TEST_KEY.to_string(),
    }
}

/// A canned response for requests whose request line contains `marker`.
pub struct Route {
    pub marker: &'static str,
    pub body: &'static str,
    pub delay: Duration,
}

/// Server answering every connection concurrently, choosing the response by
/// route marker. Request lines are reported in the order they were read.
pub struct RoutedServer {
    pub config: GeocoderConfig,
    pub request_lines: mpsc::UnboundedReceiver<String>,
}

pub async fn serve_routes(routes: Vec<Route>) -> RoutedServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = mpsc::unbounded_channel();
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let routes = Arc::clone(&routes);
            let tx = tx.clone();

            tokio::spawn(async move {
                let first_line = read_request_line(&mut socket).await;
                let _ = tx.send(first_line.clone());

                let Some(route) = routes.iter().find(|r| first_line.contains(r.marker)) else {
                    return;
                };
                if !route.delay.is_zero() {
                    tokio::time::sleep(route.delay).await;
                }
                write_json(&mut socket, route.body).await;
            });
        }
    });

    RoutedServer {
        config: GeocoderConfig {
            base_url: format!("http://{addr}/v1/forward"),
            access_key: TEST_KEY.to_string(),
        },
        request_lines: rx,
    }
}
