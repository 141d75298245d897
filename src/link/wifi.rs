//! # WiFi Link Module
//!
//! Talks to the robot through its WiFi adapter's HTTP endpoint.
//!
//! Each command is a `POST /action` with a form body `cmd=<token>`, sent on
//! its own connection. That connect doubles as the connectivity gate: an
//! unreachable adapter makes the send fail with
//! [`BridgeError::NotConnected`] without retrying.

use async_trait::async_trait;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use super::RobotLink;
use crate::controller::{ActionCommand, Direction, Gait};
use crate::error::{BridgeError, Result};
use crate::opencat::encoder::{encode_action, encode_direction};
use crate::opencat::protocol::{WIFI_ACTION_PATH, WIFI_COMMAND_FIELD};

/// WiFi link to the robot's HTTP adapter
#[derive(Debug, Clone)]
pub struct WifiLink {
    address: SocketAddr,
    connect_timeout: Duration,
}

/// Extracts the status code from an HTTP status line
fn parse_status(line: &str) -> Option<u16> {
    let mut parts = line.split_whitespace();
    let version = parts.next()?;
    if !version.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}

/// Builds the HTTP request carrying a command token
fn build_request(host: &IpAddr, token: &str) -> String {
    let body = format!("{}={}", WIFI_COMMAND_FIELD, token);
    format!(
        "POST {} HTTP/1.1\r\nHost: {}\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        WIFI_ACTION_PATH,
        host,
        body.len(),
        body
    )
}

impl WifiLink {
    /// Create a link to the adapter at `address:port`
    ///
    /// No connection is made until the first send.
    ///
    /// # Examples
    ///
    /// ```
    /// use bittle_bridge::link::wifi::WifiLink;
    /// use std::time::Duration;
    ///
    /// let link = WifiLink::new("192.168.1.138".parse().unwrap(), 80, Duration::from_secs(2));
    /// assert_eq!(link.address().port(), 80);
    /// ```
    #[must_use]
    pub fn new(address: IpAddr, port: u16, connect_timeout: Duration) -> Self {
        Self {
            address: SocketAddr::new(address, port),
            connect_timeout,
        }
    }

    /// Get the adapter socket address
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    async fn connect(&self) -> Option<TcpStream> {
        match timeout(self.connect_timeout, TcpStream::connect(self.address)).await {
            Ok(Ok(stream)) => Some(stream),
            Ok(Err(e)) => {
                debug!("WiFi adapter {} unreachable: {}", self.address, e);
                None
            }
            Err(_) => {
                debug!("WiFi adapter {} did not answer within {:?}", self.address, self.connect_timeout);
                None
            }
        }
    }

    async fn send_token(&mut self, token: &str) -> Result<()> {
        let stream = self.connect().await.ok_or(BridgeError::NotConnected)?;
        let mut stream = BufReader::new(stream);

        let request = build_request(&self.address.ip(), token);
        stream
            .get_mut()
            .write_all(request.as_bytes())
            .await
            .map_err(|e| BridgeError::Link(format!("Failed to send request: {}", e)))?;

        let mut status_line = String::new();
        stream
            .read_line(&mut status_line)
            .await
            .map_err(|e| BridgeError::Link(format!("Failed to read response: {}", e)))?;

        match parse_status(&status_line) {
            Some(code) if (200..300).contains(&code) => {
                debug!("Sent '{}' over WiFi (HTTP {})", token, code);
                Ok(())
            }
            Some(code) => Err(BridgeError::Link(format!("Robot rejected '{}' with HTTP {}", token, code))),
            None => Err(BridgeError::Link(format!(
                "Malformed response: {:?}",
                status_line.trim_end()
            ))),
        }
    }
}

#[async_trait]
impl RobotLink for WifiLink {
    async fn is_connected(&mut self) -> bool {
        self.connect().await.is_some()
    }

    async fn send_action(&mut self, action: ActionCommand) -> Result<()> {
        self.send_token(&encode_action(action)).await
    }

    async fn send_direction(&mut self, direction: Direction, gait: Gait) -> Result<()> {
        self.send_token(&encode_direction(direction, gait)).await
    }

    async fn shutdown(&mut self) -> Result<()> {
        // Connections are per request; nothing stays open
        Ok(())
    }

    fn describe(&self) -> String {
        format!("WiFi {}", self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use tokio_test::assert_ok;

    /// Reads one HTTP request, returning None for bare connectivity probes
    async fn read_request(stream: &mut TcpStream) -> Option<String> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 512];
        loop {
            let n = stream.read(&mut chunk).await.ok()?;
            if n == 0 {
                return None;
            }
            buffer.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buffer).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let length = text
                    .lines()
                    .find_map(|l| l.strip_prefix("Content-Length: "))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if text.len() >= header_end + 4 + length {
                    return Some(text);
                }
            }
        }
    }

    /// Local stand-in for the robot's adapter
    struct Adapter {
        address: SocketAddr,
        requests: Arc<Mutex<Vec<String>>>,
        connections: Arc<Mutex<usize>>,
    }

    async fn spawn_adapter(status: &'static str) -> Adapter {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(Mutex::new(0));
        let recorded = requests.clone();
        let accepted = connections.clone();

        tokio::spawn(async move {
            loop {
                let (mut stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                *accepted.lock().unwrap() += 1;
                if let Some(request) = read_request(&mut stream).await {
                    recorded.lock().unwrap().push(request);
                    let response = format!("HTTP/1.1 {}\r\nContent-Length: 0\r\n\r\n", status);
                    let _ = stream.write_all(response.as_bytes()).await;
                }
            }
        });

        Adapter {
            address,
            requests,
            connections,
        }
    }

    fn link_to(address: SocketAddr) -> WifiLink {
        WifiLink::new(address.ip(), address.port(), Duration::from_secs(1))
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("HTTP/1.1 200 OK\r\n"), Some(200));
        assert_eq!(parse_status("HTTP/1.0 404 Not Found"), Some(404));
        assert_eq!(parse_status("garbage"), None);
        assert_eq!(parse_status(""), None);
    }

    #[test]
    fn test_build_request() {
        let request = build_request(&"10.0.0.7".parse().unwrap(), "ksit");
        assert!(request.starts_with("POST /action HTTP/1.1\r\n"));
        assert!(request.contains("Host: 10.0.0.7\r\n"));
        assert!(request.contains("Content-Length: 8\r\n"));
        assert!(request.ends_with("\r\n\r\ncmd=ksit"));
    }

    #[tokio::test]
    async fn test_send_action_posts_token() {
        let adapter = spawn_adapter("200 OK").await;
        let mut link = link_to(adapter.address);

        assert_ok!(link.send_action(ActionCommand::Greeting).await);

        let requests = adapter.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].ends_with("cmd=khi"));
    }

    #[tokio::test]
    async fn test_each_command_uses_one_connection() {
        let adapter = spawn_adapter("200 OK").await;
        let mut link = link_to(adapter.address);

        assert_ok!(link.send_action(ActionCommand::Sit).await);
        assert_ok!(link.send_direction(Direction::Backward, Gait::Walk).await);

        assert_eq!(adapter.requests.lock().unwrap().len(), 2);
        assert_eq!(*adapter.connections.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_send_direction_posts_movement() {
        let adapter = spawn_adapter("200 OK").await;
        let mut link = link_to(adapter.address);

        link.send_direction(Direction::Forward, Gait::Trot).await.unwrap();
        link.send_direction(Direction::Stop, Gait::Trot).await.unwrap();

        let requests = adapter.requests.lock().unwrap();
        assert!(requests[0].ends_with("cmd=ktrF"));
        assert!(requests[1].ends_with("cmd=kbalance"));
    }

    #[tokio::test]
    async fn test_rejected_command_is_link_error() {
        let adapter = spawn_adapter("500 Internal Server Error").await;
        let mut link = link_to(adapter.address);

        match link.send_action(ActionCommand::Rest).await {
            Err(BridgeError::Link(msg)) => assert!(msg.contains("HTTP 500")),
            other => panic!("Expected Link error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_adapter_is_not_connected() {
        // Bind then drop to get a port nobody listens on
        let address = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let mut link = link_to(address);

        assert!(!link.is_connected().await);
        assert!(matches!(
            link.send_action(ActionCommand::Sit).await,
            Err(BridgeError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_shutdown_is_noop() {
        let mut link = WifiLink::new("127.0.0.1".parse().unwrap(), 9, Duration::from_millis(10));
        assert_ok!(link.shutdown().await);
        assert_eq!(link.describe(), "WiFi 127.0.0.1:9");
    }
}
