//! Shared helpers for in-process integration tests.
//!
//! Each test starts its own server on an ephemeral port and talks to it over
//! real TCP connections.

#![allow(dead_code)]

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use chrono::{Local, TimeZone};
use tcp_chat_server::{
    bootstrap::Application,
    config::ServerConfig,
    domain::{ChatLogSink, ParticipantRegistry},
    infrastructure::{
        dto::text::NAME_PROMPT, log_sink::FileChatLogSink, repository::InMemoryChatRoom,
    },
    ui::banner::WELCOME_BANNER,
};
use tcp_chat_shared::time::{Clock, FixedClock};
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{
        TcpListener, TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    task::JoinHandle,
};

pub const READ_TIMEOUT: Duration = Duration::from_secs(3);
pub const QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Timestamp every chat line carries under the fixed test clock.
pub const FIXED_TIMESTAMP: &str = "2024-01-02 03:04:05";

/// Server running in the current test's runtime
pub struct TestServer {
    pub addr: SocketAddr,
    pub room: Arc<InMemoryChatRoom>,
    pub log_path: PathBuf,
    /// Admin API router over the same room
    pub admin: axum::Router,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Start with a config adjusted by `configure`.
    pub async fn start_with<F>(configure: F) -> Self
    where
        F: FnOnce(&mut ServerConfig),
    {
        let mut config = ServerConfig::new(0);
        config.host = "127.0.0.1".to_string();
        let log_path =
            std::env::temp_dir().join(format!("tcp-chat-test-{}.log", uuid::Uuid::new_v4()));
        config.log_path = log_path.display().to_string();
        configure(&mut config);

        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(
            Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        ));
        let log_sink: Arc<dyn ChatLogSink> = Arc::new(FileChatLogSink::new(&log_path));
        let app = Application::build(&config, clock, log_sink);

        let listener = TcpListener::bind(config.listen_addr())
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().unwrap();
        let admin = app.server.admin_router();
        let server = app.server;
        let handle = tokio::spawn(async move { server.serve(listener).await });

        TestServer {
            addr,
            room: app.room,
            log_path,
            admin,
            handle,
        }
    }

    /// Names currently registered, in join order.
    pub async fn names(&self) -> Vec<String> {
        self.room
            .snapshot()
            .await
            .into_iter()
            .map(|p| p.name.into_string())
            .collect()
    }

    /// Wait until the registry satisfies `condition`.
    pub async fn wait_until<F>(&self, condition: F)
    where
        F: Fn(&[String]) -> bool,
    {
        tokio::time::timeout(READ_TIMEOUT, async {
            loop {
                if condition(&self.names().await) {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("Timed out waiting for registry state");
    }

    /// Connect and complete the handshake as `name`.
    pub async fn join(&self, name: &str) -> TestClient {
        let mut client = TestClient::connect(self.addr).await;
        client.expect_greeting().await;
        client.send_line(name).await;
        let expected = name.trim().to_string();
        self.wait_until(|names| names.contains(&expected)).await;
        client
    }

    pub fn log_contents(&self) -> String {
        std::fs::read_to_string(&self.log_path).unwrap_or_default()
    }

    /// Wait until the log file has content, then return it.
    pub async fn wait_for_log(&self) -> String {
        tokio::time::timeout(READ_TIMEOUT, async {
            loop {
                let contents = self.log_contents();
                if !contents.is_empty() {
                    return contents;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("Timed out waiting for the chat log")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
        let _ = std::fs::remove_file(&self.log_path);
    }
}

/// One TCP participant
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr)
            .await
            .expect("Failed to connect to test server");
        let (read_half, writer) = stream.into_split();
        TestClient {
            reader: BufReader::new(read_half),
            writer,
        }
    }

    pub fn reader_mut(&mut self) -> &mut BufReader<OwnedReadHalf> {
        &mut self.reader
    }

    /// Read the banner and the name prompt.
    pub async fn expect_greeting(&mut self) {
        let mut greeting = vec![0u8; WELCOME_BANNER.len() + NAME_PROMPT.len()];
        tokio::time::timeout(READ_TIMEOUT, self.reader.read_exact(&mut greeting))
            .await
            .expect("Timed out waiting for greeting")
            .expect("Failed to read greeting");
        assert_eq!(
            String::from_utf8(greeting).unwrap(),
            format!("{}{}", WELCOME_BANNER, NAME_PROMPT)
        );
    }

    pub async fn send_line(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .expect("Failed to send line");
    }

    /// Write raw bytes as-is, without appending a newline.
    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.writer
            .write_all(bytes)
            .await
            .expect("Failed to send bytes");
    }

    /// Read one line including its trailing newline.
    pub async fn read_line(&mut self) -> String {
        let mut line = String::new();
        tokio::time::timeout(READ_TIMEOUT, self.reader.read_line(&mut line))
            .await
            .expect("Timed out waiting for a line")
            .expect("Failed to read line");
        line
    }

    /// Assert nothing arrives for a short period.
    pub async fn expect_silence(&mut self) {
        let mut line = String::new();
        let result = tokio::time::timeout(QUIET_PERIOD, self.reader.read_line(&mut line)).await;
        assert!(result.is_err(), "Unexpected data: {:?}", line);
    }

    /// Read everything until the server closes the connection.
    pub async fn read_until_closed(&mut self) -> String {
        let mut rest = String::new();
        tokio::time::timeout(READ_TIMEOUT, self.reader.read_to_string(&mut rest))
            .await
            .expect("Timed out waiting for the server to close the connection")
            .expect("Failed to read until close");
        rest
    }
}
