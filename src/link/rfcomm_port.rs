//! Serial port abstraction for the Bluetooth link, swappable in tests

use async_trait::async_trait;
use std::io;
use tokio::io::AsyncWriteExt;

/// Byte-level port carrying framed commands to the robot
#[async_trait]
pub trait RfcommPort: Send {
    /// Write one complete frame and flush it out
    async fn send_frame(&mut self, frame: &[u8]) -> io::Result<()>;

    /// Flush pending bytes and release the port
    async fn close(&mut self) -> io::Result<()>;
}

/// RFCOMM device opened through tokio-serial
pub struct SerialRfcommPort {
    stream: tokio_serial::SerialStream,
}

impl SerialRfcommPort {
    pub fn new(stream: tokio_serial::SerialStream) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl RfcommPort for SerialRfcommPort {
    async fn send_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        self.stream.write_all(frame).await?;
        self.stream.flush().await
    }

    async fn close(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// In-memory port recording every frame
    #[derive(Clone, Default)]
    pub struct MockRfcommPort {
        pub frames: Arc<Mutex<Vec<Vec<u8>>>>,
        pub send_error: Arc<Mutex<Option<io::ErrorKind>>>,
        pub closed: Arc<Mutex<bool>>,
    }

    impl MockRfcommPort {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn frames(&self) -> Vec<Vec<u8>> {
            self.frames.lock().unwrap().clone()
        }

        /// Frames decoded as text, terminators stripped
        pub fn commands(&self) -> Vec<String> {
            self.frames()
                .iter()
                .map(|frame| String::from_utf8_lossy(frame).trim_end().to_string())
                .collect()
        }

        pub fn fail_sends(&self, error: io::ErrorKind) {
            *self.send_error.lock().unwrap() = Some(error);
        }

        pub fn is_closed(&self) -> bool {
            *self.closed.lock().unwrap()
        }
    }

    #[async_trait]
    impl RfcommPort for MockRfcommPort {
        async fn send_frame(&mut self, frame: &[u8]) -> io::Result<()> {
            if let Some(error) = *self.send_error.lock().unwrap() {
                return Err(io::Error::new(error, "Mock send error"));
            }
            self.frames.lock().unwrap().push(frame.to_vec());
            Ok(())
        }

        async fn close(&mut self) -> io::Result<()> {
            *self.closed.lock().unwrap() = true;
            Ok(())
        }
    }
}
