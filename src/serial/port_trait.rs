//! Trait abstraction for serial port operations to enable testing

use async_trait::async_trait;
use std::io;

/// Trait for serial port I/O operations
#[async_trait]
pub trait SerialPortIO: Send {
    /// Write all data to the port
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Flush the output buffer
    async fn flush(&mut self) -> io::Result<()>;
}

/// Wrapper around tokio_serial::SerialStream that implements SerialPortIO
pub struct TokioSerialPort {
    port: tokio_serial::SerialStream,
}

impl TokioSerialPort {
    pub fn new(port: tokio_serial::SerialStream) -> Self {
        Self { port }
    }
}

#[async_trait]
impl SerialPortIO for TokioSerialPort {
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        use tokio::io::AsyncWriteExt;
        self.port.write_all(data).await
    }

    async fn flush(&mut self) -> io::Result<()> {
        use tokio::io::AsyncWriteExt;
        self.port.flush().await
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Wire {
        /// Bytes written since the last flush
        pending: Vec<u8>,
        /// One entry per flush, in order
        flushed: Vec<Vec<u8>>,
        write_error: Option<io::ErrorKind>,
        flush_error: Option<io::ErrorKind>,
    }

    /// In-memory port that groups written bytes by flush.
    ///
    /// A frame only shows up in [`flushed_frames`](Self::flushed_frames) once
    /// it has been flushed, so tests see exactly what reached the board.
    #[derive(Clone, Default)]
    pub struct RecordingPort {
        wire: Arc<Mutex<Wire>>,
    }

    impl RecordingPort {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn flushed_frames(&self) -> Vec<Vec<u8>> {
            self.wire.lock().unwrap().flushed.clone()
        }

        pub fn pending_bytes(&self) -> Vec<u8> {
            self.wire.lock().unwrap().pending.clone()
        }

        pub fn fail_writes(&self, error: io::ErrorKind) {
            self.wire.lock().unwrap().write_error = Some(error);
        }

        pub fn fail_flushes(&self, error: io::ErrorKind) {
            self.wire.lock().unwrap().flush_error = Some(error);
        }
    }

    #[async_trait]
    impl SerialPortIO for RecordingPort {
        async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
            let mut wire = self.wire.lock().unwrap();
            if let Some(error) = wire.write_error {
                return Err(io::Error::new(error, "write rejected"));
            }
            wire.pending.extend_from_slice(data);
            Ok(())
        }

        async fn flush(&mut self) -> io::Result<()> {
            let mut wire = self.wire.lock().unwrap();
            if let Some(error) = wire.flush_error {
                return Err(io::Error::new(error, "flush rejected"));
            }
            let frame = std::mem::take(&mut wire.pending);
            wire.flushed.push(frame);
            Ok(())
        }
    }

    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_bytes_visible_only_after_flush() {
            let mut port = RecordingPort::new();

            port.write_all(&[0xA5, 0x04]).await.unwrap();
            port.write_all(&[0x01, 0x00, 0x00, 0x00]).await.unwrap();
            assert!(port.flushed_frames().is_empty());
            assert_eq!(port.pending_bytes().len(), 6);

            port.flush().await.unwrap();
            assert_eq!(port.flushed_frames(), vec![vec![0xA5, 0x04, 0x01, 0x00, 0x00, 0x00]]);
            assert!(port.pending_bytes().is_empty());
        }

        #[tokio::test]
        async fn test_failed_flush_keeps_bytes_pending() {
            let mut port = RecordingPort::new();
            port.fail_flushes(io::ErrorKind::TimedOut);

            port.write_all(&[1, 2, 3]).await.unwrap();
            assert!(port.flush().await.is_err());
            assert_eq!(port.pending_bytes(), vec![1, 2, 3]);
        }
    }
}
