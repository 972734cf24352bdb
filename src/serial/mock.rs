// Mock transport for testing without hardware

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::comm::{SerialConfig, SerialError};
use super::transport::Transport;

/// Mock transport for testing
#[derive(Clone, Default)]
pub struct MockTransport {
    /// Data to be read (simulates radio responses)
    read_buffer: Arc<Mutex<VecDeque<u8>>>,

    /// Data that was written (simulates commands sent to radio)
    write_buffer: Arc<Mutex<Vec<u8>>>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Push data to be read (simulates radio sending data)
    pub fn push_read_data(&self, data: &[u8]) {
        let mut buffer = self.read_buffer.lock().unwrap();
        for &byte in data {
            buffer.push_back(byte);
        }
    }

    /// Get data that was written (simulates reading commands sent to radio)
    pub fn written_data(&self) -> Vec<u8> {
        self.write_buffer.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    async fn write_all(&mut self, buf: &[u8]) -> Result<(), SerialError> {
        self.write_buffer.lock().unwrap().extend_from_slice(buf);
        Ok(())
    }

    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), SerialError> {
        let mut buffer = self.read_buffer.lock().unwrap();

        if buffer.len() < buf.len() {
            return Err(SerialError::Timeout(SerialConfig::default().timeout));
        }

        for item in buf.iter_mut() {
            *item = buffer.pop_front().unwrap();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_basic() {
        let mut mock = MockTransport::new();

        mock.push_read_data(b"Hello");

        let mut buf = [0u8; 5];
        mock.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"Hello");

        mock.write_all(b"World").await.unwrap();
        assert_eq!(mock.written_data(), b"World");
    }

    #[tokio::test]
    async fn test_mock_timeout_when_script_exhausted() {
        let mut mock = MockTransport::new();

        let mut buf = [0u8; 5];
        assert!(mock.read_exact(&mut buf).await.is_err());
    }
}
