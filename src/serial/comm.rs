// Serial port abstraction with async support
// Wraps the serialport crate with tokio async functionality

use std::io;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

use crate::core::constants::{BAUD_RATE, SERIAL_TIMEOUT};

use super::transport::Transport;

#[derive(Error, Debug)]
pub enum SerialError {
    #[error("Serial port error: {0}")]
    Port(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Port not open")]
    NotOpen,
}

pub type Result<T> = std::result::Result<T, SerialError>;

/// Serial port configuration
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Baud rate
    pub baud_rate: u32,

    /// Read/write timeout, applied per call
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        // The nicFW serial console is fixed at 38,400 baud 8N1
        Self {
            baud_rate: BAUD_RATE,
            timeout: SERIAL_TIMEOUT,
        }
    }
}

/// Async serial port wrapper
pub struct SerialPort {
    port: Option<Box<dyn serialport::SerialPort>>,
    config: SerialConfig,
}

impl SerialPort {
    /// Open a serial port with the given configuration
    pub fn open(port_name: &str, config: SerialConfig) -> Result<Self> {
        let port = serialport::new(port_name, config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .flow_control(serialport::FlowControl::None)
            .timeout(config.timeout)
            .open()
            .map_err(|e| SerialError::Port(e.to_string()))?;

        Ok(Self {
            port: Some(port),
            config,
        })
    }

    /// Read exactly buf.len() bytes with timeout
    pub async fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(SerialError::NotOpen)?;

        timeout(self.config.timeout, async {
            let mut total_read = 0;
            while total_read < buf.len() {
                match port.read(&mut buf[total_read..]) {
                    Ok(0) => {
                        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "Port closed"))
                    }
                    Ok(n) => total_read += n,
                    Err(ref e) if e.kind() == io::ErrorKind::TimedOut => {
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }
            Ok(())
        })
        .await
        .map_err(|_| SerialError::Timeout(self.config.timeout))?
        .map_err(SerialError::Io)
    }

    /// Write all bytes with timeout
    pub async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(SerialError::NotOpen)?;

        timeout(self.config.timeout, async {
            port.write_all(buf).map_err(SerialError::Io)
        })
        .await
        .map_err(|_| SerialError::Timeout(self.config.timeout))?
    }
}

impl Transport for SerialPort {
    async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        SerialPort::write_all(self, buf).await
    }

    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        SerialPort::read_exact(self, buf).await
    }
}
