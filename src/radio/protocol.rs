// nicFW binary command protocol
//
// Every command is a single opcode byte. Most commands are acknowledged
// by the radio echoing the opcode back; flashlight and reset are
// fire-and-forget. Channel reads and writes must be bracketed by
// disable-radio / enable-radio so the firmware's own UI stays out of the
// memory while it is being accessed.

use thiserror::Error;

use crate::core::constants::{KEY_DWELL, RECORD_SIZE};
use crate::core::{checksum, CodecError, ValidationError};
use crate::serial::{SerialError, Transport};

pub const CMD_START_REMOTE_SESSION: u8 = 0x4A;
pub const CMD_END_REMOTE_SESSION: u8 = 0x4B;
pub const CMD_READ_CHANNEL: u8 = 0x30;
pub const CMD_WRITE_CHANNEL: u8 = 0x31;
pub const CMD_READ_BATTERY_ADC: u8 = 0x32;
pub const CMD_DISABLE_RADIO: u8 = 0x45;
pub const CMD_ENABLE_RADIO: u8 = 0x46;
pub const CMD_FLASHLIGHT_ON: u8 = 0x47;
pub const CMD_FLASHLIGHT_OFF: u8 = 0x48;
pub const CMD_RESET_RADIO: u8 = 0x49;

/// Key-release sentinel sent after each keypress byte
pub const KEY_RELEASE: u8 = 0xFF;

/// Bit set on a key code to mark it as a key-down event
pub const KEY_DOWN_FLAG: u8 = 0x80;

#[derive(Error, Debug)]
pub enum RadioError {
    #[error("Serial communication error: {0}")]
    Serial(#[from] SerialError),

    #[error("No valid ack for command {expected:#04X} ({received:#04X} received)")]
    BadAck { expected: u8, received: u8 },

    #[error("Received empty channel data")]
    EmptyResponse,

    #[error("Received data checksum mismatch (expected {expected:#04X}, got {received:#04X})")]
    ChecksumMismatch { expected: u8, received: u8 },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unsupported key: '{0}'")]
    UnsupportedKey(String),
}

pub type RadioResult<T> = std::result::Result<T, RadioError>;

/// Command/acknowledgement session with one radio over a transport.
///
/// Channel operations are plain request/acknowledge cycles; the only
/// state carried between commands is whether a remote-control session
/// is active, which matters to the keypress path alone.
pub struct RadioLink<T: Transport> {
    transport: T,
    remote_active: bool,
}

impl<T: Transport> RadioLink<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            remote_active: false,
        }
    }

    /// Send a fire-and-forget command.
    async fn command(&mut self, opcode: u8) -> RadioResult<()> {
        tracing::debug!("-> {:#04X}", opcode);
        self.transport.write_all(&[opcode]).await?;
        Ok(())
    }

    /// Send a command and verify the one-byte opcode-echo ack.
    async fn command_with_ack(&mut self, opcode: u8) -> RadioResult<()> {
        self.command(opcode).await?;
        self.expect_ack(opcode).await
    }

    /// Read one ack byte and require it to equal `expected`.
    async fn expect_ack(&mut self, expected: u8) -> RadioResult<()> {
        let mut ack = [0u8; 1];
        self.transport.read_exact(&mut ack).await?;
        if ack[0] != expected {
            return Err(RadioError::BadAck {
                expected,
                received: ack[0],
            });
        }
        Ok(())
    }

    /// Suspend the radio's own UI before a memory access.
    pub async fn disable_radio(&mut self) -> RadioResult<()> {
        self.command_with_ack(CMD_DISABLE_RADIO).await
    }

    /// Resume the radio's own UI after a memory access.
    pub async fn enable_radio(&mut self) -> RadioResult<()> {
        self.command_with_ack(CMD_ENABLE_RADIO).await
    }

    pub async fn flashlight(&mut self, on: bool) -> RadioResult<()> {
        let opcode = if on {
            CMD_FLASHLIGHT_ON
        } else {
            CMD_FLASHLIGHT_OFF
        };
        self.command(opcode).await
    }

    /// Reboot the radio. Terminal for the session: the radio never acks.
    /// An active remote session is closed first so the reboot does not
    /// land inside remote mode.
    pub async fn reset(&mut self) -> RadioResult<()> {
        if self.remote_active {
            self.end_remote_session().await?;
        }
        self.command(CMD_RESET_RADIO).await
    }

    pub async fn start_remote_session(&mut self) -> RadioResult<()> {
        if !self.remote_active {
            self.command_with_ack(CMD_START_REMOTE_SESSION).await?;
            self.remote_active = true;
        }
        Ok(())
    }

    pub async fn end_remote_session(&mut self) -> RadioResult<()> {
        if self.remote_active {
            self.command_with_ack(CMD_END_REMOTE_SESSION).await?;
            self.remote_active = false;
        }
        Ok(())
    }

    /// Read the raw battery ADC value.
    pub async fn read_battery_adc(&mut self) -> RadioResult<u16> {
        self.command_with_ack(CMD_READ_BATTERY_ADC).await?;
        let mut value = [0u8; 2];
        self.transport.read_exact(&mut value).await?;
        Ok(u16::from_le_bytes(value))
    }

    /// Request one channel record. Returns the 32 raw payload bytes and
    /// the checksum byte the radio sent with them; the caller verifies.
    /// Must run inside a disable/enable bracket.
    pub async fn fetch_channel(&mut self, number: u8) -> RadioResult<([u8; RECORD_SIZE], u8)> {
        // Firmware channel addresses are offset by one from the
        // user-visible 1..198 numbering
        self.transport
            .write_all(&[CMD_READ_CHANNEL, number.wrapping_add(1)])
            .await?;

        let mut data = [0u8; RECORD_SIZE];
        let mut received = [0u8; 1];
        match self.transport.read_exact(&mut data).await {
            Err(SerialError::Timeout(_)) => return Err(RadioError::EmptyResponse),
            other => other?,
        }
        self.transport.read_exact(&mut received).await?;

        tracing::debug!("<- CH-{:03}: {:02X?} checksum {:#04X}", number, data, received[0]);
        Ok((data, received[0]))
    }

    /// Send one channel record with its checksum appended and return the
    /// radio's ack byte. Must run inside a disable/enable bracket.
    pub async fn send_channel(&mut self, number: u8, data: &[u8; RECORD_SIZE]) -> RadioResult<u8> {
        let sum = checksum(data);
        tracing::debug!("-> CH-{:03}: {:02X?} checksum {:#04X}", number, data, sum);

        self.transport
            .write_all(&[CMD_WRITE_CHANNEL, number.wrapping_add(1)])
            .await?;
        self.transport.write_all(data).await?;
        self.transport.write_all(&[sum]).await?;

        let mut ack = [0u8; 1];
        self.transport.read_exact(&mut ack).await?;
        Ok(ack[0])
    }

    /// Deliver a sequence of key codes inside a remote session. The dwell
    /// sleep after each key-down and key-up byte is the firmware's
    /// debounce spacing and must not be shortened.
    pub async fn send_keys(&mut self, codes: &[u8]) -> RadioResult<()> {
        self.start_remote_session().await?;

        for &code in codes {
            self.transport.write_all(&[KEY_DOWN_FLAG | code]).await?;
            tokio::time::sleep(KEY_DWELL).await;
            self.transport.write_all(&[KEY_RELEASE]).await?;
            tokio::time::sleep(KEY_DWELL).await;
        }

        self.end_remote_session().await
    }
}
