// Channel record - one radio memory slot and its 32-byte wire form
//
// Byte layout (little-endian):
// - Bytes 0-3:   rx frequency (u32, Hz)
// - Bytes 4-7:   tx frequency (u32, Hz)
// - Bytes 8-9:   rx subtone (u16, tenths of Hz, 0 = off)
// - Bytes 10-11: tx subtone (u16, same encoding)
// - Byte 12:     tx power (raw firmware units)
// - Bytes 13-14: group membership (4 packed nibbles)
// - Byte 15:     flags (bit 0 bandwidth, bits 1-2 modulation, bits 3-7 reserved, set to 1)
// - Bytes 16-19: reserved, 0xFF on encode, ignored on decode
// - Bytes 20-31: name, NUL-padded

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::constants::{DEFAULT_FREQ, ERASED_RECORD, NAME_SIZE, RECORD_SIZE};
use super::groups::Groups;
use super::validation::ValidationError;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Encoded record is {0} bytes instead of {RECORD_SIZE}")]
    BadLength(usize),

    #[error("Unrecognized modulation bits: {0:#04b}")]
    BadModulation(u8),
}

/// Modulation mode stored in bits 1-2 of the flag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modulation {
    Auto,
    Fm,
    Am,
    Usb,
}

impl Modulation {
    fn from_bits(bits: u8) -> Result<Self, CodecError> {
        match bits {
            0 => Ok(Self::Auto),
            1 => Ok(Self::Fm),
            2 => Ok(Self::Am),
            3 => Ok(Self::Usb),
            other => Err(CodecError::BadModulation(other)),
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            Self::Auto => 0,
            Self::Fm => 1,
            Self::Am => 2,
            Self::Usb => 3,
        }
    }
}

impl FromStr for Modulation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AUTO" => Ok(Self::Auto),
            "FM" => Ok(Self::Fm),
            "AM" => Ok(Self::Am),
            "USB" => Ok(Self::Usb),
            _ => Err(ValidationError::Modulation(s.to_string())),
        }
    }
}

impl fmt::Display for Modulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Auto => "Auto",
            Self::Fm => "FM",
            Self::Am => "AM",
            Self::Usb => "USB",
        };
        write!(f, "{}", s)
    }
}

/// Channel bandwidth stored in bit 0 of the flag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bandwidth {
    Wide,
    Narrow,
}

impl FromStr for Bandwidth {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WIDE" => Ok(Self::Wide),
            "NARROW" => Ok(Self::Narrow),
            _ => Err(ValidationError::Bandwidth(s.to_string())),
        }
    }
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Wide => "Wide",
            Self::Narrow => "Narrow",
        };
        write!(f, "{}", s)
    }
}

/// One programmed channel slot. The channel number is carried here for
/// display and CSV purposes but is not part of the 32-byte payload; on
/// the wire it lives in the command's address byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub number: u8,
    pub name: String,
    pub rx_freq: u32,
    pub tx_freq: u32,
    pub rx_subtone: u16,
    pub tx_subtone: u16,
    pub tx_power: u8,
    pub groups: Groups,
    pub modulation: Modulation,
    pub bandwidth: Bandwidth,
}

impl Channel {
    /// New channel with the firmware-like defaults used by the write action.
    pub fn new(number: u8) -> Self {
        Self {
            number,
            name: format!("CH-{:03}", number),
            rx_freq: DEFAULT_FREQ,
            tx_freq: DEFAULT_FREQ,
            rx_subtone: 0,
            tx_subtone: 0,
            tx_power: 0,
            groups: Groups::default(),
            modulation: Modulation::Auto,
            bandwidth: Bandwidth::Narrow,
        }
    }

    /// True iff the raw payload is the firmware's unprogrammed-slot
    /// sentinel (all 0xFF). Must be checked before `decode`; the sentinel
    /// is not a valid record.
    pub fn is_erased(data: &[u8; RECORD_SIZE]) -> bool {
        *data == ERASED_RECORD
    }

    /// Decode a 32-byte payload read from the radio. The caller has
    /// already ruled out the erased sentinel.
    pub fn decode(number: u8, data: &[u8; RECORD_SIZE]) -> Result<Self, CodecError> {
        let rx_freq = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let tx_freq = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        let rx_subtone = u16::from_le_bytes([data[8], data[9]]);
        let tx_subtone = u16::from_le_bytes([data[10], data[11]]);
        let tx_power = data[12];
        let groups = Groups::from_packed(data[13], data[14]);

        let flags = data[15];
        let bandwidth = if flags & 0x01 != 0 {
            Bandwidth::Narrow
        } else {
            Bandwidth::Wide
        };
        let modulation = Modulation::from_bits((flags >> 1) & 0b11)?;

        // Trailing NULs are wire padding, not part of the name
        let name = String::from_utf8_lossy(&data[20..32])
            .trim_end_matches('\0')
            .to_string();

        Ok(Self {
            number,
            name,
            rx_freq,
            tx_freq,
            rx_subtone,
            tx_subtone,
            tx_power,
            groups,
            modulation,
            bandwidth,
        })
    }

    /// Encode into the 32-byte wire payload. The length check guards the
    /// field-width bookkeeping; it failing means a bug in this function.
    pub fn encode(&self) -> Result<[u8; RECORD_SIZE], CodecError> {
        let mut flags = self.modulation.to_bits() << 1;
        if self.bandwidth == Bandwidth::Narrow {
            flags |= 0x01;
        }
        flags |= 0b1111_1000; // reserved bits ride as 1

        let (g0, g1) = self.groups.to_packed();

        let mut name_bytes = [0u8; NAME_SIZE];
        for (dst, src) in name_bytes.iter_mut().zip(self.name.bytes()) {
            *dst = src;
        }

        let mut data = Vec::with_capacity(RECORD_SIZE);
        data.extend_from_slice(&self.rx_freq.to_le_bytes());
        data.extend_from_slice(&self.tx_freq.to_le_bytes());
        data.extend_from_slice(&self.rx_subtone.to_le_bytes());
        data.extend_from_slice(&self.tx_subtone.to_le_bytes());
        data.push(self.tx_power);
        data.push(g0);
        data.push(g1);
        data.push(flags);
        data.extend_from_slice(&[0xFF; 4]);
        data.extend_from_slice(&name_bytes);

        let len = data.len();
        data.try_into().map_err(|_| CodecError::BadLength(len))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:10} : CH-{:03}", "channel", self.number)?;
        writeln!(f, "{:10} : {}", "name", self.name)?;
        writeln!(f, "{:10} : {}", "RX freq", self.rx_freq)?;
        writeln!(f, "{:10} : {}", "TX freq", self.tx_freq)?;
        writeln!(f, "{:10} : {}", "RX subtone", self.rx_subtone)?;
        writeln!(f, "{:10} : {}", "TX subtone", self.tx_subtone)?;
        writeln!(f, "{:10} : {}", "TX power", self.tx_power)?;
        writeln!(f, "{:10} : {}", "group", self.groups)?;
        writeln!(f, "{:10} : {}", "bandwidth", self.bandwidth)?;
        write!(f, "{:10} : {}", "modulation", self.modulation)
    }
}
