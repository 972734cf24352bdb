// Constants shared across the crate - channel domains, wire layout, timing

use std::time::Duration;

/// Lowest programmable channel number
pub const CHANNEL_MIN: u8 = 1;

/// Highest programmable channel number
pub const CHANNEL_MAX: u8 = 198;

/// Frequency bounds accepted by the firmware (Hz)
pub const FREQ_MIN: u32 = 1_800_000;
pub const FREQ_MAX: u32 = 130_000_000;

/// CTCSS subtone bounds (tenths of Hz as stored by the firmware; 0 = off)
pub const SUBTONE_MIN: u16 = 670;
pub const SUBTONE_MAX: u16 = 2541;

/// Size of one channel record on the wire
pub const RECORD_SIZE: usize = 32;

/// Size of the name field inside a record (NUL-padded)
pub const NAME_SIZE: usize = 12;

/// Number of group membership slots per channel
pub const GROUP_SLOTS: usize = 4;

/// Default RX/TX frequency for a newly created channel (Hz)
pub const DEFAULT_FREQ: u32 = 14_495_000;

/// An unprogrammed slot reads back as 32 bytes of 0xFF
pub const ERASED_RECORD: [u8; RECORD_SIZE] = [0xFF; RECORD_SIZE];

/// Baud rate the nicFW serial console runs at
pub const BAUD_RATE: u32 = 38_400;

/// Per-read serial timeout
pub const SERIAL_TIMEOUT: Duration = Duration::from_secs(1);

/// Firmware debounce spacing after each key-down and key-up byte.
/// Required protocol timing; shortening it drops keypresses.
pub const KEY_DWELL: Duration = Duration::from_millis(330);
