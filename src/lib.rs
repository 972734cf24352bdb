// nicfw-rs: channel memory programmer for nicFW handheld radios

pub mod core;
pub mod formats;
pub mod radio;
pub mod serial;

// Re-export commonly used types
pub use self::core::{checksum, Bandwidth, Channel, Groups, Modulation, ValidationError};
pub use formats::{import_csv, CsvError, CsvWriter};
pub use radio::{parse_key_sequence, ChannelStore, ImportSet, RadioError, RadioLink};
pub use serial::{SerialConfig, SerialError, SerialPort, Transport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
