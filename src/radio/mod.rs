// Radio protocol module - command exchange and channel memory access
pub mod channels;
pub mod keys;
pub mod protocol;

pub use channels::{ChannelStore, ExportChannels, ImportSet};
pub use keys::parse_key_sequence;
pub use protocol::{RadioError, RadioLink, RadioResult};
