// Core data layer - channel records, wire codecs, validation
pub mod channel;
pub mod checksum;
pub mod constants;
pub mod groups;
pub mod validation;

// Re-export commonly used types
pub use channel::{Bandwidth, Channel, CodecError, Modulation};
pub use checksum::checksum;
pub use groups::Groups;
pub use validation::ValidationError;
