// Record checksum - sum of all bytes modulo 256

/// Checksum over a byte buffer as the firmware computes it: the low byte
/// of the sum of all byte values. Used both to verify received channel
/// data and to tag transmitted channel data.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}
