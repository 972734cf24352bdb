// Group membership encoding
//
// Each channel belongs to up to 4 scan groups, each one letter A-O.
// On the wire the 4 slots are packed into 2 bytes of 4-bit nibbles,
// lowest nibble first: byte0 low = slot 0, byte0 high = slot 1,
// byte1 low = slot 2, byte1 high = slot 3. Nibble 0 means "no group",
// 1..=15 map to letters A..=O.

use std::fmt;

use super::constants::GROUP_SLOTS;

/// Group membership of one channel: 4 slots of nibble values 0..=15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Groups([u8; GROUP_SLOTS]);

impl Groups {
    /// Unpack from the 2-byte wire form.
    pub fn from_packed(b0: u8, b1: u8) -> Self {
        Self([b0 & 0x0F, b0 >> 4, b1 & 0x0F, b1 >> 4])
    }

    /// Pack into the 2-byte wire form.
    pub fn to_packed(self) -> (u8, u8) {
        let [g0, g1, g2, g3] = self.0;
        (g0 | (g1 << 4), g2 | (g3 << 4))
    }

    /// Slot values, lowest slot first.
    pub fn slots(&self) -> [u8; GROUP_SLOTS] {
        self.0
    }

    /// Build from an already-validated group string ("AB00", "A", ...).
    /// Slots beyond the string length default to "no group"; characters
    /// outside A-O (including '0') map to "no group".
    pub fn from_letters(letters: &str) -> Self {
        let mut slots = [0u8; GROUP_SLOTS];
        for (slot, c) in slots.iter_mut().zip(letters.chars()) {
            *slot = letter_to_number(c);
        }
        Self(slots)
    }
}

impl fmt::Display for Groups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &g in &self.0 {
            write!(f, "{}", number_to_letter(g))?;
        }
        Ok(())
    }
}

/// Convert a group letter to its nibble value: A-O (case-insensitive)
/// map to 1..=15, anything else is "no group" (0).
pub fn letter_to_number(c: char) -> u8 {
    match c.to_ascii_uppercase() {
        l @ 'A'..='O' => (l as u8) - b'A' + 1,
        _ => 0,
    }
}

/// Convert a nibble value back to its letter; 0 (and any out-of-range
/// value seen on decode) renders as '0'.
pub fn number_to_letter(n: u8) -> char {
    match n {
        1..=15 => (b'A' + n - 1) as char,
        _ => '0',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_conversions() {
        assert_eq!(letter_to_number('A'), 1);
        assert_eq!(letter_to_number('a'), 1);
        assert_eq!(letter_to_number('O'), 15);
        assert_eq!(letter_to_number('0'), 0);
        assert_eq!(letter_to_number('P'), 0);

        assert_eq!(number_to_letter(1), 'A');
        assert_eq!(number_to_letter(15), 'O');
        assert_eq!(number_to_letter(0), '0');
        assert_eq!(number_to_letter(16), '0');
    }

    #[test]
    fn test_pack_unpack_all_byte_pairs() {
        for b0 in 0..=255u8 {
            for b1 in 0..=255u8 {
                let groups = Groups::from_packed(b0, b1);
                assert_eq!(groups.to_packed(), (b0, b1));
            }
        }
    }

    #[test]
    fn test_letters_round_trip() {
        let groups = Groups::from_letters("A0OB");
        assert_eq!(groups.slots(), [1, 0, 15, 2]);
        let (b0, b1) = groups.to_packed();
        assert_eq!(Groups::from_packed(b0, b1).to_string(), "A0OB");
    }

    #[test]
    fn test_short_string_pads_with_no_group() {
        let groups = Groups::from_letters("AB");
        assert_eq!(groups.slots(), [1, 2, 0, 0]);
        assert_eq!(groups.to_string(), "AB00");
    }

    #[test]
    fn test_wire_nibble_order() {
        // "ABCD" -> slots 1,2,3,4 -> byte0 = 0x21, byte1 = 0x43
        let (b0, b1) = Groups::from_letters("ABCD").to_packed();
        assert_eq!((b0, b1), (0x21, 0x43));
    }
}
