// Field validators - every caller-supplied value passes here before it
// reaches a Channel record

use thiserror::Error;

use super::constants::{
    CHANNEL_MAX, CHANNEL_MIN, FREQ_MAX, FREQ_MIN, GROUP_SLOTS, NAME_SIZE, SUBTONE_MAX, SUBTONE_MIN,
};
use super::groups::Groups;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must contain only digits, but '{value}' was given")]
    NotANumber { field: &'static str, value: String },

    #[error("Wrong channel number '{0}' - should be in the range from {CHANNEL_MIN} to {CHANNEL_MAX}")]
    ChannelNumber(u32),

    #[error("Frequency should be in the range from {FREQ_MIN} to {FREQ_MAX}, got {0}")]
    Frequency(u32),

    #[error("Subtone should be in the range from {SUBTONE_MIN} to {SUBTONE_MAX} (or 0 to disable), got {0}")]
    Subtone(u32),

    #[error("Power should be in the range from 0 to 255, got {0}")]
    Power(u32),

    #[error("Group should be a letter between A-O (or 0 for no group), but '{0}' was found")]
    GroupLetter(char),

    #[error("Up to {GROUP_SLOTS} groups can be assigned, got {0}")]
    GroupCount(usize),

    #[error("Modulation should be one of Auto, FM, AM, USB, but '{0}' was found")]
    Modulation(String),

    #[error("Bandwidth should be Wide or Narrow, but '{0}' was found")]
    Bandwidth(String),

    #[error("Duplicated channel number: {0}")]
    DuplicateChannel(u8),
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Parse a decimal field that must contain only digits.
pub fn parse_number(field: &'static str, value: &str) -> Result<u32> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NotANumber {
            field,
            value: value.to_string(),
        });
    }
    value.parse().map_err(|_| ValidationError::NotANumber {
        field,
        value: value.to_string(),
    })
}

pub fn check_channel_number(number: u32) -> Result<u8> {
    if !(CHANNEL_MIN as u32..=CHANNEL_MAX as u32).contains(&number) {
        return Err(ValidationError::ChannelNumber(number));
    }
    Ok(number as u8)
}

pub fn check_frequency(freq: u32) -> Result<u32> {
    if !(FREQ_MIN..=FREQ_MAX).contains(&freq) {
        return Err(ValidationError::Frequency(freq));
    }
    Ok(freq)
}

pub fn check_subtone(subtone: u32) -> Result<u16> {
    if subtone != 0 && !(SUBTONE_MIN as u32..=SUBTONE_MAX as u32).contains(&subtone) {
        return Err(ValidationError::Subtone(subtone));
    }
    Ok(subtone as u16)
}

pub fn check_power(power: u32) -> Result<u8> {
    if power > 255 {
        return Err(ValidationError::Power(power));
    }
    Ok(power as u8)
}

/// Names longer than the 12-byte wire field are truncated with a warning
/// rather than rejected.
// TODO the firmware's accepted name charset is unverified; anything goes
// through as UTF-8 bytes for now
pub fn check_name(name: &str) -> String {
    if name.len() > NAME_SIZE {
        tracing::warn!("Name '{}' trimmed to {} characters", name, NAME_SIZE);
        let mut end = NAME_SIZE;
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        name[..end].to_string()
    } else {
        name.to_string()
    }
}

/// Validate a group string: up to 4 characters, each a letter A-O
/// (case-insensitive) or '0' for an unassigned slot.
pub fn check_groups(groups: &str) -> Result<Groups> {
    if groups.chars().count() > GROUP_SLOTS {
        return Err(ValidationError::GroupCount(groups.chars().count()));
    }
    for c in groups.chars() {
        if !matches!(c.to_ascii_uppercase(), 'A'..='O' | '0') {
            return Err(ValidationError::GroupLetter(c));
        }
    }
    Ok(Groups::from_letters(groups))
}
