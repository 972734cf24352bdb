// Remote-control key name parsing
//
// Key codes understood by the firmware:
//   10 MENU (blue)    0x0A
//   11 UP             0x0B
//   12 DOWN           0x0C
//   13 EXIT V/M (red) 0x0D
//   14 *              0x0E
//   15 #              0x0F
//   16 PTT            0x10
//   17 FN1/PTT2       0x11
//   18 FN2/f-light    0x12
// Digits 0-9 are their own codes 0-9.

use super::protocol::{RadioError, RadioResult};

/// Map one symbolic key token to its code.
fn key_code(key: &str) -> RadioResult<u8> {
    match key.to_ascii_lowercase().as_str() {
        "blue" | "menu" => Ok(10),
        "up" => Ok(11),
        "down" => Ok(12),
        "red" | "back" => Ok(13),
        "*" | "star" | "." => Ok(14),
        "#" => Ok(15),
        "ptt" => Ok(16),
        "f1" | "ptt2" => Ok(17),
        "f2" => Ok(18),
        k => match k.as_bytes() {
            &[d] if d.is_ascii_digit() => Ok(d - b'0'),
            _ => Err(RadioError::UnsupportedKey(key.to_string())),
        },
    }
}

/// Parse a comma-separated key sequence into key codes. Numeric tokens
/// are split into individual digit keys ("123" becomes 1, 2, 3; a '.'
/// inside a numeric token is the star key).
pub fn parse_key_sequence(sequence: &str) -> RadioResult<Vec<u8>> {
    let mut codes = Vec::new();

    for token in sequence.split(',') {
        if token.parse::<f64>().is_ok() {
            for c in token.chars() {
                codes.push(key_code(&c.to_string())?);
            }
        } else {
            codes.push(key_code(token)?);
        }
    }

    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_keys() {
        assert_eq!(parse_key_sequence("menu").unwrap(), [10]);
        assert_eq!(parse_key_sequence("BLUE").unwrap(), [10]);
        assert_eq!(parse_key_sequence("up,down,back").unwrap(), [11, 12, 13]);
        assert_eq!(parse_key_sequence("star,#,ptt").unwrap(), [14, 15, 16]);
        assert_eq!(parse_key_sequence("f1,f2").unwrap(), [17, 18]);
    }

    #[test]
    fn test_numeric_tokens_split_into_digits() {
        assert_eq!(parse_key_sequence("123").unwrap(), [1, 2, 3]);
        assert_eq!(parse_key_sequence("90").unwrap(), [9, 0]);
        assert_eq!(parse_key_sequence("menu,145.500").unwrap(), [10, 1, 4, 5, 14, 5, 0, 0]);
    }

    #[test]
    fn test_unsupported_keys() {
        assert!(parse_key_sequence("bogus").is_err());
        assert!(parse_key_sequence("menu,x").is_err());
    }
}
