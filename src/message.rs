//! The 12-character, 64-symbol alphabet JS8 packs into the 87-bit message.
//!
//! Layout of the 87-bit message: 12 six-bit characters (bits 0..72), a
//! 3-bit frame type (bits 72..75), then the CRC-12 (bits 75..87, see
//! [`crate::crc`]).

use snafu::Snafu;

pub const ALPHABET: &str =
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-+";

pub const MESSAGE_CHARS: usize = 12;
pub const MESSAGE_BITS: usize = 87;

#[derive(Debug, Snafu)]
pub enum MessageError {
    #[snafu(display("message must be exactly {MESSAGE_CHARS} characters, got {len}"))]
    WrongLength { len: usize },
    #[snafu(display("character {c:?} is not in the JS8 64-symbol alphabet"))]
    InvalidChar { c: char },
    #[snafu(display("frame type must fit in 3 bits, got {value}"))]
    InvalidType { value: u8 },
}

/// Reverse-lookup a character's 6-bit alphabet word.
pub fn alphabet_word(c: char) -> Option<u8> {
    ALPHABET.find(c).map(|pos| pos as u8)
}

/// Pack a 12-character message and 3-bit frame type into the 87-bit
/// message layout (CRC bits left zero; see [`crate::crc::apply_crc12`]).
pub fn pack_message(text: &str, msg_type: u8) -> Result<[u8; MESSAGE_BITS], MessageError> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() != MESSAGE_CHARS {
        return Err(MessageError::WrongLength { len: chars.len() });
    }
    if msg_type > 0b111 {
        return Err(MessageError::InvalidType { value: msg_type });
    }

    let mut bits = [0u8; MESSAGE_BITS];
    for (i, &c) in chars.iter().enumerate() {
        let word = alphabet_word(c).ok_or(MessageError::InvalidChar { c })?;
        for b in 0..6 {
            bits[i * 6 + b] = (word >> (5 - b)) & 1;
        }
    }
    for b in 0..3 {
        bits[72 + b] = (msg_type >> (2 - b)) & 1;
    }
    Ok(bits)
}

/// Unpack the 12-character message from an 87-bit decoded message,
/// without checking its CRC (callers check separately; see
/// [`crate::crc::check_crc12`]).
pub fn unpack_message(bits: &[u8; MESSAGE_BITS]) -> String {
    let mut out = String::with_capacity(MESSAGE_CHARS);
    for i in 0..MESSAGE_CHARS {
        let mut word = 0u8;
        for b in 0..6 {
            word = (word << 1) | bits[i * 6 + b];
        }
        out.push(ALPHABET.as_bytes()[word as usize] as char);
    }
    out
}

/// Extract the 3-bit frame type (bits 72..75).
pub fn message_type(bits: &[u8; MESSAGE_BITS]) -> u8 {
    (bits[72] << 2) | (bits[73] << 1) | bits[74]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_word_matches_known_anchors() {
        assert_eq!(alphabet_word('0'), Some(0));
        assert_eq!(alphabet_word('A'), Some(10));
        assert_eq!(alphabet_word('a'), Some(36));
        assert_eq!(alphabet_word('-'), Some(62));
        assert_eq!(alphabet_word('+'), Some(63));
    }

    #[test]
    fn pack_then_unpack_round_trips_text_and_type() {
        let text = "CQCQCQN0YPR1";
        let bits = pack_message(text, 5).unwrap();
        assert_eq!(unpack_message(&bits), text);
        assert_eq!(message_type(&bits), 5);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(pack_message("TOOSHORT", 0), Err(MessageError::WrongLength { .. })));
    }

    #[test]
    fn rejects_char_outside_alphabet() {
        assert!(matches!(pack_message("CQCQCQN0YPR!", 0), Err(MessageError::InvalidChar { .. })));
    }
}
