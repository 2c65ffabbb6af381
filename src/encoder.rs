//! Top-level message encoder: text + frame type -> 79 transmittable tones.

use crate::costas::{MODIFIED, ORIGINAL};
use crate::crc::apply_crc12;
use crate::ldpc::encode::encode_message;
use crate::message::{pack_message, MessageError};
use crate::submode::Submode;
use crate::symbol;
use bitvec::prelude::*;

/// Encode `text` (up to 12 characters from [`crate::message::ALPHABET`])
/// with 3-bit frame `msg_type` into 79 tones for `submode`.
pub fn encode(text: &str, msg_type: u8, submode: Submode) -> Result<[u8; symbol::NN], MessageError> {
    let mut message = pack_message(text, msg_type)?;
    apply_crc12(&mut message);

    let codeword = encode_message(&message);
    let mut bits = bitvec![u8, Msb0; 0; 174];
    for (i, &bit) in codeword.iter().enumerate() {
        bits.set(i, bit != 0);
    }

    let costas = match submode {
        Submode::Normal => &ORIGINAL,
        _ => &MODIFIED,
    };

    let mut tones = [0u8; symbol::NN];
    symbol::map(&bits, costas, &mut tones).expect("codeword is always exactly 174 bits");
    Ok(tones)
}
