//! LDPC(174,87) systematic encoder.
//!
//! The generator matrix is `[P | I_K]`: row `i` carries parity pattern
//! `P[i]` in columns `0..K` and a single 1 at column `K+i`. Encoding a
//! message is therefore a GF(2) matrix-vector product, XORing in the
//! generator rows for every set message bit (`mrbencode` in the reference
//! decoder, reused as-is by ordered statistics decoding in [`super::osd`]
//! against a row-reduced copy of the same matrix).

use super::constants::*;

/// XOR together the generator rows selected by `message` (`mrbencode`).
pub fn mrbencode(message: &[u8; K], generator: &[[u8; N]; K]) -> [u8; N] {
    let mut codeword = [0u8; N];
    for (i, &bit) in message.iter().enumerate() {
        if bit == 1 {
            for (c, g) in codeword.iter_mut().zip(generator[i].iter()) {
                *c ^= g;
            }
        }
    }
    codeword
}

/// The full standard-order generator matrix, built once from the hex tables.
pub fn generator_matrix() -> [[u8; N]; K] {
    let mut rows = [[0u8; N]; K];
    for (i, row) in rows.iter_mut().enumerate() {
        *row = generator_row(i);
    }
    rows
}

/// Encode an 87-bit message into a 174-bit codeword.
pub fn encode_message(message: &[u8; K]) -> [u8; N] {
    mrbencode(message, &generator_matrix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_message_encodes_to_all_zero_codeword() {
        let message = [0u8; K];
        let cw = encode_message(&message);
        assert!(cw.iter().all(|&b| b == 0));
    }

    #[test]
    fn message_bits_land_in_the_upper_k_codeword_positions() {
        let mut message = [0u8; K];
        message[5] = 1;
        message[70] = 1;
        let cw = encode_message(&message);
        assert_eq!(&cw[K..], &message[..]);
    }

    #[test]
    fn codeword_satisfies_every_parity_check() {
        let mut message = [0u8; K];
        for i in (0..K).step_by(3) {
            message[i] = 1;
        }
        let cw = encode_message(&message);
        for row in NM.iter() {
            let parity: u8 = (0..row.valid).map(|j| cw[row.neighbors[j]]).fold(0, |a, b| a ^ b);
            assert_eq!(parity, 0);
        }
    }
}
