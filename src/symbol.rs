//! LDPC codeword <-> 8-FSK tone mapping.
//!
//! A 174-bit codeword becomes 79 symbols: three 7-tone Costas sync blocks
//! (positions 0-6, 36-42, 72-78) framing two 29-symbol data blocks. The
//! first data block (positions 7-35) carries the 87 parity bits (codeword
//! bits 0..87); the second (positions 43-71) carries the 87 message bits
//! (codeword bits 87..174) unchanged. Each symbol's tone is simply its 3
//! codeword bits read as an MSB-first binary number — unlike FT8, JS8 does
//! not Gray-code its tones. The sync blocks use whichever Costas pattern
//! the active submode assigns ([`crate::costas::ORIGINAL`] for Normal,
//! [`crate::costas::MODIFIED`] for the others).

use bitvec::prelude::*;

pub const ND: usize = 58;
pub const NS: usize = 21;
pub const NN: usize = 79;

/// Map a 174-bit codeword to 79 tones using `costas` for the three sync blocks.
pub fn map(
    codeword: &BitSlice<u8, Msb0>,
    costas: &[[u8; 7]; 3],
    symbols: &mut [u8; NN],
) -> Result<(), String> {
    if codeword.len() != 174 {
        return Err(format!("codeword must be exactly 174 bits, got {}", codeword.len()));
    }

    symbols[0..7].copy_from_slice(&costas[0]);
    symbols[36..43].copy_from_slice(&costas[1]);
    symbols[72..79].copy_from_slice(&costas[2]);

    let mut k = 7;
    for j in 0..ND {
        let i = 3 * j;
        if j == 29 {
            k += 7;
        }
        let bit0 = codeword[i] as u8;
        let bit1 = codeword[i + 1] as u8;
        let bit2 = codeword[i + 2] as u8;
        symbols[k] = (bit0 << 2) | (bit1 << 1) | bit2;
        k += 1;
    }

    Ok(())
}

/// Demap 79 received tones back to a 174-bit codeword, ignoring sync positions.
pub fn demap(symbols: &[u8; NN], codeword: &mut BitSlice<u8, Msb0>) -> Result<(), String> {
    if codeword.len() != 174 {
        return Err(format!("codeword must be exactly 174 bits, got {}", codeword.len()));
    }

    let mut k = 7;
    for j in 0..ND {
        let i = 3 * j;
        if j == 29 {
            k += 7;
        }
        let indx = symbols[k];
        codeword.set(i, (indx & 0b100) != 0);
        codeword.set(i + 1, (indx & 0b010) != 0);
        codeword.set(i + 2, (indx & 0b001) != 0);
        k += 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costas::ORIGINAL;

    #[test]
    fn constants_match_the_79_symbol_frame() {
        assert_eq!(NN, ND + NS);
        assert_eq!(NN, 79);
    }

    #[test]
    fn zero_codeword_maps_to_all_zero_data_tones() {
        let storage = [0u8; 22];
        let codeword = &storage.view_bits::<Msb0>()[..174];
        let mut symbols = [0u8; NN];
        map(codeword, &ORIGINAL, &mut symbols).unwrap();
        assert_eq!(&symbols[0..7], &ORIGINAL[0]);
        assert!(symbols[7..36].iter().all(|&t| t == 0));
        assert!(symbols[43..72].iter().all(|&t| t == 0));
    }

    #[test]
    fn map_then_demap_round_trips() {
        let mut storage = [0u8; 22];
        let codeword = &mut storage.view_bits_mut::<Msb0>()[..174];
        for i in (0..174).step_by(5) {
            codeword.set(i, true);
        }
        let mut symbols = [0u8; NN];
        map(codeword, &ORIGINAL, &mut symbols).unwrap();

        let mut recovered_storage = [0u8; 22];
        let recovered = &mut recovered_storage.view_bits_mut::<Msb0>()[..174];
        demap(&symbols, recovered).unwrap();

        for i in 0..174 {
            assert_eq!(recovered[i], codeword[i], "bit mismatch at {i}");
        }
    }

    #[test]
    fn rejects_wrong_length_codeword() {
        let storage = [0u8; 10];
        let codeword = &storage.view_bits::<Msb0>()[..80];
        let mut symbols = [0u8; NN];
        assert!(map(codeword, &ORIGINAL, &mut symbols).is_err());
    }
}
