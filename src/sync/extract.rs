//! Per-symbol FFT and log-likelihood-ratio extraction.
//!
//! Each of the 58 data symbols carries 3 Gray-coded bits across 8 tones.
//! For every symbol we compute the power at all 8 candidate tones, then
//! derive each bit's LLR as the max-log approximation `max(power | bit=1)
//! - max(power | bit=0)`, grouping tones by their natural (pre-Gray) code
//! so the metric lines up with [`crate::symbol`]'s mapping.

use crate::fft::fft_forward;
use crate::submode::SubmodeParams;
use rustfft::num_complex::Complex;

const GRAY_MAP_INV: [u8; 8] = [0, 1, 3, 2, 6, 4, 5, 7];

/// Compute the 8 tone powers for every data symbol in the downsampled,
/// Costas-aligned candidate signal `cd`.
pub fn symbol_powers(cd: &[Complex<f32>], params: &SubmodeParams) -> [[f32; 8]; crate::symbol::ND] {
    let mut powers = [[0.0f32; 8]; crate::symbol::ND];
    let nsps = params.ndownsps;

    let mut k = 7usize;
    for j in 0..crate::symbol::ND {
        if j == 29 {
            k += 7;
        }
        let start = k * nsps;
        if start + nsps <= cd.len() {
            let mut buf = vec![Complex::new(0.0f32, 0.0); nsps];
            buf.copy_from_slice(&cd[start..start + nsps]);
            fft_forward(&mut buf);
            for (tone, slot) in powers[j].iter_mut().enumerate() {
                *slot = buf[tone].norm_sqr();
            }
        }
        k += 1;
    }
    powers
}

/// Derive the 174 codeword-bit LLRs from per-symbol tone powers.
pub fn extract_llrs(powers: &[[f32; 8]; crate::symbol::ND]) -> [f32; 174] {
    let mut llr = [0.0f32; 174];

    for (j, tone_powers) in powers.iter().enumerate() {
        for bit_pos in 0..3usize {
            let shift = 2 - bit_pos;
            let mut max0 = f32::NEG_INFINITY;
            let mut max1 = f32::NEG_INFINITY;
            for tone in 0..8usize {
                let natural = GRAY_MAP_INV[tone];
                let power = tone_powers[tone];
                if (natural >> shift) & 1 == 0 {
                    max0 = max0.max(power);
                } else {
                    max1 = max1.max(power);
                }
            }
            llr[3 * j + bit_pos] = max1 - max0;
        }
    }

    normalize_llr(&mut llr);
    llr
}

/// Rescale LLRs so their RMS magnitude is close to unity, the scale the
/// belief-propagation decoder's `platanh` approximation assumes.
fn normalize_llr(llr: &mut [f32; 174]) {
    let mean_sq: f32 = llr.iter().map(|v| v * v).sum::<f32>() / llr.len() as f32;
    let rms = mean_sq.sqrt();
    if rms > 1e-6 {
        for v in llr.iter_mut() {
            *v /= rms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_single_tone_per_symbol_gives_confident_llrs() {
        let mut powers = [[0.1f32; 8]; crate::symbol::ND];
        for p in powers.iter_mut() {
            p[7] = 100.0; // natural code 0b111 -> all three bits 1
        }
        let llr = extract_llrs(&powers);
        assert!(llr[0] > 0.0 && llr[1] > 0.0 && llr[2] > 0.0);
    }

    #[test]
    fn flat_powers_give_zero_llr() {
        let powers = [[1.0f32; 8]; crate::symbol::ND];
        let llr = extract_llrs(&powers);
        assert!(llr.iter().all(|&v| v.abs() < 1e-6));
    }
}
