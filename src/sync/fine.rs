//! Per-candidate Costas sync power, with optional frequency correction.
//!
//! Coherently integrates the downsampled candidate signal against each of
//! the three Costas blocks' known tones, applying an optional frequency
//! offset phasor first. Used both to refine a candidate's `(dt, df)`
//! estimate by local search and as the accept/reject gate before LLR
//! extraction.

use rustfft::num_complex::Complex;
use std::f32::consts::TAU;

use crate::submode::{Derived, SubmodeParams};

/// Coherent sync power for a downsampled candidate `cd0` at time offset
/// `i0` (samples) and frequency correction `delf` (Hz).
pub fn costas_sync_power(
    cd0: &[Complex<f32>],
    i0: i64,
    delf: f32,
    params: &SubmodeParams,
    derived: &Derived,
) -> f32 {
    let sample_rate_ds = crate::submode::SAMPLE_RATE as f32 / derived.ndown as f32;
    let dphi = TAU * delf / sample_rate_ds;

    let freq_adjust: Vec<Complex<f32>> = if delf != 0.0 {
        let mut phi = 0.0f32;
        (0..params.ndownsps)
            .map(|_| {
                let c = Complex::from_polar(1.0, phi);
                phi = (phi + dphi).rem_euclid(TAU);
                c
            })
            .collect()
    } else {
        vec![Complex::new(1.0, 0.0); params.ndownsps]
    };

    let mut sync = 0.0f32;
    for (p, block) in params.costas.iter().enumerate() {
        for (j, &tone) in block.iter().enumerate() {
            let offset = 36 * p as i64 * params.ndownsps as i64 + i0 + j as i64 * params.ndownsps as i64;
            if offset < 0 {
                continue;
            }
            let offset = offset as usize;
            if offset + params.ndownsps > cd0.len() {
                continue;
            }

            let tone_step = TAU * tone as f32 / params.ndownsps as f32;
            let mut acc = Complex::new(0.0f32, 0.0);
            for k in 0..params.ndownsps {
                let demod = Complex::from_polar(1.0, -tone_step * k as f32);
                acc += freq_adjust[k] * cd0[offset + k] * demod;
            }
            sync += acc.norm_sqr();
        }
    }
    sync
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submode::Submode;

    #[test]
    fn silence_has_zero_sync_power() {
        let params = Submode::Normal.params();
        let derived = params.derived();
        let cd0 = vec![Complex::new(0.0f32, 0.0); derived.np2];
        assert_eq!(costas_sync_power(&cd0, 0, 0.0, &params, &derived), 0.0);
    }
}
