//! Signal subtraction: removes a decoded signal from the decimated buffer
//! so a weaker, overlapping signal can be found on a later pass.
//!
//! Matched-filter amplitude/phase estimate, then subtract: mix the
//! synthesized reference against the buffer, low-pass filter the product
//! in the frequency domain to isolate the slowly-varying complex gain, and
//! subtract the reconstructed signal from the original samples.

use rustfft::num_complex::Complex;

use crate::fft::{fft_forward, fft_inverse_normalized};
use crate::submode::{SubmodeParams, SAMPLE_RATE};
use crate::sync::synthesize_reference;

/// Subtract the signal for `tones` at `f0` Hz from `dd` in place. `dt` is
/// the candidate's time offset in seconds (may be negative: the reference
/// can start before the window `dd` covers, in which case its head is
/// clipped rather than the whole subtraction skipped).
pub fn subtract_signal(dd: &mut [i16], dt: f32, tones: &[u8; crate::symbol::NN], f0: f32, params: &SubmodeParams) {
    let reference = synthesize_reference(tones, f0, params);
    let n = reference.len();

    // nstart is the reference's sample offset into dd; it may be negative,
    // matching the reference decoder's `nstart = round(xdt * 12000)`.
    let nstart = (dt * SAMPLE_RATE as f32).round() as i64;
    let ref_start = (-nstart).max(0) as usize;
    let dd_start = nstart.max(0) as usize;
    if ref_start >= n || dd_start >= dd.len() {
        return;
    }
    let overlap = (n - ref_start).min(dd.len() - dd_start);
    if overlap == 0 {
        return;
    }
    let reference = &reference[ref_start..ref_start + overlap];

    let audio: Vec<Complex<f32>> = dd[dd_start..dd_start + overlap]
        .iter()
        .map(|&s| Complex::new(s as f32, 0.0))
        .collect();

    // camp(t) = audio(t) * conj(reference(t))
    let mut camp: Vec<Complex<f32>> = audio
        .iter()
        .zip(reference.iter())
        .map(|(a, r)| a * r.conj())
        .collect();

    // Low-pass filter camp in the frequency domain: keep only the lowest
    // bins (the complex gain varies slowly compared to the carrier).
    fft_forward(&mut camp);
    let cutoff = (overlap / 64).max(1);
    for (i, c) in camp.iter_mut().enumerate() {
        let dist = i.min(overlap - i);
        if dist > cutoff {
            *c = Complex::new(0.0, 0.0);
        }
    }
    fft_inverse_normalized(&mut camp);

    for i in 0..overlap {
        let reconstructed = 2.0 * (reference[i] * camp[i]).re;
        let sample = dd[dd_start + i] as f32 - reconstructed;
        dd[dd_start + i] = sample.round().clamp(i16::MIN as f32, i16::MAX as f32) as i16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submode::Submode;

    #[test]
    fn subtracting_an_exact_match_reduces_signal_energy() {
        let params = Submode::Normal.params();
        let tones = [0u8; crate::symbol::NN];
        let reference = synthesize_reference(&tones, 1500.0, &params);
        let n = reference.len();

        let mut dd: Vec<i16> = reference.iter().map(|c| (c.re * 1000.0) as i16).collect();
        let before_energy: i64 = dd.iter().map(|&s| (s as i64) * (s as i64)).sum();

        subtract_signal(&mut dd, 0.0, &tones, 1500.0, &params);
        let after_energy: i64 = dd.iter().map(|&s| (s as i64) * (s as i64)).sum();

        assert!(after_energy < before_energy);
        let _ = n;
    }

    #[test]
    fn negative_dt_clips_the_reference_head_instead_of_skipping_subtraction() {
        let params = Submode::Normal.params();
        let tones = [0u8; crate::symbol::NN];
        let reference = synthesize_reference(&tones, 1500.0, &params);

        // The signal started half a symbol before the window: only the
        // tail of the reference overlaps `dd`.
        let shift = params.nsps / 2;
        let mut dd: Vec<i16> = reference[shift..].iter().map(|c| (c.re * 1000.0) as i16).collect();
        let before_energy: i64 = dd.iter().map(|&s| (s as i64) * (s as i64)).sum();

        let dt = -(shift as f32) / crate::submode::SAMPLE_RATE as f32;
        subtract_signal(&mut dd, dt, &tones, 1500.0, &params);
        let after_energy: i64 = dd.iter().map(|&s| (s as i64) * (s as i64)).sum();

        assert!(after_energy < before_energy);
    }
}
