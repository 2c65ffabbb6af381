//! Baseband conversion and per-candidate narrowband downsampling.
//!
//! Mirrors the reference decoder's `computeBasebandFFT`/`js8_downsample`
//! pair: the whole decimated buffer is FFT'd once per decode pass, then
//! each candidate's narrowband signal is cut from that spectrum, tapered at
//! its edges, recentered on DC, and inverse-FFT'd back to a short complex
//! time series at the submode's downsampled rate.

use crate::fft::{fft_forward, fft_inverse_normalized};
use crate::submode::{Derived, SubmodeParams};
use rustfft::num_complex::Complex;

/// Zero-padded real-to-complex FFT of the full decimated buffer, used once
/// per decode pass and sliced per-candidate by [`js8_downsample`].
pub fn compute_baseband_fft(dd: &[i16], n: usize) -> Vec<Complex<f32>> {
    let mut buf: Vec<Complex<f32>> = (0..n)
        .map(|i| Complex::new(dd.get(i).copied().unwrap_or(0) as f32, 0.0))
        .collect();
    fft_forward(&mut buf);
    buf
}

/// Half-width, in FFT bins of the `ndfft1`-point baseband spectrum, of the
/// cosine-tapered transition region at each edge of the narrowband cut.
const TAPER_BINS: usize = 30;

/// Cut, recenter and inverse-FFT the narrowband signal around `f0` (Hz).
///
/// Returns a complex time series of length `derived.np2`, sampled at
/// `SAMPLE_RATE / derived.ndown`.
pub fn js8_downsample(
    baseband: &[Complex<f32>],
    f0: f32,
    params: &SubmodeParams,
    derived: &Derived,
) -> Vec<Complex<f32>> {
    let bin_width = crate::submode::SAMPLE_RATE as f32 / derived.ndfft1 as f32;
    let center_bin = (f0 / bin_width).round() as i64;
    let half = (derived.ndfft2 / 2) as i64;

    let mut cut = vec![Complex::new(0.0f32, 0.0); derived.ndfft2];
    for (k, slot) in cut.iter_mut().enumerate() {
        let src_offset = k as i64 - half;
        let src = center_bin + src_offset;
        let src = src.rem_euclid(derived.ndfft1 as i64) as usize;
        if src < baseband.len() {
            let mut taper = 1.0f32;
            let dist_from_edge = (half - src_offset.abs()).max(0);
            if dist_from_edge < TAPER_BINS as i64 {
                let x = dist_from_edge as f32 / TAPER_BINS as f32;
                taper = 0.5 - 0.5 * (std::f32::consts::PI * x).cos();
            }
            *slot = baseband[src] * taper;
        }
    }

    // Cyclic rotation so the candidate's center frequency lands on DC
    // before the inverse FFT, matching the reference decoder's approach
    // of building the cut spectrum pre-centered rather than rotating
    // afterward in the time domain.
    let half_n = cut.len() / 2;
    cut.rotate_left(half_n);

    fft_inverse_normalized(&mut cut);

    let _ = params;
    let n = derived.np2.min(cut.len());
    cut.truncate(n);
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submode::Submode;

    #[test]
    fn downsample_of_silence_is_silence() {
        let params = Submode::Normal.params();
        let derived = params.derived();
        let baseband = vec![Complex::new(0.0f32, 0.0); derived.ndfft1];
        let out = js8_downsample(&baseband, 1500.0, &params, &derived);
        assert!(out.iter().all(|c| c.norm() < 1e-6));
    }
}
