//! Nuttall-windowed overlapping symbol spectra.
//!
//! Every `NSTEP` samples, a window of `NFFT1` samples is multiplied by a
//! 4-term Nuttall window and FFT'd; the squared magnitude of each bin
//! across all `NHSYM` windows forms the 2D power surface the sync search
//! and downstream decode both read from.

use crate::fft::fft_forward;
use crate::submode::{Derived, SubmodeParams};
use rustfft::num_complex::Complex;

/// 4-term Nuttall window, normalized so its samples sum to `n / 300`.
/// The `300` divisor and the exact coefficients are carried over from the
/// reference decoder's Fortran-compatible window generation.
pub fn nuttall_window(n: usize) -> Vec<f32> {
    const A0: f32 = 0.3635819;
    const A1: f32 = -0.4891775;
    const A2: f32 = 0.1365995;
    const A3: f32 = -0.0106411;

    let mut window = vec![0.0f32; n];
    // Kahan summation: the window sum feeds directly into the scale factor
    // every symbol spectrum is normalized by, so rounding drift here would
    // bias every downstream power value by a shared, slowly-varying factor.
    let mut sum = 0.0f32;
    let mut compensation = 0.0f32;
    for (i, w) in window.iter_mut().enumerate() {
        let x = i as f32 / n as f32;
        let value = A0
            + A1 * (2.0 * std::f32::consts::PI * x).cos()
            + A2 * (4.0 * std::f32::consts::PI * x).cos()
            + A3 * (6.0 * std::f32::consts::PI * x).cos();
        *w = value;
        let y = value - compensation;
        let t = sum + y;
        compensation = (t - sum) - y;
        sum = t;
    }
    let scale = n as f32 / (sum * 300.0);
    for w in window.iter_mut() {
        *w *= scale;
    }
    window
}

/// Windowed power spectrum across the whole receive period: `s[freq][time]`
/// and its time-average `savg[freq]`.
pub struct SymbolSpectra {
    pub s: Vec<Vec<f32>>,
    pub savg: Vec<f32>,
}

/// Compute the overlapping symbol spectra over the decimated buffer `dd`.
pub fn compute_symbol_spectra(dd: &[i16], params: &SubmodeParams, derived: &Derived) -> SymbolSpectra {
    let window = nuttall_window(derived.nfft1);
    let mut s = vec![vec![0.0f32; derived.nhsym]; params.nsps];
    let mut savg = vec![0.0f32; params.nsps];

    for j in 0..derived.nhsym {
        let ia = j * derived.nstep;
        let ib = ia + derived.nfft1;
        if ib > derived.nmax || ib > dd.len() {
            break;
        }

        let mut buf: Vec<Complex<f32>> = dd[ia..ib]
            .iter()
            .zip(window.iter())
            .map(|(&sample, &w)| Complex::new(sample as f32 * w, 0.0))
            .collect();
        fft_forward(&mut buf);

        for i in 0..params.nsps {
            let power = buf[i].norm_sqr();
            s[i][j] = power;
            savg[i] += power;
        }
    }

    SymbolSpectra { s, savg }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nuttall_window_is_symmetric_about_its_midpoint() {
        let w = nuttall_window(64);
        for i in 1..32 {
            assert!((w[i] - w[64 - i]).abs() < 1e-5);
        }
    }

    #[test]
    fn nuttall_window_tapers_to_near_zero_at_edges() {
        let w = nuttall_window(256);
        assert!(w[0].abs() < w[128].abs());
    }
}
