//! Cached FFT plans for the JS8 decode pipeline.
//!
//! JS8's FFT sizes (symbol spectra, baseband conversion, downsampling,
//! signal subtraction) are not powers of two, so plans are built through
//! `rustfft`'s general-purpose planner (Bluestein's algorithm covers the
//! non-power-of-2 sizes) and cached per size, since `FftPlanner::plan_*`
//! does nontrivial work for awkward sizes and the same few sizes recur
//! every decode pass.

use once_cell::sync::Lazy;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

static FORWARD_CACHE: Lazy<Mutex<HashMap<usize, Arc<dyn Fft<f32>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));
static INVERSE_CACHE: Lazy<Mutex<HashMap<usize, Arc<dyn Fft<f32>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn get_forward_plan(n: usize) -> Arc<dyn Fft<f32>> {
    let mut cache = FORWARD_CACHE.lock().unwrap();
    cache
        .entry(n)
        .or_insert_with(|| FftPlanner::new().plan_fft_forward(n))
        .clone()
}

fn get_inverse_plan(n: usize) -> Arc<dyn Fft<f32>> {
    let mut cache = INVERSE_CACHE.lock().unwrap();
    cache
        .entry(n)
        .or_insert_with(|| FftPlanner::new().plan_fft_inverse(n))
        .clone()
}

/// In-place forward FFT over a complex buffer.
pub fn fft_forward(buffer: &mut [Complex<f32>]) {
    get_forward_plan(buffer.len()).process(buffer);
}

/// In-place inverse FFT, unnormalized (matches rustfft: caller divides by `n`).
pub fn fft_inverse(buffer: &mut [Complex<f32>]) {
    get_inverse_plan(buffer.len()).process(buffer);
}

/// Inverse FFT normalized by `1/n`, the convention used throughout the
/// decode pipeline (baseband downsampling, signal subtraction).
pub fn fft_inverse_normalized(buffer: &mut [Complex<f32>]) {
    let n = buffer.len();
    fft_inverse(buffer);
    let scale = 1.0 / n as f32;
    for c in buffer.iter_mut() {
        *c *= scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_then_inverse_recovers_signal_for_non_power_of_two_size() {
        let n = 1920 * 100; // NDFFT1 for mode A: not a power of two
        let mut buf: Vec<Complex<f32>> = (0..n)
            .map(|i| Complex::new((i as f32 * 0.001).sin(), 0.0))
            .collect();
        let original = buf.clone();

        fft_forward(&mut buf);
        fft_inverse_normalized(&mut buf);

        for (a, b) in buf.iter().zip(original.iter()) {
            assert!((a.re - b.re).abs() < 1e-2, "{} vs {}", a.re, b.re);
        }
    }

    #[test]
    fn dc_signal_concentrates_in_bin_zero() {
        let n = 600 * 120; // NDFFT1 for mode C
        let mut buf = vec![Complex::new(1.0f32, 0.0); n];
        fft_forward(&mut buf);
        assert!((buf[0].re - n as f32).abs() < 1.0);
    }
}
