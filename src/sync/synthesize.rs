//! Synthesize a complex reference signal from a decoded tone sequence, for
//! later subtraction from the decimated buffer.

use rustfft::num_complex::Complex;
use std::f32::consts::TAU;

use crate::submode::SubmodeParams;

/// Build the complex baseband reference signal for `tones` (79 values,
/// 0-7), centered at `f0` Hz, at the submode's full (non-downsampled) rate.
pub fn synthesize_reference(tones: &[u8; crate::symbol::NN], f0: f32, params: &SubmodeParams) -> Vec<Complex<f32>> {
    let baud = crate::submode::SAMPLE_RATE as f32 / params.nsps as f32;
    let tone_spacing = baud;
    let mut signal = Vec::with_capacity(params.nsps * crate::symbol::NN);
    let mut phase = 0.0f32;

    for &tone in tones.iter() {
        let freq = f0 + tone as f32 * tone_spacing;
        let dphi = TAU * freq / crate::submode::SAMPLE_RATE as f32;
        for _ in 0..params.nsps {
            signal.push(Complex::from_polar(1.0, phase));
            phase = (phase + dphi).rem_euclid(TAU);
        }
    }

    signal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submode::Submode;

    #[test]
    fn synthesized_signal_has_unit_amplitude_throughout() {
        let params = Submode::Normal.params();
        let tones = [0u8; crate::symbol::NN];
        let signal = synthesize_reference(&tones, 1500.0, &params);
        assert_eq!(signal.len(), params.nsps * crate::symbol::NN);
        for c in signal.iter().step_by(997) {
            assert!((c.norm() - 1.0).abs() < 1e-4);
        }
    }
}
