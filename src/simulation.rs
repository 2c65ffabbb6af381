//! Synthetic-signal test tooling: noise generation, fading, and mixing
//! helpers used by the decoder's own test suite to build known-SNR
//! fixtures. Not part of the public decode/encode API.
#![allow(unused)]

use std::f32::consts::PI;

use rand::prelude::*;
use rand_distr::{Distribution, Normal, Uniform};

use crate::submode::SAMPLE_RATE;

pub const QSB_FREQ_HZ: f32 = 0.2;
pub const FLUTTER_FREQ_HZ: f32 = 20.0;

/// Compute RMS power of a signal.
pub fn rms_power(signal: &[f32]) -> f32 {
    let sum_squares: f32 = signal.iter().map(|&x| x * x).sum();
    (sum_squares / signal.len() as f32).sqrt()
}

/// Mix `waveform` into `samples` at `start_index`, scaled to the SNR
/// (dB, 2500Hz noise-reference bandwidth) implied by `noise_rms`.
pub fn mix_waveform(samples: &mut [f32], noise_rms: f32, waveform: &[f32], start_index: usize, snr_db: f32) {
    assert!(waveform.len() <= samples.len(), "waveform must not be longer than samples");

    let snr_linear = 10.0_f32.powf(snr_db / 10.0);
    let desired_signal_rms = (noise_rms / (2500.0 / SAMPLE_RATE as f32)) * snr_linear;
    let signal_rms = rms_power(waveform);
    let scaling_factor = desired_signal_rms / signal_rms;

    for (i, &wave_sample) in waveform.iter().enumerate() {
        let target_index = start_index + i;
        if target_index >= samples.len() {
            break;
        }
        samples[target_index] += wave_sample * scaling_factor;
    }
}

pub fn generate_white_noise(num_samples: usize, sigma: f32) -> Vec<f32> {
    let mut rng = rand::rng();
    let normal = Normal::new(0.0, sigma).unwrap();
    (0..num_samples).map(|_| normal.sample(&mut rng)).collect()
}

/// Paul Kellett's pink noise filter approximation.
pub fn generate_pink_noise(num_samples: usize, sigma: f32) -> Vec<f32> {
    let mut rng = rand::rng();
    let normal = Normal::new(0.0, sigma).unwrap();
    let mut pink = vec![0.0f32; num_samples];
    let mut state = [0.0f32; 7];

    for sample in pink.iter_mut() {
        let white = normal.sample(&mut rng);
        state[0] = 0.99886 * state[0] + white * 0.0555179;
        state[1] = 0.99332 * state[1] + white * 0.0750759;
        state[2] = 0.96900 * state[2] + white * 0.1538520;
        state[3] = 0.86650 * state[3] + white * 0.3104856;
        state[4] = 0.55000 * state[4] + white * 0.5329522;
        state[5] = -0.7616 * state[5] - white * 0.0168980;
        *sample = state.iter().take(7).sum::<f32>() + white * 0.5362;
        state[6] = white * 0.115926;
    }
    pink
}

/// Slow amplitude fading (QSB).
pub fn apply_qsb(samples: &[f32], sample_rate: u32, qsb_freq: f32) -> Vec<f32> {
    samples
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let phase = 2.0 * PI * qsb_freq * (i as f32 / sample_rate as f32);
            s * 0.5 * (1.0 + phase.sin())
        })
        .collect()
}

/// Fast amplitude wobble (flutter).
pub fn apply_fluttering(samples: &[f32], sample_rate: u32, flutter_freq: f32) -> Vec<f32> {
    samples
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let phase = 2.0 * PI * flutter_freq * (i as f32 / sample_rate as f32);
            s * (0.9 + 0.1 * phase.sin())
        })
        .collect()
}

pub fn add_random_spikes(samples: &mut [f32], spike_probability: f32) {
    let mut rng = rand::rng();
    let spike_dist = Uniform::new(-1.5, 1.5).unwrap();
    for sample in samples.iter_mut() {
        if rng.random::<f32>() < spike_probability {
            *sample += spike_dist.sample(&mut rng);
        }
    }
}

pub fn normalize_signal(signal: &mut [f32]) {
    let (min_value, max_value) = signal
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &x| (min.min(x), max.max(x)));

    let scale_factor = if max_value == min_value { 1.0 } else { 2.0 / (max_value - min_value) };
    let offset = if max_value == min_value { 0.0 } else { -(max_value + min_value) / (max_value - min_value) };

    for sample in signal.iter_mut() {
        *sample = scale_factor * (*sample) + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_signal_maps_into_unit_range() {
        let mut signal = vec![-5.0f32, 0.0, 10.0];
        normalize_signal(&mut signal);
        assert!((signal[0] - (-1.0)).abs() < 1e-5);
        assert!((signal[2] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn white_noise_has_roughly_the_requested_sigma() {
        let noise = generate_white_noise(20_000, 2.0);
        let rms = rms_power(&noise);
        assert!((rms - 2.0).abs() < 0.2, "rms {rms} far from sigma 2.0");
    }
}
