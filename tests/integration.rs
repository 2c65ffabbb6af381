//! End-to-end encode -> channel -> decode scenarios for the Normal
//! submode, covering the empty-buffer, clean-signal, overlapping-frame,
//! noisy-weak-signal, sub-threshold and CRC-poisoning cases.

use bitvec::prelude::*;

use js8phy::crc::apply_crc12;
use js8phy::ldpc::{encode_message, generator_matrix};
use js8phy::message::pack_message;
use js8phy::simulation::{generate_white_noise, mix_waveform, rms_power};
use js8phy::submode::{Submode, NN};
use js8phy::sync::synthesize_reference;
use js8phy::symbol::map as symbol_map;
use js8phy::{decode_pass, encode, JobParams};

const AMPLITUDE: f32 = 8000.0;

fn zero_buffer(submode: Submode) -> Vec<i16> {
    vec![0i16; submode.params().derived().nmax]
}

fn job_for(nfa: i32, nfb: i32, nfqso: i32, submode: Submode) -> JobParams {
    JobParams { nfa, nfb, nfqso, ndepth: 3, enabled_submodes: submode.params().bit as u32, ..Default::default() }
}

/// Encode `text`/`msg_type`, synthesize its tones at `freq_hz`, and place it
/// into a fresh full-length buffer for `submode` at sample offset 0.
fn synthesize_frame(text: &str, msg_type: u8, submode: Submode, freq_hz: f32) -> Vec<i16> {
    let params = submode.params();
    let tones = encode(text, msg_type, submode).expect("valid message");
    let complex = synthesize_reference(&tones, freq_hz, &params);

    let mut buf = zero_buffer(submode);
    for (i, c) in complex.iter().enumerate() {
        if i >= buf.len() {
            break;
        }
        buf[i] = (c.re * AMPLITUDE) as i16;
    }
    buf
}

fn mix_into(a: &mut [i16], b: &[i16]) {
    for (x, &y) in a.iter_mut().zip(b.iter()) {
        *x = x.saturating_add(y);
    }
}

#[test]
fn empty_buffer_yields_no_decodes() {
    let mut buf = zero_buffer(Submode::Normal);
    let job = job_for(500, 2500, 1500, Submode::Normal);
    let generator = generator_matrix();

    let decoded = decode_pass(&mut buf, Submode::Normal, &job, &generator);
    assert!(decoded.is_empty(), "expected no decodes from silence, got {decoded:?}");
}

#[test]
fn clean_signal_decodes_exactly() {
    let mut buf = synthesize_frame("HELLOWORLD12", 0, Submode::Normal, 1500.0);
    let job = job_for(500, 2500, 1500, Submode::Normal);
    let generator = generator_matrix();

    let decoded = decode_pass(&mut buf, Submode::Normal, &job, &generator);
    assert_eq!(decoded.len(), 1, "expected exactly one decode, got {decoded:?}");

    let d = &decoded[0];
    assert_eq!(d.text, "HELLOWORLD12");
    assert_eq!(d.msg_type, 0);
    assert!((d.freq - 1500.0).abs() < 2.0, "freq off by too much: {}", d.freq);
    assert!(d.dt.abs() < 0.05, "dt off by too much: {}", d.dt);
    assert!(d.quality > 0.9, "expected a clean decode to report high quality, got {}", d.quality);
}

#[test]
fn two_overlapping_frames_both_decode() {
    let mut buf = synthesize_frame("CQCQCQN0YPR1", 0, Submode::Normal, 1500.0);
    let second = synthesize_frame("K1ABCW9XYZRR", 0, Submode::Normal, 1800.0);
    mix_into(&mut buf, &second);

    let job = job_for(500, 2500, 1500, Submode::Normal);
    let generator = generator_matrix();

    let decoded = decode_pass(&mut buf, Submode::Normal, &job, &generator);
    let texts: Vec<&str> = decoded.iter().map(|d| d.text.as_str()).collect();
    assert!(texts.contains(&"CQCQCQN0YPR1"), "missing first frame, got {texts:?}");
    assert!(texts.contains(&"K1ABCW9XYZRR"), "missing second frame, got {texts:?}");
}

#[test]
fn weak_signal_in_noise_still_decodes() {
    let submode = Submode::Normal;
    let params = submode.params();
    let nmax = params.derived().nmax;

    let tones = encode("TEST12345678", 3, submode).unwrap();
    let waveform: Vec<f32> = synthesize_reference(&tones, 2000.0, &params).iter().map(|c| c.re).collect();

    let mut samples = generate_white_noise(nmax, 1.0);
    let noise_rms = rms_power(&samples);
    mix_waveform(&mut samples, noise_rms, &waveform, 0, -18.0);

    let mut buf: Vec<i16> = samples.iter().map(|&s| (s * (AMPLITUDE / 4.0)).clamp(-32768.0, 32767.0) as i16).collect();
    buf.resize(nmax, 0);

    let job = job_for(500, 2500, 2000, submode);
    let generator = generator_matrix();
    let decoded = decode_pass(&mut buf, submode, &job, &generator);

    assert!(decoded.iter().any(|d| d.text == "TEST12345678"), "expected weak frame to decode, got {decoded:?}");
}

#[test]
fn sub_threshold_signal_does_not_decode() {
    let submode = Submode::Normal;
    let params = submode.params();
    let nmax = params.derived().nmax;

    let tones = encode("CQCQCQN0YPR1", 0, submode).unwrap();
    let waveform: Vec<f32> = synthesize_reference(&tones, 1600.0, &params).iter().map(|c| c.re).collect();

    let mut samples = generate_white_noise(nmax, 1.0);
    let noise_rms = rms_power(&samples);
    mix_waveform(&mut samples, noise_rms, &waveform, 0, -30.0);

    let mut buf: Vec<i16> = samples.iter().map(|&s| (s * (AMPLITUDE / 4.0)).clamp(-32768.0, 32767.0) as i16).collect();
    buf.resize(nmax, 0);

    let job = job_for(500, 2500, 1600, submode);
    let generator = generator_matrix();
    let decoded = decode_pass(&mut buf, submode, &job, &generator);

    assert!(decoded.is_empty(), "expected no decodes at -30dB SNR, got {decoded:?}");
}

/// Build the 79 tones for a message whose embedded CRC-12 has one bit
/// flipped before tone mapping, so a perfectly clean channel still fails
/// the decoder's CRC check.
fn synthesize_crc_poisoned_frame(text: &str, msg_type: u8, submode: Submode, freq_hz: f32) -> Vec<i16> {
    let mut message = pack_message(text, msg_type).unwrap();
    apply_crc12(&mut message);
    message[75] ^= 1;

    let codeword = encode_message(&message);
    let mut bits = bitvec![u8, Msb0; 0; 174];
    for (i, &bit) in codeword.iter().enumerate() {
        bits.set(i, bit != 0);
    }
    let costas = submode.params().costas;
    let mut tones = [0u8; NN];
    symbol_map(&bits, costas, &mut tones).unwrap();

    let params = submode.params();
    let complex = synthesize_reference(&tones, freq_hz, &params);
    let mut buf = zero_buffer(submode);
    for (i, c) in complex.iter().enumerate() {
        if i >= buf.len() {
            break;
        }
        buf[i] = (c.re * AMPLITUDE) as i16;
    }
    buf
}

#[test]
fn crc_poisoned_frame_never_decodes() {
    let mut buf = synthesize_crc_poisoned_frame("CQCQCQN0YPR1", 0, Submode::Normal, 1500.0);
    let job = job_for(500, 2500, 1500, Submode::Normal);
    let generator = generator_matrix();

    let decoded = decode_pass(&mut buf, Submode::Normal, &job, &generator);
    assert!(decoded.is_empty(), "CRC-poisoned frame should never decode, got {decoded:?}");
}
