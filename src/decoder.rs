//! Per-candidate decode and the multi-pass decode loop.
//!
//! For each sync candidate: downsample its narrowband signal, search a
//! small DT/frequency neighborhood for the strongest Costas alignment,
//! reject weak alignments, extract LLRs, run BP (falling back to OSD at
//! increasing search depth across passes), check the CRC, and on success
//! report the message together with an SNR estimate and regenerated tones
//! for signal subtraction.

use bitvec::prelude::*;
use rustfft::num_complex::Complex;
use tracing::{debug, instrument};

use crate::config::JobParams;
use crate::crc::check_crc12;
use crate::ldpc::{self, constants::{K, N}};
use crate::message::unpack_message;
use crate::submode::{Derived, Submode, SubmodeParams};
use crate::sync::{self, Candidate};

/// A successfully decoded message.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    pub msg_type: u8,
    pub freq: f32,
    pub dt: f32,
    pub snr: f32,
    /// UTC stamp of the receive period this decode belongs to, `HHMMSS`,
    /// carried over from the job's [`JobParams::nutc`].
    pub utc: i32,
    /// Decode confidence in `[0, 1]`, derived from the hard-error count
    /// ([`crate::ldpc::Decoded::hard_errors`]) relative to the message
    /// length: 1.0 for a hard-error-free decode, falling off linearly.
    pub quality: f32,
    pub tones: [u8; crate::symbol::NN],
}

/// A sync-search outcome reported while scanning a submode's candidates,
/// for hosts that want visibility into rejected candidates as well as
/// successful decodes (see [`decode_pass_with_events`]).
#[derive(Debug, Clone, Copy)]
pub enum SyncNotice {
    /// A candidate was found but did not decode.
    Candidate { freq: f32, dt: f32, sync: f32 },
    /// A candidate decoded successfully.
    Decoded { freq: f32, dt: f32, snr: f32 },
}

/// DT search half-width, in downsampled-FFT-bin symbol steps.
const DT_SEARCH: i64 = 2;
/// Frequency search half-width and step, Hz.
const DF_SEARCH_STEPS: i32 = 2;
const DF_STEP_HZ: f32 = 1.0 / 4.0;
/// Minimum Costas sync power to bother attempting a decode.
const MIN_SYNC_POWER: f32 = 6.0;
const SNR_FLOOR_DB: f32 = -60.0;

/// Acceptance-test hard-error ceilings (SPEC_FULL.md §4.9 step 9).
const HARD_ERROR_DMIN_CEILING: f32 = 60.0;
const HARD_ERROR_CEILING_WEAK_SYNC: usize = 35;
const HARD_ERROR_CEILING_LATE_PASS: usize = 39;
const HARD_ERROR_CEILING_FINAL_PASS: usize = 30;
const WEAK_SYNC_THRESHOLD: f32 = 2.0;

/// Attempt to decode a single candidate. `ndeep` selects how hard OSD
/// searches on this pass (see [`crate::ldpc::passes_for_depth`]); `None`
/// restricts the attempt to BP only. `pass` (1-indexed) and `utc` feed the
/// acceptance test and the reported [`Decoded::utc`] stamp respectively.
#[instrument(skip(baseband, generator), fields(freq = candidate.freq, dt = candidate.dt))]
pub fn decode_candidate(
    baseband: &[Complex<f32>],
    candidate: &Candidate,
    params: &SubmodeParams,
    derived: &Derived,
    ndeep: Option<usize>,
    generator: &[[u8; N]; K],
    pass: u32,
    utc: i32,
) -> Option<Decoded> {
    let cd0 = sync::js8_downsample(baseband, candidate.freq, params, derived);

    let mut best_power = f32::NEG_INFINITY;
    let mut best_i0 = 0i64;
    let mut best_delf = 0.0f32;

    let center_i0 = (candidate.dt * crate::submode::SAMPLE_RATE as f32 / derived.ndown as f32).round() as i64;
    for di in -DT_SEARCH..=DT_SEARCH {
        for dj in -DF_SEARCH_STEPS..=DF_SEARCH_STEPS {
            let delf = dj as f32 * DF_STEP_HZ;
            let i0 = center_i0 + di;
            if i0 < 0 {
                continue;
            }
            let power = sync::costas_sync_power(&cd0, i0, delf, params, derived);
            if power > best_power {
                best_power = power;
                best_i0 = i0;
                best_delf = delf;
            }
        }
    }

    if best_power < MIN_SYNC_POWER {
        debug!(best_power, "rejected: sync power below gate");
        return None;
    }

    let aligned = apply_frequency_correction(&cd0, best_delf, params, derived);
    let powers = sync::symbol_powers(&aligned, params);
    let llr = sync::extract_llrs(&powers);

    let decoded = ldpc::decode(&llr, ndeep, generator)?;
    let mut message: [u8; K] = *decoded.message();
    if message.iter().all(|&b| b == 0) {
        return None;
    }

    if !check_crc12(&message) {
        debug!("rejected: CRC mismatch");
        return None;
    }

    let nharderrors = decoded.hard_errors();
    let dmin = decoded.dmin();
    if nharderrors as f32 + dmin >= HARD_ERROR_DMIN_CEILING {
        debug!(nharderrors, dmin, "rejected: nharderrors + dmin over ceiling");
        return None;
    }
    if candidate.sync < WEAK_SYNC_THRESHOLD && nharderrors > HARD_ERROR_CEILING_WEAK_SYNC {
        debug!(nharderrors, sync = candidate.sync, "rejected: weak sync with too many hard errors");
        return None;
    }
    if pass > 2 && nharderrors > HARD_ERROR_CEILING_LATE_PASS {
        debug!(nharderrors, pass, "rejected: too many hard errors on a late pass");
        return None;
    }
    if pass == 4 && nharderrors > HARD_ERROR_CEILING_FINAL_PASS {
        debug!(nharderrors, "rejected: too many hard errors on the final pass");
        return None;
    }

    let msg_type = crate::message::message_type(&message);
    for b in &mut message[75..87] {
        *b = 0;
    }
    let text = unpack_message(&message);

    let codeword = decoded.codeword();
    let mut bits = bitvec![u8, Msb0; 0; N];
    for (i, &b) in codeword.iter().enumerate() {
        bits.set(i, b != 0);
    }
    let costas = params.costas;
    let mut tones = [0u8; crate::symbol::NN];
    crate::symbol::map(&bits, costas, &mut tones).ok()?;

    let snr = estimate_snr(&powers, &tones, candidate.xbase).max(SNR_FLOOR_DB);
    let dt = best_i0 as f32 * derived.ndown as f32 / crate::submode::SAMPLE_RATE as f32;
    let quality = (1.0 - nharderrors as f32 / K as f32).clamp(0.0, 1.0);

    Some(Decoded {
        text,
        msg_type,
        freq: candidate.freq + best_delf,
        dt,
        snr,
        utc,
        quality,
        tones,
    })
}

fn apply_frequency_correction(
    cd0: &[Complex<f32>],
    delf: f32,
    params: &SubmodeParams,
    derived: &Derived,
) -> Vec<Complex<f32>> {
    if delf == 0.0 {
        return cd0.to_vec();
    }
    let sample_rate_ds = crate::submode::SAMPLE_RATE as f32 / derived.ndown as f32;
    let dphi = std::f32::consts::TAU * delf / sample_rate_ds;
    let mut phi = 0.0f32;
    let mut out = Vec::with_capacity(cd0.len());
    for &c in cd0 {
        out.push(c * Complex::from_polar(1.0, -phi));
        phi = (phi + dphi).rem_euclid(std::f32::consts::TAU);
    }
    let _ = params;
    out
}

/// SNR estimate from the decoded tones' signal power against the
/// candidate's baseline noise reference: `max(10*log10(max(xsig/xbase - 1,
/// 1.259e-10)) - 32, SNR_FLOOR_DB)`, where `xsig` sums the squared power of
/// the chosen tone at every data symbol. Mirrors the indexing
/// [`crate::symbol::map`] uses to place data symbols at codeword
/// positions, skipping the three Costas blocks.
fn estimate_snr(powers: &[[f32; 8]; crate::symbol::ND], tones: &[u8; crate::symbol::NN], xbase: f32) -> f32 {
    let mut xsig = 0.0f32;
    let mut k = 7usize;
    for j in 0..crate::symbol::ND {
        if j == 29 {
            k += 7;
        }
        let tone = tones[k] as usize;
        let power = powers[j][tone];
        xsig += power * power;
        k += 1;
    }
    let ratio = (xsig / xbase - 1.0).max(1.259e-10);
    10.0 * ratio.log10() - 32.0
}

/// Run all submode candidates through decode, closest to `job.nfqso` first,
/// deduplicating repeated decodes of the same message (keeping whichever
/// has the better SNR) and subtracting each successful decode from `dd`
/// before the next pass, as [`crate::submode::Submode::DISPATCH_ORDER`]
/// prescribes at the worker level. Pass count and per-candidate OSD search
/// depth both come from `job` (see [`JobParams::osd_depth`]). Does not
/// report per-candidate sync outcomes; see [`decode_pass_with_events`] for
/// that.
pub fn decode_pass(dd: &mut [i16], submode: Submode, job: &JobParams, generator: &[[u8; N]; K]) -> Vec<Decoded> {
    decode_pass_inner(dd, submode, job, generator, &mut |_| {})
}

/// As [`decode_pass`], but reports a [`SyncNotice`] for every candidate
/// considered, whether or not it went on to decode successfully.
pub fn decode_pass_with_events(
    dd: &mut [i16],
    submode: Submode,
    job: &JobParams,
    generator: &[[u8; N]; K],
    notify: &mut impl FnMut(SyncNotice),
) -> Vec<Decoded> {
    decode_pass_inner(dd, submode, job, generator, notify)
}

fn decode_pass_inner(
    dd: &mut [i16],
    submode: Submode,
    job: &JobParams,
    generator: &[[u8; N]; K],
    notify: &mut impl FnMut(SyncNotice),
) -> Vec<Decoded> {
    let params = submode.params();
    let npasses = ldpc::passes_for_depth(job.ndepth.max(0) as u32);
    let mut results: Vec<Decoded> = Vec::new();

    for pass in 0..npasses {
        let derived = params.derived();
        let mut candidates = sync::sync_search(dd, job.nfa, job.nfb, &params);
        if candidates.is_empty() {
            break;
        }
        candidates.sort_by(|a, b| {
            let da = (a.freq - job.nfqso as f32).abs();
            let db = (b.freq - job.nfqso as f32).abs();
            da.partial_cmp(&db).unwrap().then_with(|| a.freq.partial_cmp(&b.freq).unwrap())
        });
        let baseband = sync::compute_baseband_fft(dd, derived.ndfft1);

        let mut found_any = false;
        for candidate in &candidates {
            let ndeep = job.osd_depth(pass + 1, candidate.freq);
            match decode_candidate(&baseband, candidate, &params, &derived, ndeep, generator, pass + 1, job.nutc) {
                Some(decoded) => {
                    notify(SyncNotice::Decoded { freq: decoded.freq, dt: decoded.dt, snr: decoded.snr });
                    crate::subtract::subtract_signal(dd, decoded.dt, &decoded.tones, decoded.freq, &params);
                    found_any = true;
                    match results.iter().position(|d: &Decoded| d.text == decoded.text) {
                        Some(idx) if results[idx].snr < decoded.snr => results[idx] = decoded,
                        Some(_) => {}
                        None => results.push(decoded),
                    }
                }
                None => {
                    notify(SyncNotice::Candidate { freq: candidate.freq, dt: candidate.dt, sync: candidate.sync });
                }
            }
        }
        if !found_any {
            break;
        }
    }

    results
}
