//! Sync search: find Costas-aligned candidates across a frequency range.
//!
//! Scans the windowed symbol-power surface for time/frequency offsets whose
//! three Costas sync blocks stand out against the average power at that
//! time step, the way the reference decoder's `syncjs8` does. Candidates are
//! normalized to the pass's own 40th-percentile sync value, then thinned so
//! no two survivors sit within one `az` of each other in frequency.

use crate::baseline::Baseline;
use crate::sync::candidate::Candidate;
use crate::sync::spectra::compute_symbol_spectra;
use crate::submode::SubmodeParams;

/// Run the sync search over `dd` between `nfa` and `nfb` Hz (clamped to
/// `[100, 4910]`), returning candidates sorted by descending sync power.
pub fn sync_search(dd: &[i16], nfa_in: i32, nfb_in: i32, params: &SubmodeParams) -> Vec<Candidate> {
    let derived = params.derived();
    let spectra = compute_symbol_spectra(dd, params, &derived);

    let nwin = nfb_in - nfa_in;
    let mut nfa = nfa_in;
    let mut nfb = nfb_in;
    if nfa < 100 {
        nfa = 100;
        if nwin < 100 {
            nfb = nfa + nwin;
        }
    }
    if nfb > 4910 {
        nfb = 4910;
        if nwin < 100 {
            nfa = nfb - nwin;
        }
    }

    let ia = ((nfa as f32 / derived.df).round() as i64).max(0) as usize;
    let ib = (nfb as f32 / derived.df).round() as usize;
    let ib = ib.min(params.nsps.saturating_sub(1));
    if ia >= ib {
        return Vec::new();
    }

    let costas = params.costas;
    // Noise floor over the clipped search band, used to reference each
    // candidate's SNR estimate at decode time.
    let baseline = Baseline::fit(&spectra.savg[ia..=ib]);
    let mut found: Vec<Candidate> = Vec::new();

    for i in ia..=ib {
        let mut max_value = f32::NEG_INFINITY;
        let mut max_j = -params.jz;

        for j in -params.jz..=params.jz {
            let mut t0 = [0.0f32; 3];
            let mut t1 = [0.0f32; 3];

            for p in 0..3usize {
                for n in 0..7usize {
                    let offset = j + derived.jstrt + (crate::submode::NSSY as i32) * n as i32
                        + p as i32 * 36 * crate::submode::NSSY as i32;
                    if offset >= 0 && (offset as usize) < derived.nhsym {
                        let offset = offset as usize;
                        let freq_bin = i + crate::submode::NFOS * costas[p][n] as usize;
                        if freq_bin < spectra.s.len() {
                            t0[p] += spectra.s[freq_bin][offset];
                        }
                        for freq in 0..7usize {
                            let fb = i + crate::submode::NFOS * freq;
                            if fb < spectra.s.len() {
                                t1[p] += spectra.s[fb][offset];
                            }
                        }
                    }
                }
            }

            let compute_sync = |start: usize, end: usize| -> f32 {
                let tx: f32 = t0[start..=end].iter().sum();
                let t0sum: f32 = t1[start..=end].iter().sum();
                tx / ((t0sum - tx) / 6.0)
            };

            let sync_value = compute_sync(0, 2).max(compute_sync(0, 1)).max(compute_sync(1, 2));
            if sync_value > max_value {
                max_value = sync_value;
                max_j = j;
            }
        }

        let sbase = baseline.evaluate(i - ia);
        let xbase = 10f32.powf(0.1 * (sbase - params.basesub));

        found.push(Candidate::new(
            derived.df * i as f32,
            derived.tstep * (max_j as f32 + 0.5),
            max_value,
            xbase,
        ));
    }

    if found.is_empty() {
        return found;
    }

    let mut by_sync: Vec<f32> = found.iter().map(|c| c.sync).collect();
    let rank = (by_sync.len() * 4 / 10).min(by_sync.len() - 1);
    by_sync.select_nth_unstable_by(rank, |a, b| a.partial_cmp(b).unwrap());
    let normalizer = by_sync[rank];
    if normalizer != 0.0 {
        for c in found.iter_mut() {
            c.sync /= normalizer;
        }
    }

    found.sort_by(|a, b| b.sync.partial_cmp(&a.sync).unwrap());

    let mut candidates: Vec<Candidate> = Vec::new();
    let mut remaining = found;
    while !remaining.is_empty() && candidates.len() < crate::submode::NMAXCAND {
        let best = remaining[0];
        if best.sync < crate::submode::ASYNCMIN || best.sync.is_nan() {
            break;
        }
        candidates.push(best);
        remaining.retain(|c| (c.freq - best.freq).abs() > derived.az);
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submode::Submode;

    #[test]
    fn silence_produces_no_candidates_above_threshold() {
        let params = Submode::Normal.params();
        let derived = params.derived();
        let dd = vec![0i16; derived.nmax];
        let candidates = sync_search(&dd, 200, 3000, &params);
        assert!(candidates.is_empty());
    }
}
