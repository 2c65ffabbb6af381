//! Per-invocation job parameters shared between the capture thread and the
//! decode worker, mirroring the reference decoder's `dec_data` block.

use crate::submode::Submode;

/// Flat, portable job configuration. Corresponds to the reference
/// decoder's `dec_data` structure; kept `Copy` so the worker can snapshot
/// it under the ring-buffer mutex and then operate lock-free.
#[derive(Debug, Clone, Copy)]
pub struct JobParams {
    /// UTC timestamp of the receive period, `HHMMSS`.
    pub nutc: i32,
    /// Operator's frequency of interest, Hz; candidates are serviced in
    /// ascending order of distance to this frequency.
    pub nfqso: i32,
    /// Sync search band, Hz.
    pub nfa: i32,
    pub nfb: i32,
    /// Whether to report per-candidate sync statistics as events.
    pub sync_stats: bool,
    /// Ring-buffer read cursor at the start of the job.
    pub kin: i32,
    /// Per-submode ring-buffer read window (start, length), indexed by
    /// `Submode` enum order (A..I in the reference decoder's naming).
    pub kpos: [i32; 5],
    pub ksz: [i32; 5],
    /// Bitmask of enabled submodes (see [`Submode::params`]'s `bit` field).
    pub enabled_submodes: u32,
    /// Decode depth: 1 -> 1 pass BP only; 2 -> 3 passes BP only; >=3 -> 4
    /// passes BP+OSD. See [`crate::ldpc::passes_for_depth`].
    pub ndepth: i32,
    /// AP-decoding frequency window around `nfqso`, Hz.
    pub napwid: i32,
    /// Operator's own callsign, an opaque byte label at this layer.
    pub mycall: [u8; 12],
}

impl Default for JobParams {
    fn default() -> Self {
        Self {
            nutc: 0,
            nfqso: 1500,
            nfa: 200,
            nfb: 3000,
            sync_stats: false,
            kin: 0,
            kpos: [0; 5],
            ksz: [0; 5],
            enabled_submodes: Submode::Normal.params().bit as u32,
            ndepth: 3,
            napwid: 25,
            mycall: [0; 12],
        }
    }
}

impl JobParams {
    /// OSD search depth for a given pass and candidate frequency, per the
    /// reference decoder's `ndeep` selection: 4 within `napwid` of
    /// `nfqso` on passes 3-4 when `ndepth >= 3`, otherwise 3.
    pub fn osd_depth(&self, pass: u32, candidate_freq: f32) -> Option<usize> {
        if self.ndepth < 3 {
            return None;
        }
        if pass < 3 {
            return Some(3);
        }
        if (candidate_freq - self.nfqso as f32).abs() <= self.napwid as f32 {
            Some(4)
        } else {
            Some(3)
        }
    }

    pub fn submode_enabled(&self, submode: Submode) -> bool {
        self.enabled_submodes & submode.params().bit as u32 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_only_normal_mode() {
        let params = JobParams::default();
        assert!(params.submode_enabled(Submode::Normal));
        assert!(!params.submode_enabled(Submode::Ultra));
    }

    #[test]
    fn osd_depth_escalates_to_4_near_nfqso_on_late_passes() {
        let params = JobParams { ndepth: 3, nfqso: 1500, napwid: 25, ..Default::default() };
        assert_eq!(params.osd_depth(1, 1500.0), Some(3));
        assert_eq!(params.osd_depth(3, 1510.0), Some(4));
        assert_eq!(params.osd_depth(3, 2000.0), Some(3));
    }

    #[test]
    fn depth_below_3_never_runs_osd() {
        let params = JobParams { ndepth: 2, ..Default::default() };
        assert_eq!(params.osd_depth(3, 1500.0), None);
    }
}
