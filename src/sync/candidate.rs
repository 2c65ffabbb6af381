//! Sync-search candidate container.

/// A single frequency/time sync candidate, as extracted by [`crate::sync::search`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Center frequency, Hz.
    pub freq: f32,
    /// Time offset from the start of the receive period, seconds.
    pub dt: f32,
    /// Sync power, normalized to the 40th percentile across all candidates
    /// found in the same search pass.
    pub sync: f32,
    /// Noise reference at this candidate's frequency bin, from the baseline
    /// estimator: `10^(0.1 * (sbase - BASESUB))`. Feeds the per-candidate
    /// SNR estimate.
    pub xbase: f32,
}

impl Candidate {
    pub fn new(freq: f32, dt: f32, sync: f32, xbase: f32) -> Self {
        Self { freq, dt, sync, xbase }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_stores_fields_verbatim() {
        let c = Candidate::new(1500.0, 0.5, 12.3, 0.01);
        assert_eq!(c.freq, 1500.0);
        assert_eq!(c.dt, 0.5);
        assert_eq!(c.sync, 12.3);
        assert_eq!(c.xbase, 0.01);
    }
}
