//! Per-submode timing and sync constants.
//!
//! JS8 packs five submodes into one physical layer, trading symbol rate
//! for bandwidth and tolerance to drift/timing error: A (Normal), B
//! (Fast), C (Turbo), E (Slow) and I (Ultra). Each submode differs only in
//! these static constants; every algorithm downstream (sync search,
//! downsampling, LLR extraction) is parameterized by them rather than
//! hardcoded per mode.

use crate::costas::{MODIFIED, ORIGINAL};

pub const SAMPLE_RATE: usize = 12_000;
pub const NFOS: usize = 2;
pub const NSSY: usize = 4;
pub const NN: usize = 79;
pub const NS: usize = 21;
pub const ND: usize = 58;
pub const ASYNCMIN: f32 = 1.5;
pub const NFSRCH: i32 = 5;
pub const NMAXCAND: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submode {
    Normal,
    Fast,
    Turbo,
    Slow,
    Ultra,
}

pub struct SubmodeParams {
    pub submode: Submode,
    pub bit: u8,
    pub costas: &'static [[u8; 7]; 3],
    /// Samples per symbol at 12kHz.
    pub nsps: usize,
    /// Transmission duration in seconds.
    pub ntxdur: usize,
    /// Downsampled rate divisor used for the narrowband per-candidate pipeline.
    pub ndownsps: usize,
    /// Half-width (in downsampled-FFT bins) of the Costas search window.
    pub ndd: usize,
    /// Half-width (symbol steps) of the sync-search time range.
    pub jz: i32,
    /// Nominal start-of-transmission delay, seconds.
    pub astart: f32,
    /// Baseline dB offset applied during noise floor subtraction.
    pub basesub: f32,
}

impl Submode {
    pub const fn params(self) -> SubmodeParams {
        match self {
            Submode::Normal => SubmodeParams {
                submode: self, bit: 1 << 0, costas: &ORIGINAL,
                nsps: 1920, ntxdur: 15, ndownsps: 32, ndd: 100, jz: 62,
                astart: 0.5, basesub: 40.0,
            },
            Submode::Fast => SubmodeParams {
                submode: self, bit: 1 << 1, costas: &MODIFIED,
                nsps: 1200, ntxdur: 10, ndownsps: 20, ndd: 100, jz: 144,
                astart: 0.2, basesub: 39.0,
            },
            Submode::Turbo => SubmodeParams {
                submode: self, bit: 1 << 2, costas: &MODIFIED,
                nsps: 600, ntxdur: 6, ndownsps: 12, ndd: 120, jz: 172,
                astart: 0.1, basesub: 38.0,
            },
            Submode::Slow => SubmodeParams {
                submode: self, bit: 1 << 3, costas: &MODIFIED,
                // NTXDUR=30 and NDD=94 match the mainline decoder, not the
                // original Fortran's 28 / 90.
                nsps: 3840, ntxdur: 30, ndownsps: 32, ndd: 94, jz: 32,
                astart: 0.5, basesub: 42.0,
            },
            Submode::Ultra => SubmodeParams {
                submode: self, bit: 1 << 4, costas: &MODIFIED,
                nsps: 384, ntxdur: 4, ndownsps: 12, ndd: 125, jz: 250,
                astart: 0.1, basesub: 36.0,
            },
        }
    }

    /// Worker dispatch order: fastest (narrowest-duration) submodes first,
    /// so their signal subtraction clears spectrum ahead of the slower,
    /// narrower-bandwidth submodes decoded later in the same cycle.
    pub const DISPATCH_ORDER: [Submode; 5] =
        [Submode::Ultra, Submode::Slow, Submode::Turbo, Submode::Fast, Submode::Normal];
}

/// Constants derived from a submode's static parameters.
pub struct Derived {
    pub az: f32,
    pub nmax: usize,
    pub nfft1: usize,
    pub nstep: usize,
    pub nhsym: usize,
    pub ndown: usize,
    pub nqsymbol: usize,
    pub ndfft1: usize,
    pub ndfft2: usize,
    pub np2: usize,
    pub tstep: f32,
    pub jstrt: i32,
    pub df: f32,
}

impl SubmodeParams {
    pub fn derived(&self) -> Derived {
        let baud = SAMPLE_RATE as f32 / self.nsps as f32;
        let az = baud * match self.submode {
            Submode::Normal => 0.64,
            Submode::Fast => 0.8,
            Submode::Turbo => 0.6,
            Submode::Slow => 0.64,
            Submode::Ultra => 0.64,
        };
        let nmax = self.ntxdur * SAMPLE_RATE;
        let nfft1 = self.nsps * NFOS;
        let nstep = self.nsps / NSSY;
        let nhsym = nmax / nstep - 3;
        let ndown = self.nsps / self.ndownsps;
        let nqsymbol = self.ndownsps / 4;
        let ndfft1 = self.nsps * self.ndd;
        let ndfft2 = ndfft1 / ndown;
        let np2 = NN * self.ndownsps;
        let tstep = nstep as f32 / SAMPLE_RATE as f32;
        let jstrt = (self.astart / tstep).round() as i32;
        let df = SAMPLE_RATE as f32 / nfft1 as f32;

        Derived {
            az, nmax, nfft1, nstep, nhsym, ndown, nqsymbol,
            ndfft1, ndfft2, np2, tstep, jstrt, df,
        }
    }
}
