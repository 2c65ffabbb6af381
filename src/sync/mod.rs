//! Sync search and per-candidate signal extraction.
//!
//! Pipeline: [`spectra`] builds the windowed power surface for a receive
//! period, [`coarse::sync_search`] scans it for Costas-aligned candidates,
//! [`downsample`] cuts each candidate's narrowband signal out of the full
//! baseband spectrum, [`fine::costas_sync_power`] refines and quality-gates
//! it, and [`extract`] turns the aligned signal into codeword-bit LLRs.

pub mod candidate;
pub mod coarse;
pub mod downsample;
pub mod extract;
pub mod fft;
pub mod fine;
pub mod spectra;
pub mod synthesize;

pub use candidate::Candidate;
pub use coarse::sync_search;
pub use downsample::{compute_baseband_fft, js8_downsample};
pub use extract::{extract_llrs, symbol_powers};
pub use fine::costas_sync_power;
pub use spectra::{compute_symbol_spectra, nuttall_window};
pub use synthesize::synthesize_reference;
