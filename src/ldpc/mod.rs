//! LDPC(174,87) error correction for the JS8 codeword.
//!
//! **Encoding**: turns an 87-bit message (CRC-12 already folded in, see
//! [`crate::crc`]) into a 174-bit systematic codeword.
//!
//! **Decoding**: belief propagation first ([`decode::bp_decode`]), falling
//! back to ordered statistics decoding ([`osd::osd_decode`]) when BP fails
//! to converge and the configured decode depth calls for it.

pub mod constants;
pub mod decode;
pub mod encode;
pub mod osd;

pub use constants::{K, M, N};
pub use decode::{bp_decode, BpDecode};
pub use encode::{encode_message, generator_matrix};
pub use osd::{osd_decode, OsdDecode};

/// How many decode passes a submode runs (`calculateNPass`).
///
/// Depth 1 is belief propagation only, with no signal subtraction between
/// passes. Depth 2 adds subtraction across 3 passes, still BP only. Depth
/// 3 and above run the full 4-pass BP+OSD pipeline.
pub fn passes_for_depth(ndepth: u32) -> u32 {
    match ndepth {
        1 => 1,
        2 => 3,
        _ => 4,
    }
}

/// Result of decoding one candidate's LLRs: belief propagation if it
/// converges, otherwise ordered statistics decoding up to `ndeep`.
pub enum Decoded {
    Bp(BpDecode),
    Osd(OsdDecode),
}

impl Decoded {
    pub fn message(&self) -> &[u8; K] {
        match self {
            Decoded::Bp(bp) => &bp.message,
            Decoded::Osd(osd) => &osd.message,
        }
    }

    pub fn codeword(&self) -> &[u8; N] {
        match self {
            Decoded::Bp(bp) => &bp.codeword,
            Decoded::Osd(osd) => &osd.codeword,
        }
    }

    /// Hard-decision error count (`nharderrors`): sign mismatches against
    /// the channel LLR for BP, reliability-ordered Hamming distance for OSD.
    pub fn hard_errors(&self) -> usize {
        match self {
            Decoded::Bp(bp) => bp.errors,
            Decoded::Osd(osd) => osd.hard_errors,
        }
    }

    /// Reliability-weighted distance (`dmin`) used in the acceptance test.
    /// BP converges on an exact codeword with no search margin, so it
    /// reports 0; OSD reports the weighted distance of its chosen codeword.
    pub fn dmin(&self) -> f32 {
        match self {
            Decoded::Bp(_) => 0.0,
            Decoded::Osd(osd) => osd.dmin,
        }
    }
}

/// Run BP on `llr`; if it fails to converge and `ndeep` is `Some`, fall
/// back to OSD against `generator`.
pub fn decode(llr: &[f32; N], ndeep: Option<usize>, generator: &[[u8; N]; K]) -> Option<Decoded> {
    if let Some(bp) = bp_decode(llr) {
        return Some(Decoded::Bp(bp));
    }
    ndeep.map(|depth| Decoded::Osd(osd_decode(llr, depth, generator)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_counts_match_reference_depths() {
        assert_eq!(passes_for_depth(1), 1);
        assert_eq!(passes_for_depth(2), 3);
        assert_eq!(passes_for_depth(3), 4);
        assert_eq!(passes_for_depth(99), 4);
    }

    #[test]
    fn decode_prefers_bp_and_falls_back_to_osd() {
        let mut message = [0u8; K];
        message[4] = 1;
        let cw = encode_message(&message);
        let llr: [f32; N] = core::array::from_fn(|i| if cw[i] == 1 { 5.0 } else { -5.0 });

        let gen = generator_matrix();
        match decode(&llr, Some(2), &gen).unwrap() {
            Decoded::Bp(bp) => assert_eq!(bp.message, message),
            Decoded::Osd(_) => panic!("clean codeword should converge under BP"),
        }
    }
}
