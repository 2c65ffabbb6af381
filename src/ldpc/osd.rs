//! Ordered statistics decoding (OSD) for LDPC(174,87).
//!
//! Falls back from belief propagation when BP fails to converge. Sorts
//! codeword positions by reliability, row-reduces the generator matrix so
//! its systematic information set sits on the most reliable positions,
//! then searches increasing-weight error patterns over that basis for the
//! codeword that best matches the hard-decision vector in a
//! reliability-weighted distance.

use super::constants::{K, N};
use super::encode::mrbencode;

pub struct OsdDecode {
    pub codeword: [u8; N],
    pub message: [u8; K],
    /// Hamming distance between the chosen codeword and the hard decisions,
    /// over the reliability-reordered positions (mirrors `nhardmin`).
    pub hard_errors: usize,
    /// Reliability-weighted Euclidean distance of the chosen codeword from
    /// the hard decisions (mirrors `dmin`), used alongside `hard_errors` in
    /// the acceptance test.
    pub dmin: f32,
}

/// Enumerate every subset of `0..n` with exactly `k` elements via Gosper's
/// hack on a bitmask, ascending index order within each subset.
fn combinations(n: usize, k: usize) -> impl Iterator<Item = Vec<usize>> {
    assert!(n <= 127);
    let mut c: u128 = if k == 0 { 0 } else { (1u128 << k) - 1 };
    let mut done = k == 0;
    let limit = 1u128 << n;
    std::iter::from_fn(move || {
        if done || c >= limit {
            return None;
        }
        let out: Vec<usize> = (0..n).filter(|&i| (c >> i) & 1 == 1).collect();
        let lsb = c & c.wrapping_neg();
        let next = c + lsb;
        let updated = next | (((c ^ next) / lsb) >> 2);
        if updated >= limit {
            done = true;
        }
        c = updated;
        Some(out)
    })
}

fn argsort_desc_abs(rx: &[f32; N]) -> [usize; N] {
    let mut idx: [usize; N] = core::array::from_fn(|i| i);
    idx.sort_by(|&a, &b| rx[b].abs().partial_cmp(&rx[a].abs()).unwrap());
    idx
}

/// Decode `rx` (received LLRs/soft symbols) against `generator`, searching
/// error patterns up to weight `ndeep` (0 disables the search, returning
/// just the row-reduced hard-decision codeword).
pub fn osd_decode(rx: &[f32; N], ndeep: usize, generator: &[[u8; N]; K]) -> OsdDecode {
    let hdec: [u8; N] = core::array::from_fn(|i| if rx[i] >= 0.0 { 1 } else { 0 });
    let absrx: [f32; N] = core::array::from_fn(|i| rx[i].abs());
    let mut indices = argsort_desc_abs(rx);

    let mut genmrb: [[u8; N]; K] =
        core::array::from_fn(|i| core::array::from_fn(|j| generator[i][indices[j]]));

    for id in 0..K {
        let Some(pivot) = (id..N).find(|&col| genmrb[id][col] == 1) else {
            continue;
        };
        if pivot != id {
            for row in 0..K {
                genmrb[row].swap(id, pivot);
            }
            indices.swap(id, pivot);
        }
        for row in 0..K {
            if row != id && genmrb[row][id] == 1 {
                for col in 0..N {
                    genmrb[row][col] ^= genmrb[id][col];
                }
            }
        }
    }

    let hdec_r: [u8; N] = core::array::from_fn(|i| hdec[indices[i]]);
    let absrx_r: [f32; N] = core::array::from_fn(|i| absrx[indices[i]]);

    let weighted_distance = |cw: &[u8; N]| -> f32 {
        cw.iter()
            .zip(hdec_r.iter())
            .zip(absrx_r.iter())
            .filter(|((c, h), _)| c != h)
            .map(|(_, w)| *w)
            .sum()
    };
    let hard_distance = |cw: &[u8; N]| -> usize {
        cw.iter().zip(hdec_r.iter()).filter(|(c, h)| c != h).count()
    };

    let mut m0 = [0u8; K];
    m0.copy_from_slice(&hdec_r[..K]);
    let mut cw = mrbencode(&m0, &genmrb);
    let mut hard_errors = hard_distance(&cw);
    let mut dmin = weighted_distance(&cw);

    for iorder in 1..=ndeep {
        for pattern in combinations(K, iorder) {
            let mut me = m0;
            for &p in &pattern {
                me[p] ^= 1;
            }
            let ce = mrbencode(&me, &genmrb);
            let dd = weighted_distance(&ce);
            if dd < dmin {
                dmin = dd;
                cw = ce;
                hard_errors = hard_distance(&ce);
            }
        }
    }

    let mut codeword = [0u8; N];
    for (i, &bit) in cw.iter().enumerate() {
        codeword[indices[i]] = bit;
    }
    let mut message = [0u8; K];
    message.copy_from_slice(&codeword[K..]);

    OsdDecode { codeword, message, hard_errors, dmin }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::encode::{encode_message, generator_matrix};

    #[test]
    fn recovers_clean_codeword_with_ndeep_zero() {
        let mut message = [0u8; K];
        message[2] = 1;
        message[50] = 1;
        let cw = encode_message(&message);
        let rx: [f32; N] = core::array::from_fn(|i| if cw[i] == 1 { 3.0 } else { -3.0 });

        let gen = generator_matrix();
        let result = osd_decode(&rx, 0, &gen);
        assert_eq!(result.message, message);
        assert_eq!(result.hard_errors, 0);
    }

    #[test]
    fn corrects_errors_within_search_depth() {
        let mut message = [0u8; K];
        message[10] = 1;
        message[60] = 1;
        message[80] = 1;
        let cw = encode_message(&message);
        let mut rx: [f32; N] = core::array::from_fn(|i| if cw[i] == 1 { 2.5 } else { -2.5 });
        rx[3] = -rx[3];
        rx[4] = -rx[4];

        let gen = generator_matrix();
        let result = osd_decode(&rx, 2, &gen);
        assert_eq!(result.message, message);
    }

    #[test]
    fn combinations_enumerates_expected_count() {
        let count = combinations(6, 2).count();
        assert_eq!(count, 15);
        let count0 = combinations(6, 0).count();
        assert_eq!(count0, 1);
    }
}
