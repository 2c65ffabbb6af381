//! Belief propagation (sum-product) decoder for LDPC(174,87).

use super::constants::*;

/// Piecewise linear approximation of atanh, tuned for LDPC decoding.
///
/// This is NOT the mathematical atanh function. It uses 5 linear segments:
/// - |x| ≤ 0.664: y = x / 0.83
/// - 0.664 < |x| ≤ 0.9217: y = sign(x) * (|x| - 0.4064) / 0.322
/// - 0.9217 < |x| ≤ 0.9951: y = sign(x) * (|x| - 0.8378) / 0.0524
/// - 0.9951 < |x| ≤ 0.9998: y = sign(x) * (|x| - 0.9914) / 0.0012
/// - |x| > 0.9998: y = sign(x) * 7.0
///
/// Reference: wsjtx/lib/platanh.f90
#[inline]
pub fn platanh(x: f32) -> f32 {
    let isign = if x < 0.0 { -1.0 } else { 1.0 };
    let z = x.abs();

    if z <= 0.664 {
        x / 0.83
    } else if z <= 0.9217 {
        isign * (z - 0.4064) / 0.322
    } else if z <= 0.9951 {
        isign * (z - 0.8378) / 0.0524
    } else if z <= 0.9998 {
        isign * (z - 0.9914) / 0.0012
    } else {
        isign * 7.0
    }
}

/// Outcome of a successful belief-propagation decode.
#[derive(Debug, Clone)]
pub struct BpDecode {
    pub codeword: [u8; N],
    pub message: [u8; K],
    /// Count of bits where the hard decision disagreed with the channel LLR sign.
    pub errors: usize,
}

/// Decode 174 received LLRs via sum-product belief propagation.
///
/// Mirrors `bpdecode174`: runs up to `BP_MAX_ITERATIONS` rounds and bails
/// out early if the syndrome weight has been non-decreasing for 5
/// consecutive iterations past iteration 10 while still above 15
/// unsatisfied checks. Returns `None` if no valid codeword is found.
pub fn bp_decode(llr: &[f32; N]) -> Option<BpDecode> {
    let mut tov = [[0f32; BP_MAX_CHECKS]; N];
    let mut toc = [[0f32; BP_MAX_ROWS]; M];
    let mut tanhtoc = [[0f32; BP_MAX_ROWS]; M];
    let mut zn = [0f32; N];
    let mut cw = [0u8; N];

    for (i, row) in NM.iter().enumerate() {
        for j in 0..row.valid {
            toc[i][j] = llr[row.neighbors[j]];
        }
    }

    let mut ncnt = 0i32;
    let mut nclast = 0i32;

    for iter in 0..=BP_MAX_ITERATIONS {
        for i in 0..N {
            zn[i] = llr[i] + tov[i].iter().sum::<f32>();
        }
        for i in 0..N {
            cw[i] = if zn[i] > 0.0 { 1 } else { 0 };
        }

        let mut ncheck = 0i32;
        for row in NM.iter() {
            let mut synd = 0u32;
            for j in 0..row.valid {
                synd += cw[row.neighbors[j]] as u32;
            }
            if synd % 2 != 0 {
                ncheck += 1;
            }
        }

        if ncheck == 0 {
            let mut message = [0u8; K];
            message.copy_from_slice(&cw[M..]);
            let errors = (0..N)
                .filter(|&i| (2.0 * cw[i] as f32 - 1.0) * llr[i] < 0.0)
                .count();
            return Some(BpDecode { codeword: cw, message, errors });
        }

        if iter > 0 {
            let nd = ncheck - nclast;
            ncnt = if nd < 0 { 0 } else { ncnt + 1 };
            if ncnt >= 5 && iter >= 10 && ncheck > 15 {
                return None;
            }
        }
        nclast = ncheck;

        for (i, row) in NM.iter().enumerate() {
            for j in 0..row.valid {
                let ibj = row.neighbors[j];
                let mut v = zn[ibj];
                for k in 0..BP_MAX_CHECKS {
                    if MN[ibj][k] == i {
                        v -= tov[ibj][k];
                    }
                }
                toc[i][j] = v;
            }
        }

        for (i, row) in NM.iter().enumerate() {
            for j in 0..row.valid {
                tanhtoc[i][j] = (-toc[i][j] / 2.0).tanh();
            }
        }

        for i in 0..N {
            for j in 0..BP_MAX_CHECKS {
                let ichk = MN[i][j];
                let row = &NM[ichk];
                let mut tmn = 1.0f32;
                for k in 0..row.valid {
                    if row.neighbors[k] != i {
                        tmn *= tanhtoc[ichk][k];
                    }
                }
                tov[i][j] = 2.0 * platanh(-tmn);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::encode::encode_message;

    fn encode_llr(message: &[u8; K], confidence: f32) -> [f32; N] {
        let cw = encode_message(message);
        let mut llr = [0f32; N];
        for i in 0..N {
            llr[i] = if cw[i] == 1 { confidence } else { -confidence };
        }
        llr
    }

    #[test]
    fn decodes_perfect_codeword_at_iteration_zero() {
        let mut message = [0u8; K];
        message[3] = 1;
        message[40] = 1;
        let llr = encode_llr(&message, 10.0);

        let result = bp_decode(&llr).expect("clean codeword must decode");
        assert_eq!(result.message, message);
        assert_eq!(result.errors, 0);
    }

    #[test]
    fn corrects_a_handful_of_flipped_bits() {
        let mut message = [0u8; K];
        message[0] = 1;
        message[86] = 1;
        let mut llr = encode_llr(&message, 4.0);
        // flip the sign of a few soft bits, simulating channel errors
        for idx in [10, 55, 120] {
            llr[idx] = -llr[idx];
        }

        let result = bp_decode(&llr).expect("BP should correct a few errors");
        assert_eq!(result.message, message);
    }

    #[test]
    fn gives_up_on_pure_noise() {
        let llr = [0.05f32; N];
        assert!(bp_decode(&llr).is_none());
    }
}
