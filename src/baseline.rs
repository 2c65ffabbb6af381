//! Noise floor baseline estimation.
//!
//! Fits a degree-5 polynomial through the 10th-percentile power (in dB)
//! sampled in windows around 6 Chebyshev-spaced nodes across a frequency
//! range, then evaluates it at every bin in that range to produce a
//! smooth noise floor estimate. Chebyshev spacing keeps the fit from
//! oscillating near the ends of the range (Runge's phenomenon); the QR
//! solve (`nalgebra`, the one linear-algebra crate this pipeline needs)
//! replaces the reference decoder's Eigen `colPivHouseholderQr`.

use nalgebra::{SMatrix, SVector};

pub const DEGREE: usize = 5;
pub const NODE_COUNT: usize = DEGREE + 1;
pub const SAMPLE_PERCENTILE: usize = 10;

/// Chebyshev nodes on `[0, 1]`, scaled at call time to the window size.
pub fn chebyshev_nodes() -> [f64; NODE_COUNT] {
    let slice = std::f64::consts::PI / (2.0 * NODE_COUNT as f64);
    std::array::from_fn(|i| 0.5 * (1.0 - (slice * (2.0 * i as f64 + 1.0)).cos()))
}

/// Fitted baseline polynomial, evaluated via Estrin's method (pairs of
/// coefficients grouped by increasing powers of x^2).
pub struct Baseline {
    coefficients: SVector<f64, NODE_COUNT>,
}

impl Baseline {
    /// Fit a baseline to `power` (linear power spectrum values, converted
    /// to dB internally) over its full extent.
    pub fn fit(power: &[f32]) -> Self {
        let size = power.len();
        let db: Vec<f32> = power.iter().map(|&v| 10.0 * v.log10()).collect();
        let nodes = chebyshev_nodes();
        let arm = size / (2 * NODE_COUNT);

        let mut xs = [0.0f64; NODE_COUNT];
        let mut ys = [0.0f64; NODE_COUNT];
        for i in 0..NODE_COUNT {
            let node = size as f64 * nodes[i];
            let base = node.round() as isize;
            let lo = (base - arm as isize).max(0) as usize;
            let hi = ((base + arm as isize) as usize).min(size.saturating_sub(1));
            let mut span: Vec<f32> = db[lo..=hi.max(lo)].to_vec();
            let n = (span.len() * SAMPLE_PERCENTILE / 100).min(span.len().saturating_sub(1));
            span.select_nth_unstable_by(n, |a, b| a.partial_cmp(b).unwrap());

            xs[i] = node;
            ys[i] = span[n] as f64;
        }

        let mut vandermonde = SMatrix::<f64, NODE_COUNT, NODE_COUNT>::zeros();
        for row in 0..NODE_COUNT {
            let mut power_of_x = 1.0;
            for col in 0..NODE_COUNT {
                vandermonde[(row, col)] = power_of_x;
                power_of_x *= xs[row];
            }
        }
        let y = SVector::<f64, NODE_COUNT>::from_row_slice(&ys);
        let coefficients = vandermonde
            .qr()
            .solve(&y)
            .expect("Vandermonde matrix from distinct Chebyshev nodes is always invertible");

        Baseline { coefficients }
    }

    /// Evaluate the fitted polynomial at sample offset `i` via Estrin's
    /// method, plus the reference decoder's fixed 0.65dB offset.
    pub fn evaluate(&self, i: usize) -> f32 {
        let x = i as f64;
        let c = &self.coefficients;
        let mut baseline = 0.0;
        let mut exponent = 1.0;
        for pair in 0..NODE_COUNT / 2 {
            baseline += (c[pair * 2] + c[pair * 2 + 1] * x) * exponent;
            exponent *= x * x;
        }
        (baseline + 0.65) as f32
    }

    /// Fill `out` with the baseline evaluated at every offset `0..out.len()`.
    pub fn fill(&self, out: &mut [f32]) {
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.evaluate(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chebyshev_nodes_are_increasing_and_within_unit_range() {
        let nodes = chebyshev_nodes();
        for w in nodes.windows(2) {
            assert!(w[0] < w[1]);
        }
        assert!(nodes[0] > 0.0 && nodes[NODE_COUNT - 1] < 1.0);
    }

    #[test]
    fn flat_noise_floor_fits_to_a_near_constant_baseline() {
        let power = vec![1.0f32; 2000];
        let baseline = Baseline::fit(&power);
        let a = baseline.evaluate(100);
        let b = baseline.evaluate(1800);
        assert!((a - b).abs() < 0.5, "expected near-flat baseline, got {a} vs {b}");
    }

    #[test]
    fn fill_matches_pointwise_evaluate() {
        let power = vec![2.0f32; 500];
        let baseline = Baseline::fit(&power);
        let mut out = vec![0.0f32; 500];
        baseline.fill(&mut out);
        for i in (0..500).step_by(37) {
            assert_eq!(out[i], baseline.evaluate(i));
        }
    }
}
