//! Scalar numeric helpers shared by the analytic and lattice engines.

use std::f64::consts::{PI, SQRT_2};

use nalgebra::DVector;
use statrs::function::erf::erf;

/// Standard normal density.
#[inline]
pub fn normal_pdf(x: f64) -> f64 {
    (1.0 / (2.0 * PI).sqrt()) * (-0.5 * x * x).exp()
}

/// Standard normal CDF, `N(x) = (1 + erf(x / sqrt(2))) / 2`.
#[inline]
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Uniformly spaced values with exact endpoints: `x[0] = lo`, `x[n-1] = hi`.
///
/// A single-point axis collapses to `[lo]`.
pub fn linspace(n: usize, lo: f64, hi: f64) -> DVector<f64> {
    if n == 1 {
        return DVector::from_element(1, lo);
    }

    let step = (hi - lo) / (n as f64 - 1.0);
    DVector::from_fn(n, |i, _| {
        if i == n - 1 {
            hi
        } else {
            lo + step * i as f64
        }
    })
}
