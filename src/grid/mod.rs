//! Axis construction and broadcasting for (sigma, strike) surfaces.

use nalgebra::{DMatrix, DVector};

use crate::math::linspace;

/// The two broadcast coordinate grids every engine consumes.
///
/// `sigmas[(i, j)] = sigma_i` and `strikes[(i, j)] = strike_j`, both of shape
/// `(n_sigma, n_strike)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceAxes {
    /// Sigma axis replicated across columns.
    pub sigmas: DMatrix<f64>,
    /// Strike axis replicated across rows.
    pub strikes: DMatrix<f64>,
}

impl SurfaceAxes {
    /// Builds both grids from linearly spaced axes.
    pub fn build(
        n_sigma: usize,
        n_strike: usize,
        sigma_lo: f64,
        sigma_hi: f64,
        strike_lo: f64,
        strike_hi: f64,
    ) -> Self {
        let sigma_axis = linspace(n_sigma, sigma_lo, sigma_hi);
        let strike_axis = linspace(n_strike, strike_lo, strike_hi);
        Self {
            sigmas: sigma_grid(&sigma_axis, n_strike),
            strikes: strike_grid(&strike_axis, n_sigma),
        }
    }
}

/// Replicates a sigma axis across `n_strike` columns.
pub fn sigma_grid(sigma_axis: &DVector<f64>, n_strike: usize) -> DMatrix<f64> {
    DMatrix::from_fn(sigma_axis.len(), n_strike, |i, _| sigma_axis[i])
}

/// Replicates a strike axis across `n_sigma` rows.
pub fn strike_grid(strike_axis: &DVector<f64>, n_sigma: usize) -> DMatrix<f64> {
    DMatrix::from_fn(n_sigma, strike_axis.len(), |_, j| strike_axis[j])
}
