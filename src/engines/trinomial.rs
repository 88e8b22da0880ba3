//! Recombining trinomial lattice for American options over a whole
//! (sigma, strike) grid.
//!
//! One sweep prices every grid cell at once: the per-sigma spot multipliers
//! come from the grid's first column, so each backward-induction step is a
//! handful of element-wise passes over `(n_sigma, n_strike)` matrices rather
//! than a per-cell tree walk. Branch probabilities follow Hull (11th ed.)
//! Ch. 21: `pU = drift + 1/6`, `pD = 1/6 - drift`, `pM = 1 - pU - pD ~= 2/3`,
//! with `drift = sqrt(dtau / (12 sigma^2)) (r - q - sigma^2/2)`.

use nalgebra::{DMatrix, DVector};

use crate::core::OptionSide;

/// Number of time steps in the lattice.
pub const DEPTH: usize = 100;

#[inline]
fn intrinsic(side: OptionSide, spot: f64, strike: f64) -> f64 {
    match side {
        OptionSide::Call => (spot - strike).max(0.0),
        OptionSide::Put => (strike - spot).max(0.0),
    }
}

/// Per-sigma branch probabilities for one time step of length `dt`.
fn branch_probabilities(
    sigmas: &DMatrix<f64>,
    rate: f64,
    dividend: f64,
    dt: f64,
) -> (DMatrix<f64>, DMatrix<f64>, DMatrix<f64>) {
    let drift = sigmas.map(|sigma| {
        (dt / (12.0 * sigma * sigma)).sqrt() * ((rate - dividend) - 0.5 * sigma * sigma)
    });
    let p_up = drift.map(|d| d + 1.0 / 6.0);
    let p_down = drift.map(|d| 1.0 / 6.0 - d);
    let p_mid = p_up.zip_map(&p_down, |u, d| 1.0 - u - d);
    (p_up, p_mid, p_down)
}

/// Spot values for every sigma row at a lattice node `offset` levels away
/// from the root, via `S * exp(offset * ln u_i)`.
#[inline]
fn node_spots(spot: f64, ln_u: &DVector<f64>, offset: isize) -> DVector<f64> {
    ln_u.map(|lu| spot * (offset as f64 * lu).exp())
}

fn fill_intrinsic(
    out: &mut DMatrix<f64>,
    side: OptionSide,
    spots: &DVector<f64>,
    strikes: &DMatrix<f64>,
) {
    let (n_sigma, n_strike) = strikes.shape();
    for j in 0..n_strike {
        for i in 0..n_sigma {
            out[(i, j)] = intrinsic(side, spots[i], strikes[(i, j)]);
        }
    }
}

/// Prices an American call or put across the entire (sigma, strike) grid.
///
/// `sigmas` and `strikes` are the broadcast coordinate grids; the sigma
/// dimension must be constant along rows (the lattice multipliers are read
/// from the first column). Output has the same shape as the inputs and is
/// bit-reproducible for fixed inputs.
pub fn american_price(
    side: OptionSide,
    spot: f64,
    rate: f64,
    dividend: f64,
    expiry: f64,
    sigmas: &DMatrix<f64>,
    strikes: &DMatrix<f64>,
) -> DMatrix<f64> {
    let (n_sigma, n_strike) = sigmas.shape();
    let dt = expiry / DEPTH as f64;

    // Spot multipliers per sigma row: u = exp(sigma * sqrt(3 dt)), d = 1/u.
    let ln_u: DVector<f64> = sigmas.column(0).map(|sigma| sigma * (3.0 * dt).sqrt());
    let discount = (-rate * dt).exp();
    let (p_up, p_mid, p_down) = branch_probabilities(sigmas, rate, dividend, dt);

    // Two full-height node buffers, swapped between steps; slots past the
    // live range of a step are stale and never read.
    let n_nodes = 2 * DEPTH + 1;
    let mut values: Vec<DMatrix<f64>> = Vec::with_capacity(n_nodes);
    for node in 0..n_nodes {
        let spots = node_spots(spot, &ln_u, node as isize - DEPTH as isize);
        let mut grid = DMatrix::zeros(n_sigma, n_strike);
        fill_intrinsic(&mut grid, side, &spots, strikes);
        values.push(grid);
    }
    let mut next: Vec<DMatrix<f64>> = vec![DMatrix::zeros(n_sigma, n_strike); n_nodes];

    let mut exercise = DMatrix::zeros(n_sigma, n_strike);
    for depth in (0..DEPTH).rev() {
        let live = 2 * depth + 1;
        for node in 0..live {
            let spots = node_spots(spot, &ln_u, node as isize - depth as isize);
            fill_intrinsic(&mut exercise, side, &spots, strikes);

            // Node k rolls back from nodes (k+2, k+1, k) of the next step.
            let up = &values[node + 2];
            let mid = &values[node + 1];
            let down = &values[node];
            let out = &mut next[node];
            for j in 0..n_strike {
                for i in 0..n_sigma {
                    let continuation = discount
                        * (p_up[(i, j)] * up[(i, j)]
                            + p_mid[(i, j)] * mid[(i, j)]
                            + p_down[(i, j)] * down[(i, j)]);
                    out[(i, j)] = continuation.max(exercise[(i, j)]);
                }
            }
        }
        std::mem::swap(&mut values, &mut next);
    }

    values.swap_remove(0)
}
