//! One full surface computation: lattice greeks for both American
//! contracts, closed-form greeks for both European contracts, assembled
//! into a [`SurfaceBundle`].
//!
//! American sensitivities come from central finite differences over nine
//! perturbed lattice sweeps (base, spot down/up, sigma down/up, tau down/up,
//! rate down/up) dispatched to the shared worker pool. Results are combined
//! strictly by perturbation index, never by completion order, so a surface
//! is byte-identical across runs.

use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::core::{GreeksBundle, OptionSide, SurfaceBundle};
use crate::engines::{bsm, trinomial};
use crate::grid::SurfaceAxes;

// Positions in the perturbation schedule below.
const BASE: usize = 0;
const SPOT_LO: usize = 1;
const SPOT_HI: usize = 2;
const SIGMA_LO: usize = 3;
const SIGMA_HI: usize = 4;
const TAU_LO: usize = 5;
const TAU_HI: usize = 6;
const RATE_LO: usize = 7;
const RATE_HI: usize = 8;

/// Relative sigma bump for the vega difference: sigma grids are scaled by
/// `1 +/- SIGMA_BUMP`, so the effective step is a grid.
const SIGMA_BUMP: f64 = 0.01;

/// Smallest absolute rate bump (one basis point). A rate of zero would
/// otherwise collapse the rho central difference to 0/0.
const RATE_BUMP_FLOOR: f64 = 1.0e-4;

/// All inputs for one surface request plus the pool that runs the lattice
/// sweeps. Pure over its inputs; owns nothing shared.
pub struct PricingSurface<'a> {
    sigmas: DMatrix<f64>,
    strikes: DMatrix<f64>,
    spot: f64,
    rate: f64,
    dividend: f64,
    expiry: f64,
    pool: &'a rayon::ThreadPool,
}

impl<'a> PricingSurface<'a> {
    /// Builds the broadcast coordinate grids and captures the request scalars.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        n_sigma: usize,
        n_strike: usize,
        spot: f64,
        rate: f64,
        dividend: f64,
        sigma_lo: f64,
        sigma_hi: f64,
        strike_lo: f64,
        strike_hi: f64,
        expiry: f64,
        pool: &'a rayon::ThreadPool,
    ) -> Self {
        let axes = SurfaceAxes::build(n_sigma, n_strike, sigma_lo, sigma_hi, strike_lo, strike_hi);
        Self {
            sigmas: axes.sigmas,
            strikes: axes.strikes,
            spot,
            rate,
            dividend,
            expiry,
            pool,
        }
    }

    /// Computes all 24 grids for this request.
    pub fn compute(&self) -> SurfaceBundle {
        let american_call = self.lattice_greeks(OptionSide::Call);
        let american_put = self.lattice_greeks(OptionSide::Put);
        let european_call = bsm::call_greeks(
            self.spot,
            self.rate,
            self.dividend,
            self.expiry,
            &self.sigmas,
            &self.strikes,
        );
        let european_put = bsm::put_greeks(
            self.spot,
            self.rate,
            self.dividend,
            self.expiry,
            &self.strikes,
            &european_call,
        );
        SurfaceBundle::from_parts(american_call, american_put, european_call, european_put)
    }

    /// Central-difference greeks for one American side from nine perturbed
    /// lattice sweeps on the worker pool.
    fn lattice_greeks(&self, side: OptionSide) -> GreeksBundle {
        let eps_spot = 0.05 * self.spot;
        let eps_tau = 0.01 * self.expiry;
        let eps_rate = (0.01 * self.rate.abs()).max(RATE_BUMP_FLOOR);

        // (spot shift, sigma scale, expiry shift, rate shift) per run; the
        // positions match the index constants above.
        let shifts: [(f64, f64, f64, f64); 9] = [
            (0.0, 1.0, 0.0, 0.0),
            (-eps_spot, 1.0, 0.0, 0.0),
            (eps_spot, 1.0, 0.0, 0.0),
            (0.0, 1.0 - SIGMA_BUMP, 0.0, 0.0),
            (0.0, 1.0 + SIGMA_BUMP, 0.0, 0.0),
            (0.0, 1.0, -eps_tau, 0.0),
            (0.0, 1.0, eps_tau, 0.0),
            (0.0, 1.0, 0.0, -eps_rate),
            (0.0, 1.0, 0.0, eps_rate),
        ];

        // One indexed parallel map; collect() preserves schedule order.
        let mut prices: Vec<DMatrix<f64>> = self.pool.install(|| {
            shifts
                .par_iter()
                .map(|&(d_spot, sigma_scale, d_tau, d_rate)| {
                    let bumped_sigmas = &self.sigmas * sigma_scale;
                    trinomial::american_price(
                        side,
                        self.spot + d_spot,
                        self.rate + d_rate,
                        self.dividend,
                        self.expiry + d_tau,
                        &bumped_sigmas,
                        &self.strikes,
                    )
                })
                .collect()
        });

        let central =
            |lo: &DMatrix<f64>, hi: &DMatrix<f64>, eps: f64| (hi - lo) / (2.0 * eps);

        let delta = central(&prices[SPOT_LO], &prices[SPOT_HI], eps_spot);
        let gamma = (&prices[SPOT_HI] - &prices[BASE] * 2.0 + &prices[SPOT_LO])
            / (eps_spot * eps_spot);
        // The sigma step is a grid (1% of each sigma), so vega divides
        // element-wise.
        let vega = (&prices[SIGMA_HI] - &prices[SIGMA_LO])
            .zip_map(&self.sigmas, |dp, sigma| dp / (2.0 * SIGMA_BUMP * sigma));
        let theta = -central(&prices[TAU_LO], &prices[TAU_HI], eps_tau);
        let rho = central(&prices[RATE_LO], &prices[RATE_HI], eps_rate);
        let price = prices.swap_remove(BASE);

        GreeksBundle {
            price,
            delta,
            gamma,
            vega,
            theta,
            rho,
        }
    }
}
