//! Closed-form Black-Scholes-Merton greeks over a (sigma, strike) grid.
//!
//! The scalar kernel follows Hull (11th ed.) Ch. 19 with a continuous
//! dividend yield; the grid functions map it element-wise over the broadcast
//! coordinate grids. Put greeks derive from the call bundle through put-call
//! parity, which shares gamma and vega and shifts price, delta, theta, and
//! rho. Theta is signed as dV/dtau with tau the time to expiry.

use nalgebra::DMatrix;

use crate::core::GreeksBundle;
use crate::math::{normal_cdf, normal_pdf};

/// Closed-form greeks for a single European call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointGreeks {
    pub price: f64,
    pub delta: f64,
    pub gamma: f64,
    pub vega: f64,
    pub theta: f64,
    pub rho: f64,
}

#[inline]
fn d1_d2(spot: f64, strike: f64, rate: f64, dividend: f64, sigma: f64, expiry: f64) -> (f64, f64) {
    let vt = sigma * expiry.sqrt();
    let d1 = ((spot / strike).ln() + (rate - dividend + 0.5 * sigma * sigma) * expiry) / vt;
    (d1, d1 - vt)
}

/// European call greeks at one point.
pub fn call_greeks_at(
    spot: f64,
    strike: f64,
    rate: f64,
    dividend: f64,
    sigma: f64,
    expiry: f64,
) -> PointGreeks {
    let sqrt_tau = expiry.sqrt();
    let df_q = (-dividend * expiry).exp();
    let df_r = (-rate * expiry).exp();

    let (d1, d2) = d1_d2(spot, strike, rate, dividend, sigma, expiry);
    let nd1 = normal_cdf(d1);
    let nd2 = normal_cdf(d2);
    let pdf1 = normal_pdf(d1);

    PointGreeks {
        price: spot * df_q * nd1 - strike * df_r * nd2,
        delta: df_q * nd1,
        gamma: pdf1 * df_q / (spot * sigma * sqrt_tau),
        vega: spot * sqrt_tau * pdf1 * df_q,
        theta: -spot * pdf1 * sigma * df_q / (2.0 * sqrt_tau) + dividend * spot * nd1 * df_q
            - rate * strike * df_r * nd2,
        rho: strike * expiry * df_r * nd2,
    }
}

/// European call greeks, element-wise over the broadcast grids.
pub fn call_greeks(
    spot: f64,
    rate: f64,
    dividend: f64,
    expiry: f64,
    sigmas: &DMatrix<f64>,
    strikes: &DMatrix<f64>,
) -> GreeksBundle {
    let (n_sigma, n_strike) = sigmas.shape();

    let mut price = DMatrix::zeros(n_sigma, n_strike);
    let mut delta = DMatrix::zeros(n_sigma, n_strike);
    let mut gamma = DMatrix::zeros(n_sigma, n_strike);
    let mut vega = DMatrix::zeros(n_sigma, n_strike);
    let mut theta = DMatrix::zeros(n_sigma, n_strike);
    let mut rho = DMatrix::zeros(n_sigma, n_strike);

    for j in 0..n_strike {
        for i in 0..n_sigma {
            let g = call_greeks_at(
                spot,
                strikes[(i, j)],
                rate,
                dividend,
                sigmas[(i, j)],
                expiry,
            );
            price[(i, j)] = g.price;
            delta[(i, j)] = g.delta;
            gamma[(i, j)] = g.gamma;
            vega[(i, j)] = g.vega;
            theta[(i, j)] = g.theta;
            rho[(i, j)] = g.rho;
        }
    }

    GreeksBundle {
        price,
        delta,
        gamma,
        vega,
        theta,
        rho,
    }
}

/// European put greeks derived from the call bundle by put-call parity.
///
/// `P = C - S e^(-q tau) + K e^(-r tau)`; differentiating the parity identity gives
/// the delta, theta, and rho adjustments while gamma and vega carry over.
pub fn put_greeks(
    spot: f64,
    rate: f64,
    dividend: f64,
    expiry: f64,
    strikes: &DMatrix<f64>,
    call: &GreeksBundle,
) -> GreeksBundle {
    let df_q = (-dividend * expiry).exp();
    let df_r = (-rate * expiry).exp();

    GreeksBundle {
        price: call.price.zip_map(strikes, |c, k| c - spot * df_q + k * df_r),
        delta: call.delta.map(|d| d - df_q),
        gamma: call.gamma.clone(),
        vega: call.vega.clone(),
        theta: call
            .theta
            .zip_map(strikes, |t, k| t - dividend * spot * df_q + rate * k * df_r),
        rho: call.rho.zip_map(strikes, |r, k| r - k * expiry * df_r),
    }
}
