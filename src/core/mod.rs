//! Common domain types, result bundles, and the library-wide error enum.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

pub mod types;

pub use types::*;

/// Price and sensitivity grids for one contract over a (sigma, strike) grid.
///
/// Every grid has shape `(n_sigma, n_strike)` with sigma varying along rows
/// and strike along columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreeksBundle {
    /// Present value.
    pub price: DMatrix<f64>,
    /// dV/dS.
    pub delta: DMatrix<f64>,
    /// d^2V/dS^2.
    pub gamma: DMatrix<f64>,
    /// dV/dsigma.
    pub vega: DMatrix<f64>,
    /// dV/dtau.
    pub theta: DMatrix<f64>,
    /// dV/dr.
    pub rho: DMatrix<f64>,
}

impl GreeksBundle {
    /// Shape shared by the six grids.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.price.shape()
    }

    /// Borrows the grid for one greek.
    pub fn grid(&self, greek: GreekKind) -> &DMatrix<f64> {
        match greek {
            GreekKind::Price => &self.price,
            GreekKind::Delta => &self.delta,
            GreekKind::Gamma => &self.gamma,
            GreekKind::Vega => &self.vega,
            GreekKind::Theta => &self.theta,
            GreekKind::Rho => &self.rho,
        }
    }
}

const GRID_COUNT: usize = OptionKind::COUNT * GreekKind::COUNT;

/// The full result of one surface request: 24 grids covering every
/// `OptionKind` x `GreekKind` pair.
///
/// Grids are stored at `option.idx() * GreekKind::COUNT + greek.idx()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBundle {
    grids: [DMatrix<f64>; GRID_COUNT],
}

impl SurfaceBundle {
    /// Total number of grids per bundle.
    pub const GRID_COUNT: usize = GRID_COUNT;

    /// Assembles a bundle from the four per-contract results, in
    /// `OptionKind` ordinal order.
    pub(crate) fn from_parts(
        american_call: GreeksBundle,
        american_put: GreeksBundle,
        european_call: GreeksBundle,
        european_put: GreeksBundle,
    ) -> Self {
        let ac = american_call;
        let ap = american_put;
        let ec = european_call;
        let ep = european_put;
        Self {
            grids: [
                ac.price, ac.delta, ac.gamma, ac.vega, ac.theta, ac.rho, //
                ap.price, ap.delta, ap.gamma, ap.vega, ap.theta, ap.rho, //
                ec.price, ec.delta, ec.gamma, ec.vega, ec.theta, ec.rho, //
                ep.price, ep.delta, ep.gamma, ep.vega, ep.theta, ep.rho,
            ],
        }
    }

    /// Borrows the grid for one contract/greek pair.
    #[inline]
    pub fn grid(&self, option: OptionKind, greek: GreekKind) -> &DMatrix<f64> {
        &self.grids[option.idx() * GreekKind::COUNT + greek.idx()]
    }

    /// Borrows all 24 grids in bundle order.
    #[inline]
    pub fn grids(&self) -> &[DMatrix<f64>; GRID_COUNT] {
        &self.grids
    }

    /// Shape `(n_sigma, n_strike)` shared by every grid.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.grids[0].shape()
    }

    /// Flattens the bundle into one column-major vector for binding and
    /// transport layers: sigma varies fastest, then strike, then option
    /// kind, then greek kind.
    pub fn flatten(&self) -> Vec<f64> {
        let (n_sigma, n_strike) = self.shape();
        let mut out = Vec::with_capacity(n_sigma * n_strike * Self::GRID_COUNT);
        for greek in GreekKind::ALL {
            for option in OptionKind::ALL {
                out.extend_from_slice(self.grid(option, greek).as_slice());
            }
        }
        out
    }
}

/// Errors surfaced by the surface manager and the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// A request parameter violates its domain precondition.
    InvalidArgument(String),
    /// Cache lookup for a key that has no live entry.
    NotFound,
    /// The worker pool could not be constructed or refused work.
    PoolExhausted(String),
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::NotFound => write!(f, "key not found in surface cache"),
            Self::PoolExhausted(msg) => write!(f, "worker pool exhausted: {msg}"),
        }
    }
}

impl std::error::Error for SurfaceError {}
