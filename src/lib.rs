//! GreekGrid computes dense option-surface analytics: prices and greeks for
//! American and European calls and puts over a two-dimensional implied-
//! volatility / strike grid, with full result bundles cached behind a
//! quantized-key LRU.
//!
//! European contracts use the Black-Scholes-Merton closed forms with a
//! continuous dividend yield; American contracts run a recombining trinomial
//! lattice with early-exercise comparison, and their sensitivities come from
//! central finite differences over perturbed lattice sweeps scheduled on a
//! shared rayon pool.
//!
//! References used across modules:
//! - Hull, *Options, Futures, and Other Derivatives* (11th ed.), Ch. 19 for
//!   the closed-form greeks and Ch. 21 for the trinomial branch
//!   probabilities.
//! - Put-call parity identities for the European put bundle.
//!
//! Numerical considerations:
//! - The lattice depth is fixed at 100 steps; closed-form comparisons carry
//!   O(dtau) discretization error on the order of 1e-2 at equity-like scales.
//! - Finite-difference bumps are proportional (5% of spot, 1% of sigma, tau,
//!   and rate) to keep second differences smooth across coarse lattices; the
//!   rate bump is floored at one basis point so zero and near-zero rates
//!   keep a usable rho difference.
//! - Cache keys truncate parameters at 1e-6 absolute precision; requests
//!   closer than that alias to the same entry.
//!
//! # Quick Start
//!
//! Request a 3x3 surface and read one grid out of the bundle:
//! ```rust
//! use greekgrid::core::{GreekKind, OptionKind};
//! use greekgrid::manager::SurfaceManager;
//!
//! let mut manager = SurfaceManager::with_threads(8, 2).unwrap();
//! let bundle = manager
//!     .get(3, 3, 100.0, 0.05, 0.02, 0.1, 0.4, 80.0, 120.0, 1.0)
//!     .unwrap();
//!
//! assert_eq!(bundle.shape(), (3, 3));
//! let put_delta = bundle.grid(OptionKind::AmericanPut, GreekKind::Delta);
//! assert!(put_delta[(0, 0)] <= 0.0);
//! ```
//!
//! Price a single grid directly with the lattice engine:
//! ```rust
//! use greekgrid::core::OptionSide;
//! use greekgrid::engines::trinomial::american_price;
//! use nalgebra::DMatrix;
//!
//! let sigmas = DMatrix::from_element(1, 1, 0.2);
//! let strikes = DMatrix::from_element(1, 1, 100.0);
//! let px = american_price(OptionSide::Put, 90.0, 0.05, 0.02, 1.0, &sigmas, &strikes);
//! assert!(px[(0, 0)] >= 10.0);
//! ```

pub mod cache;
pub mod core;
pub mod engines;
pub mod grid;
pub mod manager;
pub mod math;
pub mod surface;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::cache::{LruCache, PricingKey};
    pub use crate::core::{
        GreekKind, GreeksBundle, OptionKind, OptionSide, SurfaceBundle, SurfaceError,
    };
    pub use crate::manager::SurfaceManager;
    pub use crate::surface::PricingSurface;
}
