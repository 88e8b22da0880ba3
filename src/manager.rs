//! The surface manager: owns the worker pool and the LRU, validates
//! requests, and serves bundles from cache or fresh computation.

use crate::cache::{LruCache, PricingKey};
use crate::core::{SurfaceBundle, SurfaceError};
use crate::surface::PricingSurface;

/// Front door for surface requests.
///
/// The rayon pool lives as long as the manager; lattice sweeps for every
/// request share it. The cache is driven only from the caller's thread, and
/// the borrow returned by [`SurfaceManager::get`] stays valid until the next
/// call on the same manager.
pub struct SurfaceManager {
    cache: LruCache,
    pool: rayon::ThreadPool,
}

impl SurfaceManager {
    /// Creates a manager whose pool is sized to hardware parallelism.
    /// Capacity is clamped to at least one cached bundle.
    pub fn new(capacity: usize) -> Result<Self, SurfaceError> {
        Self::build(capacity, 0)
    }

    /// Creates a manager with an explicit worker count (clamped to >= 1).
    pub fn with_threads(capacity: usize, n_threads: usize) -> Result<Self, SurfaceError> {
        Self::build(capacity, n_threads.max(1))
    }

    fn build(capacity: usize, n_threads: usize) -> Result<Self, SurfaceError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .build()
            .map_err(|e| SurfaceError::PoolExhausted(e.to_string()))?;
        Ok(Self {
            cache: LruCache::new(capacity),
            pool,
        })
    }

    /// Returns the bundle for the requested surface, computing and caching
    /// it on a miss.
    ///
    /// Two consecutive calls with parameters that quantize to the same key
    /// trigger exactly one computation.
    #[allow(clippy::too_many_arguments)]
    pub fn get(
        &mut self,
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
    ) -> Result<&SurfaceBundle, SurfaceError> {
        validate(
            n_sigma, n_strike, spot, rate, dividend, sigma_lo, sigma_hi, strike_lo, strike_hi,
            expiry,
        )?;

        let key = PricingKey::new(
            n_sigma, n_strike, spot, rate, dividend, sigma_lo, sigma_hi, strike_lo, strike_hi,
            expiry,
        );

        if !self.cache.contains(&key) {
            let surface = PricingSurface::new(
                n_sigma, n_strike, spot, rate, dividend, sigma_lo, sigma_hi, strike_lo,
                strike_hi, expiry, &self.pool,
            );
            self.cache.insert(key, surface.compute());
        }

        self.cache.get(&key)
    }
}

#[allow(clippy::too_many_arguments)]
fn validate(
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
) -> Result<(), SurfaceError> {
    let invalid = |msg: &str| Err(SurfaceError::InvalidArgument(msg.to_string()));

    if n_sigma == 0 {
        return invalid("n_sigma must be >= 1");
    }
    if n_strike == 0 {
        return invalid("n_strike must be >= 1");
    }
    let scalars = [
        spot, rate, dividend, sigma_lo, sigma_hi, strike_lo, strike_hi, expiry,
    ];
    if scalars.iter().any(|v| !v.is_finite()) {
        return invalid("all request parameters must be finite");
    }
    if spot <= 0.0 {
        return invalid("spot must be > 0");
    }
    if dividend < 0.0 {
        return invalid("dividend yield must be >= 0");
    }
    if sigma_lo <= 0.0 || sigma_hi < sigma_lo {
        return invalid("sigma range must satisfy 0 < sigma_lo <= sigma_hi");
    }
    if strike_lo <= 0.0 || strike_hi < strike_lo {
        return invalid("strike range must satisfy 0 < strike_lo <= strike_hi");
    }
    if expiry <= 0.0 {
        return invalid("tau must be > 0");
    }

    Ok(())
}
