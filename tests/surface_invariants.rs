//! Cross-cutting invariants over full surfaces plus cache behavior through
//! the manager.

use greekgrid::core::{GreekKind, OptionKind, SurfaceBundle, SurfaceError};
use greekgrid::manager::SurfaceManager;

const N_SIGMA: usize = 10;
const N_STRIKE: usize = 10;
const SPOT: f64 = 100.0;
const RATE: f64 = 0.05;
const DIVIDEND: f64 = 0.02;
const EXPIRY: f64 = 1.0;

fn standard_bundle(manager: &mut SurfaceManager) -> SurfaceBundle {
    manager
        .get(
            N_SIGMA, N_STRIKE, SPOT, RATE, DIVIDEND, 0.1, 0.4, 80.0, 120.0, EXPIRY,
        )
        .expect("valid request")
        .clone()
}

#[test]
fn every_grid_is_full_shape_and_finite() {
    let mut manager = SurfaceManager::with_threads(4, 2).unwrap();
    let bundle = standard_bundle(&mut manager);

    assert_eq!(bundle.shape(), (N_SIGMA, N_STRIKE));
    for grid in bundle.grids() {
        assert_eq!(grid.shape(), (N_SIGMA, N_STRIKE));
        assert!(grid.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn european_parity_holds_across_the_grid() {
    let mut manager = SurfaceManager::with_threads(4, 2).unwrap();
    let bundle = standard_bundle(&mut manager);

    let call = bundle.grid(OptionKind::EuropeanCall, GreekKind::Price);
    let put = bundle.grid(OptionKind::EuropeanPut, GreekKind::Price);

    for j in 0..N_STRIKE {
        let strike = 80.0 + 40.0 * j as f64 / (N_STRIKE - 1) as f64;
        let rhs = SPOT * (-DIVIDEND * EXPIRY).exp() - strike * (-RATE * EXPIRY).exp();
        for i in 0..N_SIGMA {
            assert!((call[(i, j)] - put[(i, j)] - rhs).abs() < 1e-8);
        }
    }
}

#[test]
fn deltas_carry_the_right_sign_for_all_kinds() {
    let mut manager = SurfaceManager::with_threads(4, 2).unwrap();
    let bundle = standard_bundle(&mut manager);

    for j in 0..N_STRIKE {
        for i in 0..N_SIGMA {
            for kind in [OptionKind::AmericanCall, OptionKind::EuropeanCall] {
                assert!(bundle.grid(kind, GreekKind::Delta)[(i, j)] >= 0.0);
            }
            for kind in [OptionKind::AmericanPut, OptionKind::EuropeanPut] {
                assert!(bundle.grid(kind, GreekKind::Delta)[(i, j)] <= 0.0);
            }
        }
    }
}

#[test]
fn american_prices_dominate_european_within_lattice_error() {
    let mut manager = SurfaceManager::with_threads(4, 2).unwrap();
    let bundle = standard_bundle(&mut manager);

    let pairs = [
        (OptionKind::AmericanCall, OptionKind::EuropeanCall),
        (OptionKind::AmericanPut, OptionKind::EuropeanPut),
    ];
    for (american, european) in pairs {
        let amer = bundle.grid(american, GreekKind::Price);
        let euro = bundle.grid(european, GreekKind::Price);
        for j in 0..N_STRIKE {
            for i in 0..N_SIGMA {
                assert!(
                    amer[(i, j)] >= euro[(i, j)] - 2.5e-2,
                    "american {:?} below european at ({i}, {j}): {} vs {}",
                    american,
                    amer[(i, j)],
                    euro[(i, j)]
                );
            }
        }
    }
}

#[test]
fn american_prices_dominate_intrinsic() {
    let mut manager = SurfaceManager::with_threads(4, 2).unwrap();
    let bundle = standard_bundle(&mut manager);

    let call = bundle.grid(OptionKind::AmericanCall, GreekKind::Price);
    let put = bundle.grid(OptionKind::AmericanPut, GreekKind::Price);

    for j in 0..N_STRIKE {
        let strike = 80.0 + 40.0 * j as f64 / (N_STRIKE - 1) as f64;
        for i in 0..N_SIGMA {
            assert!(call[(i, j)] >= (SPOT - strike).max(0.0));
            assert!(put[(i, j)] >= (strike - SPOT).max(0.0));
        }
    }
}

#[test]
fn gamma_is_nonnegative_up_to_difference_noise() {
    let mut manager = SurfaceManager::with_threads(4, 2).unwrap();
    let bundle = standard_bundle(&mut manager);

    for kind in OptionKind::ALL {
        let gamma = bundle.grid(kind, GreekKind::Gamma);
        for j in 0..N_STRIKE {
            for i in 0..N_SIGMA {
                assert!(
                    gamma[(i, j)] >= -1e-3,
                    "negative gamma for {kind:?} at ({i}, {j}): {}",
                    gamma[(i, j)]
                );
            }
        }
    }
}

#[test]
fn call_prices_fall_in_strike_and_rise_in_vol() {
    let mut manager = SurfaceManager::with_threads(4, 2).unwrap();
    let bundle = standard_bundle(&mut manager);

    for kind in [OptionKind::AmericanCall, OptionKind::EuropeanCall] {
        let price = bundle.grid(kind, GreekKind::Price);
        for i in 0..N_SIGMA {
            for j in 1..N_STRIKE {
                assert!(
                    price[(i, j)] < price[(i, j - 1)],
                    "{kind:?} not decreasing in strike at ({i}, {j})"
                );
            }
        }
        for j in 0..N_STRIKE {
            for i in 1..N_SIGMA {
                assert!(
                    price[(i, j)] > price[(i - 1, j)],
                    "{kind:?} not increasing in vol at ({i}, {j})"
                );
            }
        }
    }
}

#[test]
fn repeated_requests_are_idempotent() {
    let mut manager = SurfaceManager::with_threads(4, 2).unwrap();
    let first = standard_bundle(&mut manager);
    let second = standard_bundle(&mut manager);
    assert_eq!(first, second);
}

#[test]
fn independent_managers_agree_bitwise() {
    let mut one = SurfaceManager::with_threads(4, 1).unwrap();
    let mut two = SurfaceManager::with_threads(4, 3).unwrap();
    // Thread count must not affect the result: runs combine by index.
    assert_eq!(standard_bundle(&mut one), standard_bundle(&mut two));
}

#[test]
fn sub_micro_parameter_shifts_alias_to_the_cached_entry() {
    let mut manager = SurfaceManager::with_threads(4, 2).unwrap();
    let first = standard_bundle(&mut manager);
    let aliased = manager
        .get(
            N_SIGMA,
            N_STRIKE,
            SPOT + 4e-7,
            RATE,
            DIVIDEND,
            0.1,
            0.4,
            80.0,
            120.0,
            EXPIRY,
        )
        .unwrap();
    // The perturbed spot quantizes to the same key, so the cached bundle for
    // the original spot is returned unchanged.
    assert_eq!(*aliased, first);
}

#[test]
fn capacity_one_manager_still_serves_alternating_keys() {
    let mut manager = SurfaceManager::with_threads(1, 2).unwrap();

    let request = |manager: &mut SurfaceManager, spot: f64| -> f64 {
        manager
            .get(2, 2, spot, RATE, DIVIDEND, 0.15, 0.3, 90.0, 110.0, EXPIRY)
            .unwrap()
            .grid(OptionKind::EuropeanCall, GreekKind::Price)[(0, 0)]
    };

    let at_100 = request(&mut manager, 100.0);
    let at_105 = request(&mut manager, 105.0);
    assert!(at_105 > at_100);

    // Each key evicts the other; values stay correct through the thrash.
    assert_eq!(request(&mut manager, 100.0), at_100);
    assert_eq!(request(&mut manager, 105.0), at_105);
}

#[test]
fn single_cell_surface_behaves_like_scalars() {
    let mut manager = SurfaceManager::with_threads(2, 2).unwrap();
    let bundle = manager
        .get(1, 1, 100.0, 0.05, 0.02, 0.2, 0.5, 100.0, 130.0, 1.0)
        .unwrap();

    assert_eq!(bundle.shape(), (1, 1));
    // The single-point axes collapse to their lower bounds.
    let call = bundle.grid(OptionKind::EuropeanCall, GreekKind::Price)[(0, 0)];
    assert!((call - 9.227006).abs() < 1e-5);
}

#[test]
fn flatten_exports_every_grid_cell() {
    let mut manager = SurfaceManager::with_threads(2, 2).unwrap();
    let bundle = standard_bundle(&mut manager);

    let flat = bundle.flatten();
    assert_eq!(flat.len(), N_SIGMA * N_STRIKE * SurfaceBundle::GRID_COUNT);

    // Sigma is fastest, then strike: the first block is the american-call
    // price grid in column-major order.
    let amer_call_price = bundle.grid(OptionKind::AmericanCall, GreekKind::Price);
    assert_eq!(flat[0], amer_call_price[(0, 0)]);
    assert_eq!(flat[1], amer_call_price[(1, 0)]);
    assert_eq!(flat[N_SIGMA], amer_call_price[(0, 1)]);
}

#[test]
fn zero_and_negative_rates_produce_finite_grids() {
    let mut manager = SurfaceManager::with_threads(4, 2).unwrap();

    for rate in [0.0, -0.01] {
        let bundle = manager
            .get(2, 2, 100.0, rate, 0.02, 0.15, 0.3, 90.0, 110.0, 1.0)
            .unwrap();

        for grid in bundle.grids() {
            assert!(
                grid.iter().all(|v| v.is_finite()),
                "non-finite grid value at rate = {rate}"
            );
        }
        // The rho difference must survive the degenerate proportional bump.
        let put_rho = bundle.grid(OptionKind::AmericanPut, GreekKind::Rho);
        assert!(put_rho.iter().all(|v| v.is_finite() && *v <= 0.0));
    }
}

#[test]
fn invalid_requests_surface_invalid_argument() {
    let mut manager = SurfaceManager::with_threads(2, 2).unwrap();
    let result = manager.get(2, 2, 100.0, 0.05, 0.02, 0.3, 0.1, 90.0, 110.0, 1.0);
    assert!(matches!(result, Err(SurfaceError::InvalidArgument(_))));
}
