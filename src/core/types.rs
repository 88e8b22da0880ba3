use serde::{Deserialize, Serialize};

/// Option payoff side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionSide {
    /// Call payoff profile.
    Call,
    /// Put payoff profile.
    Put,
}

impl OptionSide {
    /// Returns +1.0 for calls and -1.0 for puts.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Self::Call => 1.0,
            Self::Put => -1.0,
        }
    }
}

/// The four contracts priced on every surface, in bundle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionKind {
    /// Call exercisable at any time up to expiry.
    AmericanCall,
    /// Put exercisable at any time up to expiry.
    AmericanPut,
    /// Call exercisable only at expiry.
    EuropeanCall,
    /// Put exercisable only at expiry.
    EuropeanPut,
}

impl OptionKind {
    /// Number of contract kinds in a surface bundle.
    pub const COUNT: usize = 4;

    /// All kinds in bundle order.
    pub const ALL: [OptionKind; 4] = [
        Self::AmericanCall,
        Self::AmericanPut,
        Self::EuropeanCall,
        Self::EuropeanPut,
    ];

    /// Position of this kind inside a surface bundle.
    #[inline]
    pub fn idx(self) -> usize {
        match self {
            Self::AmericanCall => 0,
            Self::AmericanPut => 1,
            Self::EuropeanCall => 2,
            Self::EuropeanPut => 3,
        }
    }

    /// Payoff side of the contract.
    #[inline]
    pub fn side(self) -> OptionSide {
        match self {
            Self::AmericanCall | Self::EuropeanCall => OptionSide::Call,
            Self::AmericanPut | Self::EuropeanPut => OptionSide::Put,
        }
    }

    /// Whether the contract carries early-exercise rights.
    #[inline]
    pub fn is_american(self) -> bool {
        matches!(self, Self::AmericanCall | Self::AmericanPut)
    }
}

/// Sensitivities computed for every contract, in bundle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GreekKind {
    /// Present value.
    Price,
    /// First derivative to spot.
    Delta,
    /// Second derivative to spot.
    Gamma,
    /// First derivative to volatility.
    Vega,
    /// First derivative to time to expiry.
    Theta,
    /// First derivative to the risk-free rate.
    Rho,
}

impl GreekKind {
    /// Number of greeks per contract.
    pub const COUNT: usize = 6;

    /// All greeks in bundle order.
    pub const ALL: [GreekKind; 6] = [
        Self::Price,
        Self::Delta,
        Self::Gamma,
        Self::Vega,
        Self::Theta,
        Self::Rho,
    ];

    /// Position of this greek inside a contract's six-grid block.
    #[inline]
    pub fn idx(self) -> usize {
        match self {
            Self::Price => 0,
            Self::Delta => 1,
            Self::Gamma => 2,
            Self::Vega => 3,
            Self::Theta => 4,
            Self::Rho => 5,
        }
    }
}
