//! Pricing engine implementations.

pub mod bsm;
pub mod trinomial;
