//! Threaded decimal rounding policy.
//!
//! Every precision-losing operation in the indicator engine goes through a
//! `MathContext`, so a composed indicator rounds identically no matter in
//! which order its sub-expressions are evaluated or cached. The context is
//! a property of the owning `CandleSeries`: one policy per series, shared by
//! every attached indicator.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounding policy for indicator arithmetic.
///
/// Addition and subtraction of `Decimal` are exact and bypass the context;
/// division and multiplication round their result to `scale` fractional
/// digits with the configured strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathContext {
    scale: u32,
    rounding: RoundingStrategy,
}

impl MathContext {
    pub const fn new(scale: u32, rounding: RoundingStrategy) -> Self {
        Self { scale, rounding }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Round a value to the context scale.
    pub fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.scale, self.rounding)
    }

    /// Divide and round. Panics if `den` is zero; every division in the
    /// catalog guards its denominator first (the guarded cases return 0 or
    /// 100 by contract instead of dividing).
    pub fn div(&self, num: Decimal, den: Decimal) -> Decimal {
        assert!(!den.is_zero(), "MathContext::div by zero");
        self.round(num / den)
    }

    /// Multiply and round.
    pub fn mul(&self, a: Decimal, b: Decimal) -> Decimal {
        self.round(a * b)
    }
}

impl Default for MathContext {
    /// Scale 12, midpoint away from zero — wide enough that 14-period
    /// smoothing chains are stable, narrow enough to stay far from the
    /// 28-digit `Decimal` mantissa limit.
    fn default() -> Self {
        Self::new(12, RoundingStrategy::MidpointAwayFromZero)
    }
}
