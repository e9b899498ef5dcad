//! Exact decimal helpers. Every fallible operation maps overflow to
//! [`PricingError::UnexpectedComputation`].

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{PricingError, PricingResult};

/// Round half away from zero ("half-up" for the non-negative amounts quoted here).
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

pub(crate) fn add(a: Decimal, b: Decimal) -> PricingResult<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow("addition"))
}

pub(crate) fn mul(a: Decimal, b: Decimal) -> PricingResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow("multiplication"))
}

pub(crate) fn div(a: Decimal, b: Decimal) -> PricingResult<Decimal> {
    a.checked_div(b).ok_or_else(|| overflow("division"))
}

fn overflow(op: &str) -> PricingError {
    PricingError::UnexpectedComputation(format!("decimal overflow in {}", op))
}
