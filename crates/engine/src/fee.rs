//! Transfer fee policy.
//!
//! Kept as a pure function so pricing is independently testable and a future
//! tiered schedule only has to touch this module.

use crate::Money;

/// Fee charged to the **sender** of a transfer: 1% of the amount, rounded
/// half-up to the minor unit.
///
/// The recipient always receives the full principal; the fee is never passed
/// through. Amount validation (`> 0`) happens in the transfer workflow, not
/// here.
#[must_use]
pub fn transfer_fee(amount: Money) -> Money {
    // 1% with half-up rounding: (minor + 50) / 100 for non-negative input.
    let minor = amount.minor();
    Money::new((minor + 50).div_euclid(100))
}
