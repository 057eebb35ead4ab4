//! # Surcharge Calculator
//!
//! The fast-track (expedite) surcharge: a premium on the professional
//! subtotal, computed before any discount and then discounted along with it.

use crate::money::Money;
use crate::types::Rate;

/// `floor(rate * base_professional_subtotal)` when `fast_track` is set,
/// otherwise zero.
pub fn fast_track_surcharge(base_professional_subtotal: Money, fast_track: bool, rate: Rate) -> Money {
    if !fast_track {
        return Money::zero();
    }
    base_professional_subtotal.apply_rate(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST_TRACK: Rate = Rate::from_bps(2500);

    #[test]
    fn test_surcharge_when_enabled() {
        let surcharge = fast_track_surcharge(Money::from_units(23_500), true, FAST_TRACK);
        assert_eq!(surcharge.units(), 5_875);

        // floor(0.25 * 4798) = floor(1199.5) = 1199
        let surcharge = fast_track_surcharge(Money::from_units(4_798), true, FAST_TRACK);
        assert_eq!(surcharge.units(), 1_199);
    }

    #[test]
    fn test_no_surcharge_when_disabled() {
        assert!(fast_track_surcharge(Money::from_units(23_500), false, FAST_TRACK).is_zero());
    }
}
