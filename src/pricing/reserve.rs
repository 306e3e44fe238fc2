use super::{Bounds, PricingCurve, PricingError};
use crate::num::FixedPoint;

/// Curve paying out the price ratio to the upper bound, held
/// within the reserve kept for each side.
///
/// Non-decreasing in the price as long as the cap is at least one half,
/// see [`Bounds`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReserveCurve {
    pub bounds: Bounds,
}

impl ReserveCurve {
    pub fn new(upper_bound: FixedPoint, long_cap_fraction: FixedPoint) -> Self {
        Self {
            bounds: Bounds::new(upper_bound, long_cap_fraction),
        }
    }
}

impl PricingCurve for ReserveCurve {
    fn validate(&self) -> Result<(), PricingError> {
        self.bounds.validate()
    }

    fn long_share(&self, price: FixedPoint) -> Result<FixedPoint, PricingError> {
        self.validate()?;
        self.bounds.share_of(price)
    }
}
