use super::{Bounds, Leverage, PricingCurve, PricingError};
use crate::num::FixedPoint;

/// Curve evaluated on the leveraged price
/// `initial_price + leverage_factor * (price - initial_price)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeveragedCurve {
    pub bounds: Bounds,
    pub leverage: Leverage,
}

impl LeveragedCurve {
    pub fn new(
        upper_bound: FixedPoint,
        long_cap_fraction: FixedPoint,
        initial_price: FixedPoint,
        leverage_factor: FixedPoint,
    ) -> Self {
        Self {
            bounds: Bounds::new(upper_bound, long_cap_fraction),
            leverage: Leverage::new(initial_price, leverage_factor),
        }
    }

    /// Price amplified by the leverage factor around the initial price.
    /// Can be negative for large enough drops.
    pub fn leveraged_price(&self, price: FixedPoint) -> Result<FixedPoint, PricingError> {
        let Leverage {
            initial_price,
            leverage_factor,
        } = self.leverage;
        let deviation = leverage_factor.try_mul(price.try_sub(initial_price)?)?;
        Ok(initial_price.try_add(deviation)?)
    }
}

impl PricingCurve for LeveragedCurve {
    fn validate(&self) -> Result<(), PricingError> {
        self.bounds.validate()?;
        self.leverage.validate()
    }

    fn long_share(&self, price: FixedPoint) -> Result<FixedPoint, PricingError> {
        self.validate()?;
        self.bounds.share_of(self.leveraged_price(price)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(s: &str) -> FixedPoint {
        s.parse().unwrap()
    }

    fn curve() -> LeveragedCurve {
        LeveragedCurve::new(fp("200"), fp("0.9"), fp("100"), fp("2"))
    }

    #[test]
    fn test_leveraged_price() {
        assert_eq!(curve().leveraged_price(fp("61")).unwrap(), fp("22"));
        assert_eq!(curve().leveraged_price(fp("100")).unwrap(), fp("100"));
        assert_eq!(curve().leveraged_price(fp("40")).unwrap(), fp("-20"));
    }

    #[test]
    fn test_within_bounds() {
        assert_eq!(curve().long_share(fp("61")).unwrap(), fp("0.11"));
        assert_eq!(curve().long_share(fp("100")).unwrap(), fp("0.5"));
        assert_eq!(curve().long_share(fp("125")).unwrap(), fp("0.75"));
    }

    #[test]
    fn test_clamps() {
        // Leveraged price 200 hits the upper bound
        assert_eq!(curve().long_share(fp("150")).unwrap(), fp("0.9"));
        assert_eq!(curve().long_share(fp("145")).unwrap(), fp("0.9"));
        // Leveraged price drops below zero
        assert_eq!(curve().long_share(fp("40")).unwrap(), fp("0.1"));
        assert_eq!(curve().long_share(fp("50")).unwrap(), fp("0.1"));
        assert_eq!(curve().long_share(fp("-1")).unwrap(), fp("0.1"));
        assert_eq!(curve().long_share(fp("55")).unwrap(), fp("0.1"));
    }

    #[test]
    fn test_invalid_params() {
        let invalid = |ub: &str, cap: &str, ip: &str, lev: &str| {
            LeveragedCurve::new(fp(ub), fp(cap), fp(ip), fp(lev)).validate()
        };
        assert_eq!(invalid("0", "0.9", "100", "2"), Err(PricingError::InvalidBound));
        assert_eq!(invalid("200", "1.1", "100", "2"), Err(PricingError::InvalidCap));
        assert_eq!(
            invalid("200", "0.9", "0", "2"),
            Err(PricingError::InvalidInitialPrice)
        );
        assert_eq!(invalid("200", "0.9", "100", "0"), Err(PricingError::InvalidLeverage));
    }
}
