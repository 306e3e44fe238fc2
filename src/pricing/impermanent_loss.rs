use super::{Bounds, Leverage, PricingCurve, PricingError};
use crate::num::{FixedPoint, NumError};

/// Curve paying out leveraged impermanent loss of a constant-product pool
/// relative to the initial price.
///
/// At the initial price the long share is `1 / upper_bound`; any move of the
/// price in either direction increases the loss and therefore the long share.
/// Non-positive prices pay out the cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImpermanentLossCurve {
    pub bounds: Bounds,
    pub leverage: Leverage,
}

impl ImpermanentLossCurve {
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

    /// Impermanent loss `1 - 2 * sqrt(price * initial) / (price + initial)`,
    /// always non-negative for a positive price.
    ///
    /// Prices too large for `price * initial` are evaluated on the
    /// equivalent form `1 - 2 * sqrt(r) / (1 + r)` with `r = initial / price`.
    pub fn impermanent_loss(&self, price: FixedPoint) -> Result<FixedPoint, PricingError> {
        let initial_price = self.leverage.initial_price;
        let direct = price.try_mul(initial_price).and_then(|product| {
            let geometric_mean = product.try_sqrt()?;
            geometric_mean
                .try_add(geometric_mean)?
                .try_div(price.try_add(initial_price)?)
        });
        let ratio = match direct {
            Err(NumError::Overflow) => {
                let relative = initial_price.try_div(price)?;
                let root = relative.try_sqrt()?;
                root.try_add(root)?
                    .try_div(FixedPoint::ONE.try_add(relative)?)?
            }
            other => other?,
        };
        Ok(FixedPoint::ONE.try_sub(ratio)?)
    }
}

impl PricingCurve for ImpermanentLossCurve {
    fn validate(&self) -> Result<(), PricingError> {
        self.bounds.validate()?;
        self.leverage.validate()
    }

    fn long_share(&self, price: FixedPoint) -> Result<FixedPoint, PricingError> {
        self.validate()?;
        if !price.is_positive() {
            return Ok(self.bounds.cap());
        }
        let leveraged_loss = self
            .leverage
            .leverage_factor
            .try_mul(self.impermanent_loss(price)?)?;
        let share = FixedPoint::ONE
            .try_add(leveraged_loss)?
            .try_div(self.bounds.upper_bound)?;
        Ok(share.bounded(self.bounds.floor()?, self.bounds.cap()))
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::I256;

    use super::*;

    fn fp(s: &str) -> FixedPoint {
        s.parse().unwrap()
    }

    fn curve() -> ImpermanentLossCurve {
        ImpermanentLossCurve::new(fp("2"), fp("0.9"), fp("4000"), fp("20"))
    }

    #[test]
    fn test_impermanent_loss() {
        assert_eq!(curve().impermanent_loss(fp("4000")).unwrap(), FixedPoint::ZERO);
        assert_eq!(curve().impermanent_loss(fp("2250")).unwrap(), fp("0.04"));
        assert_eq!(
            curve().impermanent_loss(fp("4500")).unwrap(),
            fp("0.001731603030756437")
        );
    }

    #[test]
    fn test_midpoint_at_initial_price() {
        assert_eq!(curve().long_share(fp("4000")).unwrap(), fp("0.5"));
    }

    #[test]
    fn test_within_bounds() {
        assert_eq!(
            curve().long_share(fp("3500")).unwrap(),
            fp("0.522246968602822980")
        );
        assert_eq!(
            curve().long_share(fp("3000")).unwrap(),
            fp("0.60256681389212976")
        );
        assert_eq!(
            curve().long_share(fp("4500")).unwrap(),
            fp("0.51731603030756437")
        );
        assert_eq!(
            curve().long_share(fp("2250.000000000000019999")).unwrap(),
            fp("0.899999999999999990")
        );
    }

    #[test]
    fn test_clamps_to_cap() {
        assert_eq!(curve().long_share(fp("2250")).unwrap(), fp("0.9"));
        assert_eq!(curve().long_share(fp("8000")).unwrap(), fp("0.9"));
        assert_eq!(curve().long_share(fp("1")).unwrap(), fp("0.9"));
        assert_eq!(curve().long_share(fp("-1")).unwrap(), fp("0.9"));
        assert_eq!(curve().long_share(FixedPoint::ZERO).unwrap(), fp("0.9"));
    }

    #[test]
    fn test_extreme_prices() {
        let huge = fp("10000000000000000000000000000000000000000");
        assert_eq!(curve().long_share(huge).unwrap(), fp("0.9"));

        // Loss saturates at 1 once initial / price is below the resolution
        let curve = ImpermanentLossCurve::new(fp("2"), fp("0.9"), fp("4000"), fp("0.5"));
        assert_eq!(curve.impermanent_loss(huge).unwrap(), FixedPoint::ONE);
        assert_eq!(curve.long_share(huge).unwrap(), fp("0.75"));
        assert_eq!(
            curve.long_share(FixedPoint::from_raw(I256::MAX)).unwrap(),
            fp("0.75")
        );
    }

    #[test]
    fn test_clamps_to_floor() {
        // Upper bound of 10 puts the midpoint at 0.1, below the floor of 0.2
        let curve = ImpermanentLossCurve::new(fp("10"), fp("0.8"), fp("4000"), fp("1"));
        assert_eq!(curve.long_share(fp("4000")).unwrap(), fp("0.2"));
    }

    #[test]
    fn test_invalid_params() {
        let curve = ImpermanentLossCurve::new(fp("2"), fp("0.9"), fp("-4000"), fp("20"));
        assert_eq!(curve.long_share(fp("1")), Err(PricingError::InvalidInitialPrice));
    }
}
