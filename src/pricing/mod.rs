//! Settlement pricing curves of Long-Short Pair financial product libraries.
//!
//! A curve maps the settlement price of the underlying to the fraction of
//! collateral paid out to long token holders at expiry. The fraction is always
//! bounded by the curve's floor (`1 - long_cap_fraction`) and cap
//! (`long_cap_fraction`), whatever the price.
//!
//! Curves are configured once per referencing contract through a
//! [`ProductLibrary`] and looked up by the contract address afterwards.

mod error;
mod impermanent_loss;
mod leveraged;
mod library;
mod reserve;

use serde::Deserialize;

use crate::num::FixedPoint;

// Public re-exports
pub use error::*;
pub use impermanent_loss::*;
pub use leveraged::*;
pub use library::*;
pub use reserve::*;

/// Settlement pricing curve.
pub trait PricingCurve {
    /// Checks the parameters, failing with the first invalid one.
    fn validate(&self) -> Result<(), PricingError>;

    /// Fraction of collateral allocated to the long side at `price`.
    fn long_share(&self, price: FixedPoint) -> Result<FixedPoint, PricingError>;
}

/// Price range and payout cap shared by all curve variants.
///
/// Shares only rise with the price for a cap of at least one half. A lower cap
/// puts the floor above it and the curves pay out `1 - cap` at low prices down
/// to `cap` at high prices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub upper_bound: FixedPoint,
    pub long_cap_fraction: FixedPoint,
}

impl Bounds {
    pub fn new(upper_bound: FixedPoint, long_cap_fraction: FixedPoint) -> Self {
        Self {
            upper_bound,
            long_cap_fraction,
        }
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        if !self.upper_bound.is_positive() {
            return Err(PricingError::InvalidBound);
        }
        if !self.long_cap_fraction.is_positive() || self.long_cap_fraction >= FixedPoint::ONE {
            return Err(PricingError::InvalidCap);
        }
        Ok(())
    }

    /// Maximum long share.
    pub fn cap(&self) -> FixedPoint {
        self.long_cap_fraction
    }

    /// Minimum long share, symmetric to the cap.
    pub fn floor(&self) -> Result<FixedPoint, PricingError> {
        Ok(FixedPoint::ONE.try_sub(self.long_cap_fraction)?)
    }

    /// `value / upper_bound` bounded by the floor and the cap,
    /// with `value <= 0` mapped to the floor and `value >= upper_bound` to the cap.
    pub(crate) fn share_of(&self, value: FixedPoint) -> Result<FixedPoint, PricingError> {
        let floor = self.floor()?;
        if !value.is_positive() {
            return Ok(floor);
        }
        if value >= self.upper_bound {
            return Ok(self.cap());
        }
        Ok(value.try_div(self.upper_bound)?.bounded(floor, self.cap()))
    }
}

/// Reference price and leverage of leveraged curve variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Leverage {
    pub initial_price: FixedPoint,
    pub leverage_factor: FixedPoint,
}

impl Leverage {
    pub fn new(initial_price: FixedPoint, leverage_factor: FixedPoint) -> Self {
        Self {
            initial_price,
            leverage_factor,
        }
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        if !self.initial_price.is_positive() {
            return Err(PricingError::InvalidInitialPrice);
        }
        if !self.leverage_factor.is_positive() {
            return Err(PricingError::InvalidLeverage);
        }
        Ok(())
    }
}

/// Curve variant identifier used in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurveKind {
    Reserve,
    Leveraged,
    ImpermanentLoss,
}

/// Parameters of any supported curve variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveParameters {
    Reserve(ReserveCurve),
    Leveraged(LeveragedCurve),
    ImpermanentLoss(ImpermanentLossCurve),
}

impl CurveParameters {
    pub fn kind(&self) -> CurveKind {
        match self {
            CurveParameters::Reserve(_) => CurveKind::Reserve,
            CurveParameters::Leveraged(_) => CurveKind::Leveraged,
            CurveParameters::ImpermanentLoss(_) => CurveKind::ImpermanentLoss,
        }
    }

    pub fn bounds(&self) -> &Bounds {
        match self {
            CurveParameters::Reserve(c) => &c.bounds,
            CurveParameters::Leveraged(c) => &c.bounds,
            CurveParameters::ImpermanentLoss(c) => &c.bounds,
        }
    }
}

impl PricingCurve for CurveParameters {
    fn validate(&self) -> Result<(), PricingError> {
        match self {
            CurveParameters::Reserve(c) => c.validate(),
            CurveParameters::Leveraged(c) => c.validate(),
            CurveParameters::ImpermanentLoss(c) => c.validate(),
        }
    }

    fn long_share(&self, price: FixedPoint) -> Result<FixedPoint, PricingError> {
        match self {
            CurveParameters::Reserve(c) => c.long_share(price),
            CurveParameters::Leveraged(c) => c.long_share(price),
            CurveParameters::ImpermanentLoss(c) => c.long_share(price),
        }
    }
}

impl From<ReserveCurve> for CurveParameters {
    fn from(value: ReserveCurve) -> Self {
        CurveParameters::Reserve(value)
    }
}

impl From<LeveragedCurve> for CurveParameters {
    fn from(value: LeveragedCurve) -> Self {
        CurveParameters::Leveraged(value)
    }
}

impl From<ImpermanentLossCurve> for CurveParameters {
    fn from(value: ImpermanentLossCurve) -> Self {
        CurveParameters::ImpermanentLoss(value)
    }
}

/// Fraction of collateral allocated to long token holders when the
/// contract settles at `price`.
pub fn compute_long_share(
    price: FixedPoint,
    params: &CurveParameters,
) -> Result<FixedPoint, PricingError> {
    params.long_share(price)
}
