use alloy::primitives::Address;

use crate::num::NumError;

/// Pricing curve configuration and evaluation errors.
///
/// Every configuration failure has its own variant so callers can tell
/// a bad bound from a bad cap or from an already configured contract.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("invalid bound: upper bound must be positive")]
    InvalidBound,

    #[error("invalid cap: long cap fraction must be within (0, 1)")]
    InvalidCap,

    #[error("invalid initial price: must be positive")]
    InvalidInitialPrice,

    #[error("invalid leverage: must be positive")]
    InvalidLeverage,

    #[error("parameters already set for {0}")]
    ParamsAlreadySet(Address),

    #[error("parameters not set for {0}")]
    ParamsNotSet(Address),

    #[error("invalid reference contract: {0}")]
    InvalidReference(Address),

    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] NumError),
}
