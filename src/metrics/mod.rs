//! Collateralization and portfolio metrics.
//!
//! Pure functions over already fetched snapshots. Data problems such as an
//! unknown collateral or a zero denominator are reported as [`MetricsError`],
//! callers decide whether to skip the asset or abort.

mod collateral;
mod portfolio;

use alloy::primitives::Address;

use crate::num::NumError;

// Public re-exports
pub use collateral::*;
pub use portfolio::*;

/// Errors of metric computations, all of them mean "data unavailable".
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MetricsError {
    #[error("collateral not found: {0}")]
    CollateralNotFound(String),

    #[error("asset not found: {0}")]
    AssetNotFound(String),

    #[error("token {0} is not held by the pool")]
    TokenNotInPool(Address),

    #[error("zero denominator")]
    ZeroDenominator,

    #[error("missing price")]
    MissingPrice,

    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] NumError),
}
