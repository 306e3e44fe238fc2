use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::metrics::MetricsError;

/// Network (chain) ID.
pub type NetworkId = u64;

/// Expiring Multi-Party contract ABI generation.
///
/// Both generations expose the same state, [`EmpVersion::V1`] under the
/// legacy `...Pct` getter names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmpVersion {
    V1,
    #[default]
    V2,
}

/// Lifecycle state of an Expiring Multi-Party contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractState {
    Open = 0,
    ExpiredPriceRequested = 1,
    ExpiredPriceReceived = 2,
}

impl TryFrom<u8> for ContractState {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ContractState::Open),
            1 => Ok(ContractState::ExpiredPriceRequested),
            2 => Ok(ContractState::ExpiredPriceReceived),
            other => Err(other),
        }
    }
}

/// Supported collateral tokens.
///
/// Symbols are case-insensitive, in configuration as well as when parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum CollateralSymbol {
    Weth,
    Usdc,
}

impl CollateralSymbol {
    pub fn decimals(&self) -> u8 {
        match self {
            CollateralSymbol::Weth => 18,
            CollateralSymbol::Usdc => 6,
        }
    }

    /// Whether the collateral has to be converted to USD with a spot price.
    /// Stable collateral is valued at par.
    pub fn is_usd_priced(&self) -> bool {
        matches!(self, CollateralSymbol::Weth)
    }
}

impl FromStr for CollateralSymbol {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WETH" => Ok(CollateralSymbol::Weth),
            "USDC" => Ok(CollateralSymbol::Usdc),
            _ => Err(MetricsError::CollateralNotFound(s.to_string())),
        }
    }
}

impl TryFrom<String> for CollateralSymbol {
    type Error = MetricsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for CollateralSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CollateralSymbol::Weth => "WETH",
            CollateralSymbol::Usdc => "USDC",
        })
    }
}
