//! Static registry of synthetic assets.
//!
//! Assets are configured in JSON, keyed by network id and then by asset group
//! (e.g. all `ugas` cycles form the `ugas` group):
//!
//! ```json
//! {
//!   "1": {
//!     "ugas": [
//!       {
//!         "name": "ugas",
//!         "cycle": "06",
//!         "year": "21",
//!         "collateral": "WETH",
//!         "emp": { "address": "0x...", "version": "v2" },
//!         "pool": { "address": "0x...", "location": "uni" }
//!       }
//!     ]
//!   }
//! }
//! ```
//!
//! The whole registry is validated when loaded, so accessors on a loaded
//! registry only fail on lookups of unknown networks, groups or assets.

use std::{collections::HashMap, fs, path::Path};

use alloy::primitives::{Address, hex::FromHexError};
use itertools::Itertools;
use serde::Deserialize;

use crate::{
    num::{FixedPoint, NumError},
    pricing::{
        CurveKind, CurveParameters, ImpermanentLossCurve, LeveragedCurve, PricingCurve,
        PricingError, ReserveCurve,
    },
    types::{CollateralSymbol, EmpVersion, NetworkId},
};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read asset registry: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid asset registry JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {field} address of {asset}: {source}")]
    InvalidAddress {
        asset: String,
        field: &'static str,
        #[source]
        source: FromHexError,
    },

    #[error("Invalid curve value {field} of {asset}: {source}")]
    InvalidCurveValue {
        asset: String,
        field: &'static str,
        #[source]
        source: NumError,
    },

    #[error("Missing curve value {field} of {asset}")]
    MissingCurveValue { asset: String, field: &'static str },

    #[error("Invalid curve of {asset}: {source}")]
    InvalidCurve {
        asset: String,
        #[source]
        source: PricingError,
    },

    #[error("Network {0} not configured")]
    NetworkNotFound(NetworkId),

    #[error("Asset group {0} not found")]
    GroupNotFound(String),

    #[error("Asset {0} not found")]
    AssetNotFound(String),
}

fn default_token_decimals() -> u8 {
    18
}

/// Expiring Multi-Party contract of an asset.
#[derive(Clone, Debug, Deserialize)]
pub struct EmpConfig {
    pub address: String,

    /// ABI generation, defaults to the current one
    #[serde(default)]
    pub version: EmpVersion,
}

/// Liquidity pool the synthetic token trades in.
#[derive(Clone, Debug, Deserialize)]
pub struct PoolConfig {
    pub address: String,

    /// Venue hosting the pool (e.g. "uni", "sushi")
    #[serde(default)]
    pub location: Option<String>,
}

/// Long-Short Pair contract and its settlement curve.
#[derive(Clone, Debug, Deserialize)]
pub struct CurveConfig {
    pub address: String,
    pub curve: CurveKind,
    pub upper_bound: String,
    pub long_cap_fraction: String,
    #[serde(default)]
    pub initial_price: Option<String>,
    #[serde(default)]
    pub leverage_factor: Option<String>,
}

/// Single synthetic asset.
#[derive(Clone, Debug, Deserialize)]
pub struct AssetConfig {
    /// Asset family name (e.g. "ugas")
    pub name: String,

    /// Expiry month, two digits
    pub cycle: String,

    /// Expiry year, two digits
    pub year: String,

    pub collateral: CollateralSymbol,

    #[serde(default = "default_token_decimals")]
    pub token_decimals: u8,

    pub emp: EmpConfig,

    #[serde(default)]
    pub pool: Option<PoolConfig>,

    #[serde(default)]
    pub lsp: Option<CurveConfig>,
}

impl AssetConfig {
    /// Unique asset identifier, e.g. `ugas-0621`.
    pub fn id(&self) -> String {
        format!("{}-{}{}", self.name, self.cycle, self.year)
    }

    pub fn emp_address(&self) -> Result<Address, ConfigError> {
        self.parse_address("emp", &self.emp.address)
    }

    pub fn emp_version(&self) -> EmpVersion {
        self.emp.version
    }

    pub fn pool_address(&self) -> Result<Option<Address>, ConfigError> {
        self.pool
            .as_ref()
            .map(|pool| self.parse_address("pool", &pool.address))
            .transpose()
    }

    /// Address of the Long-Short Pair contract, if the asset has one.
    pub fn lsp_address(&self) -> Result<Option<Address>, ConfigError> {
        self.lsp
            .as_ref()
            .map(|lsp| self.parse_address("lsp", &lsp.address))
            .transpose()
    }

    /// Validated settlement curve of the Long-Short Pair, if any.
    pub fn curve(&self) -> Result<Option<CurveParameters>, ConfigError> {
        let Some(lsp) = &self.lsp else {
            return Ok(None);
        };
        let upper_bound = self.parse_value("upper_bound", &lsp.upper_bound)?;
        let long_cap_fraction = self.parse_value("long_cap_fraction", &lsp.long_cap_fraction)?;

        let params: CurveParameters = match lsp.curve {
            CurveKind::Reserve => ReserveCurve::new(upper_bound, long_cap_fraction).into(),
            CurveKind::Leveraged => LeveragedCurve::new(
                upper_bound,
                long_cap_fraction,
                self.required_value("initial_price", lsp.initial_price.as_deref())?,
                self.required_value("leverage_factor", lsp.leverage_factor.as_deref())?,
            )
            .into(),
            CurveKind::ImpermanentLoss => ImpermanentLossCurve::new(
                upper_bound,
                long_cap_fraction,
                self.required_value("initial_price", lsp.initial_price.as_deref())?,
                self.required_value("leverage_factor", lsp.leverage_factor.as_deref())?,
            )
            .into(),
        };
        params.validate().map_err(|source| ConfigError::InvalidCurve {
            asset: self.id(),
            source,
        })?;
        Ok(Some(params))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.emp_address()?;
        self.pool_address()?;
        self.lsp_address()?;
        self.curve()?;
        Ok(())
    }

    fn parse_address(&self, field: &'static str, value: &str) -> Result<Address, ConfigError> {
        value.parse().map_err(|source| ConfigError::InvalidAddress {
            asset: self.id(),
            field,
            source,
        })
    }

    fn parse_value(&self, field: &'static str, value: &str) -> Result<FixedPoint, ConfigError> {
        value.parse().map_err(|source| ConfigError::InvalidCurveValue {
            asset: self.id(),
            field,
            source,
        })
    }

    fn required_value(&self, field: &'static str, value: Option<&str>) -> Result<FixedPoint, ConfigError> {
        let value = value.ok_or_else(|| ConfigError::MissingCurveValue {
            asset: self.id(),
            field,
        })?;
        self.parse_value(field, value)
    }
}

/// Assets grouped by network and asset group.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct AssetRegistry {
    networks: HashMap<NetworkId, HashMap<String, Vec<AssetConfig>>>,
}

impl AssetRegistry {
    /// Parses and validates a registry from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let registry: Self = serde_json::from_str(json)?;
        registry
            .networks
            .values()
            .flat_map(HashMap::values)
            .flatten()
            .try_for_each(AssetConfig::validate)?;
        Ok(registry)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Configured networks in ascending order.
    pub fn networks(&self) -> Vec<NetworkId> {
        self.networks.keys().copied().sorted().collect()
    }

    /// Asset group names of the network in alphabetical order.
    pub fn groups(&self, network: NetworkId) -> Result<Vec<&str>, ConfigError> {
        Ok(self
            .network(network)?
            .keys()
            .map(String::as_str)
            .sorted()
            .collect())
    }

    pub fn group(&self, network: NetworkId, group: &str) -> Result<&[AssetConfig], ConfigError> {
        self.network(network)?
            .get(group)
            .map(Vec::as_slice)
            .ok_or_else(|| ConfigError::GroupNotFound(group.to_string()))
    }

    /// Looks an asset up by its [`AssetConfig::id`] across all groups of the network.
    pub fn asset(&self, network: NetworkId, id: &str) -> Result<&AssetConfig, ConfigError> {
        self.network(network)?
            .values()
            .flatten()
            .find(|asset| asset.id() == id)
            .ok_or_else(|| ConfigError::AssetNotFound(id.to_string()))
    }

    fn network(&self, network: NetworkId) -> Result<&HashMap<String, Vec<AssetConfig>>, ConfigError> {
        self.networks
            .get(&network)
            .ok_or(ConfigError::NetworkNotFound(network))
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    const REGISTRY: &str = r#"{
        "1": {
            "ugas": [
                {
                    "name": "ugas",
                    "cycle": "06",
                    "year": "21",
                    "collateral": "WETH",
                    "emp": { "address": "0x4E3168Ea1082f3dda1694646B5EACdeb572009F1", "version": "v1" },
                    "pool": { "address": "0x25fb29D865C1356F9e95D621F21366d3a5DB6BB0", "location": "uni" }
                },
                {
                    "name": "ugas",
                    "cycle": "09",
                    "year": "21",
                    "collateral": "WETH",
                    "emp": { "address": "0xfA3AA7EE08399A4cE0B4921c85AB7D645Ccac669" }
                }
            ],
            "ustonks": [
                {
                    "name": "ustonks",
                    "cycle": "06",
                    "year": "21",
                    "collateral": "USDC",
                    "token_decimals": 6,
                    "emp": { "address": "0xB1a3E5a8d642534840bFC50c6417F9566E716cc7", "version": "v2" },
                    "lsp": {
                        "address": "0x1111111111111111111111111111111111111111",
                        "curve": "leveraged",
                        "upper_bound": "200",
                        "long_cap_fraction": "0.9",
                        "initial_price": "100",
                        "leverage_factor": "2"
                    }
                }
            ]
        },
        "42": {}
    }"#;

    fn fp(s: &str) -> FixedPoint {
        s.parse().unwrap()
    }

    #[test]
    fn test_registry_lookups() {
        let registry = AssetRegistry::from_json(REGISTRY).unwrap();
        assert_eq!(registry.networks(), vec![1, 42]);
        assert_eq!(registry.groups(1).unwrap(), vec!["ugas", "ustonks"]);
        assert!(registry.groups(42).unwrap().is_empty());

        let ugas = registry.group(1, "ugas").unwrap();
        assert_eq!(ugas.len(), 2);
        assert_eq!(ugas[0].id(), "ugas-0621");
        assert_eq!(ugas[0].emp_version(), EmpVersion::V1);
        assert_eq!(ugas[1].emp_version(), EmpVersion::V2);
        assert_eq!(ugas[0].token_decimals, 18);
        assert_eq!(
            ugas[0].pool_address().unwrap(),
            Some(address!("0x25fb29D865C1356F9e95D621F21366d3a5DB6BB0"))
        );
        assert_eq!(ugas[1].pool_address().unwrap(), None);

        let ustonks = registry.asset(1, "ustonks-0621").unwrap();
        assert_eq!(ustonks.collateral, CollateralSymbol::Usdc);
        assert_eq!(ustonks.token_decimals, 6);
        assert_eq!(
            ustonks.emp_address().unwrap(),
            address!("0xB1a3E5a8d642534840bFC50c6417F9566E716cc7")
        );
    }

    #[test]
    fn test_curve_config() {
        let registry = AssetRegistry::from_json(REGISTRY).unwrap();
        let curve = registry.asset(1, "ustonks-0621").unwrap().curve().unwrap().unwrap();
        assert_eq!(
            curve,
            CurveParameters::from(LeveragedCurve::new(fp("200"), fp("0.9"), fp("100"), fp("2")))
        );
        assert_eq!(registry.asset(1, "ugas-0621").unwrap().curve().unwrap(), None);
    }

    #[test]
    fn test_unknown_lookups() {
        let registry = AssetRegistry::from_json(REGISTRY).unwrap();
        assert!(matches!(registry.group(5, "ugas"), Err(ConfigError::NetworkNotFound(5))));
        assert!(matches!(
            registry.group(1, "upunks"),
            Err(ConfigError::GroupNotFound(g)) if g == "upunks"
        ));
        assert!(matches!(
            registry.asset(1, "ugas-1221"),
            Err(ConfigError::AssetNotFound(a)) if a == "ugas-1221"
        ));
    }

    #[test]
    fn test_invalid_address_rejected_on_load() {
        let json = r#"{ "1": { "ugas": [ {
            "name": "ugas", "cycle": "06", "year": "21", "collateral": "WETH",
            "emp": { "address": "0xnot-an-address" }
        } ] } }"#;
        assert!(matches!(
            AssetRegistry::from_json(json),
            Err(ConfigError::InvalidAddress { field: "emp", .. })
        ));
    }

    #[test]
    fn test_unknown_collateral_rejected_on_load() {
        let json = r#"{ "1": { "ugas": [ {
            "name": "ugas", "cycle": "06", "year": "21", "collateral": "WBTC",
            "emp": { "address": "0x4E3168Ea1082f3dda1694646B5EACdeb572009F1" }
        } ] } }"#;
        assert!(matches!(AssetRegistry::from_json(json), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_invalid_curves_rejected_on_load() {
        let curve_json = |lsp: &str| {
            format!(
                r#"{{ "1": {{ "upunks": [ {{
                    "name": "upunks", "cycle": "09", "year": "21", "collateral": "WETH",
                    "emp": {{ "address": "0x4E3168Ea1082f3dda1694646B5EACdeb572009F1" }},
                    "lsp": {lsp}
                }} ] }} }}"#
            )
        };

        let missing = curve_json(
            r#"{ "address": "0x1111111111111111111111111111111111111111",
                 "curve": "impermanent-loss", "upper_bound": "2", "long_cap_fraction": "0.9",
                 "initial_price": "4000" }"#,
        );
        assert!(matches!(
            AssetRegistry::from_json(&missing),
            Err(ConfigError::MissingCurveValue { field: "leverage_factor", .. })
        ));

        let invalid_cap = curve_json(
            r#"{ "address": "0x1111111111111111111111111111111111111111",
                 "curve": "reserve", "upper_bound": "200", "long_cap_fraction": "1.1" }"#,
        );
        assert!(matches!(
            AssetRegistry::from_json(&invalid_cap),
            Err(ConfigError::InvalidCurve { source: PricingError::InvalidCap, .. })
        ));

        let unparsable = curve_json(
            r#"{ "address": "0x1111111111111111111111111111111111111111",
                 "curve": "reserve", "upper_bound": "two hundred", "long_cap_fraction": "0.9" }"#,
        );
        assert!(matches!(
            AssetRegistry::from_json(&unparsable),
            Err(ConfigError::InvalidCurveValue { field: "upper_bound", .. })
        ));

        for literal in ["inf", "NaN"] {
            let non_finite = curve_json(&format!(
                r#"{{ "address": "0x1111111111111111111111111111111111111111",
                     "curve": "reserve", "upper_bound": "{literal}", "long_cap_fraction": "0.9" }}"#
            ));
            assert!(matches!(
                AssetRegistry::from_json(&non_finite),
                Err(ConfigError::InvalidCurveValue {
                    field: "upper_bound",
                    source: NumError::Parse(_),
                    ..
                })
            ));
        }
    }
}
