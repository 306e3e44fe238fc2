//! Configuration for the synthetic assets report.
//!
//! Configuration comes from two sources:
//! - Environment variables (via .env file or shell): node connection, asset registry
//! - CLI arguments: what to report on

use alloy::primitives::Address;
use clap::{Args, Parser, Subcommand, ValueEnum};
use synths_sdk::{
    num::FixedPoint,
    pricing::{CurveParameters, ImpermanentLossCurve, LeveragedCurve, ReserveCurve},
    types::NetworkId,
};

/// Environment configuration (connection details, asset registry).
#[derive(Debug, serde::Deserialize)]
pub struct EnvConfig {
    /// RPC URL for the node
    pub node_rpc_url: String,

    /// Path of the JSON asset registry
    pub assets_file: String,

    /// Optional timeout of a single chain read (default: 30s)
    pub timeout_seconds: Option<u64>,
}

impl EnvConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}

#[derive(Debug, Parser)]
#[command(name = "synth-report")]
#[command(about = "Collateralization and settlement report for synthetic assets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read an asset group from chain and report its GCR and TVL
    Report(ReportArgs),

    /// Evaluate a settlement curve offline
    LongShare(LongShareArgs),
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Network ID the assets are deployed on (e.g., 1 for Ethereum mainnet)
    #[arg(long, default_value = "1")]
    pub network: NetworkId,

    /// Asset group to report on (e.g., "ugas")
    #[arg(long)]
    pub group: String,

    /// ETH/USD price used to value WETH collateral
    #[arg(long)]
    pub eth_usd: Option<String>,

    /// Sponsor whose positions are reported as well
    #[arg(long)]
    pub sponsor: Option<String>,
}

impl ReportArgs {
    pub fn eth_usd(&self) -> Result<Option<FixedPoint>, ConfigError> {
        self.eth_usd
            .as_deref()
            .map(|price| parse_positive("eth_usd", price))
            .transpose()
    }

    pub fn sponsor(&self) -> Result<Option<Address>, ConfigError> {
        self.sponsor
            .as_deref()
            .map(|sponsor| sponsor.parse().map_err(|_| ConfigError::InvalidAddress("sponsor")))
            .transpose()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CurveArg {
    Reserve,
    Leveraged,
    ImpermanentLoss,
}

#[derive(Debug, Args)]
pub struct LongShareArgs {
    #[arg(long, value_enum)]
    pub curve: CurveArg,

    /// Settlement price of the underlying
    #[arg(long, allow_hyphen_values = true)]
    pub price: String,

    #[arg(long)]
    pub upper_bound: String,

    /// Maximum long share, the floor is `1 - cap`
    #[arg(long, default_value = "0.9")]
    pub cap: String,

    /// Reference price of leveraged curves
    #[arg(long)]
    pub initial_price: Option<String>,

    /// Leverage of leveraged curves
    #[arg(long)]
    pub leverage: Option<String>,
}

impl LongShareArgs {
    pub fn price(&self) -> Result<FixedPoint, ConfigError> {
        parse_value("price", &self.price)
    }

    /// Curve parameters; validation is left to the curve itself.
    pub fn to_curve_parameters(&self) -> Result<CurveParameters, ConfigError> {
        let upper_bound = parse_value("upper_bound", &self.upper_bound)?;
        let cap = parse_value("cap", &self.cap)?;
        let leverage = || -> Result<(FixedPoint, FixedPoint), ConfigError> {
            Ok((
                required_value("initial_price", self.initial_price.as_deref())?,
                required_value("leverage", self.leverage.as_deref())?,
            ))
        };

        Ok(match self.curve {
            CurveArg::Reserve => ReserveCurve::new(upper_bound, cap).into(),
            CurveArg::Leveraged => {
                let (initial_price, leverage) = leverage()?;
                LeveragedCurve::new(upper_bound, cap, initial_price, leverage).into()
            }
            CurveArg::ImpermanentLoss => {
                let (initial_price, leverage) = leverage()?;
                ImpermanentLossCurve::new(upper_bound, cap, initial_price, leverage).into()
            }
        })
    }
}

fn parse_value(field: &'static str, value: &str) -> Result<FixedPoint, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue(field))
}

fn parse_positive(field: &'static str, value: &str) -> Result<FixedPoint, ConfigError> {
    let value = parse_value(field, value)?;
    if !value.is_positive() {
        return Err(ConfigError::InvalidValue(field));
    }
    Ok(value)
}

fn required_value(field: &'static str, value: Option<&str>) -> Result<FixedPoint, ConfigError> {
    parse_value(field, value.ok_or(ConfigError::MissingValue(field))?)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(&'static str),

    #[error("{0} is required for this curve")]
    MissingValue(&'static str),

    #[error("Invalid address for {0}")]
    InvalidAddress(&'static str),
}

#[cfg(test)]
mod tests {
    use synths_sdk::pricing::PricingCurve;

    use super::*;

    fn fp(s: &str) -> FixedPoint {
        s.parse().unwrap()
    }

    fn long_share_args(curve: CurveArg) -> LongShareArgs {
        LongShareArgs {
            curve,
            price: "3500".to_string(),
            upper_bound: "2".to_string(),
            cap: "0.9".to_string(),
            initial_price: Some("4000".to_string()),
            leverage: Some("20".to_string()),
        }
    }

    #[test]
    fn test_cli_parses_long_share() {
        let cli = Cli::try_parse_from([
            "synth-report",
            "long-share",
            "--curve",
            "impermanent-loss",
            "--price",
            "-1",
            "--upper-bound",
            "2",
            "--initial-price",
            "4000",
            "--leverage",
            "20",
        ])
        .unwrap();
        let Command::LongShare(args) = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(args.curve, CurveArg::ImpermanentLoss);
        assert_eq!(args.price().unwrap(), fp("-1"));
        assert_eq!(args.cap, "0.9");
    }

    #[test]
    fn test_cli_parses_report() {
        let cli = Cli::try_parse_from([
            "synth-report",
            "report",
            "--group",
            "ugas",
            "--eth-usd",
            "2000",
        ])
        .unwrap();
        let Command::Report(args) = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(args.network, 1);
        assert_eq!(args.group, "ugas");
        assert_eq!(args.eth_usd().unwrap(), Some(fp("2000")));
        assert_eq!(args.sponsor().unwrap(), None);
    }

    #[test]
    fn test_to_curve_parameters() {
        let params = long_share_args(CurveArg::ImpermanentLoss)
            .to_curve_parameters()
            .unwrap();
        assert_eq!(params.long_share(fp("3500")).unwrap(), fp("0.52224696860282298"));

        let params = long_share_args(CurveArg::Reserve).to_curve_parameters().unwrap();
        assert_eq!(params, CurveParameters::from(ReserveCurve::new(fp("2"), fp("0.9"))));
    }

    #[test]
    fn test_missing_leverage() {
        let args = LongShareArgs {
            leverage: None,
            ..long_share_args(CurveArg::Leveraged)
        };
        assert!(matches!(
            args.to_curve_parameters(),
            Err(ConfigError::MissingValue("leverage"))
        ));
    }

    #[test]
    fn test_invalid_eth_price() {
        let args = ReportArgs {
            network: 1,
            group: "ugas".to_string(),
            eth_usd: Some("-5".to_string()),
            sponsor: Some("0xnope".to_string()),
        };
        assert!(matches!(args.eth_usd(), Err(ConfigError::InvalidValue("eth_usd"))));
        assert!(matches!(args.sponsor(), Err(ConfigError::InvalidAddress("sponsor"))));
    }
}
