//! Error types for the synthetic assets report.

use synths_sdk::{
    config::ConfigError as RegistryError, error::ProviderError, metrics::MetricsError,
    pricing::PricingError,
};

use crate::config::ConfigError;

/// Main error type for the synthetic assets report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Environment configuration error: {0}")]
    EnvConfig(#[from] envy::Error),

    #[error("Asset registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(#[from] url::ParseError),

    #[error("Chain read timeout after {0} seconds")]
    Timeout(u64),
}

pub type Result<T> = std::result::Result<T, Error>;
