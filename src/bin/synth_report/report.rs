//! Asset group report.
//!
//! Reads every asset of a group at a single block and derives its global
//! collateralization ratio and the value locked. Assets whose data is
//! unavailable are logged and skipped, the report covers the rest.

use std::{future::Future, time::Duration};

use alloy::{
    primitives::Address,
    providers::{DynProvider, ProviderBuilder},
    rpc::client::RpcClient,
};
use synths_sdk::{
    cache::PriceCache,
    config::AssetConfig,
    error::ProviderError,
    metrics::{
        self, AssetCollateral, MetricsError, TvlScope, format_ratio, global_cr, pool_token_price,
        sponsor_cr,
    },
    num::FixedPoint,
    state::{EmpReader, EmpState},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};

/// Report line of a single asset.
#[derive(Clone, Debug)]
pub struct AssetReport {
    pub id: String,
    pub expired: bool,
    pub gcr: Option<FixedPoint>,
    pub sponsor_cr: Option<FixedPoint>,
}

#[derive(Clone, Debug, Default)]
pub struct GroupReport {
    pub assets: Vec<AssetReport>,
    pub total_value_locked: Option<FixedPoint>,
}

/// Reads asset groups from chain.
#[derive(Debug)]
pub struct Reporter {
    reader: EmpReader<DynProvider>,
    prices: PriceCache,
    eth_usd: Option<FixedPoint>,
    timeout: Duration,
}

impl Reporter {
    /// Connects to the node and pins all subsequent reads to its current head.
    pub async fn try_new(node_url: Url, timeout: Duration) -> Result<Self> {
        let rpc_client = RpcClient::new_http(node_url);
        let provider = DynProvider::new(ProviderBuilder::new().connect_client(rpc_client));

        let reader = EmpReader::new(provider);
        let reader = with_timeout(timeout, reader.pinned()).await?;
        info!(?reader, "Reader pinned");

        Ok(Self::new(reader, timeout))
    }

    fn new(reader: EmpReader<DynProvider>, timeout: Duration) -> Self {
        Self {
            reader,
            prices: PriceCache::new(timeout * 10),
            eth_usd: None,
            timeout,
        }
    }

    /// ETH/USD price used to value WETH collateral for the whole run.
    pub fn with_eth_usd(mut self, price: Option<FixedPoint>) -> Self {
        self.eth_usd = price;
        self
    }

    /// Reports all assets of the group, optionally including the positions of `sponsor`.
    pub async fn run(&self, assets: &[AssetConfig], sponsor: Option<Address>) -> GroupReport {
        let mut report = GroupReport::default();
        let mut collaterals = Vec::with_capacity(assets.len());

        for asset in assets {
            let id = asset.id();
            let state = match self.read_state(asset).await {
                Ok(state) => state,
                Err(e) => {
                    warn!(asset = %id, %e, "Failed to read EMP state, skipping asset");
                    continue;
                }
            };
            collaterals.push(AssetCollateral::from_state(&id, asset.collateral, &state));

            let token_price = match self.token_price(asset, &state).await {
                Ok(price) => Some(price),
                Err(e) => {
                    warn!(asset = %id, %e, "Token price unavailable");
                    None
                }
            };
            // Without outstanding tokens the GCR is zero whatever the price
            let gcr = match global_cr(
                &state,
                asset.token_decimals,
                asset.collateral.decimals(),
                token_price.unwrap_or(FixedPoint::ZERO),
            ) {
                Ok(gcr) => {
                    info!(asset = %id, gcr = %format_ratio(gcr), expired = state.is_expired(), "GCR");
                    Some(gcr)
                }
                Err(e) => {
                    warn!(asset = %id, %e, "GCR unavailable");
                    None
                }
            };

            let sponsor_cr = match (sponsor, token_price) {
                (Some(sponsor), Some(price)) => self.report_position(asset, &state, sponsor, price).await,
                _ => None,
            };

            report.assets.push(AssetReport {
                id,
                expired: state.is_expired(),
                gcr,
                sponsor_cr,
            });
        }

        report.total_value_locked = self.total_value_locked(&collaterals);
        report
    }

    fn total_value_locked(&self, collaterals: &[AssetCollateral]) -> Option<FixedPoint> {
        match metrics::total_value_locked(collaterals, self.eth_usd, TvlScope::Combined) {
            Ok(tvl) => {
                info!(tvl = %tvl.to_precision_string(2), assets = collaterals.len(), "TVL");
                Some(tvl)
            }
            Err(e) => {
                warn!(%e, "TVL unavailable");
                None
            }
        }
    }

    async fn read_state(&self, asset: &AssetConfig) -> Result<EmpState> {
        let state = self
            .read(self.reader.state(asset.emp_address()?, asset.emp_version()))
            .await?;
        let token_decimals = self.read(self.reader.token_decimals(state.token_currency())).await?;
        if token_decimals != asset.token_decimals {
            warn!(
                asset = %asset.id(),
                configured = asset.token_decimals,
                on_chain = token_decimals,
                "Token decimals mismatch"
            );
        }
        Ok(state)
    }

    /// Synthetic token price in collateral, implied by the asset's pool.
    async fn token_price(&self, asset: &AssetConfig, state: &EmpState) -> Result<FixedPoint> {
        let pool = asset.pool_address()?.ok_or(MetricsError::MissingPrice)?;
        let key = format!("{}/{}", asset.id(), asset.collateral);
        self.prices
            .get_or_try_insert_with(&key, || async {
                let reserves = self.read(self.reader.pool_reserves(pool)).await?;
                debug!(%pool, reserve0 = %reserves.reserve0(), reserve1 = %reserves.reserve1(), "Pool reserves");
                Ok(pool_token_price(
                    &reserves,
                    state.token_currency(),
                    asset.token_decimals,
                    state.collateral_currency(),
                    asset.collateral.decimals(),
                )?)
            })
            .await
    }

    async fn report_position(
        &self,
        asset: &AssetConfig,
        state: &EmpState,
        sponsor: Address,
        token_price: FixedPoint,
    ) -> Option<FixedPoint> {
        let position = match self.read(self.reader.position(state.address(), sponsor)).await {
            Ok(position) if position.is_empty() => return None,
            Ok(position) => position,
            Err(e) => {
                warn!(asset = %asset.id(), %sponsor, %e, "Failed to read position");
                return None;
            }
        };
        match sponsor_cr(&position, asset.collateral, asset.token_decimals, token_price) {
            Ok(cr) => {
                info!(
                    asset = %asset.id(),
                    %sponsor,
                    collateral = %position_collateral(&position, asset),
                    cr = %format_ratio(cr),
                    pending_withdrawal = position.has_pending_withdrawal(),
                    "Sponsor position"
                );
                Some(cr)
            }
            Err(e) => {
                warn!(asset = %asset.id(), %sponsor, %e, "Sponsor CR unavailable");
                None
            }
        }
    }

    async fn read<T>(&self, fut: impl Future<Output = std::result::Result<T, ProviderError>>) -> Result<T> {
        with_timeout(self.timeout, fut).await
    }
}

async fn with_timeout<T>(
    timeout: Duration,
    fut: impl Future<Output = std::result::Result<T, ProviderError>>,
) -> Result<T> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| Error::Timeout(timeout.as_secs()))?
        .map_err(Error::from)
}

fn position_collateral(position: &synths_sdk::state::SponsorPosition, asset: &AssetConfig) -> String {
    metrics::position_cr(position, &asset.collateral.to_string())
        .map(format_ratio)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use alloy::transports::mock::Asserter;
    use synths_sdk::{testing::wad, types::CollateralSymbol};

    use super::*;

    fn reporter(timeout: Duration) -> Reporter {
        let provider = DynProvider::new(ProviderBuilder::new().connect_mocked_client(Asserter::new()));
        Reporter::new(EmpReader::new(provider), timeout)
    }

    #[tokio::test(start_paused = true)]
    async fn test_eth_usd_outlives_price_ttl() {
        let reporter = reporter(Duration::from_secs(1)).with_eth_usd(Some(FixedPoint::from_int(2_000)));
        let collaterals = [AssetCollateral::new("ugas-0621", CollateralSymbol::Weth, wad(150))];

        tokio::time::advance(Duration::from_secs(3_600)).await;
        assert_eq!(
            reporter.total_value_locked(&collaterals),
            Some(FixedPoint::from_int(300_000))
        );
    }

    #[tokio::test]
    async fn test_weth_tvl_needs_eth_usd() {
        let reporter = reporter(Duration::from_secs(1));
        let collaterals = [AssetCollateral::new("ugas-0621", CollateralSymbol::Weth, wad(150))];
        assert_eq!(reporter.total_value_locked(&collaterals), None);
    }
}
