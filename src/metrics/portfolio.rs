use alloy::primitives::{I256, U256};

use super::MetricsError;
use crate::{num::FixedPoint, state::EmpState, types::CollateralSymbol};

/// Share of weekly rewards kept for developer mining payouts (82%).
pub const DEV_REWARDS_RETENTION: FixedPoint = FixedPoint::from_raw(I256::from_raw(
    U256::from_limbs([820_000_000_000_000_000, 0, 0, 0]),
));

pub const WEEKS_PER_YEAR: i64 = 52;

/// Collateral locked in one asset's contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetCollateral {
    pub name: String,
    pub collateral: CollateralSymbol,
    pub raw_total_position_collateral: U256,
}

impl AssetCollateral {
    pub fn new(name: impl Into<String>, collateral: CollateralSymbol, raw_total_position_collateral: U256) -> Self {
        Self {
            name: name.into(),
            collateral,
            raw_total_position_collateral,
        }
    }

    pub fn from_state(name: impl Into<String>, collateral: CollateralSymbol, state: &EmpState) -> Self {
        Self::new(name, collateral, state.raw_total_position_collateral())
    }

    /// USD value of the locked collateral. Only WETH needs `eth_usd`,
    /// stable collateral is valued at par.
    pub fn usd_value(&self, eth_usd: Option<FixedPoint>) -> Result<FixedPoint, MetricsError> {
        let amount = FixedPoint::from_units(
            self.raw_total_position_collateral,
            self.collateral.decimals(),
        )?;
        if !self.collateral.is_usd_priced() {
            return Ok(amount);
        }
        let price = eth_usd.ok_or(MetricsError::MissingPrice)?;
        Ok(amount.try_mul(price)?)
    }
}

/// Which assets [`total_value_locked`] accounts for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TvlScope<'a> {
    /// Sum over all assets.
    Combined,
    /// Only the asset with the given name.
    Single(&'a str),
}

/// Total USD value locked in the given assets.
pub fn total_value_locked(
    assets: &[AssetCollateral],
    eth_usd: Option<FixedPoint>,
    scope: TvlScope<'_>,
) -> Result<FixedPoint, MetricsError> {
    match scope {
        TvlScope::Combined => assets.iter().try_fold(FixedPoint::ZERO, |total, asset| {
            Ok(total.try_add(asset.usd_value(eth_usd)?)?)
        }),
        TvlScope::Single(name) => assets
            .iter()
            .find(|asset| asset.name == name)
            .ok_or_else(|| MetricsError::AssetNotFound(name.to_string()))?
            .usd_value(eth_usd),
    }
}

/// Decrease from `old_value` to `new_value` in percent: `(old - new) / old * 100`.
///
/// The result is positive when the value went down and negative when it
/// went up, e.g. `100 -> 150` yields `-50`.
pub fn percentage_change(old_value: FixedPoint, new_value: FixedPoint) -> Result<FixedPoint, MetricsError> {
    if old_value.is_zero() {
        return Err(MetricsError::ZeroDenominator);
    }
    Ok(old_value
        .try_sub(new_value)?
        .try_div(old_value)?
        .try_mul(FixedPoint::from_int(100))?)
}

/// Inputs of [`apr_from_rewards`]; all values except the reward pool are in USD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardInputs {
    /// Reward tokens distributed per week across all eligible contracts.
    pub weekly_reward_pool: FixedPoint,
    /// Price of the reward token, `None` when no price feed answered.
    pub reward_token_price: Option<FixedPoint>,
    /// Value locked in the contract the APR is computed for.
    pub contract_value: FixedPoint,
    /// Value locked across all reward eligible contracts.
    pub eligible_value: FixedPoint,
    /// Value of the pool asset the rewards are paid against.
    pub pool_asset_value: FixedPoint,
}

/// Annual percentage rate earned from developer mining rewards.
///
/// The contract earns its share of the weekly pool, minus the retention,
/// annualized over 52 weeks and related to the pool asset value.
/// Yields zero when the reward token price is unknown or when the
/// multiplier would be unbounded (no eligible value or no pool asset value).
pub fn apr_from_rewards(inputs: &RewardInputs) -> Result<FixedPoint, MetricsError> {
    let Some(reward_token_price) = inputs.reward_token_price else {
        return Ok(FixedPoint::ZERO);
    };
    if inputs.eligible_value.is_zero() || inputs.pool_asset_value.is_zero() {
        return Ok(FixedPoint::ZERO);
    }

    let contract_share = inputs.contract_value.try_div(inputs.eligible_value)?;
    let weekly_rewards = inputs
        .weekly_reward_pool
        .try_mul(contract_share)?
        .try_mul(reward_token_price)?
        .try_mul(DEV_REWARDS_RETENTION)?;
    let multiplier = weekly_rewards
        .try_mul(FixedPoint::from_int(WEEKS_PER_YEAR))?
        .try_div(inputs.pool_asset_value)?;
    Ok(multiplier.try_mul(FixedPoint::from_int(100))?)
}
