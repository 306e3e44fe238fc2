//! On-chain state snapshots.
//!
//! [`EmpReader`] reads Expiring Multi-Party contract state, sponsor positions
//! and pool reserves at a single block, so every value of a snapshot is
//! consistent with the others. Snapshots are plain data and are never
//! updated, a fresher view requires a new read.

mod emp;
mod pool;
mod position;

use crate::{
    abi::{
        emp::{ExpiringMultiPartyV1, ExpiringMultiPartyV2},
        erc20::Erc20,
        pool::UniswapV2Pair,
    },
    error::ProviderError,
    types::{ContractState, EmpVersion},
};
use alloy::{
    eips::{BlockId, BlockNumberOrTag},
    primitives::{Address, U256},
    providers::Provider,
};
use tracing::debug;

// Public re-exports
pub use emp::*;
pub use pool::*;
pub use position::*;

/// Reads all state getters of an EMP contract instance at `$block_id`.
/// Contract generations differ only by the names of the dispute getters.
macro_rules! read_emp_state {
    (
        $instance:expr,
        $emp:expr,
        $block_id:expr,
        $dispute_bond:ident,
        $sponsor_reward:ident,
        $disputer_reward:ident
    ) => {{
        let (
            expiration_timestamp_call,
            collateral_currency_call,
            price_identifier_call,
            token_currency_call,
            collateral_requirement_call,
            dispute_bond_call,
            sponsor_reward_call,
            disputer_reward_call,
            min_sponsor_tokens_call,
        ) = (
            $instance.expirationTimestamp().block($block_id),
            $instance.collateralCurrency().block($block_id),
            $instance.priceIdentifier().block($block_id),
            $instance.tokenCurrency().block($block_id),
            $instance.collateralRequirement().block($block_id),
            $instance.$dispute_bond().block($block_id),
            $instance.$sponsor_reward().block($block_id),
            $instance.$disputer_reward().block($block_id),
            $instance.minSponsorTokens().block($block_id),
        );
        let (
            expiration_timestamp,
            collateral_currency,
            price_identifier,
            token_currency,
            collateral_requirement,
            dispute_bond_percentage,
            sponsor_dispute_reward_percentage,
            disputer_dispute_reward_percentage,
            min_sponsor_tokens,
        ) = futures::try_join!(
            expiration_timestamp_call.call().into_future(),
            collateral_currency_call.call().into_future(),
            price_identifier_call.call().into_future(),
            token_currency_call.call().into_future(),
            collateral_requirement_call.call().into_future(),
            dispute_bond_call.call().into_future(),
            sponsor_reward_call.call().into_future(),
            disputer_reward_call.call().into_future(),
            min_sponsor_tokens_call.call().into_future(),
        )?;

        let (
            fee_multiplier_call,
            total_collateral_call,
            total_tokens_call,
            liquidation_liveness_call,
            withdrawal_liveness_call,
            current_time_call,
            contract_state_call,
            finder_call,
            expiry_price_call,
        ) = (
            $instance.cumulativeFeeMultiplier().block($block_id),
            $instance.rawTotalPositionCollateral().block($block_id),
            $instance.totalTokensOutstanding().block($block_id),
            $instance.liquidationLiveness().block($block_id),
            $instance.withdrawalLiveness().block($block_id),
            $instance.getCurrentTime().block($block_id),
            $instance.contractState().block($block_id),
            $instance.finder().block($block_id),
            $instance.expiryPrice().block($block_id),
        );
        let (
            cumulative_fee_multiplier,
            raw_total_position_collateral,
            total_tokens_outstanding,
            liquidation_liveness,
            withdrawal_liveness,
            current_time,
            contract_state,
            finder,
            expiry_price,
        ) = futures::try_join!(
            fee_multiplier_call.call().into_future(),
            total_collateral_call.call().into_future(),
            total_tokens_call.call().into_future(),
            liquidation_liveness_call.call().into_future(),
            withdrawal_liveness_call.call().into_future(),
            current_time_call.call().into_future(),
            contract_state_call.call().into_future(),
            finder_call.call().into_future(),
            expiry_price_call.call().into_future(),
        )?;

        Ok::<_, ProviderError>(EmpState {
            address: $emp,
            expiration_timestamp: expiration_timestamp.saturating_to(),
            collateral_currency,
            price_identifier,
            token_currency,
            collateral_requirement,
            dispute_bond_percentage,
            sponsor_dispute_reward_percentage,
            disputer_dispute_reward_percentage,
            min_sponsor_tokens,
            cumulative_fee_multiplier,
            raw_total_position_collateral,
            total_tokens_outstanding,
            liquidation_liveness: liquidation_liveness.saturating_to(),
            withdrawal_liveness: withdrawal_liveness.saturating_to(),
            current_time: current_time.saturating_to(),
            contract_state: ContractState::try_from(contract_state)
                .map_err(ProviderError::UnknownContractState)?,
            finder,
            expiry_price,
        })
    }};
}

/// Reads contract state snapshots via the given [`Provider`].
///
/// It is recommended to setup provider with
/// [`alloy::transports::layers::RetryBackoffLayer`], the reader never retries.
#[derive(Clone, derive_more::Debug)]
pub struct EmpReader<P> {
    #[debug(skip)]
    provider: P,
    block_id: BlockId,
}

impl<P: Provider + Clone> EmpReader<P> {
    /// Creates a new [`EmpReader`] reading the latest block.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            block_id: BlockId::Number(BlockNumberOrTag::Latest),
        }
    }

    /// Sets the block number or tag to read the state at (default: latest).
    pub fn at_block(mut self, block: BlockId) -> Self {
        self.block_id = block;
        self
    }

    /// Block the reader reads the state at.
    pub fn block_id(&self) -> BlockId {
        self.block_id
    }

    /// Pins the reader to the current head block so that subsequent reads
    /// observe the same chain state.
    pub async fn pinned(mut self) -> Result<Self, ProviderError> {
        let number = self.provider.get_block_number().await?;
        self.block_id = BlockId::number(number);
        Ok(self)
    }

    /// Snapshot of the contract at `emp`, read with the ABI of `version`.
    pub async fn state(&self, emp: Address, version: EmpVersion) -> Result<EmpState, ProviderError> {
        let state = match version {
            EmpVersion::V1 => self.state_v1(emp).await?,
            EmpVersion::V2 => self.state_v2(emp).await?,
        };
        debug!(
            %emp,
            ?version,
            expired = state.is_expired(),
            contract_state = ?state.contract_state(),
            "EMP state fetched"
        );
        Ok(state)
    }

    async fn state_v1(&self, emp: Address) -> Result<EmpState, ProviderError> {
        let instance = ExpiringMultiPartyV1::new(emp, self.provider.clone());
        read_emp_state!(
            instance,
            emp,
            self.block_id,
            disputeBondPct,
            sponsorDisputeRewardPct,
            disputerDisputeRewardPct
        )
    }

    async fn state_v2(&self, emp: Address) -> Result<EmpState, ProviderError> {
        let instance = ExpiringMultiPartyV2::new(emp, self.provider.clone());
        read_emp_state!(
            instance,
            emp,
            self.block_id,
            disputeBondPercentage,
            sponsorDisputeRewardPercentage,
            disputerDisputeRewardPercentage
        )
    }

    /// Position of `sponsor`, empty if the sponsor never minted.
    /// Position layout is the same in both contract generations.
    pub async fn position(&self, emp: Address, sponsor: Address) -> Result<SponsorPosition, ProviderError> {
        let data = ExpiringMultiPartyV2::new(emp, self.provider.clone())
            .positions(sponsor)
            .block(self.block_id)
            .call()
            .await?;
        Ok(SponsorPosition::new(
            sponsor,
            data.rawCollateral,
            data.tokensOutstanding,
            data.withdrawalRequestPassTimestamp.saturating_to(),
            data.withdrawalRequestAmount,
        ))
    }

    /// Current reserves of a constant-product pool.
    pub async fn pool_reserves(&self, pool: Address) -> Result<PoolReserves, ProviderError> {
        let instance = UniswapV2Pair::new(pool, self.provider.clone());
        let (token0_call, token1_call, reserves_call) = (
            instance.token0().block(self.block_id),
            instance.token1().block(self.block_id),
            instance.getReserves().block(self.block_id),
        );
        let (token0, token1, reserves) = futures::try_join!(
            token0_call.call().into_future(),
            token1_call.call().into_future(),
            reserves_call.call().into_future(),
        )?;
        Ok(PoolReserves::new(
            pool,
            token0,
            token1,
            U256::from(reserves.reserve0),
            U256::from(reserves.reserve1),
        ))
    }

    /// Declared decimals of an ERC-20 token.
    pub async fn token_decimals(&self, token: Address) -> Result<u8, ProviderError> {
        Ok(Erc20::new(token, self.provider.clone())
            .decimals()
            .block(self.block_id)
            .call()
            .await?)
    }
}
