use alloy::primitives::{Address, B256, U256};

use crate::{pricing::ReferenceContract, types::ContractState};

/// Point-in-time snapshot of an Expiring Multi-Party contract.
///
/// Values are kept exactly as read from the contract: amounts are raw token
/// units, percentages and multipliers are scaled by `10^18`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmpState {
    pub(crate) address: Address,
    pub(crate) expiration_timestamp: u64,
    pub(crate) collateral_currency: Address,
    pub(crate) price_identifier: B256,
    pub(crate) token_currency: Address,
    pub(crate) collateral_requirement: U256,
    pub(crate) dispute_bond_percentage: U256,
    pub(crate) sponsor_dispute_reward_percentage: U256,
    pub(crate) disputer_dispute_reward_percentage: U256,
    pub(crate) min_sponsor_tokens: U256,
    pub(crate) cumulative_fee_multiplier: U256,
    pub(crate) raw_total_position_collateral: U256,
    pub(crate) total_tokens_outstanding: U256,
    pub(crate) liquidation_liveness: u64,
    pub(crate) withdrawal_liveness: u64,
    pub(crate) current_time: u64,
    pub(crate) contract_state: ContractState,
    pub(crate) finder: Address,
    pub(crate) expiry_price: U256,
}

impl EmpState {
    /// Address of the contract the snapshot was taken from.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn expiration_timestamp(&self) -> u64 {
        self.expiration_timestamp
    }

    pub fn collateral_currency(&self) -> Address {
        self.collateral_currency
    }

    pub fn price_identifier(&self) -> B256 {
        self.price_identifier
    }

    pub fn token_currency(&self) -> Address {
        self.token_currency
    }

    /// Minimum collateralization ratio of a position, `10^18` scaled.
    pub fn collateral_requirement(&self) -> U256 {
        self.collateral_requirement
    }

    pub fn dispute_bond_percentage(&self) -> U256 {
        self.dispute_bond_percentage
    }

    pub fn sponsor_dispute_reward_percentage(&self) -> U256 {
        self.sponsor_dispute_reward_percentage
    }

    pub fn disputer_dispute_reward_percentage(&self) -> U256 {
        self.disputer_dispute_reward_percentage
    }

    pub fn min_sponsor_tokens(&self) -> U256 {
        self.min_sponsor_tokens
    }

    /// Multiplier converting raw collateral into actual collateral
    /// after fees, `10^18` scaled.
    pub fn cumulative_fee_multiplier(&self) -> U256 {
        self.cumulative_fee_multiplier
    }

    pub fn raw_total_position_collateral(&self) -> U256 {
        self.raw_total_position_collateral
    }

    pub fn total_tokens_outstanding(&self) -> U256 {
        self.total_tokens_outstanding
    }

    pub fn liquidation_liveness(&self) -> u64 {
        self.liquidation_liveness
    }

    pub fn withdrawal_liveness(&self) -> u64 {
        self.withdrawal_liveness
    }

    /// Contract time at the snapshot.
    pub fn current_time(&self) -> u64 {
        self.current_time
    }

    pub fn contract_state(&self) -> ContractState {
        self.contract_state
    }

    pub fn finder(&self) -> Address {
        self.finder
    }

    /// Settlement price, zero until the contract expired and received a price.
    pub fn expiry_price(&self) -> U256 {
        self.expiry_price
    }

    pub fn is_expired(&self) -> bool {
        self.current_time >= self.expiration_timestamp
    }
}

impl ReferenceContract for EmpState {
    fn address(&self) -> Address {
        self.address
    }

    fn expiration_timestamp(&self) -> Option<u64> {
        Some(self.expiration_timestamp)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::EmpStateBuilder;

    #[test]
    fn test_is_expired() {
        let state = EmpStateBuilder::new()
            .expiration_timestamp(1_000)
            .current_time(999)
            .build();
        assert!(!state.is_expired());

        let state = EmpStateBuilder::new()
            .expiration_timestamp(1_000)
            .current_time(1_000)
            .build();
        assert!(state.is_expired());
    }
}
