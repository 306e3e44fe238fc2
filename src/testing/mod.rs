//! Test utilities.
//!
//! [`EmpStateBuilder`] and [`PositionBuilder`] create snapshots with controlled values
//! for unit testing collateralization metrics without a node.
//!
//! [`StaticReference`] stands in for a deployed contract when configuring pricing
//! libraries.
//!

use alloy::primitives::{Address, B256, U256, address};

use crate::{
    pricing::ReferenceContract,
    state::{EmpState, SponsorPosition},
    types::ContractState,
};

const DEFAULT_EMP: Address = address!("0x00000000000000000000000000000000000e3e3e");
const DEFAULT_SPONSOR: Address = address!("0x000000000000000000000000000000000000bee5");

/// `10^18`, the on-chain representation of 1.0.
pub const WAD: u64 = 1_000_000_000_000_000_000;

pub fn scale(amount: u64, decimals: u8) -> U256 {
    U256::from(amount) * U256::from(10).pow(U256::from(decimals))
}

pub fn wad(amount: u64) -> U256 {
    scale(amount, 18)
}

/// Reference contract with a fixed expiration timestamp.
#[derive(Clone, Copy, Debug)]
pub struct StaticReference {
    address: Address,
    expiration_timestamp: Option<u64>,
}

impl StaticReference {
    pub fn new(address: Address, expiration_timestamp: u64) -> Self {
        Self {
            address,
            expiration_timestamp: Some(expiration_timestamp),
        }
    }

    /// Reference whose expiration timestamp can not be read.
    pub fn unreachable(address: Address) -> Self {
        Self {
            address,
            expiration_timestamp: None,
        }
    }
}

impl ReferenceContract for StaticReference {
    fn address(&self) -> Address {
        self.address
    }

    fn expiration_timestamp(&self) -> Option<u64> {
        self.expiration_timestamp
    }
}

/// Builder for creating test EmpState instances with controlled values.
///
/// # Example
///
/// ```ignore
/// use synths_sdk::testing::{EmpStateBuilder, wad};
///
/// let state = EmpStateBuilder::new()
///     .raw_total_position_collateral(wad(150))
///     .total_tokens_outstanding(wad(100))
///     .build();
/// ```
#[derive(Clone, Debug)]
pub struct EmpStateBuilder {
    state: EmpState,
}

impl Default for EmpStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EmpStateBuilder {
    /// Create a new builder of an open, fee-free contract without positions.
    pub fn new() -> Self {
        Self {
            state: EmpState {
                address: DEFAULT_EMP,
                expiration_timestamp: 1_625_097_600,
                collateral_currency: Address::ZERO,
                price_identifier: B256::ZERO,
                token_currency: Address::ZERO,
                collateral_requirement: U256::from(1_250_000_000_000_000_000u64),
                dispute_bond_percentage: U256::from(WAD / 10),
                sponsor_dispute_reward_percentage: U256::from(WAD / 20),
                disputer_dispute_reward_percentage: U256::from(WAD / 5),
                min_sponsor_tokens: wad(5),
                cumulative_fee_multiplier: U256::from(WAD),
                raw_total_position_collateral: U256::ZERO,
                total_tokens_outstanding: U256::ZERO,
                liquidation_liveness: 7_200,
                withdrawal_liveness: 7_200,
                current_time: 1_609_459_200,
                contract_state: ContractState::Open,
                finder: Address::ZERO,
                expiry_price: U256::ZERO,
            },
        }
    }

    /// Set the contract address.
    pub fn address(mut self, address: Address) -> Self {
        self.state.address = address;
        self
    }

    pub fn expiration_timestamp(mut self, ts: u64) -> Self {
        self.state.expiration_timestamp = ts;
        self
    }

    pub fn current_time(mut self, ts: u64) -> Self {
        self.state.current_time = ts;
        self
    }

    pub fn collateral_currency(mut self, token: Address) -> Self {
        self.state.collateral_currency = token;
        self
    }

    pub fn token_currency(mut self, token: Address) -> Self {
        self.state.token_currency = token;
        self
    }

    /// Set the minimum collateralization ratio (`10^18` scaled).
    pub fn collateral_requirement(mut self, requirement: U256) -> Self {
        self.state.collateral_requirement = requirement;
        self
    }

    /// Set the cumulative fee multiplier (`10^18` scaled).
    pub fn cumulative_fee_multiplier(mut self, multiplier: U256) -> Self {
        self.state.cumulative_fee_multiplier = multiplier;
        self
    }

    pub fn raw_total_position_collateral(mut self, amount: U256) -> Self {
        self.state.raw_total_position_collateral = amount;
        self
    }

    pub fn total_tokens_outstanding(mut self, amount: U256) -> Self {
        self.state.total_tokens_outstanding = amount;
        self
    }

    pub fn contract_state(mut self, contract_state: ContractState) -> Self {
        self.state.contract_state = contract_state;
        self
    }

    pub fn expiry_price(mut self, price: U256) -> Self {
        self.state.expiry_price = price;
        self
    }

    pub fn build(self) -> EmpState {
        self.state
    }
}

/// Builder for creating test SponsorPosition instances with controlled values.
///
/// # Example
///
/// ```ignore
/// use synths_sdk::testing::{PositionBuilder, wad};
///
/// let position = PositionBuilder::new()
///     .raw_collateral(wad(3))
///     .tokens_outstanding(wad(10))
///     .build();
/// ```
#[derive(Clone, Debug)]
pub struct PositionBuilder {
    sponsor: Address,
    raw_collateral: U256,
    tokens_outstanding: U256,
    withdrawal_request_pass_timestamp: u64,
    withdrawal_request_amount: U256,
}

impl Default for PositionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionBuilder {
    /// Create a new builder of an empty position.
    pub fn new() -> Self {
        Self {
            sponsor: DEFAULT_SPONSOR,
            raw_collateral: U256::ZERO,
            tokens_outstanding: U256::ZERO,
            withdrawal_request_pass_timestamp: 0,
            withdrawal_request_amount: U256::ZERO,
        }
    }

    /// Set the sponsor address.
    pub fn sponsor(mut self, sponsor: Address) -> Self {
        self.sponsor = sponsor;
        self
    }

    /// Set the collateral locked in the position, in raw token units.
    pub fn raw_collateral(mut self, amount: U256) -> Self {
        self.raw_collateral = amount;
        self
    }

    /// Set the synthetic tokens minted by the position, in raw token units.
    pub fn tokens_outstanding(mut self, amount: U256) -> Self {
        self.tokens_outstanding = amount;
        self
    }

    /// Set a pending slow withdrawal.
    pub fn withdrawal_request(mut self, pass_timestamp: u64, amount: U256) -> Self {
        self.withdrawal_request_pass_timestamp = pass_timestamp;
        self.withdrawal_request_amount = amount;
        self
    }

    pub fn build(self) -> SponsorPosition {
        SponsorPosition::new(
            self.sponsor,
            self.raw_collateral,
            self.tokens_outstanding,
            self.withdrawal_request_pass_timestamp,
            self.withdrawal_request_amount,
        )
    }
}
