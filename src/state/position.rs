use alloy::primitives::{Address, U256};

/// Sponsor position in an Expiring Multi-Party contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SponsorPosition {
    sponsor: Address,
    raw_collateral: U256,
    tokens_outstanding: U256,
    withdrawal_request_pass_timestamp: u64,
    withdrawal_request_amount: U256,
}

impl SponsorPosition {
    pub(crate) fn new(
        sponsor: Address,
        raw_collateral: U256,
        tokens_outstanding: U256,
        withdrawal_request_pass_timestamp: u64,
        withdrawal_request_amount: U256,
    ) -> Self {
        Self {
            sponsor,
            raw_collateral,
            tokens_outstanding,
            withdrawal_request_pass_timestamp,
            withdrawal_request_amount,
        }
    }

    pub fn sponsor(&self) -> Address {
        self.sponsor
    }

    /// Collateral locked by the sponsor, in raw collateral token units.
    pub fn raw_collateral(&self) -> U256 {
        self.raw_collateral
    }

    /// Synthetic tokens minted by the sponsor, in raw token units.
    pub fn tokens_outstanding(&self) -> U256 {
        self.tokens_outstanding
    }

    /// Time a pending slow withdrawal can be executed, zero if none.
    pub fn withdrawal_request_pass_timestamp(&self) -> u64 {
        self.withdrawal_request_pass_timestamp
    }

    pub fn withdrawal_request_amount(&self) -> U256 {
        self.withdrawal_request_amount
    }

    pub fn has_pending_withdrawal(&self) -> bool {
        self.withdrawal_request_pass_timestamp != 0
    }

    /// Whether the position exists at all.
    pub fn is_empty(&self) -> bool {
        self.raw_collateral.is_zero() && self.tokens_outstanding.is_zero()
    }
}
