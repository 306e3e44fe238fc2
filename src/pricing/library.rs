use std::collections::{HashMap, hash_map};

use alloy::primitives::Address;

use super::{ImpermanentLossCurve, LeveragedCurve, PricingCurve, PricingError, ReserveCurve};
use crate::num::FixedPoint;

/// Contract a pricing curve is configured for.
///
/// The expiration timestamp is used as a probe: a contract that can not
/// report a non-zero expiration is not a valid reference.
pub trait ReferenceContract {
    fn address(&self) -> Address;

    fn expiration_timestamp(&self) -> Option<u64>;
}

/// Registry of curve parameters per referencing contract.
///
/// Parameters are write-once: after a successful [`Self::set_parameters`]
/// the same contract can never be reconfigured.
#[derive(Clone, Debug)]
pub struct ProductLibrary<C> {
    params: HashMap<Address, C>,
}

pub type ReserveLibrary = ProductLibrary<ReserveCurve>;
pub type LeveragedLibrary = ProductLibrary<LeveragedCurve>;
pub type ImpermanentLossLibrary = ProductLibrary<ImpermanentLossCurve>;

impl<C> Default for ProductLibrary<C> {
    fn default() -> Self {
        Self {
            params: HashMap::new(),
        }
    }
}

impl<C: PricingCurve> ProductLibrary<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the curve for the `reference` contract.
    ///
    /// Fails if the reference does not look like a contract, if any parameter
    /// is invalid, or if parameters were already set for this contract.
    pub fn set_parameters<R>(&mut self, reference: &R, params: C) -> Result<(), PricingError>
    where
        R: ReferenceContract + ?Sized,
    {
        let address = reference.address();
        if address.is_zero() || !matches!(reference.expiration_timestamp(), Some(ts) if ts > 0) {
            return Err(PricingError::InvalidReference(address));
        }
        params.validate()?;
        match self.params.entry(address) {
            hash_map::Entry::Occupied(_) => Err(PricingError::ParamsAlreadySet(address)),
            hash_map::Entry::Vacant(e) => {
                e.insert(params);
                Ok(())
            }
        }
    }

    /// Parameters configured for the contract at `address`.
    pub fn parameters(&self, address: &Address) -> Result<&C, PricingError> {
        self.params
            .get(address)
            .ok_or(PricingError::ParamsNotSet(*address))
    }

    /// Long share of the contract at `address` settling at `price`.
    pub fn long_share(&self, address: &Address, price: FixedPoint) -> Result<FixedPoint, PricingError> {
        self.parameters(address)?.long_share(price)
    }

    pub fn is_configured(&self, address: &Address) -> bool {
        self.params.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
