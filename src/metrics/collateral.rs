use alloy::primitives::Address;

use super::MetricsError;
use crate::{
    num::FixedPoint,
    state::{EmpState, PoolReserves, SponsorPosition},
    types::CollateralSymbol,
};

/// Number of decimals ratios are displayed with.
pub const RATIO_DISPLAY_DECIMALS: u8 = 4;

/// Collateral locked in the position, in whole collateral tokens.
///
/// Fails with [`MetricsError::CollateralNotFound`] for anything but the
/// supported collateral symbols.
pub fn position_cr(position: &SponsorPosition, collateral: &str) -> Result<FixedPoint, MetricsError> {
    let symbol: CollateralSymbol = collateral.parse()?;
    Ok(FixedPoint::from_units(
        position.raw_collateral(),
        symbol.decimals(),
    )?)
}

/// Renders a ratio the way it is displayed to users, with 4 truncated decimals.
pub fn format_ratio(ratio: FixedPoint) -> String {
    ratio.to_precision_string(RATIO_DISPLAY_DECIMALS)
}

/// Collateralization ratio of a single position:
/// collateral / (tokens outstanding * token price).
///
/// `token_price` is the price of one synthetic token in collateral tokens.
pub fn sponsor_cr(
    position: &SponsorPosition,
    collateral: CollateralSymbol,
    token_decimals: u8,
    token_price: FixedPoint,
) -> Result<FixedPoint, MetricsError> {
    let tokens = FixedPoint::from_units(position.tokens_outstanding(), token_decimals)?;
    if tokens.is_zero() {
        return Err(MetricsError::ZeroDenominator);
    }
    if !token_price.is_positive() {
        return Err(MetricsError::MissingPrice);
    }
    let collateral = FixedPoint::from_units(position.raw_collateral(), collateral.decimals())?;
    Ok(collateral.try_div(tokens)?.try_div(token_price)?)
}

/// Global collateralization ratio of the contract:
/// fee adjusted total collateral / (total tokens outstanding * token price).
///
/// A contract without outstanding tokens has a GCR of zero.
pub fn global_cr(
    state: &EmpState,
    token_decimals: u8,
    collateral_decimals: u8,
    token_price: FixedPoint,
) -> Result<FixedPoint, MetricsError> {
    if state.total_tokens_outstanding().is_zero() {
        return Ok(FixedPoint::ZERO);
    }
    if !token_price.is_positive() {
        return Err(MetricsError::MissingPrice);
    }

    let fee_multiplier =
        FixedPoint::from_units(state.cumulative_fee_multiplier(), FixedPoint::DECIMALS)?;
    let raw_collateral =
        FixedPoint::from_units(state.raw_total_position_collateral(), collateral_decimals)?;
    let total_collateral = fee_multiplier.try_mul(raw_collateral)?;

    let total_tokens = FixedPoint::from_units(state.total_tokens_outstanding(), token_decimals)?;
    if total_tokens.is_zero() {
        // Dust below 18 decimals
        return Err(MetricsError::ZeroDenominator);
    }

    Ok(total_collateral.try_div(total_tokens)?.try_div(token_price)?)
}

/// Price of `token` in `collateral` implied by the pool reserves.
pub fn pool_token_price(
    reserves: &PoolReserves,
    token: Address,
    token_decimals: u8,
    collateral: Address,
    collateral_decimals: u8,
) -> Result<FixedPoint, MetricsError> {
    let token_reserve = reserves
        .reserve_of(token)
        .ok_or(MetricsError::TokenNotInPool(token))?;
    let collateral_reserve = reserves
        .reserve_of(collateral)
        .ok_or(MetricsError::TokenNotInPool(collateral))?;

    let token_reserve = FixedPoint::from_units(token_reserve, token_decimals)?;
    if token_reserve.is_zero() {
        return Err(MetricsError::ZeroDenominator);
    }
    let collateral_reserve = FixedPoint::from_units(collateral_reserve, collateral_decimals)?;
    Ok(collateral_reserve.try_div(token_reserve)?)
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{U256, address};

    use super::*;
    use crate::testing::{EmpStateBuilder, PositionBuilder};

    fn fp(s: &str) -> FixedPoint {
        s.parse().unwrap()
    }

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::from(1_000_000_000_000_000_000u64)
    }

    #[test]
    fn test_position_cr() {
        let position = PositionBuilder::new()
            .raw_collateral(U256::from(1_234_567_890u64))
            .build();
        let cr = position_cr(&position, "USDC").unwrap();
        assert_eq!(cr, fp("1234.56789"));
        assert_eq!(format_ratio(cr), "1234.5678");

        let position = PositionBuilder::new().raw_collateral(ether(3)).build();
        assert_eq!(format_ratio(position_cr(&position, "WETH").unwrap()), "3.0000");
    }

    #[test]
    fn test_position_cr_unknown_collateral() {
        let position = PositionBuilder::new().raw_collateral(ether(3)).build();
        assert_eq!(
            position_cr(&position, "WBTC"),
            Err(MetricsError::CollateralNotFound("WBTC".to_string()))
        );
    }

    #[test]
    fn test_sponsor_cr() {
        let position = PositionBuilder::new()
            .raw_collateral(ether(3))
            .tokens_outstanding(ether(10))
            .build();
        assert_eq!(
            sponsor_cr(&position, CollateralSymbol::Weth, 18, fp("0.2")).unwrap(),
            fp("1.5")
        );
        assert_eq!(
            sponsor_cr(&position, CollateralSymbol::Weth, 18, FixedPoint::ZERO),
            Err(MetricsError::MissingPrice)
        );

        let empty = PositionBuilder::new().raw_collateral(ether(3)).build();
        assert_eq!(
            sponsor_cr(&empty, CollateralSymbol::Weth, 18, fp("0.2")),
            Err(MetricsError::ZeroDenominator)
        );
    }

    #[test]
    fn test_global_cr() {
        let state = EmpStateBuilder::new()
            .raw_total_position_collateral(ether(150))
            .total_tokens_outstanding(ether(100))
            .build();
        assert_eq!(global_cr(&state, 18, 18, FixedPoint::ONE).unwrap(), fp("1.5"));
        assert_eq!(global_cr(&state, 18, 18, fp("0.5")).unwrap(), fp("3"));
    }

    #[test]
    fn test_global_cr_applies_fee_multiplier() {
        let state = EmpStateBuilder::new()
            .cumulative_fee_multiplier(U256::from(990_000_000_000_000_000u64))
            .raw_total_position_collateral(ether(150))
            .total_tokens_outstanding(ether(100))
            .build();
        assert_eq!(global_cr(&state, 18, 18, FixedPoint::ONE).unwrap(), fp("1.485"));
    }

    #[test]
    fn test_global_cr_mixed_decimals() {
        let state = EmpStateBuilder::new()
            .raw_total_position_collateral(U256::from(1_500_000_000u64))
            .total_tokens_outstanding(ether(10))
            .build();
        assert_eq!(global_cr(&state, 18, 6, fp("100")).unwrap(), fp("1.5"));
    }

    #[test]
    fn test_global_cr_without_tokens_is_zero() {
        let state = EmpStateBuilder::new()
            .raw_total_position_collateral(ether(150))
            .total_tokens_outstanding(U256::ZERO)
            .build();
        assert_eq!(global_cr(&state, 18, 18, FixedPoint::ONE), Ok(FixedPoint::ZERO));
        // Guard applies before the price is even looked at
        assert_eq!(global_cr(&state, 18, 18, FixedPoint::ZERO), Ok(FixedPoint::ZERO));
    }

    #[test]
    fn test_global_cr_missing_price() {
        let state = EmpStateBuilder::new()
            .raw_total_position_collateral(ether(150))
            .total_tokens_outstanding(ether(100))
            .build();
        assert_eq!(
            global_cr(&state, 18, 18, FixedPoint::ZERO),
            Err(MetricsError::MissingPrice)
        );
    }

    #[test]
    fn test_pool_token_price() {
        let (pool, synth, usdc) = (
            address!("0x00000000000000000000000000000000000000aa"),
            address!("0x00000000000000000000000000000000000000bb"),
            address!("0x00000000000000000000000000000000000000cc"),
        );
        let reserves = PoolReserves::new(
            pool,
            synth,
            usdc,
            ether(500),
            U256::from(125_000_000_000u64),
        );
        assert_eq!(
            pool_token_price(&reserves, synth, 18, usdc, 6).unwrap(),
            fp("250")
        );
        assert_eq!(
            pool_token_price(&reserves, pool, 18, usdc, 6),
            Err(MetricsError::TokenNotInPool(pool))
        );

        let drained = PoolReserves::new(pool, synth, usdc, U256::ZERO, U256::from(1u64));
        assert_eq!(
            pool_token_price(&drained, synth, 18, usdc, 6),
            Err(MetricsError::ZeroDenominator)
        );
    }
}
