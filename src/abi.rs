//! Contract interfaces read by the SDK.
//!
//! Only the view functions needed to snapshot contract state are declared.

#[allow(clippy::too_many_arguments)]
pub mod emp {
    alloy::sol!(
        /// Legacy Expiring Multi-Party contract.
        #[derive(Debug)]
        #[sol(rpc)]
        interface ExpiringMultiPartyV1 {
            function expirationTimestamp() external view returns (uint256);
            function collateralCurrency() external view returns (address);
            function priceIdentifier() external view returns (bytes32);
            function tokenCurrency() external view returns (address);
            function collateralRequirement() external view returns (uint256 rawValue);
            function disputeBondPct() external view returns (uint256 rawValue);
            function sponsorDisputeRewardPct() external view returns (uint256 rawValue);
            function disputerDisputeRewardPct() external view returns (uint256 rawValue);
            function minSponsorTokens() external view returns (uint256 rawValue);
            function cumulativeFeeMultiplier() external view returns (uint256 rawValue);
            function rawTotalPositionCollateral() external view returns (uint256 rawValue);
            function totalTokensOutstanding() external view returns (uint256 rawValue);
            function liquidationLiveness() external view returns (uint256);
            function withdrawalLiveness() external view returns (uint256);
            function getCurrentTime() external view returns (uint256);
            function contractState() external view returns (uint8);
            function finder() external view returns (address);
            function expiryPrice() external view returns (uint256 rawValue);
        }
    );

    alloy::sol!(
        /// Expiring Multi-Party contract.
        #[derive(Debug)]
        #[sol(rpc)]
        interface ExpiringMultiPartyV2 {
            function expirationTimestamp() external view returns (uint256);
            function collateralCurrency() external view returns (address);
            function priceIdentifier() external view returns (bytes32);
            function tokenCurrency() external view returns (address);
            function collateralRequirement() external view returns (uint256 rawValue);
            function disputeBondPercentage() external view returns (uint256 rawValue);
            function sponsorDisputeRewardPercentage() external view returns (uint256 rawValue);
            function disputerDisputeRewardPercentage() external view returns (uint256 rawValue);
            function minSponsorTokens() external view returns (uint256 rawValue);
            function cumulativeFeeMultiplier() external view returns (uint256 rawValue);
            function rawTotalPositionCollateral() external view returns (uint256 rawValue);
            function totalTokensOutstanding() external view returns (uint256 rawValue);
            function liquidationLiveness() external view returns (uint256);
            function withdrawalLiveness() external view returns (uint256);
            function getCurrentTime() external view returns (uint256);
            function contractState() external view returns (uint8);
            function finder() external view returns (address);
            function expiryPrice() external view returns (uint256 rawValue);
            function positions(address sponsor) external view returns (
                uint256 tokensOutstanding,
                uint256 withdrawalRequestPassTimestamp,
                uint256 withdrawalRequestAmount,
                uint256 rawCollateral,
                uint256 transferPositionRequestPassTimestamp
            );
        }
    );
}

pub mod pool {
    alloy::sol!(
        /// Constant-product pool the synthetic token trades in.
        #[derive(Debug)]
        #[sol(rpc)]
        interface UniswapV2Pair {
            function token0() external view returns (address);
            function token1() external view returns (address);
            function getReserves() external view returns (
                uint112 reserve0,
                uint112 reserve1,
                uint32 blockTimestampLast
            );
        }
    );
}

pub mod erc20 {
    alloy::sol!(
        #[derive(Debug)]
        #[sol(rpc)]
        interface Erc20 {
            function decimals() external view returns (uint8);
            function symbol() external view returns (string);
        }
    );
}
