//! Synthetic assets SDK.
//!
//! # Overview
//!
//! Settlement pricing and collateralization analytics for synthetic assets
//! minted by Expiring Multi-Party (EMP) contracts and Long-Short Pair products.
//!
//! Use [`pricing::compute_long_share`] or a [`pricing::ProductLibrary`] to map
//! a settlement price to the share of collateral paid out to long token holders.
//!
//! Use [`state::EmpReader`] to capture contract state snapshots, then
//! [`metrics`] to derive collateralization ratios, total value locked and
//! reward APRs from them. All metric and pricing functions are synchronous
//! and pure; prices are passed in explicitly, [`cache::PriceCache`] can be
//! used to keep them between calls.
//!
//! Assets are described by a JSON [`config::AssetRegistry`].
//!
//! See `./tests` and the `synth_report` binary for examples.
//!
//! # Numerics
//!
//! All values are [`num::FixedPoint`], a signed 18-decimal fixed point number
//! with truncating multiplication and division. Binary floating point is not
//! used anywhere.
//!
//! # Testing
//!
//! [`testing`] module provides builders for snapshots and positions with
//! controlled values.

pub mod abi;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod num;
pub mod pricing;
pub mod state;
pub mod testing;
pub mod types;
