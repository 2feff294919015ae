//! # tint-types
//!
//! Shared types, errors, and configuration for the **TINT** intent pipeline.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`IntentId`]
//! - **Intent model**: [`Intent`], [`IntentRequest`], [`IntentStatus`], [`TimelineEntry`]
//! - **Pool model**: [`FeeTier`], [`PoolKey`], [`VenueState`], [`Venue`], [`SwapParams`]
//! - **Receipts**: [`TxReceipt`], [`SwapReceipt`], [`RedeemReceipt`], [`SettlementPhase`]
//! - **Configuration**: [`NetworkRegistry`], [`NetworkConfig`], [`TokenConfig`], [`DiscoveryConfig`]
//! - **Errors**: [`TintError`] with `TINT_ERR_` prefix codes, [`ChainError`]
//! - **Units**: [`parse_units`], [`format_units`]
//! - **Constants**: fee tiers, price limits, defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod intent;
pub mod pool;
pub mod receipt;
pub mod units;

pub use config::*;
pub use error::*;
pub use ids::*;
pub use intent::*;
pub use pool::*;
pub use receipt::*;
pub use units::*;

// Constants are accessed via `tint_types::constants::FOO`.

pub use alloy_primitives::{Address, B256, I256, U256};
