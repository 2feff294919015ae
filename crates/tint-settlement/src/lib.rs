//! # tint-settlement
//!
//! **Residual settlement**: turns whatever netting left over into one
//! confirmed on-chain swap, and drives intents through their lifecycle.
//!
//! ## Architecture
//!
//! An intent moves through the [`IntentPipeline`]:
//! 1. Session connect and authenticate through a [`SessionGate`]
//! 2. Commit to the amount (digest recorded on the intent)
//! 3. Net against the revealed opposing side of the batch
//! 4. Discover the most liquid venue and settle the residual with the
//!    [`SettlementExecutor`]
//!
//! Claims left with the pool manager are burned for real tokens by the
//! [`ClaimRedeemer`]. All chain access goes through the narrow traits in
//! [`chain`], so every collaborator is injectable.

pub mod chain;
pub mod executor;
pub mod pipeline;
pub mod redeem;
pub mod store;

pub use chain::{
    ClaimLedger, SubmittedSwap, SwapRouter, TokenClient, TxConfirmer, claim_token_id,
};
pub use executor::{ExecutorConfig, SettlementExecutor, SwapRequest};
pub use pipeline::{IntentOutcome, IntentPipeline, SessionGate};
pub use redeem::{ClaimRedeemer, RedeemAmount};
pub use store::{InMemoryIntentStore, IntentStore};
