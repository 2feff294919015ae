//! Error types for the TINT intent pipeline.
//!
//! All errors use the `TINT_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Configuration errors
//! - 2xx: Amount conversion errors
//! - 3xx: Authorization (approval) errors
//! - 4xx: Trade / forwarding errors
//! - 5xx: Claim redemption errors
//! - 6xx: Intent lifecycle errors
//! - 7xx: Chain access errors
//! - 9xx: General / internal errors
//!
//! Discovery itself never fails on an empty market; [`TintError::NoLiquidVenue`]
//! is raised only where a venue is required to continue.

use alloy_primitives::U256;
use thiserror::Error;

use crate::{IntentId, IntentStatus, SwapReceipt};

/// Failure reported by an on-chain collaborator (RPC node, contract call).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The node could not be reached or answered with a transport error.
    #[error("node unreachable: {0}")]
    Unreachable(String),

    /// The queried object (pool, token, receipt) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The call or transaction reverted on-chain.
    #[error("reverted: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Reverted { reason: Option<String> },

    /// No response within the bounded wait.
    #[error("timed out after {ms}ms")]
    Timeout { ms: u64 },
}

/// Central error enum for all TINT operations.
#[derive(Debug, Error)]
pub enum TintError {
    // =================================================================
    // Configuration Errors (1xx)
    // =================================================================
    /// No network with this name is configured.
    #[error("TINT_ERR_100: Unknown network: {0}")]
    UnknownNetwork(String),

    /// The token symbol is not configured on the given network.
    #[error("TINT_ERR_101: Token not supported on {network}: {symbol}")]
    UnsupportedToken { network: String, symbol: String },

    /// Invalid configuration (malformed table, missing fields, etc.).
    #[error("TINT_ERR_102: Configuration error: {0}")]
    Configuration(String),

    // =================================================================
    // Conversion Errors (2xx)
    // =================================================================
    /// The amount string is not a valid non-negative decimal for the precision.
    #[error("TINT_ERR_200: Invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    /// The amount does not fit the signed trade-size parameter.
    #[error("TINT_ERR_201: Amount out of range: {0}")]
    AmountOutOfRange(U256),

    // =================================================================
    // Authorization Errors (3xx)
    // =================================================================
    /// The spending approval failed before or during confirmation.
    #[error("TINT_ERR_300: Approval failed: {reason}")]
    ApprovalFailed { reason: String },

    // =================================================================
    // Trade Errors (4xx)
    // =================================================================
    /// The swap transaction failed or reverted.
    #[error("TINT_ERR_400: Trade failed: {reason}")]
    TradeFailed { reason: String },

    /// The swap is final on-chain but forwarding the output failed.
    #[error("TINT_ERR_401: Swap {} confirmed but forwarding failed: {reason}", .receipt.tx_hash)]
    ForwardFailed {
        receipt: Box<SwapReceipt>,
        reason: String,
    },

    /// No fee tier of the pair has initialized, positive liquidity.
    #[error("TINT_ERR_402: No liquid venue for {from}/{to}")]
    NoLiquidVenue { from: String, to: String },

    /// The swap is final on-chain but the output balance could not be read.
    #[error("TINT_ERR_403: Swap {} confirmed but output measurement failed: {reason}", .receipt.tx_hash)]
    MeasurementFailed {
        receipt: Box<SwapReceipt>,
        reason: String,
    },

    // =================================================================
    // Claim Errors (5xx)
    // =================================================================
    /// Requested redemption of zero (or the claim balance is empty).
    #[error("TINT_ERR_500: No claims to redeem")]
    NothingToRedeem,

    /// Requested more than the available claim balance.
    #[error("TINT_ERR_501: Insufficient claims: requested {requested}, have {available}")]
    InsufficientClaim { requested: String, available: String },

    /// The redeem transaction failed or reverted.
    #[error("TINT_ERR_502: Redeem failed: {reason}")]
    RedeemFailed { reason: String },

    // =================================================================
    // Lifecycle Errors (6xx)
    // =================================================================
    /// The intent is not present in the store.
    #[error("TINT_ERR_600: Intent not found: {0}")]
    IntentNotFound(IntentId),

    /// An intent with this ID is already stored.
    #[error("TINT_ERR_601: Intent already exists: {0}")]
    DuplicateIntent(IntentId),

    /// The requested status is not the successor of the current one.
    #[error("TINT_ERR_602: Invalid intent transition: {from} -> {to}")]
    InvalidTransition { from: IntentStatus, to: IntentStatus },

    /// The intent already reached `settled` or `failed`.
    #[error("TINT_ERR_603: Intent {id} is terminal ({status})")]
    IntentTerminal { id: IntentId, status: IntentStatus },

    /// Every stored intent is still live; none can be evicted.
    #[error("TINT_ERR_604: Intent store full: {capacity} live intents")]
    StoreFull { capacity: usize },

    /// The swap is final on-chain but the settled status was not recorded.
    #[error("TINT_ERR_605: Swap {} confirmed but intent {id} not recorded as settled: {reason}", .receipt.tx_hash)]
    SettlementUnrecorded {
        id: IntentId,
        receipt: Box<SwapReceipt>,
        reason: String,
    },

    // =================================================================
    // Chain Access Errors (7xx)
    // =================================================================
    /// A read or pre-submission call failed. Eligible for caller retry.
    #[error("TINT_ERR_700: Chain access failed: {0}")]
    Chain(#[from] ChainError),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("TINT_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("TINT_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// I/O error (config file).
    #[error("TINT_ERR_903: I/O error: {0}")]
    Io(String),
}

impl TintError {
    /// The confirmed swap behind a partial failure, if the trade is final.
    #[must_use]
    pub fn confirmed_swap(&self) -> Option<&SwapReceipt> {
        match self {
            Self::ForwardFailed { receipt, .. }
            | Self::MeasurementFailed { receipt, .. }
            | Self::SettlementUnrecorded { receipt, .. } => Some(receipt),
            _ => None,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, TintError>;

impl From<std::io::Error> for TintError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TintError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
