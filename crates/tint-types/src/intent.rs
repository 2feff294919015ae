//! Intent model and its lifecycle state machine.
//!
//! ## State Machine
//!
//! ```text
//!   CREATED → CONNECTING → CONNECTED → AUTHENTICATING → AUTHENTICATED
//!       → SUBMITTED → { MATCHED | UNMATCHED } → SETTLING → SETTLED
//!
//!   any non-terminal state ──error──▶ FAILED
//! ```
//!
//! Transitions are strictly ordered: no state may be skipped, and the
//! terminal states (`SETTLED`, `FAILED`) accept no further transition.
//! Every accepted transition appends a timestamped [`TimelineEntry`].

use alloy_primitives::{Address, B256, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{IntentId, Result, TintError};

/// Lifecycle status of an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    Created,
    Connecting,
    Connected,
    Authenticating,
    Authenticated,
    Submitted,
    Matched,
    Unmatched,
    Settling,
    Settled,
    Failed,
}

impl IntentStatus {
    /// `settled` and `failed` end the lifecycle.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Settled | Self::Failed)
    }

    /// Can an intent in this status move to `target`?
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, target),
            (_, Self::Failed)
                | (Self::Created, Self::Connecting)
                | (Self::Connecting, Self::Connected)
                | (Self::Connected, Self::Authenticating)
                | (Self::Authenticating, Self::Authenticated)
                | (Self::Authenticated, Self::Submitted)
                | (Self::Submitted, Self::Matched | Self::Unmatched)
                | (Self::Matched | Self::Unmatched, Self::Settling)
                | (Self::Settling, Self::Settled)
        )
    }
}

impl std::fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
            Self::Submitted => "submitted",
            Self::Matched => "matched",
            Self::Unmatched => "unmatched",
            Self::Settling => "settling",
            Self::Settled => "settled",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Kind of intent. Only swaps reach the settlement core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IntentType {
    #[default]
    Swap,
}

/// One timestamped lifecycle step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub status: IntentStatus,
    pub note: String,
    pub at: DateTime<Utc>,
}

/// What a user submits: swap `amount` (smallest units) of `from_token`
/// into `to_token` on `network`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    pub from_token: String,
    pub to_token: String,
    pub amount: U256,
    pub network: String,
    #[serde(default)]
    pub recipient: Option<Address>,
    /// Slippage tolerance in basis points. Informational only: the
    /// settlement core defers slippage protection to the caller's quote.
    #[serde(default)]
    pub slippage_bps: u32,
    #[serde(default)]
    pub intent_type: IntentType,
}

/// A user's declared swap, tracked through its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub id: IntentId,
    pub from_token: String,
    pub to_token: String,
    pub amount: U256,
    pub network: String,
    pub recipient: Option<Address>,
    pub slippage_bps: u32,
    pub intent_type: IntentType,
    pub status: IntentStatus,
    /// Commitment digest recorded at submission. The opening stays with
    /// whoever produced it.
    pub commitment: Option<B256>,
    pub created_at: DateTime<Utc>,
    pub timeline: Vec<TimelineEntry>,
}

impl Intent {
    /// Create a new intent in `created` status with an empty timeline.
    #[must_use]
    pub fn new(request: IntentRequest) -> Self {
        Self {
            id: IntentId::new(),
            from_token: request.from_token,
            to_token: request.to_token,
            amount: request.amount,
            network: request.network,
            recipient: request.recipient,
            slippage_bps: request.slippage_bps,
            intent_type: request.intent_type,
            status: IntentStatus::Created,
            commitment: None,
            created_at: Utc::now(),
            timeline: Vec::new(),
        }
    }

    /// Move to `status`, appending a timeline entry.
    ///
    /// # Errors
    /// - `IntentTerminal` if the intent already settled or failed
    /// - `InvalidTransition` if `status` is not a legal successor
    pub fn transition(&mut self, status: IntentStatus, note: impl Into<String>) -> Result<()> {
        if self.status.is_terminal() {
            return Err(TintError::IntentTerminal {
                id: self.id,
                status: self.status,
            });
        }
        if !self.status.can_transition_to(status) {
            return Err(TintError::InvalidTransition {
                from: self.status,
                to: status,
            });
        }
        self.status = status;
        self.timeline.push(TimelineEntry {
            status,
            note: note.into(),
            at: Utc::now(),
        });
        Ok(())
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl IntentRequest {
    pub fn dummy(amount: u64) -> Self {
        Self {
            from_token: "WETH".into(),
            to_token: "USDC".into(),
            amount: U256::from(amount),
            network: "base".into(),
            recipient: None,
            slippage_bps: 50,
            intent_type: IntentType::Swap,
        }
    }
}
