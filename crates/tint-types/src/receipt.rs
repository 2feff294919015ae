//! Transaction receipts and settlement progress.

use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};

/// Confirmation result for one submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub block_number: u64,
    /// `false` when the transaction was mined but reverted.
    pub success: bool,
    pub revert_reason: Option<String>,
}

impl TxReceipt {
    #[must_use]
    pub fn confirmed(tx_hash: B256, block_number: u64) -> Self {
        Self {
            tx_hash,
            block_number,
            success: true,
            revert_reason: None,
        }
    }

    #[must_use]
    pub fn reverted(tx_hash: B256, block_number: u64, reason: Option<String>) -> Self {
        Self {
            tx_hash,
            block_number,
            success: false,
            revert_reason: reason,
        }
    }
}

/// Progress of one settlement execution.
///
/// ```text
///   PENDING ─┬─▶ APPROVING ─▶ APPROVED ─┐
///            └──────────────────────────┴─▶ TRADE_SUBMITTED ─▶ TRADE_CONFIRMED
///                                                     ┌────────────┘
///                                                     ├─▶ FORWARDING ─▶ COMPLETE
///                                                     └─▶ COMPLETE
///   APPROVING | TRADE_SUBMITTED ──revert──▶ REVERTED
/// ```
///
/// `REVERTED` means no trade happened. A failed forward stays at
/// `FORWARDING`: the swap is already final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementPhase {
    Pending,
    Approving,
    Approved,
    TradeSubmitted,
    TradeConfirmed,
    Forwarding,
    Complete,
    Reverted,
}

impl SettlementPhase {
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Approving | Self::TradeSubmitted)
                | (Self::Approving, Self::Approved | Self::Reverted)
                | (Self::Approved, Self::TradeSubmitted)
                | (Self::TradeSubmitted, Self::TradeConfirmed | Self::Reverted)
                | (Self::TradeConfirmed, Self::Forwarding | Self::Complete)
                | (Self::Forwarding, Self::Complete)
        )
    }

    /// The trade itself is final on-chain from `TradeConfirmed` onwards.
    #[must_use]
    pub fn trade_is_final(self) -> bool {
        matches!(self, Self::TradeConfirmed | Self::Forwarding | Self::Complete)
    }
}

impl std::fmt::Display for SettlementPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Approving => "APPROVING",
            Self::Approved => "APPROVED",
            Self::TradeSubmitted => "TRADE_SUBMITTED",
            Self::TradeConfirmed => "TRADE_CONFIRMED",
            Self::Forwarding => "FORWARDING",
            Self::Complete => "COMPLETE",
            Self::Reverted => "REVERTED",
        };
        f.write_str(s)
    }
}

/// Outcome of a confirmed swap.
///
/// `amount_out` is the executing account's destination-token balance delta,
/// never the amount the trade call reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapReceipt {
    pub tx_hash: B256,
    pub block_number: u64,
    pub amount_out: U256,
    /// Approval submitted during this execution, if one was needed.
    pub approval_tx: Option<B256>,
    /// Transfer to the final recipient, if one happened.
    pub forward_tx: Option<B256>,
    pub phase: SettlementPhase,
}

impl SwapReceipt {
    #[must_use]
    pub fn success(&self) -> bool {
        self.phase == SettlementPhase::Complete
    }
}

/// Outcome of a confirmed claim redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemReceipt {
    pub tx_hash: B256,
    pub block_number: u64,
    pub token: String,
    pub amount: U256,
    /// `amount` in human units.
    pub redeemed_amount: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_is_optional() {
        assert!(SettlementPhase::Pending.can_transition_to(SettlementPhase::TradeSubmitted));
        assert!(SettlementPhase::Pending.can_transition_to(SettlementPhase::Approving));
        assert!(!SettlementPhase::Pending.can_transition_to(SettlementPhase::TradeConfirmed));
    }

    #[test]
    fn forwarding_is_optional() {
        assert!(SettlementPhase::TradeConfirmed.can_transition_to(SettlementPhase::Complete));
        assert!(SettlementPhase::TradeConfirmed.can_transition_to(SettlementPhase::Forwarding));
        assert!(!SettlementPhase::TradeConfirmed.can_transition_to(SettlementPhase::Reverted));
    }

    #[test]
    fn failed_forward_never_reads_as_reverted() {
        assert!(!SettlementPhase::Forwarding.can_transition_to(SettlementPhase::Reverted));
        assert!(!SettlementPhase::TradeConfirmed.can_transition_to(SettlementPhase::Reverted));
        assert!(!SettlementPhase::Reverted.trade_is_final());
    }

    #[test]
    fn terminal_phases_are_final() {
        for target in [SettlementPhase::Pending, SettlementPhase::Approving] {
            assert!(!SettlementPhase::Complete.can_transition_to(target));
            assert!(!SettlementPhase::Reverted.can_transition_to(target));
        }
    }

    #[test]
    fn trade_final_after_confirmation() {
        assert!(!SettlementPhase::TradeSubmitted.trade_is_final());
        assert!(SettlementPhase::Forwarding.trade_is_final());
    }

    #[test]
    fn phase_display_and_serde() {
        assert_eq!(SettlementPhase::TradeSubmitted.to_string(), "TRADE_SUBMITTED");
        let json = serde_json::to_string(&SettlementPhase::TradeConfirmed).unwrap();
        assert_eq!(json, "\"TRADE_CONFIRMED\"");
    }
}
