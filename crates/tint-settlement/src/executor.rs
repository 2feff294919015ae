//! Residual settlement executor.
//!
//! Turns a residual amount into one confirmed exact-input swap on a chosen
//! venue, for a single authorized account:
//! 1. Convert the human amount to smallest units (token decimals)
//! 2. Approve the router for the maximum allowance, only if the current
//!    allowance is short
//! 3. Build exact-input parameters (negative amount, widest price limit)
//! 4. Snapshot the output balance, swap, wait, snapshot again; the delta is
//!    the amount received
//! 5. Forward the received amount to the recipient, if one is set
//!
//! Every dependent transaction waits for its confirmation before the next
//! step starts. Once the swap is confirmed it is final: later failures are
//! reported together with the swap receipt.

use alloy_primitives::{Address, B256, I256, U256};
use tint_types::{
    ChainError, Result, SettlementFlags, SettlementPhase, SwapParams, SwapReceipt, TintError,
    TxReceipt, Venue, parse_units,
};

use crate::chain::{SwapRouter, TokenClient, TxConfirmer};

/// One settlement request, amount in smallest units.
#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub venue: Venue,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    pub recipient: Option<Address>,
}

/// Account and contract the executor works with.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// The executing (signing) account.
    pub account: Address,
    /// Router that receives approvals and executes swaps.
    pub router: Address,
    pub flags: SettlementFlags,
    pub hook_data: Vec<u8>,
}

impl ExecutorConfig {
    #[must_use]
    pub fn new(account: Address, router: Address) -> Self {
        Self {
            account,
            router,
            flags: SettlementFlags::default(),
            hook_data: Vec::new(),
        }
    }
}

/// Tracks the phase of one execution and logs every step.
struct Progress {
    phase: SettlementPhase,
}

impl Progress {
    fn new() -> Self {
        Self {
            phase: SettlementPhase::Pending,
        }
    }

    fn advance(&mut self, next: SettlementPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal settlement transition {} -> {next}",
            self.phase
        );
        tracing::debug!(from = %self.phase, to = %next, "Settlement phase");
        self.phase = next;
    }
}

fn revert_reason(receipt: &TxReceipt) -> String {
    ChainError::Reverted {
        reason: receipt.revert_reason.clone(),
    }
    .to_string()
}

/// Executes residual swaps for one account.
pub struct SettlementExecutor<C> {
    chain: C,
    config: ExecutorConfig,
}

impl<C> SettlementExecutor<C>
where
    C: TokenClient + SwapRouter + TxConfirmer,
{
    #[must_use]
    pub fn new(chain: C, config: ExecutorConfig) -> Self {
        Self { chain, config }
    }

    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Swap `amount_in` (human units of `token_in`) on `venue`.
    ///
    /// # Errors
    /// - `InvalidAmount` if the string does not fit the token's decimals
    /// - `Chain` if a read fails before anything was submitted
    /// - `ApprovalFailed`, `TradeFailed` for failed submissions or reverts
    /// - `ForwardFailed`, `MeasurementFailed` when the swap is already final
    pub async fn execute(
        &self,
        venue: &Venue,
        token_in: Address,
        token_out: Address,
        amount_in: &str,
        recipient: Option<Address>,
    ) -> Result<SwapReceipt> {
        let decimals = self.chain.decimals(token_in).await?;
        let amount_in = parse_units(amount_in, decimals)?;
        self.execute_units(&SwapRequest {
            venue: *venue,
            token_in,
            token_out,
            amount_in,
            recipient,
        })
        .await
    }

    /// Swap an amount already expressed in smallest units.
    pub async fn execute_units(&self, request: &SwapRequest) -> Result<SwapReceipt> {
        self.validate(request)?;
        let mut progress = Progress::new();
        let account = self.config.account;

        // Approval is a one-time, reusable grant; skip it when it suffices.
        let approval_tx = self.ensure_allowance(request, &mut progress).await?;

        let zero_for_one = request.venue.key.zero_for_one(request.token_in);
        let signed = I256::try_from(request.amount_in)
            .map_err(|_| TintError::AmountOutOfRange(request.amount_in))?;
        let params = SwapParams::exact_input(zero_for_one, signed);

        let before = self
            .chain
            .balance_of(request.token_out, account)
            .await?;

        let submitted = self
            .chain
            .swap(
                self.config.router,
                request.venue.key,
                params,
                self.config.flags,
                self.config.hook_data.clone(),
            )
            .await
            .map_err(|e| TintError::TradeFailed {
                reason: e.to_string(),
            })?;
        progress.advance(SettlementPhase::TradeSubmitted);
        tracing::info!(
            tx = %submitted.tx_hash,
            venue = %request.venue.id,
            zero_for_one,
            amount_in = %request.amount_in,
            "Swap submitted"
        );

        let mined = self
            .chain
            .wait_for_receipt(submitted.tx_hash)
            .await
            .map_err(|e| TintError::TradeFailed {
                reason: format!("{} (tx {})", e, submitted.tx_hash),
            })?;
        if !mined.success {
            progress.advance(SettlementPhase::Reverted);
            return Err(TintError::TradeFailed {
                reason: format!("{} (tx {})", revert_reason(&mined), mined.tx_hash),
            });
        }
        progress.advance(SettlementPhase::TradeConfirmed);

        let mut receipt = SwapReceipt {
            tx_hash: mined.tx_hash,
            block_number: mined.block_number,
            amount_out: U256::ZERO,
            approval_tx,
            forward_tx: None,
            phase: progress.phase,
        };

        let after = match self.chain.balance_of(request.token_out, account).await {
            Ok(after) => after,
            Err(e) => {
                return Err(TintError::MeasurementFailed {
                    receipt: Box::new(receipt),
                    reason: e.to_string(),
                });
            }
        };
        receipt.amount_out = after.saturating_sub(before);
        tracing::info!(
            tx = %receipt.tx_hash,
            block = receipt.block_number,
            amount_out = %receipt.amount_out,
            reported_delta = %submitted.reported_delta,
            "Swap confirmed"
        );

        match request.recipient {
            Some(to) if to != account && !receipt.amount_out.is_zero() => {
                progress.advance(SettlementPhase::Forwarding);
                receipt.phase = progress.phase;
                match self.forward(request.token_out, to, receipt.amount_out).await {
                    Ok(tx) => {
                        receipt.forward_tx = Some(tx);
                        progress.advance(SettlementPhase::Complete);
                    }
                    Err(reason) => {
                        // Phase stays FORWARDING: the swap is final on-chain.
                        tracing::warn!(
                            tx = %receipt.tx_hash,
                            recipient = %to,
                            %reason,
                            "Swap final but forwarding failed"
                        );
                        return Err(TintError::ForwardFailed {
                            receipt: Box::new(receipt),
                            reason,
                        });
                    }
                }
            }
            _ => progress.advance(SettlementPhase::Complete),
        }

        receipt.phase = progress.phase;
        Ok(receipt)
    }

    fn validate(&self, request: &SwapRequest) -> Result<()> {
        let key = &request.venue.key;
        if request.token_in == request.token_out
            || !key.contains(request.token_in)
            || !key.contains(request.token_out)
        {
            return Err(TintError::Configuration(format!(
                "pair {}/{} does not trade on venue {}",
                request.token_in, request.token_out, request.venue.id
            )));
        }
        if request.amount_in.is_zero() {
            return Err(TintError::InvalidAmount {
                input: "0".into(),
                reason: "amount must be positive".into(),
            });
        }
        Ok(())
    }

    async fn ensure_allowance(
        &self,
        request: &SwapRequest,
        progress: &mut Progress,
    ) -> Result<Option<B256>> {
        let allowance = self
            .chain
            .allowance(request.token_in, self.config.account, self.config.router)
            .await?;
        if allowance >= request.amount_in {
            tracing::debug!(token = %request.token_in, %allowance, "Allowance sufficient");
            return Ok(None);
        }

        progress.advance(SettlementPhase::Approving);
        tracing::info!(token = %request.token_in, spender = %self.config.router, "Approving");
        let tx = self
            .chain
            .approve(request.token_in, self.config.router, U256::MAX)
            .await
            .map_err(|e| TintError::ApprovalFailed {
                reason: e.to_string(),
            })?;
        let mined = self
            .chain
            .wait_for_receipt(tx)
            .await
            .map_err(|e| TintError::ApprovalFailed {
                reason: format!("{e} (tx {tx})"),
            })?;
        if !mined.success {
            progress.advance(SettlementPhase::Reverted);
            return Err(TintError::ApprovalFailed {
                reason: format!("{} (tx {tx})", revert_reason(&mined)),
            });
        }
        progress.advance(SettlementPhase::Approved);
        tracing::info!(tx = %tx, "Approved");
        Ok(Some(tx))
    }

    /// Transfer the received amount onward.
    async fn forward(
        &self,
        token: Address,
        to: Address,
        amount: U256,
    ) -> std::result::Result<B256, String> {
        tracing::info!(%token, recipient = %to, %amount, "Forwarding output");
        let tx = self
            .chain
            .transfer(token, to, amount)
            .await
            .map_err(|e| e.to_string())?;
        let mined = self
            .chain
            .wait_for_receipt(tx)
            .await
            .map_err(|e| format!("{e} (tx {tx})"))?;
        if !mined.success {
            return Err(format!("transfer {} (tx {tx})", revert_reason(&mined)));
        }
        tracing::info!(tx = %tx, "Transfer complete");
        Ok(tx)
    }
}
