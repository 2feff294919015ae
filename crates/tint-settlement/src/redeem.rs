//! Claim redemption.
//!
//! Swaps settled with claims leave an internal balance in the pool manager,
//! keyed by `uint256(uint160(token))`. Redemption burns part or all of that
//! balance for real tokens. The request is checked against the balance
//! before any transaction is submitted.

use std::str::FromStr;

use alloy_primitives::{Address, U256};
use tint_types::{RedeemReceipt, Result, TintError, format_units, parse_units};

use crate::chain::{ClaimLedger, TokenClient, TxConfirmer, claim_token_id};

/// How much of a claim balance to redeem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedeemAmount {
    /// The whole balance.
    All,
    /// A human-unit amount, e.g. `"0.5"`.
    Exact(String),
}

impl FromStr for RedeemAmount {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Exact(s.to_owned()))
        }
    }
}

/// Redeems the executing account's claims on one pool manager.
pub struct ClaimRedeemer<C> {
    chain: C,
    account: Address,
    router: Address,
    manager: Address,
}

impl<C> ClaimRedeemer<C>
where
    C: TokenClient + ClaimLedger + TxConfirmer,
{
    #[must_use]
    pub fn new(chain: C, account: Address, router: Address, manager: Address) -> Self {
        Self {
            chain,
            account,
            router,
            manager,
        }
    }

    /// Current claim balance of `token`, in smallest units.
    pub async fn balance(&self, token: Address) -> Result<U256> {
        Ok(self
            .chain
            .claim_balance(self.manager, self.account, claim_token_id(token))
            .await?)
    }

    /// Burn claims on `token` for real tokens.
    ///
    /// # Errors
    /// - `NothingToRedeem` if the resolved amount is zero
    /// - `InsufficientClaim` if it exceeds the claim balance
    /// - `InvalidAmount` for a malformed exact amount
    /// - `RedeemFailed` if the transaction fails or reverts
    pub async fn redeem(
        &self,
        token: Address,
        symbol: &str,
        amount: &RedeemAmount,
    ) -> Result<RedeemReceipt> {
        let available = self.balance(token).await?;
        let decimals = self.chain.decimals(token).await?;

        let requested = match amount {
            RedeemAmount::All => available,
            RedeemAmount::Exact(human) => parse_units(human, decimals)?,
        };
        if requested.is_zero() {
            return Err(TintError::NothingToRedeem);
        }
        if requested > available {
            return Err(TintError::InsufficientClaim {
                requested: format_units(requested, decimals),
                available: format_units(available, decimals),
            });
        }

        tracing::info!(
            %token,
            symbol,
            amount = %requested,
            "Redeeming claims"
        );
        let tx = self
            .chain
            .redeem(self.router, token, requested)
            .await
            .map_err(|e| TintError::RedeemFailed {
                reason: e.to_string(),
            })?;
        let mined = self
            .chain
            .wait_for_receipt(tx)
            .await
            .map_err(|e| TintError::RedeemFailed {
                reason: format!("{e} (tx {tx})"),
            })?;
        if !mined.success {
            return Err(TintError::RedeemFailed {
                reason: format!(
                    "reverted: {} (tx {tx})",
                    mined.revert_reason.as_deref().unwrap_or("no reason given")
                ),
            });
        }

        let redeemed_amount = format_units(requested, decimals);
        tracing::info!(tx = %tx, block = mined.block_number, %redeemed_amount, "Claims redeemed");
        Ok(RedeemReceipt {
            tx_hash: mined.tx_hash,
            block_number: mined.block_number,
            token: symbol.to_owned(),
            amount: requested,
            redeemed_amount,
        })
    }
}
