//! End-to-end intent pipeline.
//!
//! Drives one intent through its lifecycle against injected collaborators:
//!
//! ```text
//!   session     created → connecting → connected → authenticating → authenticated
//!   commit      submitted              (digest recorded on the intent)
//!   net         matched | unmatched    (against revealed opposing amounts)
//!   settle      settling → settled     (residual swapped on the best venue)
//! ```
//!
//! Any error moves the intent to `failed`, with the error text as the
//! timeline note, and is returned to the caller unchanged. Once a swap is
//! final on-chain its receipt always reaches the caller, either in the
//! outcome or in the error ([`TintError::confirmed_swap`]).

use std::future::Future;

use alloy_primitives::{Address, U256};
use tint_netting::{Commitment, NetDirection, NetResult, commit, compute_net_position};
use tint_types::{
    DiscoveryConfig, Intent, IntentId, IntentRequest, IntentStatus, NetworkRegistry, Result,
    SettlementFlags, SwapReceipt, TintError,
};
use tint_venue::{PoolStateReader, VenueSelector};

use crate::{
    chain::{SwapRouter, TokenClient, TxConfirmer},
    executor::{ExecutorConfig, SettlementExecutor, SwapRequest},
    store::IntentStore,
};

/// The external state-channel session an intent is submitted through.
pub trait SessionGate {
    fn connect(&self) -> impl Future<Output = Result<()>> + Send;

    fn authenticate(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Everything one successful run produced.
#[derive(Debug, Clone)]
pub struct IntentOutcome {
    /// The intent in its final (`settled`) state.
    pub intent: Intent,
    pub commitment: Commitment,
    pub net: NetResult,
    /// `None` when nothing was left to trade on-chain.
    pub receipt: Option<SwapReceipt>,
}

/// Intent lifecycle driver for one executing account.
pub struct IntentPipeline<S, G, C> {
    store: S,
    gate: G,
    chain: C,
    registry: NetworkRegistry,
    discovery: DiscoveryConfig,
    account: Address,
    flags: SettlementFlags,
}

impl<S, G, C> IntentPipeline<S, G, C>
where
    S: IntentStore,
    G: SessionGate,
    C: PoolStateReader + TokenClient + SwapRouter + TxConfirmer + Sync,
{
    #[must_use]
    pub fn new(
        store: S,
        gate: G,
        chain: C,
        registry: NetworkRegistry,
        discovery: DiscoveryConfig,
        account: Address,
    ) -> Self {
        Self {
            store,
            gate,
            chain,
            registry,
            discovery,
            account,
            flags: SettlementFlags::default(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store a new intent in `created` status.
    pub fn submit(&self, request: IntentRequest) -> Result<IntentId> {
        let intent = Intent::new(request);
        let id = intent.id;
        tracing::info!(
            intent = %id,
            from = %intent.from_token,
            to = %intent.to_token,
            amount = %intent.amount,
            network = %intent.network,
            "Intent created"
        );
        self.store.put(intent)?;
        Ok(id)
    }

    /// Drive a stored intent to completion.
    ///
    /// `opposing` are the revealed amounts of the other side of the batch.
    /// The intent sells `amount` of its source token; when the batch leaves
    /// a residual on that side, the residual is swapped on-chain.
    ///
    /// # Errors
    /// Whatever step failed. The stored intent is `failed` in that case,
    /// unless it had already reached a terminal status.
    pub async fn process(&self, id: &IntentId, opposing: &[U256]) -> Result<IntentOutcome> {
        match self.drive(id, opposing).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                let note = match err.confirmed_swap() {
                    Some(swap) => format!("swap {} final on-chain; {err}", swap.tx_hash),
                    None => err.to_string(),
                };
                tracing::warn!(intent = %id, error = %err, "Intent failed");
                if let Err(store_err) = self.store.update_status(id, IntentStatus::Failed, &note) {
                    tracing::debug!(intent = %id, error = %store_err, "Failure not recorded");
                }
                Err(err)
            }
        }
    }

    /// [`Self::submit`] followed by [`Self::process`].
    pub async fn run(&self, request: IntentRequest, opposing: &[U256]) -> Result<IntentOutcome> {
        let id = self.submit(request)?;
        self.process(&id, opposing).await
    }

    async fn drive(&self, id: &IntentId, opposing: &[U256]) -> Result<IntentOutcome> {
        let intent = self.store.get(id)?;
        let network = self.registry.network(&intent.network)?;
        let (from, to) = network.pair(&intent.from_token, &intent.to_token)?;
        if intent.amount.is_zero() {
            return Err(TintError::InvalidAmount {
                input: "0".into(),
                reason: "amount must be positive".into(),
            });
        }

        self.store
            .update_status(id, IntentStatus::Connecting, &network.rpc_url)?;
        self.gate.connect().await?;
        self.store.update_status(id, IntentStatus::Connected, "")?;
        self.store
            .update_status(id, IntentStatus::Authenticating, "")?;
        self.gate.authenticate().await?;
        self.store
            .update_status(id, IntentStatus::Authenticated, "")?;

        let commitment = commit(intent.amount, None);
        self.store.attach_commitment(id, commitment.digest)?;
        self.store
            .update_status(id, IntentStatus::Submitted, &commitment.digest_hex())?;

        let net = compute_net_position(&[intent.amount], opposing);
        let matched = if net.netted_volume.is_zero() {
            IntentStatus::Unmatched
        } else {
            IntentStatus::Matched
        };
        self.store.update_status(
            id,
            matched,
            &format!(
                "residual {} {}, efficiency {}%",
                net.residual,
                net.direction,
                net.efficiency_percent()
            ),
        )?;

        self.store.update_status(id, IntentStatus::Settling, "")?;
        let receipt = if net.direction == NetDirection::Sell && !net.fully_netted() {
            let residual = net
                .residual_amount()
                .ok_or_else(|| TintError::Internal("residual exceeds intent amount".into()))?;

            let selector = VenueSelector::new(&self.chain, self.discovery.clone());
            let venue = selector
                .find_best_configured(network.pool_manager, from.address, to.address)
                .await
                .ok_or_else(|| TintError::NoLiquidVenue {
                    from: intent.from_token.clone(),
                    to: intent.to_token.clone(),
                })?;

            let executor = SettlementExecutor::new(
                &self.chain,
                ExecutorConfig {
                    account: self.account,
                    router: network.router,
                    flags: self.flags,
                    hook_data: Vec::new(),
                },
            );
            let receipt = executor
                .execute_units(&SwapRequest {
                    venue,
                    token_in: from.address,
                    token_out: to.address,
                    amount_in: residual,
                    recipient: intent.recipient,
                })
                .await?;
            Some(receipt)
        } else {
            None
        };

        let note = receipt
            .as_ref()
            .map_or_else(|| "no on-chain trade".to_owned(), |r| r.tx_hash.to_string());
        let intent = match self.store.update_status(id, IntentStatus::Settled, &note) {
            Ok(intent) => intent,
            Err(err) => {
                let Some(receipt) = receipt else {
                    return Err(err);
                };
                return Err(TintError::SettlementUnrecorded {
                    id: *id,
                    receipt: Box::new(receipt),
                    reason: err.to_string(),
                });
            }
        };

        Ok(IntentOutcome {
            intent,
            commitment,
            net,
            receipt,
        })
    }
}
