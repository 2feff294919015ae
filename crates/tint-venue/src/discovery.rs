//! Best-venue discovery across fee tiers.
//!
//! For a token pair, every candidate tier is turned into a canonical
//! [`PoolKey`], its venue id derived, and its state queried. Queries run
//! concurrently (one per tier), each under its own timeout. A failed or
//! timed-out query only removes that tier from consideration.
//!
//! ## Selection Rule
//!
//! Among tiers whose price is initialized and whose liquidity is strictly
//! positive, the one with the greatest liquidity wins. On an exact tie the
//! earliest tier in iteration order wins (with the default table: the
//! lowest fee). No qualifying tier yields `None`, which is an ordinary
//! empty-market outcome.

use std::time::Duration;

use alloy_primitives::{Address, U256};
use futures::future::join_all;
use tint_types::{
    ChainError, DiscoveryConfig, FeeTier, PoolKey, Venue, VenueState, constants, format_units,
};

use crate::reader::PoolStateReader;

/// Outcome of querying one tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierProbe {
    /// Initialized pool with positive liquidity.
    Found(Venue),
    /// The pool answered but is uninitialized or empty.
    NotFound { key: PoolKey, state: VenueState },
    /// The query failed or timed out (pool missing, node unreachable).
    QueryError { key: PoolKey, error: ChainError },
}

impl TierProbe {
    #[must_use]
    pub fn key(&self) -> &PoolKey {
        match self {
            Self::Found(venue) => &venue.key,
            Self::NotFound { key, .. } | Self::QueryError { key, .. } => key,
        }
    }

    #[must_use]
    pub fn venue(&self) -> Option<&Venue> {
        match self {
            Self::Found(venue) => Some(venue),
            _ => None,
        }
    }
}

/// Pick the most liquid venue; earlier probes win ties.
#[must_use]
pub fn select_best(probes: &[TierProbe]) -> Option<Venue> {
    probes
        .iter()
        .filter_map(TierProbe::venue)
        .fold(None, |best: Option<&Venue>, candidate| match best {
            Some(b) if candidate.state.liquidity <= b.state.liquidity => Some(b),
            _ => Some(candidate),
        })
        .copied()
}

/// Finds the best pool for a pair by probing candidate fee tiers.
pub struct VenueSelector<R> {
    reader: R,
    config: DiscoveryConfig,
}

impl<R: PoolStateReader> VenueSelector<R> {
    #[must_use]
    pub fn new(reader: R, config: DiscoveryConfig) -> Self {
        Self { reader, config }
    }

    #[must_use]
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Query one pool's state under the configured timeout.
    pub async fn probe(&self, manager: Address, key: PoolKey) -> TierProbe {
        let timeout = self.config.query_timeout();
        let pool_id = key.id();
        let query = async {
            let slot0 = self.reader.get_slot0(manager, pool_id).await?;
            let liquidity = self.reader.get_liquidity(manager, pool_id).await?;
            Ok::<_, ChainError>(VenueState {
                sqrt_price_x96: slot0.sqrt_price_x96,
                tick: slot0.tick,
                liquidity,
            })
        };

        match tokio::time::timeout(timeout, query).await {
            Ok(Ok(state)) if state.is_liquid() => {
                tracing::debug!(
                    venue = %pool_id,
                    tier = %key.tier(),
                    liquidity = %format_units(
                        U256::from(state.liquidity),
                        constants::LIQUIDITY_DISPLAY_DECIMALS
                    ),
                    "Found pool"
                );
                TierProbe::Found(Venue::new(key, state))
            }
            Ok(Ok(state)) => TierProbe::NotFound { key, state },
            Ok(Err(error)) => {
                tracing::debug!(venue = %pool_id, tier = %key.tier(), %error, "Pool query failed");
                TierProbe::QueryError { key, error }
            }
            Err(_) => {
                tracing::warn!(venue = %pool_id, tier = %key.tier(), "Pool query timed out");
                TierProbe::QueryError {
                    key,
                    error: ChainError::Timeout {
                        ms: duration_ms(timeout),
                    },
                }
            }
        }
    }

    /// Probe every tier concurrently. Results keep the order of `tiers`.
    pub async fn probe_tiers(
        &self,
        manager: Address,
        token_a: Address,
        token_b: Address,
        tiers: &[FeeTier],
    ) -> Vec<TierProbe> {
        join_all(
            tiers
                .iter()
                .map(|tier| self.probe(manager, PoolKey::new(token_a, token_b, *tier))),
        )
        .await
    }

    /// Best venue among `tiers`, or `None` for an empty market.
    pub async fn find_best_venue(
        &self,
        manager: Address,
        token_a: Address,
        token_b: Address,
        tiers: &[FeeTier],
    ) -> Option<Venue> {
        let probes = self.probe_tiers(manager, token_a, token_b, tiers).await;
        let best = select_best(&probes);
        match &best {
            Some(venue) => tracing::info!(
                venue = %venue.id,
                tier = %venue.key.tier(),
                liquidity = %venue.state.liquidity,
                "Best pool selected"
            ),
            None => tracing::info!(
                currency0 = %probes.first().map_or(token_a, |p| p.key().currency0),
                currency1 = %probes.first().map_or(token_b, |p| p.key().currency1),
                "No pools found"
            ),
        }
        best
    }

    /// [`Self::find_best_venue`] over the configured tiers.
    pub async fn find_best_configured(
        &self,
        manager: Address,
        token_a: Address,
        token_b: Address,
    ) -> Option<Venue> {
        self.find_best_venue(manager, token_a, token_b, &self.config.tiers)
            .await
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use alloy_primitives::{B256, address};

    use super::*;
    use crate::reader::Slot0;

    const MANAGER: Address = address!("05E73354cFDd6745C338b50BcFDfA3Aa6fA03408");
    const USDC: Address = address!("036CbD53842c5426634e7929541eC2318f3dCF7e");
    const WETH: Address = address!("4200000000000000000000000000000000000006");

    #[derive(Clone, Copy)]
    enum Pool {
        Live { liquidity: u128 },
        Uninitialized,
        Missing,
        Hang,
    }

    #[derive(Default)]
    struct MockReader {
        pools: Mutex<HashMap<B256, Pool>>,
        queries: AtomicUsize,
    }

    impl MockReader {
        fn with(pools: &[(FeeTier, Pool)]) -> Self {
            let reader = Self::default();
            {
                let mut map = reader.pools.lock().unwrap();
                for (tier, pool) in pools {
                    map.insert(PoolKey::new(USDC, WETH, *tier).id(), *pool);
                }
            }
            reader
        }

        fn lookup(&self, id: B256) -> Pool {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.pools
                .lock()
                .unwrap()
                .get(&id)
                .copied()
                .unwrap_or(Pool::Missing)
        }
    }

    impl PoolStateReader for MockReader {
        async fn get_slot0(&self, _manager: Address, pool_id: B256) -> Result<Slot0, ChainError> {
            match self.lookup(pool_id) {
                Pool::Live { .. } => Ok(Slot0 {
                    sqrt_price_x96: U256::from(1u64) << 96,
                    tick: 0,
                }),
                Pool::Uninitialized => Ok(Slot0 {
                    sqrt_price_x96: U256::ZERO,
                    tick: 0,
                }),
                Pool::Missing => Err(ChainError::NotFound(pool_id.to_string())),
                Pool::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(ChainError::Unreachable("hung".into()))
                }
            }
        }

        async fn get_liquidity(&self, _manager: Address, pool_id: B256) -> Result<u128, ChainError> {
            match self.lookup(pool_id) {
                Pool::Live { liquidity } => Ok(liquidity),
                _ => Ok(0),
            }
        }
    }

    fn selector(reader: MockReader) -> VenueSelector<MockReader> {
        VenueSelector::new(
            reader,
            DiscoveryConfig {
                query_timeout_ms: 50,
                ..DiscoveryConfig::default()
            },
        )
    }

    const A: FeeTier = FeeTier::new(500, 10);
    const B: FeeTier = FeeTier::new(3000, 60);

    #[tokio::test]
    async fn picks_most_liquid_tier() {
        let sel = selector(MockReader::with(&[
            (A, Pool::Live { liquidity: 10 }),
            (B, Pool::Live { liquidity: 50 }),
        ]));
        let venue = sel.find_best_venue(MANAGER, USDC, WETH, &[A, B]).await.unwrap();
        assert_eq!(venue.key.tier(), B);
        assert_eq!(venue.state.liquidity, 50);
        assert_eq!(venue.id, PoolKey::new(WETH, USDC, B).id());
    }

    #[tokio::test]
    async fn token_order_does_not_change_ids() {
        let sel = selector(MockReader::with(&[(A, Pool::Live { liquidity: 1 })]));
        let forward = sel.probe_tiers(MANAGER, USDC, WETH, &[A, B]).await;
        let backward = sel.probe_tiers(MANAGER, WETH, USDC, &[A, B]).await;
        let ids = |p: &[TierProbe]| p.iter().map(|t| t.key().id()).collect::<Vec<_>>();
        assert_eq!(ids(&forward), ids(&backward));
    }

    #[tokio::test]
    async fn zero_liquidity_never_selected() {
        let sel = selector(MockReader::with(&[(A, Pool::Live { liquidity: 0 })]));
        let probes = sel.probe_tiers(MANAGER, USDC, WETH, &[A]).await;
        assert!(matches!(probes[0], TierProbe::NotFound { .. }));
        assert!(sel.find_best_venue(MANAGER, USDC, WETH, &[A]).await.is_none());
    }

    #[tokio::test]
    async fn uninitialized_price_never_selected() {
        let sel = selector(MockReader::with(&[(A, Pool::Uninitialized)]));
        assert!(sel.find_best_venue(MANAGER, USDC, WETH, &[A]).await.is_none());
    }

    #[tokio::test]
    async fn failures_do_not_abort_other_tiers() {
        let sel = selector(MockReader::with(&[
            (A, Pool::Hang),
            (B, Pool::Live { liquidity: 7 }),
        ]));
        let c = FeeTier::new(10_000, 200);
        let probes = sel.probe_tiers(MANAGER, USDC, WETH, &[A, B, c]).await;
        assert!(matches!(
            probes[0],
            TierProbe::QueryError {
                error: ChainError::Timeout { ms: 50 },
                ..
            }
        ));
        assert!(matches!(probes[1], TierProbe::Found(_)));
        assert!(matches!(
            probes[2],
            TierProbe::QueryError {
                error: ChainError::NotFound(_),
                ..
            }
        ));
        assert_eq!(select_best(&probes).unwrap().state.liquidity, 7);
    }

    #[tokio::test]
    async fn ties_go_to_earliest_tier() {
        let sel = selector(MockReader::with(&[
            (A, Pool::Live { liquidity: 42 }),
            (B, Pool::Live { liquidity: 42 }),
        ]));
        let venue = sel.find_best_venue(MANAGER, USDC, WETH, &[A, B]).await.unwrap();
        assert_eq!(venue.key.tier(), A);
        let venue = sel.find_best_venue(MANAGER, USDC, WETH, &[B, A]).await.unwrap();
        assert_eq!(venue.key.tier(), B);
    }

    #[tokio::test]
    async fn empty_market_is_none() {
        let reader = MockReader::default();
        let sel = selector(reader);
        assert!(sel.find_best_configured(MANAGER, USDC, WETH).await.is_none());
        // every default tier was queried
        assert_eq!(sel.reader.queries.load(Ordering::SeqCst), 4);
    }
}
