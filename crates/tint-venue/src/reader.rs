//! Read-only access to pool state held by the pool manager.

use std::future::Future;

use alloy_primitives::{Address, B256, U256};
use tint_types::ChainError;

/// Price slot of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot0 {
    pub sqrt_price_x96: U256,
    pub tick: i32,
}

/// Pool state queries. Both calls are pure reads and fail when the pool
/// does not exist or the node cannot be reached.
pub trait PoolStateReader {
    fn get_slot0(
        &self,
        manager: Address,
        pool_id: B256,
    ) -> impl Future<Output = Result<Slot0, ChainError>> + Send;

    fn get_liquidity(
        &self,
        manager: Address,
        pool_id: B256,
    ) -> impl Future<Output = Result<u128, ChainError>> + Send;
}

impl<T: PoolStateReader + Sync + ?Sized> PoolStateReader for &T {
    fn get_slot0(
        &self,
        manager: Address,
        pool_id: B256,
    ) -> impl Future<Output = Result<Slot0, ChainError>> + Send {
        (**self).get_slot0(manager, pool_id)
    }

    fn get_liquidity(
        &self,
        manager: Address,
        pool_id: B256,
    ) -> impl Future<Output = Result<u128, ChainError>> + Send {
        (**self).get_liquidity(manager, pool_id)
    }
}
