//! Narrow on-chain collaborator interfaces used by settlement.
//!
//! State-changing calls return the transaction hash as soon as the
//! transaction is accepted by the node; [`TxConfirmer::wait_for_receipt`]
//! suspends until it is mined. Nothing here retries.

use std::future::Future;

use alloy_primitives::{Address, B256, I256, U256};
use tint_types::{ChainError, PoolKey, SettlementFlags, SwapParams, TxReceipt};

/// ERC-20 style token access for the executing account.
pub trait TokenClient {
    fn decimals(&self, token: Address) -> impl Future<Output = Result<u8, ChainError>> + Send;

    fn balance_of(
        &self,
        token: Address,
        account: Address,
    ) -> impl Future<Output = Result<U256, ChainError>> + Send;

    fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> impl Future<Output = Result<U256, ChainError>> + Send;

    fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> impl Future<Output = Result<B256, ChainError>> + Send;

    fn transfer(
        &self,
        token: Address,
        to: Address,
        amount: U256,
    ) -> impl Future<Output = Result<B256, ChainError>> + Send;
}

/// A swap accepted by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedSwap {
    pub tx_hash: B256,
    /// Balance delta the router reports. Informational only.
    pub reported_delta: I256,
}

/// The swap entry point, executed by the authorized account.
pub trait SwapRouter {
    fn swap(
        &self,
        router: Address,
        key: PoolKey,
        params: SwapParams,
        flags: SettlementFlags,
        hook_data: Vec<u8>,
    ) -> impl Future<Output = Result<SubmittedSwap, ChainError>> + Send;
}

/// Internal claim balances held by the pool manager.
pub trait ClaimLedger {
    fn claim_balance(
        &self,
        manager: Address,
        owner: Address,
        token_id: U256,
    ) -> impl Future<Output = Result<U256, ChainError>> + Send;

    /// Burn `amount` of claims on `currency` for real tokens.
    fn redeem(
        &self,
        router: Address,
        currency: Address,
        amount: U256,
    ) -> impl Future<Output = Result<B256, ChainError>> + Send;
}

/// Waits for a submitted transaction to be mined.
pub trait TxConfirmer {
    fn wait_for_receipt(
        &self,
        tx_hash: B256,
    ) -> impl Future<Output = Result<TxReceipt, ChainError>> + Send;
}

// Shared references delegate, so one client can back the selector, the
// executor and the redeemer at once.

impl<T: TokenClient + Sync + ?Sized> TokenClient for &T {
    fn decimals(&self, token: Address) -> impl Future<Output = Result<u8, ChainError>> + Send {
        (**self).decimals(token)
    }

    fn balance_of(
        &self,
        token: Address,
        account: Address,
    ) -> impl Future<Output = Result<U256, ChainError>> + Send {
        (**self).balance_of(token, account)
    }

    fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> impl Future<Output = Result<U256, ChainError>> + Send {
        (**self).allowance(token, owner, spender)
    }

    fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> impl Future<Output = Result<B256, ChainError>> + Send {
        (**self).approve(token, spender, amount)
    }

    fn transfer(
        &self,
        token: Address,
        to: Address,
        amount: U256,
    ) -> impl Future<Output = Result<B256, ChainError>> + Send {
        (**self).transfer(token, to, amount)
    }
}

impl<T: SwapRouter + Sync + ?Sized> SwapRouter for &T {
    fn swap(
        &self,
        router: Address,
        key: PoolKey,
        params: SwapParams,
        flags: SettlementFlags,
        hook_data: Vec<u8>,
    ) -> impl Future<Output = Result<SubmittedSwap, ChainError>> + Send {
        (**self).swap(router, key, params, flags, hook_data)
    }
}

impl<T: ClaimLedger + Sync + ?Sized> ClaimLedger for &T {
    fn claim_balance(
        &self,
        manager: Address,
        owner: Address,
        token_id: U256,
    ) -> impl Future<Output = Result<U256, ChainError>> + Send {
        (**self).claim_balance(manager, owner, token_id)
    }

    fn redeem(
        &self,
        router: Address,
        currency: Address,
        amount: U256,
    ) -> impl Future<Output = Result<B256, ChainError>> + Send {
        (**self).redeem(router, currency, amount)
    }
}

impl<T: TxConfirmer + Sync + ?Sized> TxConfirmer for &T {
    fn wait_for_receipt(
        &self,
        tx_hash: B256,
    ) -> impl Future<Output = Result<TxReceipt, ChainError>> + Send {
        (**self).wait_for_receipt(tx_hash)
    }
}

/// Claim token id of a currency: `uint256(uint160(currency))`.
#[must_use]
pub fn claim_token_id(currency: Address) -> U256 {
    U256::from_be_bytes(currency.into_word().0)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    #[test]
    fn claim_id_is_address_as_integer() {
        let weth = address!("4200000000000000000000000000000000000006");
        assert_eq!(
            claim_token_id(weth),
            U256::from(0x42u64) << 152 | U256::from(6u64)
        );
        assert_eq!(claim_token_id(Address::ZERO), U256::ZERO);
    }
}
