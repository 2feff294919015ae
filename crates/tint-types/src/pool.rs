//! Pool keys, venue state and swap parameters.
//!
//! A venue is one liquidity pool identified by its canonically ordered token
//! pair, fee tier and tick spacing. Its identifier is the keccak-256 hash of
//! the ABI encoding of `(address, address, uint24, int24, address)`, i.e. five
//! 32-byte words, so two independently built keys for the same pair and tier
//! always yield the same id.

use alloy_primitives::{Address, B256, I256, U256, keccak256};
use serde::{Deserialize, Serialize};

use crate::constants;

/// A fee tier and the tick spacing that goes with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTier {
    /// Fee in hundredths of a basis point (3000 = 0.3%).
    pub fee: u32,
    pub tick_spacing: i32,
}

impl FeeTier {
    #[must_use]
    pub const fn new(fee: u32, tick_spacing: i32) -> Self {
        Self { fee, tick_spacing }
    }
}

impl std::fmt::Display for FeeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}%", self.fee / 10_000, (self.fee % 10_000) / 100)
    }
}

/// Canonical pool key. `currency0 < currency1` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolKey {
    pub currency0: Address,
    pub currency1: Address,
    pub fee: u32,
    pub tick_spacing: i32,
    pub hooks: Address,
}

impl PoolKey {
    /// Build the key for a token pair in either order.
    ///
    /// Addresses compare byte-wise, which is the same order as comparing
    /// their lowercase hex text.
    #[must_use]
    pub fn new(token_a: Address, token_b: Address, tier: FeeTier) -> Self {
        let (currency0, currency1) = sort_tokens(token_a, token_b);
        Self {
            currency0,
            currency1,
            fee: tier.fee,
            tick_spacing: tier.tick_spacing,
            hooks: constants::NO_HOOKS,
        }
    }

    #[must_use]
    pub fn tier(&self) -> FeeTier {
        FeeTier::new(self.fee, self.tick_spacing)
    }

    /// ABI encoding of the key tuple: five left-padded 32-byte words.
    #[must_use]
    pub fn abi_encode(&self) -> [u8; 160] {
        let mut out = [0u8; 160];
        out[12..32].copy_from_slice(self.currency0.as_slice());
        out[44..64].copy_from_slice(self.currency1.as_slice());
        out[64..96].copy_from_slice(&U256::from(self.fee).to_be_bytes::<32>());
        let fill = if self.tick_spacing < 0 { 0xff } else { 0x00 };
        out[96..124].fill(fill);
        out[124..128].copy_from_slice(&self.tick_spacing.to_be_bytes());
        out[140..160].copy_from_slice(self.hooks.as_slice());
        out
    }

    /// Deterministic venue identifier.
    #[must_use]
    pub fn id(&self) -> B256 {
        keccak256(self.abi_encode())
    }

    /// `true` when trading `token_in` moves token0 → token1.
    #[must_use]
    pub fn zero_for_one(&self, token_in: Address) -> bool {
        token_in == self.currency0
    }

    #[must_use]
    pub fn contains(&self, token: Address) -> bool {
        token == self.currency0 || token == self.currency1
    }
}

/// Order two tokens canonically (smaller address first).
#[must_use]
pub fn sort_tokens(token_a: Address, token_b: Address) -> (Address, Address) {
    if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}

/// Read-only snapshot of a pool's on-chain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueState {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub liquidity: u128,
}

impl VenueState {
    /// Price initialized and liquidity strictly positive.
    #[must_use]
    pub fn is_liquid(&self) -> bool {
        !self.sqrt_price_x96.is_zero() && self.liquidity > 0
    }
}

/// A discovered, liquid venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: B256,
    pub key: PoolKey,
    pub state: VenueState,
}

impl Venue {
    #[must_use]
    pub fn new(key: PoolKey, state: VenueState) -> Self {
        Self {
            id: key.id(),
            key,
            state,
        }
    }
}

/// Swap parameters handed to the trade collaborator.
///
/// A negative `amount_specified` means exact input; positive means exact
/// output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapParams {
    pub zero_for_one: bool,
    pub amount_specified: I256,
    pub sqrt_price_limit_x96: U256,
}

impl SwapParams {
    /// Exact-input parameters with the widest valid price limit for the
    /// direction, so the pool never reverts on its own limit check.
    #[must_use]
    pub fn exact_input(zero_for_one: bool, amount_in: I256) -> Self {
        Self {
            zero_for_one,
            amount_specified: -amount_in,
            sqrt_price_limit_x96: if zero_for_one {
                constants::MIN_SQRT_PRICE_LIMIT
            } else {
                constants::MAX_SQRT_PRICE_LIMIT
            },
        }
    }
}

/// How the swap's deltas are settled with the pool manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementFlags {
    /// Receive output as internal claims instead of tokens.
    pub take_claims: bool,
    /// Pay input by burning claims instead of transferring tokens.
    pub settle_using_burn: bool,
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    const USDC: Address = address!("036CbD53842c5426634e7929541eC2318f3dCF7e");
    const WETH: Address = address!("4200000000000000000000000000000000000006");

    #[test]
    fn key_is_canonical_in_either_order() {
        let tier = FeeTier::new(3000, 60);
        let a = PoolKey::new(USDC, WETH, tier);
        let b = PoolKey::new(WETH, USDC, tier);
        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());
        assert!(a.currency0 < a.currency1);
        assert_eq!(a.currency0, USDC);
    }

    #[test]
    fn ids_differ_by_tier() {
        let low = PoolKey::new(USDC, WETH, FeeTier::new(500, 10));
        let high = PoolKey::new(USDC, WETH, FeeTier::new(10_000, 200));
        assert_ne!(low.id(), high.id());
    }

    #[test]
    fn abi_words_are_left_padded() {
        let key = PoolKey::new(USDC, WETH, FeeTier::new(3000, 60));
        let enc = key.abi_encode();
        assert!(enc[..12].iter().all(|b| *b == 0));
        assert_eq!(&enc[12..32], USDC.as_slice());
        assert_eq!(&enc[94..96], &3000u16.to_be_bytes());
        assert_eq!(enc[127], 60);
        assert!(enc[128..].iter().all(|b| *b == 0));
    }

    #[test]
    fn negative_tick_spacing_is_sign_extended() {
        let mut key = PoolKey::new(USDC, WETH, FeeTier::new(3000, 60));
        key.tick_spacing = -1;
        let enc = key.abi_encode();
        assert!(enc[96..128].iter().all(|b| *b == 0xff));
    }

    #[test]
    fn direction_follows_canonical_order() {
        let key = PoolKey::new(WETH, USDC, FeeTier::new(3000, 60));
        assert!(key.zero_for_one(USDC));
        assert!(!key.zero_for_one(WETH));
    }

    #[test]
    fn exact_input_is_negative_with_extreme_limit() {
        let amount = I256::try_from(1_000_000i64).unwrap();
        let p = SwapParams::exact_input(true, amount);
        assert!(p.amount_specified.is_negative());
        assert_eq!(p.sqrt_price_limit_x96, constants::MIN_SQRT_PRICE_LIMIT);
        let p = SwapParams::exact_input(false, amount);
        assert_eq!(p.sqrt_price_limit_x96, constants::MAX_SQRT_PRICE_LIMIT);
    }

    #[test]
    fn liquid_requires_price_and_liquidity() {
        let mut s = VenueState {
            sqrt_price_x96: U256::from(1u64) << 96,
            tick: 0,
            liquidity: 1,
        };
        assert!(s.is_liquid());
        s.liquidity = 0;
        assert!(!s.is_liquid());
        s.liquidity = 1;
        s.sqrt_price_x96 = U256::ZERO;
        assert!(!s.is_liquid());
    }

    #[test]
    fn fee_tier_display() {
        assert_eq!(FeeTier::new(3000, 60).to_string(), "0.30%");
        assert_eq!(FeeTier::new(100, 1).to_string(), "0.01%");
        assert_eq!(FeeTier::new(10_000, 200).to_string(), "1.00%");
    }
}
