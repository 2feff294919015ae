//! System-wide constants for the TINT pipeline.

use alloy_primitives::{Address, U256};

use crate::FeeTier;

/// Hook identifier for pools without hooks.
pub const NO_HOOKS: Address = Address::ZERO;

/// Standard fee tiers, lowest fee first. Discovery iterates in this order,
/// so the lowest fee wins exact liquidity ties.
pub const DEFAULT_FEE_TIERS: [FeeTier; 4] = [
    FeeTier::new(100, 1),
    FeeTier::new(500, 10),
    FeeTier::new(3000, 60),
    FeeTier::new(10_000, 200),
];

/// `MIN_SQRT_PRICE + 1`: price limit for token0 → token1 swaps.
pub const MIN_SQRT_PRICE_LIMIT: U256 = U256::from_limbs([4_295_128_740, 0, 0, 0]);

/// `MAX_SQRT_PRICE - 1`: price limit for token1 → token0 swaps.
/// Decimal value 1461446703485210103287273052203988822378723970341.
pub const MAX_SQRT_PRICE_LIMIT: U256 = U256::from_limbs([
    6_743_328_256_752_651_557,
    17_280_870_778_742_802_505,
    4_294_805_859,
    0,
]);

/// Default per-tier pool query timeout in milliseconds.
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5_000;

/// Default maximum number of intents kept by the in-memory store.
pub const DEFAULT_INTENT_STORE_CAPACITY: usize = 10_000;

/// Decimals used when logging pool liquidity in human units.
pub const LIQUIDITY_DISPLAY_DECIMALS: u8 = 18;

/// Basis-point scale used for netting efficiency.
pub const BPS_SCALE: u64 = 10_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
