//! Batch netting of opposing intents.
//!
//! Given the revealed sell and buy amounts of one batch, computes the single
//! residual that still has to trade on-chain:
//!
//! ```text
//! residual      = |total_sell - total_buy|
//! netted_volume = total_sell + total_buy - residual
//! efficiency    = netted_volume / (total_sell + total_buy)     (0 when empty)
//! ```
//!
//! Totals are accumulated in 512 bits so that summing full-range 256-bit
//! token amounts never truncates. The reduction is pure and the result does
//! not depend on input order.

use alloy_primitives::{U256, U512};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tint_types::constants::BPS_SCALE;

/// Which side the residual is on. Ties report `Buy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NetDirection {
    Sell,
    Buy,
}

impl std::fmt::Display for NetDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sell => write!(f, "SELL"),
            Self::Buy => write!(f, "BUY"),
        }
    }
}

/// Result of netting one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetResult {
    pub total_sell: U512,
    pub total_buy: U512,
    pub residual: U512,
    pub direction: NetDirection,
    pub netted_volume: U512,
    pub total_volume: U512,
    /// `floor(netted_volume * 10_000 / total_volume)`, 0 for an empty batch.
    pub efficiency_bps: u64,
}

impl NetResult {
    /// Efficiency as a ratio in `[0, 1]` with four decimal places.
    #[must_use]
    pub fn efficiency(&self) -> Decimal {
        Decimal::new(bps_i64(self.efficiency_bps), 4)
    }

    /// Efficiency as a percentage with two decimal places (`57.14`).
    #[must_use]
    pub fn efficiency_percent(&self) -> Decimal {
        Decimal::new(bps_i64(self.efficiency_bps), 2)
    }

    /// The residual as an on-chain amount, if it fits in 256 bits.
    #[must_use]
    pub fn residual_amount(&self) -> Option<U256> {
        narrow(self.residual)
    }

    /// Nothing left to trade on-chain.
    #[must_use]
    pub fn fully_netted(&self) -> bool {
        self.residual.is_zero()
    }
}

fn bps_i64(bps: u64) -> i64 {
    // bps never exceeds BPS_SCALE
    i64::try_from(bps).unwrap_or(i64::MAX)
}

fn widen(value: U256) -> U512 {
    U512::from_limbs_slice(value.as_limbs())
}

fn narrow(value: U512) -> Option<U256> {
    U256::try_from_be_slice(&value.to_be_bytes::<64>())
}

fn total(amounts: &[U256]) -> U512 {
    amounts
        .iter()
        .fold(U512::ZERO, |acc, amount| acc + widen(*amount))
}

/// Reduce a batch of revealed sell and buy amounts to one residual.
#[must_use]
pub fn compute_net_position(sell_amounts: &[U256], buy_amounts: &[U256]) -> NetResult {
    let total_sell = total(sell_amounts);
    let total_buy = total(buy_amounts);

    let (residual, direction) = if total_sell > total_buy {
        (total_sell - total_buy, NetDirection::Sell)
    } else {
        (total_buy - total_sell, NetDirection::Buy)
    };

    let total_volume = total_sell + total_buy;
    let netted_volume = total_volume - residual;
    let efficiency_bps = if total_volume.is_zero() {
        0
    } else {
        let bps = netted_volume * U512::from(BPS_SCALE) / total_volume;
        u64::try_from(bps).unwrap_or(BPS_SCALE)
    };

    tracing::debug!(
        sells = sell_amounts.len(),
        buys = buy_amounts.len(),
        residual = %residual,
        direction = %direction,
        efficiency_bps,
        "Batch netted"
    );

    NetResult {
        total_sell,
        total_buy,
        residual,
        direction,
        netted_volume,
        total_volume,
        efficiency_bps,
    }
}

#[cfg(test)]
mod tests {
    use rand::seq::SliceRandom;

    use super::*;

    fn amounts(values: &[u64]) -> Vec<U256> {
        values.iter().map(|v| U256::from(*v)).collect()
    }

    #[test]
    fn empty_batch() {
        let r = compute_net_position(&[], &[]);
        assert!(r.residual.is_zero());
        assert_eq!(r.efficiency_bps, 0);
        assert_eq!(r.efficiency(), Decimal::ZERO);
        assert_eq!(r.direction, NetDirection::Buy);
        assert!(r.fully_netted());
    }

    #[test]
    fn sell_heavy_batch() {
        let r = compute_net_position(&amounts(&[100]), &amounts(&[40]));
        assert_eq!(r.total_sell, U512::from(100u64));
        assert_eq!(r.total_buy, U512::from(40u64));
        assert_eq!(r.residual, U512::from(60u64));
        assert_eq!(r.direction, NetDirection::Sell);
        assert_eq!(r.netted_volume, U512::from(80u64));
        assert_eq!(r.efficiency_bps, 5714);
        assert_eq!(r.efficiency(), Decimal::new(5714, 4));
        assert_eq!(r.efficiency_percent().to_string(), "57.14");
        assert_eq!(r.residual_amount(), Some(U256::from(60u64)));
    }

    #[test]
    fn tie_defaults_to_buy_with_full_efficiency() {
        let r = compute_net_position(&amounts(&[30, 20]), &amounts(&[50]));
        assert_eq!(r.direction, NetDirection::Buy);
        assert!(r.fully_netted());
        assert_eq!(r.efficiency_bps, BPS_SCALE);
        assert_eq!(r.efficiency(), Decimal::ONE);
    }

    #[test]
    fn one_sided_batch_has_zero_efficiency() {
        let r = compute_net_position(&[], &amounts(&[10, 5]));
        assert_eq!(r.direction, NetDirection::Buy);
        assert_eq!(r.residual, U512::from(15u64));
        assert_eq!(r.efficiency_bps, 0);
    }

    #[test]
    fn full_range_amounts_do_not_truncate() {
        let r = compute_net_position(&[U256::MAX, U256::MAX], &[U256::MAX]);
        assert_eq!(r.residual_amount(), Some(U256::MAX));
        assert!(r.total_sell > widen(U256::MAX));
        assert_eq!(r.efficiency_bps, 6666);

        let r = compute_net_position(&[U256::MAX, U256::MAX], &[]);
        assert_eq!(r.residual_amount(), None);
    }

    #[test]
    fn residual_bounded_and_efficiency_in_range() {
        let mut rng = rand::thread_rng();
        for _ in 0..64 {
            let sells: Vec<U256> = (0..rand::random::<u8>() % 8)
                .map(|_| U256::from(rand::random::<u64>()))
                .collect();
            let buys: Vec<U256> = (0..rand::random::<u8>() % 8)
                .map(|_| U256::from(rand::random::<u64>()))
                .collect();
            let r = compute_net_position(&sells, &buys);
            assert!(r.residual <= r.total_sell.max(r.total_buy));
            assert!(r.efficiency_bps <= BPS_SCALE);

            let mut shuffled_sells = sells.clone();
            let mut shuffled_buys = buys.clone();
            shuffled_sells.shuffle(&mut rng);
            shuffled_buys.shuffle(&mut rng);
            assert_eq!(compute_net_position(&shuffled_sells, &shuffled_buys), r);
        }
    }

    #[test]
    fn inputs_untouched() {
        let sells = amounts(&[3, 1, 2]);
        let before = sells.clone();
        let _ = compute_net_position(&sells, &[]);
        assert_eq!(sells, before);
    }
}
