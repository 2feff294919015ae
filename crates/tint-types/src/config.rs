//! Static per-network configuration: RPC endpoint, contract addresses and
//! the tokens each network supports.

use std::{collections::BTreeMap, path::Path, time::Duration};

use alloy_primitives::{Address, address};
use serde::{Deserialize, Serialize};

use crate::{FeeTier, Result, TintError, constants};

/// One configured token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub address: Address,
    pub decimals: u8,
}

/// Addresses and tokens for one network.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    /// Swap router: spender of approvals, entry point for swaps and redeems.
    pub router: Address,
    /// Pool manager: pool state and claim ledger.
    pub pool_manager: Address,
    /// Tokens keyed by uppercase symbol.
    pub tokens: BTreeMap<String, TokenConfig>,
}

impl NetworkConfig {
    /// Look up a token by symbol (case-insensitive).
    pub fn token(&self, symbol: &str) -> Result<TokenConfig> {
        self.tokens
            .get(&symbol.to_ascii_uppercase())
            .copied()
            .ok_or_else(|| TintError::UnsupportedToken {
                network: self.name.clone(),
                symbol: symbol.to_string(),
            })
    }

    /// Resolve both sides of a swap.
    pub fn pair(&self, from: &str, to: &str) -> Result<(TokenConfig, TokenConfig)> {
        Ok((self.token(from)?, self.token(to)?))
    }

    fn normalized(mut self) -> Self {
        self.tokens = std::mem::take(&mut self.tokens)
            .into_iter()
            .map(|(symbol, token)| (symbol.to_ascii_uppercase(), token))
            .collect();
        self
    }
}

/// All configured networks, keyed by lowercase name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkRegistry {
    pub networks: BTreeMap<String, NetworkConfig>,
}

impl NetworkRegistry {
    /// Look up a network by name (case-insensitive).
    pub fn network(&self, name: &str) -> Result<&NetworkConfig> {
        self.networks
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| TintError::UnknownNetwork(name.to_string()))
    }

    /// Look up a token on a network.
    pub fn token(&self, network: &str, symbol: &str) -> Result<TokenConfig> {
        self.network(network)?.token(symbol)
    }

    /// Parse a registry from JSON, normalizing key case.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Self = serde_json::from_str(json)?;
        let networks = raw
            .networks
            .into_iter()
            .map(|(name, cfg)| (name.to_ascii_lowercase(), cfg.normalized()))
            .collect::<BTreeMap<_, _>>();
        if networks.is_empty() {
            return Err(TintError::Configuration("no networks configured".into()));
        }
        Ok(Self { networks })
    }

    /// Load a registry from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// The Sepolia testnet deployments (Base, Arbitrum, Ethereum).
    #[must_use]
    pub fn testnets() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(
            "base".to_string(),
            testnet(
                "base",
                84_532,
                "https://sepolia.base.org",
                address!("3213d0d87bc3215dac5719db385aaf094b8c4a32"),
                address!("05E73354cFDd6745C338b50BcFDfA3Aa6fA03408"),
                address!("036CbD53842c5426634e7929541eC2318f3dCF7e"),
                address!("4200000000000000000000000000000000000006"),
            ),
        );
        networks.insert(
            "arbitrum".to_string(),
            testnet(
                "arbitrum",
                421_614,
                "https://sepolia-rollup.arbitrum.io/rpc",
                address!("72166b1ec9da1233cec8d742abc9890608ba4097"),
                address!("FB3e0C6F74eB1a21CC1Da29aeC80D2Dfe6C9a317"),
                address!("75faf114eafb1BDbe2F0316DF893fd58CE46AA4d"),
                address!("802CC0F559eBc79DA798bf3F3baB44141a1a06Ed"),
            ),
        );
        networks.insert(
            "ethereum".to_string(),
            testnet(
                "ethereum",
                11_155_111,
                "https://1rpc.io/sepolia",
                address!("d42d0554eb98163fe5915031183441745ead65a9"),
                address!("E03A1074c86CFeDd5C142C4F04F1a1536e203543"),
                address!("1c7D4B196Cb0C7B01d743Fbc6116a902379C7238"),
                address!("fFf9976782d46CC05630D1f6eBAb18b2324d6B14"),
            ),
        );
        Self { networks }
    }
}

fn testnet(
    name: &str,
    chain_id: u64,
    rpc_url: &str,
    router: Address,
    pool_manager: Address,
    usdc: Address,
    weth: Address,
) -> NetworkConfig {
    let usdc = TokenConfig {
        address: usdc,
        decimals: 6,
    };
    let weth = TokenConfig {
        address: weth,
        decimals: 18,
    };
    NetworkConfig {
        name: name.to_string(),
        chain_id,
        rpc_url: rpc_url.to_string(),
        router,
        pool_manager,
        tokens: BTreeMap::from([
            ("USDC".to_string(), usdc),
            ("WETH".to_string(), weth),
            // Native ETH settles as WETH.
            ("ETH".to_string(), weth),
        ]),
    }
}

/// Venue discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryConfig {
    /// Candidate tiers in evaluation order; earlier tiers win ties.
    pub tiers: Vec<FeeTier>,
    /// Per-tier query timeout in milliseconds.
    pub query_timeout_ms: u64,
}

impl DiscoveryConfig {
    #[must_use]
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            tiers: constants::DEFAULT_FEE_TIERS.to_vec(),
            query_timeout_ms: constants::DEFAULT_QUERY_TIMEOUT_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testnets_resolve_tokens() {
        let reg = NetworkRegistry::testnets();
        let base = reg.network("Base").unwrap();
        assert_eq!(base.chain_id, 84_532);
        let usdc = base.token("usdc").unwrap();
        assert_eq!(usdc.decimals, 6);
        assert_eq!(base.token("ETH").unwrap(), base.token("WETH").unwrap());
    }

    #[test]
    fn unknown_network_is_configuration_error() {
        let reg = NetworkRegistry::testnets();
        let err = reg.network("optimism").unwrap_err();
        assert!(matches!(err, TintError::UnknownNetwork(n) if n == "optimism"));
    }

    #[test]
    fn unsupported_token() {
        let reg = NetworkRegistry::testnets();
        let err = reg.token("arbitrum", "DAI").unwrap_err();
        assert!(matches!(err, TintError::UnsupportedToken { .. }));
        let base = reg.network("base").unwrap();
        assert!(base.pair("WETH", "DOGE").is_err());
    }

    #[test]
    fn json_roundtrip_normalizes_case() {
        let mut reg = NetworkRegistry::testnets();
        let mut base = reg.networks.remove("base").unwrap();
        let usdc = base.tokens.remove("USDC").unwrap();
        base.tokens.insert("usdc".into(), usdc);
        reg.networks.insert("BASE".into(), base);

        let json = serde_json::to_string(&reg).unwrap();
        let back = NetworkRegistry::from_json(&json).unwrap();
        assert!(back.network("base").is_ok());
        assert_eq!(back.token("base", "USDC").unwrap(), usdc);
    }

    #[test]
    fn empty_registry_rejected() {
        let err = NetworkRegistry::from_json(r#"{"networks":{}}"#).unwrap_err();
        assert!(matches!(err, TintError::Configuration(_)));
        let err = NetworkRegistry::from_json("not json").unwrap_err();
        assert!(matches!(err, TintError::Serialization(_)));
    }

    #[test]
    fn discovery_defaults() {
        let cfg = DiscoveryConfig::default();
        assert_eq!(cfg.tiers.len(), 4);
        assert_eq!(cfg.query_timeout(), Duration::from_secs(5));
    }
}
