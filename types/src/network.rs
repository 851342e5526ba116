//! Cluster identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::address::Pubkey;
use crate::keys::Signature;

const EXPLORER_BASE: &str = "https://explorer.solana.com";

/// Identifies which cluster the client talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    /// The public development network (the default).
    #[default]
    Devnet,
    /// The public test network.
    Testnet,
    /// The production network.
    MainnetBeta,
    /// A local test validator.
    Localnet,
}

impl Cluster {
    /// Public JSON-RPC endpoint for this cluster.
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Self::Devnet => "https://api.devnet.solana.com",
            Self::Testnet => "https://api.testnet.solana.com",
            Self::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Self::Localnet => "http://127.0.0.1:8899",
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Devnet => "devnet",
            Self::Testnet => "testnet",
            Self::MainnetBeta => "mainnet-beta",
            Self::Localnet => "localnet",
        }
    }

    /// Query string the block explorer needs to show this cluster.
    fn explorer_query(&self) -> &'static str {
        match self {
            Self::Devnet => "?cluster=devnet",
            Self::Testnet => "?cluster=testnet",
            Self::MainnetBeta => "",
            Self::Localnet => "?cluster=custom&customUrl=http%3A%2F%2F127.0.0.1%3A8899",
        }
    }

    /// Block explorer page for a transaction.
    pub fn explorer_tx_url(&self, signature: &Signature) -> String {
        format!("{EXPLORER_BASE}/tx/{signature}{}", self.explorer_query())
    }

    /// Block explorer page for an account.
    pub fn explorer_address_url(&self, account: &Pubkey) -> String {
        format!("{EXPLORER_BASE}/address/{account}{}", self.explorer_query())
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cluster {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "devnet" | "d" => Ok(Self::Devnet),
            "testnet" | "t" => Ok(Self::Testnet),
            "mainnet-beta" | "mainnet" | "m" => Ok(Self::MainnetBeta),
            "localnet" | "localhost" | "l" => Ok(Self::Localnet),
            other => Err(format!("unknown cluster: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_devnet() {
        assert_eq!(Cluster::default(), Cluster::Devnet);
        assert_eq!(Cluster::default().rpc_url(), "https://api.devnet.solana.com");
    }

    #[test]
    fn explorer_links_carry_cluster() {
        let sig = Signature::new([3u8; 64]);
        let url = Cluster::Devnet.explorer_tx_url(&sig);
        assert!(url.starts_with("https://explorer.solana.com/tx/"));
        assert!(url.ends_with("?cluster=devnet"));
        assert!(!Cluster::MainnetBeta.explorer_tx_url(&sig).contains('?'));
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("mainnet".parse::<Cluster>(), Ok(Cluster::MainnetBeta));
        assert_eq!("Localhost".parse::<Cluster>(), Ok(Cluster::Localnet));
        assert!("moon".parse::<Cluster>().is_err());
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&Cluster::MainnetBeta).unwrap();
        assert_eq!(json, "\"mainnet-beta\"");
    }
}
