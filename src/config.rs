//! Client configuration from environment variables
//!
//! Controls the target network, RPC endpoint, deployed contract addresses,
//! and the IPFS gateway/pinning endpoints. Defaults to Sepolia testnet.

use std::env;
use std::time::Duration;

use crate::codec::Felt;

/// Deployed music marketplace contract (testnet)
pub const DEFAULT_MUSIC_CONTRACT: &str =
    "0x008116e28d9b4767a530ec96d4c84ce31d0e5b157880bc589a58effd7203202c";

/// ETH token contract used for balances and share payments
pub const DEFAULT_TOKEN_CONTRACT: &str =
    "0x049d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7";

/// Subscription tier contract (testnet)
pub const DEFAULT_SUBSCRIPTION_CONTRACT: &str =
    "0x00356077b414bb3fda4f8ef1e44bc2a3fd7eb108b722eeeaec08917468c425bd";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Sepolia,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Target network
    pub network: Network,
    /// JSON-RPC endpoint for view calls
    pub rpc_url: String,
    /// Music marketplace contract address
    pub music_contract: Felt,
    /// ERC-20 token contract address (balances, payments)
    pub token_contract: Felt,
    /// Subscription contract address
    pub subscription_contract: Felt,
    /// IPFS gateway base URL for audio/artwork retrieval
    pub ipfs_gateway_url: String,
    /// Pinning API base URL for uploads
    pub pinning_api_url: String,
    /// Bearer token for the pinning API (optional; uploads fail without it)
    pub pinning_jwt: Option<String>,
    /// Balance poll interval
    pub balance_poll_interval: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `SOUNDSHARE_NETWORK`: "sepolia" (default) or "mainnet"
    /// - `SOUNDSHARE_RPC_URL`: JSON-RPC endpoint (has per-network defaults)
    /// - `SOUNDSHARE_MUSIC_CONTRACT`, `SOUNDSHARE_TOKEN_CONTRACT`,
    ///   `SOUNDSHARE_SUBSCRIPTION_CONTRACT`: deployed contract addresses
    /// - `SOUNDSHARE_IPFS_GATEWAY`: gateway base URL (default: ipfs.io)
    /// - `SOUNDSHARE_PINNING_URL` / `SOUNDSHARE_PINNING_JWT`: pinning API
    /// - `SOUNDSHARE_POLL_SECS`: balance poll interval (default: 30)
    pub fn from_env() -> Self {
        let network_str = env::var("SOUNDSHARE_NETWORK")
            .unwrap_or_else(|_| "sepolia".to_string())
            .to_lowercase();

        let network = match network_str.as_str() {
            "mainnet" => {
                log::info!("Using MAINNET network");
                Network::Mainnet
            }
            "sepolia" | "" => {
                log::info!("Using SEPOLIA network");
                Network::Sepolia
            }
            other => {
                log::warn!("Unknown network '{}', defaulting to Sepolia", other);
                Network::Sepolia
            }
        };

        let rpc_url = env::var("SOUNDSHARE_RPC_URL").unwrap_or_else(|_| {
            let default_url = match network {
                Network::Mainnet => "https://rpc.starknet.io",
                Network::Sepolia => "https://rpc.sepolia.starknet.io",
            };
            log::info!("RPC endpoint: {} (network default)", default_url);
            default_url.to_string()
        });

        let music_contract = addr_from_env("SOUNDSHARE_MUSIC_CONTRACT", DEFAULT_MUSIC_CONTRACT);
        let token_contract = addr_from_env("SOUNDSHARE_TOKEN_CONTRACT", DEFAULT_TOKEN_CONTRACT);
        let subscription_contract = addr_from_env(
            "SOUNDSHARE_SUBSCRIPTION_CONTRACT",
            DEFAULT_SUBSCRIPTION_CONTRACT,
        );

        let ipfs_gateway_url = env::var("SOUNDSHARE_IPFS_GATEWAY")
            .unwrap_or_else(|_| "https://ipfs.io/ipfs".to_string());

        let pinning_api_url = env::var("SOUNDSHARE_PINNING_URL")
            .unwrap_or_else(|_| "https://api.pinata.cloud".to_string());

        let pinning_jwt = env::var("SOUNDSHARE_PINNING_JWT").ok();
        if pinning_jwt.is_none() {
            log::info!("No pinning JWT configured; uploads will be rejected by the service");
        }

        let poll_secs = env::var("SOUNDSHARE_POLL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        Self {
            network,
            rpc_url,
            music_contract,
            token_contract,
            subscription_contract,
            ipfs_gateway_url,
            pinning_api_url,
            pinning_jwt,
            balance_poll_interval: Duration::from_secs(poll_secs),
        }
    }
}

fn addr_from_env(key: &str, default: &str) -> Felt {
    match env::var(key) {
        Ok(value) => match Felt::from_hex(&value) {
            Ok(felt) => felt,
            Err(e) => {
                log::warn!("Invalid address in {}: {}; using default", key, e);
                Felt::from_hex(default).expect("default contract address is valid hex")
            }
        },
        Err(_) => Felt::from_hex(default).expect("default contract address is valid hex"),
    }
}

impl Default for AppConfig {
    /// Default configuration (Sepolia)
    fn default() -> Self {
        Self {
            network: Network::Sepolia,
            rpc_url: "https://rpc.sepolia.starknet.io".to_string(),
            music_contract: Felt::from_hex(DEFAULT_MUSIC_CONTRACT).expect("valid default"),
            token_contract: Felt::from_hex(DEFAULT_TOKEN_CONTRACT).expect("valid default"),
            subscription_contract: Felt::from_hex(DEFAULT_SUBSCRIPTION_CONTRACT)
                .expect("valid default"),
            ipfs_gateway_url: "https://ipfs.io/ipfs".to_string(),
            pinning_api_url: "https://api.pinata.cloud".to_string(),
            pinning_jwt: None,
            balance_poll_interval: Duration::from_secs(30),
        }
    }
}
