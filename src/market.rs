//! Share purchases and subscription upgrades
//!
//! A [`PurchaseIntent`] exists only for the duration of the purchase
//! interaction: it validates the requested share count and computes the
//! total cost before anything touches the network. Invalid input is
//! rejected locally with [`SoundShareError::InvalidInput`]; no wallet or
//! RPC call is made for a rejected intent.

use crate::catalog::Track;
use crate::codec::{format_token_amount, Felt, Uint256};
use crate::error::SoundShareError;
use crate::gateway::{MusicContract, SubscriptionContract};
use crate::provider::{AccountApi, TxHash};
use crate::Result;

/// Transient purchase state: track, share count, computed total cost.
#[derive(Clone, Debug)]
pub struct PurchaseIntent {
    pub song_id: Felt,
    pub share_count: u64,
    pub total_cost: Uint256,
}

impl PurchaseIntent {
    /// Validate a raw share-count input against a track.
    ///
    /// Rejects non-numeric and non-positive counts, and cost overflow,
    /// before any network call is made.
    pub fn new(track: &Track, shares_input: &str) -> Result<Self> {
        let share_count: u64 = shares_input.trim().parse().map_err(|_| {
            SoundShareError::invalid_input(format!(
                "share count must be a positive number, got {:?}",
                shares_input
            ))
        })?;
        if share_count == 0 {
            return Err(SoundShareError::invalid_input(
                "share count must be greater than zero",
            ));
        }

        let total_cost = track
            .price_per_share
            .checked_mul_u64(share_count)
            .ok_or_else(|| SoundShareError::invalid_input("total cost overflows 256 bits"))?;

        Ok(Self {
            song_id: track.id,
            share_count,
            total_cost,
        })
    }

    /// Total cost divided by 10^18, 4 decimal digits.
    pub fn cost_display(&self) -> String {
        format_token_amount(&self.total_cost)
    }
}

/// Confirmed purchase outcome.
#[derive(Clone, Debug)]
pub struct PurchaseReceipt {
    pub tx_hash: TxHash,
    pub share_count: u64,
}

/// Subscription tiers, mapped to on-chain tier ids 0..3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriptionTier {
    Free,
    Basic,
    Premium,
    Ultimate,
}

impl SubscriptionTier {
    pub fn tier_id(&self) -> u64 {
        match self {
            Self::Free => 0,
            Self::Basic => 1,
            Self::Premium => 2,
            Self::Ultimate => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Basic => "Basic",
            Self::Premium => "Premium",
            Self::Ultimate => "Ultimate",
        }
    }

    /// Monthly price in whole tokens
    pub fn price_tokens(&self) -> u64 {
        match self {
            Self::Free => 0,
            Self::Basic => 50,
            Self::Premium => 100,
            Self::Ultimate => 150,
        }
    }
}

/// Marketplace write flows over the music and subscription contracts.
#[derive(Clone)]
pub struct Marketplace {
    music: MusicContract,
    subscription: SubscriptionContract,
}

impl Marketplace {
    pub fn new(music: MusicContract, subscription: SubscriptionContract) -> Self {
        Self { music, subscription }
    }

    /// Submit a validated purchase and block on confirmation.
    pub async fn buy_shares(
        &self,
        account: &dyn AccountApi,
        intent: &PurchaseIntent,
    ) -> Result<PurchaseReceipt> {
        log::info!(
            "Purchasing {} shares of song {} for {}",
            intent.share_count,
            intent.song_id,
            intent.cost_display()
        );
        let tx_hash = self
            .music
            .buy_shares(account, intent.song_id, intent.share_count, &intent.total_cost)
            .await?;
        Ok(PurchaseReceipt {
            tx_hash,
            share_count: intent.share_count,
        })
    }

    /// Upgrade the subscription tier and block on confirmation.
    pub async fn upgrade_subscription(
        &self,
        account: &dyn AccountApi,
        tier: SubscriptionTier,
    ) -> Result<TxHash> {
        log::info!("Upgrading subscription to {} plan", tier.name());
        self.subscription.upgrade(account, tier.tier_id()).await
    }
}
