use async_trait::async_trait;

use crate::entities::{GuildMember, OutgoingMessage, RankedPlayer};
use crate::errors::FetchError;
use crate::value_objects::{ChannelId, GuildId, MemberId};

#[async_trait]
pub trait RankingSource: Send + Sync {
    /// Ranking sorted by votes descending, ties in payload order.
    async fn fetch_ranking(&self, url: &str) -> Result<Vec<RankedPlayer>, FetchError>;
}

#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Full membership of the guild, every page.
    async fn list_members(&self, guild_id: &GuildId) -> anyhow::Result<Vec<GuildMember>>;
    async fn send_message(
        &self,
        channel_id: &ChannelId,
        message: &OutgoingMessage,
    ) -> anyhow::Result<()>;
}

/// Server economy holding the members' diamond balances.
#[async_trait]
pub trait RewardLedger: Send + Sync {
    /// Adds `amount` to the member's cash balance.
    async fn credit(
        &self,
        guild_id: &GuildId,
        member_id: &MemberId,
        amount: u64,
        reason: &str,
    ) -> anyhow::Result<()>;
}
