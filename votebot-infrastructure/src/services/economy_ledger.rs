use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use votebot_domain::{GuildId, MemberId, RewardLedger};

pub const DEFAULT_UNBELIEVABOAT_API_URL: &str = "https://unbelievaboat.com/api/v1";

#[derive(Serialize)]
struct BalancePatch<'a> {
    cash: u64,
    reason: &'a str,
}

/// UnbelievaBoat economy: `PATCH /guilds/{guild}/users/{user}` adds to the
/// member's cash balance.
pub struct UnbelievaBoatLedger {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl UnbelievaBoatLedger {
    pub fn new(base_url: &str, token: &str, timeout_seconds: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds.max(1)))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl RewardLedger for UnbelievaBoatLedger {
    async fn credit(
        &self,
        guild_id: &GuildId,
        member_id: &MemberId,
        amount: u64,
        reason: &str,
    ) -> anyhow::Result<()> {
        let url = format!("{}/guilds/{}/users/{}", self.base_url, guild_id, member_id);
        let response = self
            .client
            .patch(&url)
            .header("Authorization", &self.token)
            .json(&BalancePatch { cash: amount, reason })
            .send()
            .await
            .with_context(|| format!("economy request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("economy api returned {}: {}", status, body.trim()));
        }
        debug!(member_id = %member_id, amount, "economy balance updated");
        Ok(())
    }
}
