use serde::{Deserialize, Serialize};
use uuid::Uuid;

use votebot_domain::{GuildId, RankedPlayer};

use crate::commands::reward_commands::DeliveryReport;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleOutcome {
    Skipped { guild_id: GuildId, period: String },
    /// The ranking had no votes yet; nothing was posted and the month stays open.
    NoVotes { guild_id: GuildId, period: String },
    Announced(CycleSummary),
}

impl CycleOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, CycleOutcome::Skipped { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleSummary {
    pub cycle_id: Uuid,
    pub guild_id: GuildId,
    pub period: String,
    pub results_label: String,
    pub winners: usize,
    pub participants: usize,
    pub linked: usize,
    pub unresolved: usize,
    pub messages_sent: usize,
    pub delivery: DeliveryReport,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CycleRequest {
    #[serde(default)]
    pub guild_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingView {
    pub results_label: String,
    pub players: Vec<RankedPlayer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuildQuery {
    #[serde(default)]
    pub guild_id: Option<String>,
}
