use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use votebot_domain::ports::{
    AliasRepository, ChatPlatform, MetaStore, RankingSource, RewardLedger,
};
use votebot_domain::{AliasTable, GuildId, RuntimeConfig};

use crate::{AppError, Metrics};

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub meta_store: Arc<dyn MetaStore>,
    pub ranking_source: Arc<dyn RankingSource>,
    pub chat: Arc<dyn ChatPlatform>,
    pub alias_repo: Arc<dyn AliasRepository>,
    /// `None` when no economy token is configured; diamonds are then paid by hand.
    pub reward_ledger: Option<Arc<dyn RewardLedger>>,
    pub aliases: Arc<RwLock<AliasTable>>,
    pub metrics: Arc<Metrics>,
    /// Held for the whole of a monthly cycle.
    pub cycle_guard: Arc<Mutex<()>>,
}

impl AppState {
    /// The bot serves the configured guild only; an explicit request for any
    /// other guild is rejected rather than posted to the wrong channel.
    pub fn guild_for(&self, requested: Option<&str>) -> Result<GuildId, AppError> {
        match requested.map(str::trim).filter(|value| !value.is_empty()) {
            None => Ok(self.config.guild_id.clone()),
            Some(value) if value == self.config.guild_id.as_str() => Ok(self.config.guild_id.clone()),
            Some(value) => Err(AppError::BadRequest(format!("unknown guild '{}'", value))),
        }
    }
}
