use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use votebot_application::{AppState, Metrics};
use votebot_domain::{AliasRepository, DbConfig, MetaBackend, MetaStore, RewardLedger};
use votebot_infrastructure::{
    AliasFileRepository, AppConfig, ClickhouseMetaStore, DiscordPlatform, FileMetaStore,
    HttpRankingClient, UnbelievaBoatLedger,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config_path: Option<&str>) -> Result<Self> {
        let config = AppConfig::load(config_path).await?;
        let runtime_config = config.to_runtime_config()?;
        let db_config = config.to_db_config();
        info!(
            guild_id = %runtime_config.guild_id,
            results_channel_id = %runtime_config.results_channel_id,
            timezone = %runtime_config.timezone,
            meta_backend = ?db_config.meta_backend,
            api_token_set = runtime_config.api_token.is_some(),
            credits_enabled = config.unbelievaboat_token.is_some(),
            admin_log_channel_id = ?runtime_config.delivery.admin_log_channel_id,
            "config loaded"
        );

        let meta_store = build_meta_store(&db_config);
        meta_store
            .ensure_schema()
            .await
            .context("meta store is not usable")?;

        let alias_repo = Arc::new(AliasFileRepository::new());
        let mut aliases = runtime_config.aliases.clone();
        let file_aliases = alias_repo
            .load_aliases(&runtime_config.aliases_path)
            .await
            .with_context(|| format!("loading aliases from {}", runtime_config.aliases_path))?;
        aliases.extend(file_aliases);

        let reward_ledger = match config.unbelievaboat_token.as_deref() {
            Some(token) => Some(Arc::new(UnbelievaBoatLedger::new(
                &config.unbelievaboat_api_url,
                token,
                runtime_config.request_timeout_seconds,
            )?) as Arc<dyn RewardLedger>),
            None => None,
        };

        let state = AppState {
            meta_store,
            ranking_source: Arc::new(HttpRankingClient::new(
                runtime_config.request_timeout_seconds,
            )?),
            chat: Arc::new(DiscordPlatform::new(config.discord_token()?)),
            alias_repo,
            reward_ledger,
            aliases: Arc::new(RwLock::new(aliases)),
            metrics: Arc::new(Metrics::default()),
            cycle_guard: Arc::new(Mutex::new(())),
            config: runtime_config,
        };

        Ok(Self { state })
    }
}

fn build_meta_store(db_config: &DbConfig) -> Arc<dyn MetaStore> {
    match db_config.meta_backend {
        MetaBackend::File => Arc::new(FileMetaStore::new(&db_config.meta_path)),
        MetaBackend::Clickhouse => Arc::new(ClickhouseMetaStore::from_config(db_config)),
    }
}
