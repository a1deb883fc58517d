use std::env;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use votebot_domain::{
    AliasTable, ChannelId, DbConfig, DeliveryConfig, GuildId, ItemQuantity, MetaBackend,
    RewardTable, RewardTier, RuntimeConfig, ScheduleConfig, StyleConfig,
    DEFAULT_ITEM_COMMAND_TEMPLATE,
};

use crate::config::validation::{parse_timezone, validate_http_url, validate_snowflake};
use crate::services::DEFAULT_UNBELIEVABOAT_API_URL;

pub const DEFAULT_RANKING_URL: &str =
    "https://api.top-serveurs.net/v1/servers/4ROMAU33GJTY/players-ranking?type=lastMonth";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub discord_token: Option<String>,
    pub guild_id: String,
    pub results_channel_id: String,
    pub ranking_url: String,
    pub timezone: String,
    pub schedule_enabled: bool,
    pub announce_day_of_month: u32,
    pub announce_hour: u32,
    pub announce_minute: u32,
    pub diamonds_per_vote: u64,
    pub rewards: Vec<RewardTier>,
    pub aliases: AliasTable,
    pub aliases_path: String,
    pub style: StyleConfig,
    /// Enables automatic diamond credits when set.
    pub unbelievaboat_token: Option<String>,
    pub unbelievaboat_api_url: String,
    pub admin_log_channel_id: Option<String>,
    pub item_command_template: String,
    pub credit_reason: String,
    pub meta_backend: MetaBackend,
    pub meta_path: String,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            discord_token: None,
            guild_id: String::new(),
            results_channel_id: String::new(),
            ranking_url: DEFAULT_RANKING_URL.to_string(),
            timezone: "Europe/Paris".to_string(),
            schedule_enabled: true,
            announce_day_of_month: 1,
            announce_hour: 18,
            announce_minute: 0,
            diamonds_per_vote: 100,
            rewards: default_rewards(),
            aliases: AliasTable::new(),
            aliases_path: "./aliases.yaml".to_string(),
            style: StyleConfig::default(),
            unbelievaboat_token: None,
            unbelievaboat_api_url: DEFAULT_UNBELIEVABOAT_API_URL.to_string(),
            admin_log_channel_id: None,
            item_command_template: DEFAULT_ITEM_COMMAND_TEMPLATE.to_string(),
            credit_reason: "Récompense votes mensuels".to_string(),
            meta_backend: MetaBackend::File,
            meta_path: "./data/meta.json".to_string(),
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "votebot".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

/// Monthly prizes: item lots for the podium, flat diamonds for 4th and 5th.
pub fn default_rewards() -> Vec<RewardTier> {
    let lot = |rank: u32, scale: u64, ticket: &str, diamonds: u64| RewardTier {
        rank,
        items: vec![
            ItemQuantity::new("🦖", 2 * scale),
            ItemQuantity::new("🎨", 2 * scale),
            ItemQuantity::new(ticket, 1),
            ItemQuantity::new("🍓", diamonds),
        ],
        diamonds: Some(diamonds),
        label: None,
    };
    vec![
        lot(1, 3, "3️⃣", 15_000),
        lot(2, 2, "2️⃣", 10_000),
        lot(3, 1, "1️⃣", 5_000),
        RewardTier::diamonds(4, 4_000),
        RewardTier::diamonds(5, 3_000),
    ]
}

impl AppConfig {
    /// Reads the TOML file named by `path`, or `VOTEBOT_CONFIG`, or
    /// `./config.toml`, then layers the environment on top.
    pub async fn load(path: Option<&str>) -> Result<Self> {
        let path = path
            .map(ToString::to_string)
            .or_else(|| env::var("VOTEBOT_CONFIG").ok())
            .unwrap_or_else(|| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path)
                .await
                .with_context(|| format!("reading {}", path))?;
            toml::from_str::<AppConfig>(&content).with_context(|| format!("parsing {}", path))?
        } else {
            warn!(path = %path, "config file not found, using defaults");
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        self.api_token = non_blank(self.api_token.take());
        self.discord_token = non_blank(self.discord_token.take());
        self.unbelievaboat_token = non_blank(self.unbelievaboat_token.take());
        self.admin_log_channel_id =
            non_blank(self.admin_log_channel_id.take()).map(|value| value.trim().to_string());
        self.unbelievaboat_api_url = self.unbelievaboat_api_url.trim().to_string();
        self.clickhouse_user = non_blank(self.clickhouse_user.take());
        self.clickhouse_password = non_blank(self.clickhouse_password.take());
        self.style.memo_url = non_blank(self.style.memo_url.take());
        self.guild_id = self.guild_id.trim().to_string();
        self.results_channel_id = self.results_channel_id.trim().to_string();
        self.ranking_url = self.ranking_url.trim().to_string();
        self.aliases = std::mem::take(&mut self.aliases)
            .into_iter()
            .map(|(playername, alias)| (playername.trim().to_string(), alias.trim().to_string()))
            .filter(|(playername, alias)| !playername.is_empty() && !alias.is_empty())
            .collect();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.aliases_path = resolve_path(base, &self.aliases_path);
        self.meta_path = resolve_path(base, &self.meta_path);
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        validate_snowflake("guild_id", &self.guild_id)?;
        validate_snowflake("results_channel_id", &self.results_channel_id)?;
        validate_http_url("ranking_url", &self.ranking_url)?;
        parse_timezone(&self.timezone)?;
        if let Some(channel) = self.admin_log_channel_id.as_deref() {
            validate_snowflake("admin_log_channel_id", channel)?;
        }
        if self.unbelievaboat_token.is_some() {
            validate_http_url("unbelievaboat_api_url", &self.unbelievaboat_api_url)?;
        }
        if !self.item_command_template.contains("{mention}") {
            return Err(anyhow!("item_command_template must contain {{mention}}"));
        }
        if !(1..=28).contains(&self.announce_day_of_month) {
            return Err(anyhow!("announce_day_of_month must be between 1 and 28"));
        }
        if self.announce_hour > 23 || self.announce_minute > 59 {
            return Err(anyhow!("announce_hour or announce_minute out of range"));
        }
        RewardTable::new(self.rewards.clone()).map_err(|err| anyhow!("invalid rewards: {}", err))?;
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        match self.meta_backend {
            MetaBackend::File if self.meta_path.trim().is_empty() => {
                Err(anyhow!("meta_path must not be empty for the file backend"))
            }
            MetaBackend::Clickhouse if self.clickhouse_url.trim().is_empty() => {
                Err(anyhow!("clickhouse_url must not be empty for the clickhouse backend"))
            }
            _ => Ok(()),
        }
    }

    /// Bot token for the chat platform; only commands that talk to Discord
    /// need it.
    pub fn discord_token(&self) -> Result<&str> {
        self.discord_token
            .as_deref()
            .ok_or_else(|| anyhow!("DISCORD_TOKEN is not set"))
    }

    pub fn to_runtime_config(&self) -> Result<RuntimeConfig> {
        let rewards =
            RewardTable::new(self.rewards.clone()).map_err(|err| anyhow!("invalid rewards: {}", err))?;
        Ok(RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            guild_id: GuildId::from(self.guild_id.as_str()),
            results_channel_id: ChannelId::from(self.results_channel_id.as_str()),
            ranking_url: self.ranking_url.clone(),
            timezone: parse_timezone(&self.timezone)?,
            schedule: ScheduleConfig {
                enabled: self.schedule_enabled,
                day_of_month: self.announce_day_of_month,
                hour: self.announce_hour,
                minute: self.announce_minute,
            },
            rewards,
            diamonds_per_vote: self.diamonds_per_vote,
            aliases: self.aliases.clone(),
            aliases_path: self.aliases_path.clone(),
            style: self.style.clone(),
            delivery: DeliveryConfig {
                admin_log_channel_id: self.admin_log_channel_id.as_deref().map(ChannelId::from),
                item_command_template: self.item_command_template.clone(),
                credit_reason: self.credit_reason.clone(),
            },
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        })
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            meta_backend: self.meta_backend,
            meta_path: self.meta_path.clone(),
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("VOTEBOT_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("VOTEBOT_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("DISCORD_TOKEN") {
            self.discord_token = Some(value);
        }
        if let Ok(value) = env::var("UNBELIEVABOAT_TOKEN") {
            self.unbelievaboat_token = Some(value);
        }
        if let Ok(value) = env::var("VOTEBOT_ADMIN_LOG_CHANNEL_ID") {
            self.admin_log_channel_id = Some(value);
        }
        if let Ok(value) = env::var("VOTEBOT_GUILD_ID") {
            self.guild_id = value;
        }
        if let Ok(value) = env::var("VOTEBOT_RESULTS_CHANNEL_ID") {
            self.results_channel_id = value;
        }
        if let Ok(value) = env::var("VOTEBOT_RANKING_URL") {
            self.ranking_url = value;
        }
        if let Ok(value) = env::var("VOTEBOT_TIMEZONE") {
            self.timezone = value;
        }
        if let Ok(value) = env::var("VOTEBOT_SCHEDULE_ENABLED") {
            self.schedule_enabled = value.parse().unwrap_or(self.schedule_enabled);
        }
        if let Ok(value) = env::var("VOTEBOT_ANNOUNCE_DAY_OF_MONTH") {
            self.announce_day_of_month = value.parse().unwrap_or(self.announce_day_of_month);
        }
        if let Ok(value) = env::var("VOTEBOT_ANNOUNCE_HOUR") {
            self.announce_hour = value.parse().unwrap_or(self.announce_hour);
        }
        if let Ok(value) = env::var("VOTEBOT_ANNOUNCE_MINUTE") {
            self.announce_minute = value.parse().unwrap_or(self.announce_minute);
        }
        if let Ok(value) = env::var("VOTEBOT_DIAMONDS_PER_VOTE") {
            self.diamonds_per_vote = value.parse().unwrap_or(self.diamonds_per_vote);
        }
        if let Ok(value) = env::var("VOTEBOT_ALIASES_PATH") {
            self.aliases_path = value;
        }
        if let Ok(value) = env::var("VOTEBOT_META_BACKEND") {
            match value.trim().to_ascii_lowercase().as_str() {
                "file" => self.meta_backend = MetaBackend::File,
                "clickhouse" => self.meta_backend = MetaBackend::Clickhouse,
                other => warn!(value = other, "unknown VOTEBOT_META_BACKEND ignored"),
            }
        }
        if let Ok(value) = env::var("VOTEBOT_META_PATH") {
            self.meta_path = value;
        }
        if let Ok(value) = env::var("VOTEBOT_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Ok(value) = env::var("VOTEBOT_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Ok(value) = env::var("VOTEBOT_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Ok(value) = env::var("VOTEBOT_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Ok(value) = env::var("VOTEBOT_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("VOTEBOT_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|item| !item.trim().is_empty())
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
