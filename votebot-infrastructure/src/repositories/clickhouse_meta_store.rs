use anyhow::Result;
use async_trait::async_trait;
use clickhouse::{Client, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use votebot_domain::{DbConfig, GuildId, MetaStore};

use crate::utils::{current_millis, millis_to_utc};

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
struct MetaRow {
    guild_id: String,
    key: String,
    value: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    updated_at: OffsetDateTime,
}

/// Meta store on ClickHouse. Rows are versioned by `updated_at` and collapsed
/// by the ReplacingMergeTree; reads go through `FINAL` so the newest row per
/// `(guild_id, key)` wins even before a merge.
#[derive(Clone)]
pub struct ClickhouseMetaStore {
    client: Client,
    database: String,
}

impl ClickhouseMetaStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn from_config(config: &DbConfig) -> Self {
        let mut client = Client::default()
            .with_url(&config.clickhouse_url)
            .with_database(&config.clickhouse_database);
        if let Some(user) = &config.clickhouse_user {
            client = client.with_user(user);
        }
        if let Some(password) = &config.clickhouse_password {
            client = client.with_password(password);
        }
        Self::new(client, config.clickhouse_database.clone())
    }
}

#[async_trait]
impl MetaStore for ClickhouseMetaStore {
    async fn ensure_schema(&self) -> Result<()> {
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client.query(&create_db).execute().await?;

        let create_meta = r#"
CREATE TABLE IF NOT EXISTS bot_meta (
    guild_id String,
    key String,
    value String,
    updated_at DateTime64(3)
) ENGINE = ReplacingMergeTree(updated_at)
ORDER BY (guild_id, key)
"#;
        self.client.query(create_meta).execute().await?;
        Ok(())
    }

    async fn get_meta(&self, guild_id: &GuildId, key: &str) -> Result<Option<String>> {
        let rows = self
            .client
            .query(
                "SELECT guild_id, key, value, updated_at FROM bot_meta FINAL \
                 WHERE guild_id = ? AND key = ? ORDER BY updated_at DESC LIMIT 1",
            )
            .bind(guild_id.as_str())
            .bind(key)
            .fetch_all::<MetaRow>()
            .await?;
        Ok(rows.into_iter().next().map(|row| row.value))
    }

    async fn set_meta(&self, guild_id: &GuildId, key: &str, value: &str) -> Result<()> {
        let mut insert = self.client.insert("bot_meta")?;
        insert
            .write(&MetaRow {
                guild_id: guild_id.as_str().to_string(),
                key: key.to_string(),
                value: value.to_string(),
                updated_at: millis_to_utc(current_millis()),
            })
            .await?;
        insert.end().await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let _: u8 = self.client.query("SELECT toUInt8(1)").fetch_one().await?;
        Ok(())
    }
}
