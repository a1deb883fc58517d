use async_trait::async_trait;

use crate::entities::AliasTable;
use crate::value_objects::GuildId;

/// Durable `(guild_id, key) -> value` store. Last write wins.
#[async_trait]
pub trait MetaStore: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;
    async fn get_meta(&self, guild_id: &GuildId, key: &str) -> anyhow::Result<Option<String>>;
    async fn set_meta(&self, guild_id: &GuildId, key: &str, value: &str) -> anyhow::Result<()>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AliasRepository: Send + Sync {
    async fn load_aliases(&self, path: &str) -> anyhow::Result<AliasTable>;
    async fn save_aliases(&self, path: &str, aliases: &AliasTable) -> anyhow::Result<()>;
}
