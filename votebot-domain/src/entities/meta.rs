// Meta entity
// Durable per-guild key/value state

use serde::{Deserialize, Serialize};

use crate::value_objects::GuildId;

/// Period key of the last announcement that was posted successfully.
pub const LAST_ANNOUNCED_MONTH_KEY: &str = "last_announced_month";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaEntry {
    pub guild_id: GuildId,
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub updated_at_ms: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementStatus {
    pub guild_id: GuildId,
    pub last_announced_month: Option<String>,
    pub current_period: String,
    pub announced: bool,
}
