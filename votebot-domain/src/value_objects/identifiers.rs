// Identifier value objects

use std::fmt;

use serde::{Deserialize, Serialize};

/// Chat-platform community identifier. Kept as a string so the meta store
/// key never depends on the platform's numeric width.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

impl GuildId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl MemberId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Discord user mention markup.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

impl ChannelId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GuildId {
    fn from(value: &str) -> Self {
        GuildId(value.trim().to_string())
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        MemberId(value.trim().to_string())
    }
}

impl From<&str> for ChannelId {
    fn from(value: &str) -> Self {
        ChannelId(value.trim().to_string())
    }
}
