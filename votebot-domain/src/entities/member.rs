// Guild member entity
// Snapshot of one community member as enumerated from the chat platform

use serde::{Deserialize, Serialize};

use crate::value_objects::MemberId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMember {
    pub id: MemberId,
    pub display_name: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,
}

impl GuildMember {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: MemberId(id.into()),
            display_name: display_name.into(),
            username: username.into(),
            global_name: None,
        }
    }

    /// Every name the member can be recognised by, in lookup priority order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.display_name.as_str()),
            Some(self.username.as_str()),
            self.global_name.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}
