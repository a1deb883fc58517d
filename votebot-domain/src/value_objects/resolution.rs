// Resolution value object
// Outcome of mapping an external player name to a guild member

use serde::Serialize;

use crate::value_objects::MemberId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Linked { member_id: MemberId },
    NotFound,
    Ambiguous { candidates: Vec<MemberId> },
}

impl Resolution {
    pub fn member_id(&self) -> Option<&MemberId> {
        match self {
            Resolution::Linked { member_id } => Some(member_id),
            _ => None,
        }
    }

    pub fn is_linked(&self) -> bool {
        matches!(self, Resolution::Linked { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Linked { .. } => "linked",
            Resolution::NotFound => "not_found",
            Resolution::Ambiguous { .. } => "ambiguous",
        }
    }
}
