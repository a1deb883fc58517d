use serde::Serialize;

/// Discord rejects message content longer than this many characters.
pub const MESSAGE_CHAR_LIMIT: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    pub content: String,
    pub mention_everyone: bool,
}
