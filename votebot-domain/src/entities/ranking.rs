// Ranking entity
// One row of the external monthly vote ranking

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedPlayer {
    pub playername: String,
    pub votes: u64,
}

impl RankedPlayer {
    pub fn new(playername: impl Into<String>, votes: u64) -> Self {
        Self {
            playername: playername.into(),
            votes,
        }
    }
}
