// Alias entity
// Corrections from the ranking site's player names to chat display names

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// External playername (exact) -> name to normalize instead.
pub type AliasTable = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub playername: String,
    pub alias: String,
}

impl AliasEntry {
    pub fn normalized(&self) -> Self {
        Self {
            playername: self.playername.trim().to_string(),
            alias: self.alias.trim().to_string(),
        }
    }
}

pub fn alias_entries(table: &AliasTable) -> Vec<AliasEntry> {
    let mut list = table
        .iter()
        .map(|(playername, alias)| AliasEntry {
            playername: playername.clone(),
            alias: alias.clone(),
        })
        .collect::<Vec<_>>();
    list.sort_by(|a, b| a.playername.cmp(&b.playername));
    list
}
