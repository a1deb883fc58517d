use votebot_domain::{alias_entries, AliasEntry};

use crate::AppState;

pub async fn list_aliases(state: &AppState) -> Vec<AliasEntry> {
    let aliases = state.aliases.read().await;
    alias_entries(&aliases)
}
