use std::collections::HashSet;

use tracing::info;

use crate::{AppError, AppState};
use votebot_domain::{alias_entries, AliasEntry, AliasTable};

/// Replaces the whole alias table, on disk first and then in memory, so a
/// failed write never leaves the running bot ahead of its file.
pub async fn replace_aliases(
    state: &AppState,
    entries: Vec<AliasEntry>,
) -> Result<Vec<AliasEntry>, AppError> {
    let mut seen = HashSet::new();
    let mut table = AliasTable::new();
    for entry in entries.into_iter().map(|entry| entry.normalized()) {
        if entry.playername.is_empty() {
            return Err(AppError::BadRequest("playername must not be empty".to_string()));
        }
        if entry.alias.is_empty() {
            return Err(AppError::BadRequest(format!(
                "alias for '{}' must not be empty",
                entry.playername
            )));
        }
        if !seen.insert(entry.playername.clone()) {
            return Err(AppError::BadRequest(format!(
                "duplicate alias for '{}'",
                entry.playername
            )));
        }
        table.insert(entry.playername, entry.alias);
    }

    state
        .alias_repo
        .save_aliases(&state.config.aliases_path, &table)
        .await?;
    let list = alias_entries(&table);
    {
        let mut aliases = state.aliases.write().await;
        *aliases = table;
    }
    info!(count = list.len(), path = %state.config.aliases_path, "alias table replaced");
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::monthly_cycle_commands::run_monthly_cycle;
    use crate::dtos::CycleOutcome;
    use crate::test_support::{fixture_now, TestHarness};

    fn entry(playername: &str, alias: &str) -> AliasEntry {
        AliasEntry {
            playername: playername.to_string(),
            alias: alias.to_string(),
        }
    }

    #[tokio::test]
    async fn replace_persists_and_swaps_table() {
        let harness = TestHarness::new();
        let list = replace_aliases(&harness.state, vec![entry(" Mystery ", "Alice")])
            .await
            .expect("replace");
        assert_eq!(list, vec![entry("Mystery", "Alice")]);

        let saved = harness.alias_repo.saved("aliases.yaml").expect("saved file");
        assert_eq!(saved.get("Mystery").map(String::as_str), Some("Alice"));
        assert_eq!(
            harness.state.aliases.read().await.get("Mystery").map(String::as_str),
            Some("Alice")
        );
    }

    #[tokio::test]
    async fn rejects_duplicates_and_blank_values() {
        let harness = TestHarness::new();
        let duplicate = replace_aliases(
            &harness.state,
            vec![entry("Bob", "Robert"), entry("Bob ", "Bobby")],
        )
        .await;
        assert!(matches!(duplicate, Err(AppError::BadRequest(_))));

        let blank = replace_aliases(&harness.state, vec![entry("Bob", "  ")]).await;
        assert!(matches!(blank, Err(AppError::BadRequest(_))));
        assert!(harness.alias_repo.saved("aliases.yaml").is_none());
    }

    #[tokio::test]
    async fn new_alias_links_player_in_next_cycle() {
        let harness = TestHarness::new();
        replace_aliases(&harness.state, vec![entry("Mystery", "alice_42")])
            .await
            .expect("replace");
        let guild = harness.state.config.guild_id.clone();

        let outcome = run_monthly_cycle(&harness.state, &guild, fixture_now())
            .await
            .expect("cycle");
        let CycleOutcome::Announced(summary) = outcome else {
            panic!("expected an announcement");
        };
        assert_eq!(summary.unresolved, 0);
        assert_eq!(summary.linked, 2);
    }
}
