use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use votebot_domain::{AliasRepository, AliasTable};

/// Alias table stored as a flat YAML mapping `playername: alias`.
pub struct AliasFileRepository;

impl AliasFileRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AliasFileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AliasRepository for AliasFileRepository {
    async fn load_aliases(&self, path: &str) -> anyhow::Result<AliasTable> {
        if path.trim().is_empty() || !Path::new(path).exists() {
            return Ok(AliasTable::new());
        }
        let content = fs::read_to_string(path).await?;
        if content.trim().is_empty() {
            return Ok(AliasTable::new());
        }
        let aliases: AliasTable = serde_yaml::from_str(&content)?;
        Ok(aliases)
    }

    async fn save_aliases(&self, path: &str, aliases: &AliasTable) -> anyhow::Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let sorted = aliases.iter().collect::<std::collections::BTreeMap<_, _>>();
        let content = serde_yaml::to_string(&sorted)?;
        fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_empty_table() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("aliases.yaml");
        let repo = AliasFileRepository::new();
        let aliases = repo
            .load_aliases(path.to_str().expect("utf8 path"))
            .await
            .expect("load");
        assert!(aliases.is_empty());
    }

    #[tokio::test]
    async fn saved_table_loads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("conf").join("aliases.yaml");
        let path = path.to_str().expect("utf8 path");
        let repo = AliasFileRepository::new();

        let mut aliases = AliasTable::new();
        aliases.insert("xXProX".to_string(), "Eric".to_string());
        aliases.insert("Élo 2".to_string(), "elodie".to_string());
        repo.save_aliases(path, &aliases).await.expect("save");

        let loaded = repo.load_aliases(path).await.expect("load");
        assert_eq!(loaded, aliases);
    }
}
