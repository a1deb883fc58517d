use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use votebot_domain::{GuildId, MetaEntry, MetaStore};

use crate::utils::current_millis;

/// Meta store backed by a single JSON document.
///
/// Every write rewrites the whole document through a sibling temp file and a
/// rename, so a crash leaves either the old or the new document on disk.
pub struct FileMetaStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileMetaStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_entries(&self) -> anyhow::Result<Vec<MetaEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let entries: Vec<MetaEntry> = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(entries)
    }

    async fn write_entries(&self, entries: &[MetaEntry]) -> anyhow::Result<()> {
        ensure_parent(&self.path).await?;
        let content = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

async fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

#[async_trait]
impl MetaStore for FileMetaStore {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        if self.path.exists() {
            // Fail at startup rather than on the first cycle.
            self.read_entries().await?;
            return Ok(());
        }
        self.write_entries(&[]).await
    }

    async fn get_meta(&self, guild_id: &GuildId, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self.read_entries().await?;
        Ok(entries
            .into_iter()
            .find(|entry| entry.guild_id == *guild_id && entry.key == key)
            .map(|entry| entry.value))
    }

    async fn set_meta(&self, guild_id: &GuildId, key: &str, value: &str) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        let updated_at_ms = current_millis();
        match entries
            .iter_mut()
            .find(|entry| entry.guild_id == *guild_id && entry.key == key)
        {
            Some(entry) => {
                entry.value = value.to_string();
                entry.updated_at_ms = updated_at_ms;
            }
            None => entries.push(MetaEntry {
                guild_id: guild_id.clone(),
                key: key.to_string(),
                value: value.to_string(),
                updated_at_ms,
            }),
        }
        self.write_entries(&entries).await
    }

    async fn ping(&self) -> anyhow::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let metadata = fs::metadata(&dir)
            .await
            .with_context(|| format!("meta directory {}", dir.display()))?;
        if !metadata.is_dir() {
            return Err(anyhow!("{} is not a directory", dir.display()));
        }
        Ok(())
    }
}
