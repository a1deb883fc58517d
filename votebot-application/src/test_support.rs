// In-memory adapters shared by the application tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::{Mutex, RwLock};

use votebot_domain::ports::{
    AliasRepository, ChatPlatform, MetaStore, RankingSource, RewardLedger,
};
use votebot_domain::{
    AliasTable, ChannelId, DeliveryConfig, FetchError, GuildId, GuildMember, ItemQuantity,
    MemberId, OutgoingMessage, RankedPlayer, RewardTable, RewardTier, RuntimeConfig,
    ScheduleConfig, StyleConfig, DEFAULT_ITEM_COMMAND_TEMPLATE,
};

use crate::{AppState, Metrics};

/// 2025-07-03 10:00 UTC, i.e. July in Paris; results are for June.
pub fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 3, 10, 0, 0)
        .single()
        .expect("valid fixture time")
}

#[derive(Default)]
pub struct InMemoryMetaStore {
    entries: StdMutex<HashMap<(String, String), String>>,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_delay_ms: AtomicU64,
}

impl InMemoryMetaStore {
    pub fn seed(&self, guild_id: &GuildId, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("meta lock")
            .insert((guild_id.0.clone(), key.to_string()), value.to_string());
    }

    pub fn value(&self, guild_id: &GuildId, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("meta lock")
            .get(&(guild_id.0.clone(), key.to_string()))
            .cloned()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_failing_reads(&self, failing: bool) {
        self.fail_reads.store(failing, Ordering::SeqCst);
    }

    pub fn set_failing_writes(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    pub fn set_write_delay(&self, delay: Duration) {
        self.write_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

#[async_trait]
impl MetaStore for InMemoryMetaStore {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn get_meta(&self, guild_id: &GuildId, key: &str) -> anyhow::Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("meta store unavailable"));
        }
        Ok(self.value(guild_id, key))
    }

    async fn set_meta(&self, guild_id: &GuildId, key: &str, value: &str) -> anyhow::Result<()> {
        let delay = self.write_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("meta store read-only"));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.seed(guild_id, key, value);
        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

pub struct StaticRanking {
    players: Vec<RankedPlayer>,
    fail_status: AtomicU16,
    calls: AtomicUsize,
}

impl StaticRanking {
    pub fn new(players: Vec<RankedPlayer>) -> Self {
        Self {
            players,
            fail_status: AtomicU16::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_with_status(&self, status: u16) {
        self.fail_status.store(status, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RankingSource for StaticRanking {
    async fn fetch_ranking(&self, url: &str) -> Result<Vec<RankedPlayer>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_status.load(Ordering::SeqCst) {
            0 => Ok(self.players.clone()),
            status => Err(FetchError::UnexpectedStatus {
                url: url.to_string(),
                status,
            }),
        }
    }
}

pub struct RecordingChat {
    members: Vec<GuildMember>,
    sent: StdMutex<Vec<(ChannelId, OutgoingMessage)>>,
    failing: AtomicBool,
    failing_members: AtomicBool,
}

impl RecordingChat {
    pub fn new(members: Vec<GuildMember>) -> Self {
        Self {
            members,
            sent: StdMutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            failing_members: AtomicBool::new(false),
        }
    }

    pub fn sent(&self) -> Vec<(ChannelId, OutgoingMessage)> {
        self.sent.lock().expect("sent lock").clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_failing_members(&self, failing: bool) {
        self.failing_members.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChatPlatform for RecordingChat {
    async fn list_members(&self, _guild_id: &GuildId) -> anyhow::Result<Vec<GuildMember>> {
        if self.failing_members.load(Ordering::SeqCst) {
            return Err(anyhow!("guild members intent missing"));
        }
        Ok(self.members.clone())
    }

    async fn send_message(
        &self,
        channel_id: &ChannelId,
        message: &OutgoingMessage,
    ) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("missing permissions"));
        }
        self.sent
            .lock()
            .expect("sent lock")
            .push((channel_id.clone(), message.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingLedger {
    credits: StdMutex<Vec<(String, u64, String)>>,
    failing: AtomicBool,
}

impl RecordingLedger {
    /// `(member id, amount, reason)` in call order.
    pub fn credits(&self) -> Vec<(String, u64, String)> {
        self.credits.lock().expect("ledger lock").clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl RewardLedger for RecordingLedger {
    async fn credit(
        &self,
        _guild_id: &GuildId,
        member_id: &MemberId,
        amount: u64,
        reason: &str,
    ) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("economy api returned 401"));
        }
        self.credits
            .lock()
            .expect("ledger lock")
            .push((member_id.0.clone(), amount, reason.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryAliasRepo {
    saved: StdMutex<HashMap<String, AliasTable>>,
}

impl MemoryAliasRepo {
    pub fn saved(&self, path: &str) -> Option<AliasTable> {
        self.saved.lock().expect("alias lock").get(path).cloned()
    }
}

#[async_trait]
impl AliasRepository for MemoryAliasRepo {
    async fn load_aliases(&self, path: &str) -> anyhow::Result<AliasTable> {
        Ok(self.saved(path).unwrap_or_default())
    }

    async fn save_aliases(&self, path: &str, aliases: &AliasTable) -> anyhow::Result<()> {
        self.saved
            .lock()
            .expect("alias lock")
            .insert(path.to_string(), aliases.clone());
        Ok(())
    }
}

pub fn test_config() -> RuntimeConfig {
    let rewards = RewardTable::new(vec![
        RewardTier::items(1, vec![ItemQuantity::new("🦖", 6)]),
        RewardTier::items(2, vec![ItemQuantity::new("🦖", 4)]),
        RewardTier::diamonds(3, 3000),
    ])
    .expect("valid rewards");
    RuntimeConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        api_token: None,
        guild_id: GuildId("100".to_string()),
        results_channel_id: ChannelId("200".to_string()),
        ranking_url: "http://ranking.test/api".to_string(),
        timezone: chrono_tz::Europe::Paris,
        schedule: ScheduleConfig {
            enabled: false,
            day_of_month: 1,
            hour: 18,
            minute: 0,
        },
        rewards,
        diamonds_per_vote: 100,
        aliases: AliasTable::new(),
        aliases_path: "aliases.yaml".to_string(),
        style: StyleConfig::default(),
        delivery: DeliveryConfig {
            admin_log_channel_id: None,
            item_command_template: DEFAULT_ITEM_COMMAND_TEMPLATE.to_string(),
            credit_reason: "Récompense votes mensuels".to_string(),
        },
        max_body_bytes: 65_536,
        request_timeout_seconds: 10,
    }
}

pub struct TestHarness {
    pub state: AppState,
    pub meta: Arc<InMemoryMetaStore>,
    pub ranking: Arc<StaticRanking>,
    pub chat: Arc<RecordingChat>,
    pub alias_repo: Arc<MemoryAliasRepo>,
    pub ledger: Arc<RecordingLedger>,
}

impl TestHarness {
    /// Alice is a member; Mystery is not.
    pub fn new() -> Self {
        Self::with_players(vec![
            RankedPlayer::new("Alice", 10),
            RankedPlayer::new("Mystery", 5),
        ])
    }

    pub fn with_players(players: Vec<RankedPlayer>) -> Self {
        let meta = Arc::new(InMemoryMetaStore::default());
        let ranking = Arc::new(StaticRanking::new(players));
        let chat = Arc::new(RecordingChat::new(vec![GuildMember::new("1", "Alice", "alice_42")]));
        let alias_repo = Arc::new(MemoryAliasRepo::default());
        let ledger = Arc::new(RecordingLedger::default());
        let config = test_config();
        let state = AppState {
            aliases: Arc::new(RwLock::new(config.aliases.clone())),
            config,
            meta_store: meta.clone(),
            ranking_source: ranking.clone(),
            chat: chat.clone(),
            alias_repo: alias_repo.clone(),
            reward_ledger: Some(ledger.clone()),
            metrics: Arc::new(Metrics::default()),
            cycle_guard: Arc::new(Mutex::new(())),
        };
        Self {
            state,
            meta,
            ranking,
            chat,
            alias_repo,
            ledger,
        }
    }
}
