// Runtime configuration handed to the application layer
// Built once by the infrastructure config loader, never read from globals

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::entities::{AliasTable, RewardTable};
use crate::value_objects::{ChannelId, GuildId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub everyone_ping: bool,
    pub logo: String,
    pub fireworks: String,
    pub arrow: String,
    pub sparkly: String,
    pub place_icons: Vec<String>,
    pub title: String,
    pub intro_text: String,
    pub credit_text: String,
    pub memo_text: String,
    pub memo_url: Option<String>,
    pub participation_title: String,
    pub not_linked_marker: String,
    pub diamond_icon: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            everyone_ping: true,
            logo: "<a:Logo:1313979016973127730>".to_string(),
            fireworks: "<a:fireworks:1388428854078476339>".to_string(),
            arrow: "<a:fleche:1402586366210080899>".to_string(),
            sparkly: "<a:SparklyCrystal:1366174439003263087>".to_string(),
            place_icons: vec![
                "<:icon_place_1:1120819097916149911>".to_string(),
                "<:icon_place_2:1120819117197365299>".to_string(),
                "<:icon_place_3:1120819143659233452>".to_string(),
                "<:icon_place_4:1120819164119040151>".to_string(),
                "<:icon_place_5:1120819191650451598>".to_string(),
            ],
            title: "RÉSULTATS DES VOTES".to_string(),
            intro_text: "Merci à tous les votants ! Grâce à vous, notre serveur gagne en visibilité. Continuez comme ça ! 💪".to_string(),
            credit_text: "Les diamants ont été **automatiquement crédités** sur vos comptes !".to_string(),
            memo_text: "Pour mémo, vous retrouverez la liste des récompenses votes à gagner ici".to_string(),
            memo_url: None,
            participation_title: "Participation".to_string(),
            not_linked_marker: "(non lié)".to_string(),
            diamond_icon: "💎".to_string(),
        }
    }
}

impl StyleConfig {
    pub fn place_icon(&self, rank: u32) -> String {
        usize::try_from(rank)
            .ok()
            .and_then(|rank| rank.checked_sub(1))
            .and_then(|index| self.place_icons.get(index))
            .filter(|icon| !icon.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| format!("#{}", rank))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub enabled: bool,
    /// First day of the month on which the daily trigger may announce.
    pub day_of_month: u32,
    pub hour: u32,
    pub minute: u32,
}

/// What happens to the rewards once the announcement is up.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Channel receiving item-grant commands and pending manual payouts.
    pub admin_log_channel_id: Option<ChannelId>,
    pub item_command_template: String,
    pub credit_reason: String,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub guild_id: GuildId,
    pub results_channel_id: ChannelId,
    pub ranking_url: String,
    pub timezone: Tz,
    pub schedule: ScheduleConfig,
    pub rewards: RewardTable,
    pub diamonds_per_vote: u64,
    pub aliases: AliasTable,
    pub aliases_path: String,
    pub style: StyleConfig,
    pub delivery: DeliveryConfig,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaBackend {
    File,
    Clickhouse,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub meta_backend: MetaBackend,
    pub meta_path: String,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
}
