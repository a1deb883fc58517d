use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serenity::builder::{CreateAllowedMentions, CreateMessage};
use serenity::http::Http;
use serenity::model::guild::Member;
use serenity::model::id::{ChannelId as DiscordChannelId, GuildId as DiscordGuildId, UserId};
use tracing::{debug, info};

use votebot_domain::{ChannelId, ChatPlatform, GuildId, GuildMember, MemberId, OutgoingMessage};

const MEMBER_PAGE_SIZE: u64 = 1000;

/// Discord REST adapter. No gateway connection: members are listed page by
/// page and messages are posted through the bot token.
pub struct DiscordPlatform {
    http: Http,
}

impl DiscordPlatform {
    pub fn new(token: &str) -> Self {
        Self {
            http: Http::new(token),
        }
    }
}

pub fn parse_snowflake(raw: &str) -> anyhow::Result<u64> {
    let value = raw
        .trim()
        .parse::<u64>()
        .with_context(|| format!("'{}' is not a snowflake", raw))?;
    if value == 0 {
        return Err(anyhow!("snowflake must not be zero"));
    }
    Ok(value)
}

fn to_guild_member(member: &Member) -> GuildMember {
    GuildMember {
        id: MemberId(member.user.id.get().to_string()),
        display_name: member.display_name().to_string(),
        username: member.user.name.clone(),
        global_name: member.user.global_name.clone(),
    }
}

#[async_trait]
impl ChatPlatform for DiscordPlatform {
    async fn list_members(&self, guild_id: &GuildId) -> anyhow::Result<Vec<GuildMember>> {
        let guild = DiscordGuildId::new(parse_snowflake(guild_id.as_str())?);
        let mut members = Vec::new();
        let mut after: Option<UserId> = None;
        loop {
            let page = guild
                .members(&self.http, Some(MEMBER_PAGE_SIZE), after)
                .await
                .with_context(|| format!("listing members of guild {}", guild_id))?;
            let page_len = page.len() as u64;
            after = page.last().map(|member| member.user.id);
            members.extend(page.iter().map(to_guild_member));
            debug!(guild_id = %guild_id, fetched = members.len(), "member page fetched");
            if page_len < MEMBER_PAGE_SIZE || after.is_none() {
                break;
            }
        }
        info!(guild_id = %guild_id, members = members.len(), "guild members enumerated");
        Ok(members)
    }

    async fn send_message(
        &self,
        channel_id: &ChannelId,
        message: &OutgoingMessage,
    ) -> anyhow::Result<()> {
        let channel = DiscordChannelId::new(parse_snowflake(channel_id.as_str())?);
        let mentions = CreateAllowedMentions::new()
            .everyone(message.mention_everyone)
            .all_users(true);
        let builder = CreateMessage::new()
            .content(message.content.clone())
            .allowed_mentions(mentions);
        let sent = channel
            .send_message(&self.http, builder)
            .await
            .with_context(|| format!("posting to channel {}", channel_id))?;
        debug!(channel_id = %channel_id, message_id = %sent.id, "message posted");
        Ok(())
    }
}
