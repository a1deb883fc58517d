use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use votebot_domain::{
    compose_announcement, Announcement, AnnouncementInput, GuildId, MemberIndex, Period,
};

use crate::{AppError, AppState, CycleError};

/// Fetch, enumerate, resolve and format. No side effects besides the reads.
pub async fn build_announcement(
    state: &AppState,
    guild_id: &GuildId,
    period: Period,
) -> Result<Announcement, CycleError> {
    let ranking = state
        .ranking_source
        .fetch_ranking(&state.config.ranking_url)
        .await?;
    let members = state
        .chat
        .list_members(guild_id)
        .await
        .map_err(CycleError::Members)?;
    let index = MemberIndex::build(&members);
    debug!(
        players = ranking.len(),
        members = members.len(),
        keys = index.len(),
        "member index built"
    );

    let aliases = state.aliases.read().await.clone();
    let announcement = compose_announcement(AnnouncementInput {
        period,
        ranking: &ranking,
        index: &index,
        aliases: &aliases,
        rewards: &state.config.rewards,
        style: &state.config.style,
        diamonds_per_vote: state.config.diamonds_per_vote,
        credits_enabled: state.reward_ledger.is_some(),
    });

    let unresolved = announcement
        .winners
        .iter()
        .map(|entry| (&entry.player, &entry.resolution))
        .chain(
            announcement
                .participants
                .iter()
                .map(|entry| (&entry.player, &entry.resolution)),
        )
        .filter(|(_, resolution)| !resolution.is_linked());
    for (player, resolution) in unresolved {
        warn!(
            playername = %player.playername,
            votes = player.votes,
            outcome = resolution.as_str(),
            "ranked player not linked to a member"
        );
    }
    Ok(announcement)
}

/// Same composition as the monthly cycle, without posting and without
/// touching the announcement gate.
pub async fn preview_announcement(
    state: &AppState,
    guild_id: &GuildId,
    now: DateTime<Utc>,
) -> Result<Announcement, AppError> {
    let period = Period::containing(now, state.config.timezone);
    let announcement = build_announcement(state, guild_id, period).await?;
    Ok(announcement)
}
