use chrono::{DateTime, Utc};

use votebot_domain::{AnnouncementStatus, GuildId, Period, LAST_ANNOUNCED_MONTH_KEY};

use crate::{AppError, AppState};

pub async fn announcement_status(
    state: &AppState,
    guild_id: &GuildId,
    now: DateTime<Utc>,
) -> Result<AnnouncementStatus, AppError> {
    let current_period = Period::containing(now, state.config.timezone).key();
    let last_announced_month = state
        .meta_store
        .get_meta(guild_id, LAST_ANNOUNCED_MONTH_KEY)
        .await?;
    Ok(AnnouncementStatus {
        guild_id: guild_id.clone(),
        announced: last_announced_month.as_deref() == Some(current_period.as_str()),
        last_announced_month,
        current_period,
    })
}
