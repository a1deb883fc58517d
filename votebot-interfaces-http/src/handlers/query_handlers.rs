use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;

use votebot_application::dtos::{GuildQuery, RankingView};
use votebot_application::queries::{announcement_queries, ranking_queries, status_queries};
use votebot_application::AppState;
use votebot_domain::{Announcement, AnnouncementStatus};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn preview_announcement(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<GuildQuery>,
) -> Result<Json<Announcement>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let guild_id = state.guild_for(query.guild_id.as_deref())?;
    let announcement =
        announcement_queries::preview_announcement(&state, &guild_id, Utc::now()).await?;
    Ok(Json(announcement))
}

pub async fn current_ranking(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RankingView>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let ranking = ranking_queries::current_ranking(&state, Utc::now()).await?;
    Ok(Json(ranking))
}

pub async fn announcement_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<GuildQuery>,
) -> Result<Json<AnnouncementStatus>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let guild_id = state.guild_for(query.guild_id.as_deref())?;
    let status = status_queries::announcement_status(&state, &guild_id, Utc::now()).await?;
    Ok(Json(status))
}
