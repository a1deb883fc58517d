use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;

use votebot_application::commands::monthly_cycle_commands;
use votebot_application::dtos::{CycleOutcome, CycleRequest};
use votebot_application::AppState;

use crate::error::HttpError;
use crate::middleware::authorize;

/// Manual trigger. Goes through the same gate as the scheduler, so calling it
/// after the month was announced reports a skip instead of posting again.
/// The cycle runs detached: a request timeout leaves it running to the end.
pub async fn run_cycle(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Option<Json<CycleRequest>>,
) -> Result<Json<CycleOutcome>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let guild_id = state.guild_for(request.guild_id.as_deref())?;
    let outcome = monthly_cycle_commands::spawn_monthly_cycle(state, guild_id, Utc::now())
        .await
        .map_err(|err| HttpError::Internal(format!("monthly cycle task failed: {}", err)))??;
    Ok(Json(outcome))
}
