use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use votebot_application::commands::alias_commands;
use votebot_application::queries::alias_queries;
use votebot_application::AppState;
use votebot_domain::AliasEntry;

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn list_aliases(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<AliasEntry>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(alias_queries::list_aliases(&state).await))
}

pub async fn replace_aliases(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Vec<AliasEntry>>,
) -> Result<Json<Vec<AliasEntry>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let aliases = alias_commands::replace_aliases(&state, payload).await?;
    Ok(Json(aliases))
}
