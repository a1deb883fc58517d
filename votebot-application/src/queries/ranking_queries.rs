use chrono::{DateTime, Utc};

use votebot_domain::Period;

use crate::dtos::RankingView;
use crate::{AppError, AppState, CycleError};

pub async fn current_ranking(state: &AppState, now: DateTime<Utc>) -> Result<RankingView, AppError> {
    let results_period = Period::containing(now, state.config.timezone).previous();
    let players = state
        .ranking_source
        .fetch_ranking(&state.config.ranking_url)
        .await
        .map_err(CycleError::from)?;
    Ok(RankingView {
        results_label: format!("{} {}", results_period.month_name_fr(), results_period.year()),
        players,
    })
}
