use axum::Router;

use votebot_application::AppState;

use crate::handlers::{alias_handlers, cycle_handlers, ops_handlers, query_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/cycles/run",
            axum::routing::post(cycle_handlers::run_cycle),
        )
        .route(
            "/v1/announcement/preview",
            axum::routing::get(query_handlers::preview_announcement),
        )
        .route(
            "/v1/ranking",
            axum::routing::get(query_handlers::current_ranking),
        )
        .route(
            "/v1/status",
            axum::routing::get(query_handlers::announcement_status),
        )
        .route(
            "/v1/aliases",
            axum::routing::get(alias_handlers::list_aliases).put(alias_handlers::replace_aliases),
        )
        .route(
            "/v1/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/v1/ops/health/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/v1/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
