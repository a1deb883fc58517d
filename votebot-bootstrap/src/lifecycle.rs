use anyhow::Result;
use axum::Router;
use chrono::Utc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use votebot_application::commands::monthly_cycle_commands::run_monthly_cycle;
use votebot_application::queries::announcement_queries::preview_announcement;
use votebot_application::AppState;
use votebot_infrastructure::schedule_monthly_cycles;
use votebot_interfaces_http::build_router;

use crate::context::AppContext;

fn build_router_with_layers(state: AppState) -> Router {
    build_router(state.clone())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(
            usize::try_from(state.config.max_body_bytes).unwrap_or(usize::MAX),
        ))
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(
            state.config.request_timeout_seconds,
        )))
        .layer(TraceLayer::new_for_http())
}

/// Scheduler plus operator API until SIGINT/SIGTERM.
pub async fn run_standalone(config_path: Option<&str>) -> Result<()> {
    let context = AppContext::new(config_path).await?;
    let state = context.state;

    tokio::spawn(schedule_monthly_cycles(state.clone()));

    let app = build_router_with_layers(state.clone());
    let addr: std::net::SocketAddr = state.config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// One trigger, for external schedulers such as cron. A skip is a success.
pub async fn run_cycle_once(config_path: Option<&str>) -> Result<()> {
    let context = AppContext::new(config_path).await?;
    let state = context.state;
    let guild_id = state.config.guild_id.clone();
    let outcome = run_monthly_cycle(&state, &guild_id, Utc::now()).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

/// Prints the announcement that a cycle would post right now.
pub async fn run_preview(config_path: Option<&str>, as_json: bool) -> Result<()> {
    let context = AppContext::new(config_path).await?;
    let state = context.state;
    let guild_id = state.config.guild_id.clone();
    let announcement = preview_announcement(&state, &guild_id, Utc::now()).await?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&announcement)?);
        return Ok(());
    }
    for (index, chunk) in announcement.chunks.iter().enumerate() {
        if index > 0 {
            println!("---");
        }
        println!("{}", chunk);
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("sigterm handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
