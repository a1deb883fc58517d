use thiserror::Error;

use votebot_domain::FetchError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Failure of one monthly cycle. The gate is left untouched on every variant,
/// so the next trigger starts the cycle over.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("ranking fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("member enumeration failed: {0}")]
    Members(#[source] anyhow::Error),
    #[error("announcement post failed after {sent} message(s): {source}")]
    Send {
        sent: usize,
        #[source]
        source: anyhow::Error,
    },
    #[error("meta store failure: {0}")]
    Persistence(#[source] anyhow::Error),
}

impl CycleError {
    pub fn kind(&self) -> &'static str {
        match self {
            CycleError::Fetch(_) => "fetch",
            CycleError::Members(_) => "members",
            CycleError::Send { .. } => "send",
            CycleError::Persistence(_) => "persistence",
        }
    }
}

impl From<CycleError> for AppError {
    fn from(value: CycleError) -> Self {
        AppError::Internal(anyhow::Error::new(value))
    }
}
