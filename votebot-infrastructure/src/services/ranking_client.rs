use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use votebot_domain::{parse_ranking, FetchError, RankedPlayer, RankingSource};

const USER_AGENT: &str = concat!("votebot/", env!("CARGO_PKG_VERSION"));

/// Single-shot GET of the monthly ranking. No retry: a failed fetch fails
/// the cycle and the next trigger starts over.
pub struct HttpRankingClient {
    client: reqwest::Client,
}

impl HttpRankingClient {
    pub fn new(timeout_seconds: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds.max(1)))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RankingSource for HttpRankingClient {
    async fn fetch_ranking(&self, url: &str) -> Result<Vec<RankedPlayer>, FetchError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| FetchError::Http {
                url: url.to_string(),
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|err| FetchError::Body {
            url: url.to_string(),
            message: err.to_string(),
        })?;
        let players = parse_ranking(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })?;
        debug!(url, players = players.len(), "ranking fetched");
        Ok(players)
    }
}
