use serde::Deserialize;
use serde_json::Value;

use crate::entities::RankedPlayer;

#[derive(Debug, Deserialize)]
struct RankingPayload {
    #[serde(default)]
    players: Option<Vec<Value>>,
}

/// Decodes a ranking document and returns it sorted.
///
/// Only a body that is not a JSON object with an optional `players` array is
/// an error; individual rows never fail the whole ranking.
pub fn parse_ranking(body: &[u8]) -> Result<Vec<RankedPlayer>, serde_json::Error> {
    let payload: RankingPayload = serde_json::from_slice(body)?;
    let mut players = payload
        .players
        .unwrap_or_default()
        .iter()
        .filter_map(parse_player)
        .collect::<Vec<_>>();
    sort_ranking(&mut players);
    Ok(players)
}

/// Descending by votes. `sort_by` is a stable sort, so equal votes keep the
/// order in which the ranking site listed them.
pub fn sort_ranking(players: &mut [RankedPlayer]) {
    players.sort_by(|a, b| b.votes.cmp(&a.votes));
}

fn parse_player(row: &Value) -> Option<RankedPlayer> {
    let playername = row.get("playername")?.as_str()?;
    if playername.trim().is_empty() {
        return None;
    }
    let votes = row.get("votes").map(coerce_votes).unwrap_or(0);
    Some(RankedPlayer::new(playername, votes))
}

fn coerce_votes(value: &Value) -> u64 {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_i64().map(|_| 0))
            .or_else(|| number.as_f64().map(float_votes))
            .unwrap_or(0),
        Value::String(raw) => {
            let raw = raw.trim();
            raw.parse::<i64>()
                .map(|votes| u64::try_from(votes).unwrap_or(0))
                .or_else(|_| raw.parse::<f64>().map(float_votes))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn float_votes(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.trunc() as u64
    } else {
        0
    }
}
