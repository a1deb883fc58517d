use anyhow::{anyhow, Result};
use chrono_tz::Tz;

/// Discord ids are positive 64-bit integers written in decimal.
pub fn validate_snowflake(field: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{} must not be empty", field));
    }
    match trimmed.parse::<u64>() {
        Ok(0) | Err(_) => Err(anyhow!("{} must be a Discord snowflake, got '{}'", field, value)),
        Ok(_) => Ok(()),
    }
}

pub fn validate_http_url(field: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| anyhow!("{} must be an http(s) URL", field))?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(anyhow!("{} has no host", field));
    }
    Ok(())
}

pub fn parse_timezone(value: &str) -> Result<Tz> {
    value
        .trim()
        .parse::<Tz>()
        .map_err(|err| anyhow!("invalid timezone '{}': {}", value, err))
}
