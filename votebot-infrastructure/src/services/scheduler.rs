use std::time::Duration;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{debug, info};

use votebot_application::commands::monthly_cycle_commands::run_monthly_cycle;
use votebot_application::dtos::CycleOutcome;
use votebot_application::AppState;
use votebot_domain::ScheduleConfig;

/// Daily trigger from `day_of_month` to the end of each month. Once a month
/// is announced the remaining triggers are skips; a failed cycle is simply
/// attempted again by the next day's trigger.
pub async fn schedule_monthly_cycles(state: AppState) {
    if !state.config.schedule.enabled {
        info!("monthly schedule disabled");
        return;
    }
    loop {
        let now = Utc::now();
        let next = next_trigger_time(&state.config.schedule, state.config.timezone, now);
        let sleep_ms = next.signed_duration_since(now).num_milliseconds().max(0) as u64;
        debug!(next = %next, "next monthly trigger scheduled");
        tokio::time::sleep(Duration::from_millis(sleep_ms)).await;

        let guild_id = state.config.guild_id.clone();
        // Failures are logged and counted by the cycle itself.
        if let Ok(CycleOutcome::Announced(summary)) =
            run_monthly_cycle(&state, &guild_id, Utc::now()).await
        {
            info!(period = %summary.period, "scheduled announcement posted");
        }
    }
}

/// First `hour:minute` in `tz` strictly after `now` that falls on or after
/// `day_of_month`.
pub fn next_trigger_time(schedule: &ScheduleConfig, tz: Tz, now: DateTime<Utc>) -> DateTime<Utc> {
    let mut date = now.with_timezone(&tz).date_naive();
    // Two months of days always reach a valid trigger.
    for _ in 0..62 {
        if date.day() >= schedule.day_of_month {
            let candidate = date
                .and_hms_opt(schedule.hour, schedule.minute, 0)
                .and_then(|local| tz.from_local_datetime(&local).earliest())
                .map(|local| local.with_timezone(&Utc));
            if let Some(candidate) = candidate.filter(|candidate| *candidate > now) {
                return candidate;
            }
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    now + chrono::Duration::hours(24)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Paris;

    fn schedule(day_of_month: u32) -> ScheduleConfig {
        ScheduleConfig {
            enabled: true,
            day_of_month,
            hour: 18,
            minute: 0,
        }
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .expect("valid time")
    }

    #[test]
    fn fires_later_today_when_time_not_reached() {
        let next = next_trigger_time(&schedule(1), Paris, utc(2025, 7, 3, 10, 0));
        assert_eq!(next, utc(2025, 7, 3, 16, 0));
    }

    #[test]
    fn fires_tomorrow_once_time_has_passed() {
        let next = next_trigger_time(&schedule(1), Paris, utc(2025, 7, 3, 17, 0));
        assert_eq!(next, utc(2025, 7, 4, 16, 0));
    }

    #[test]
    fn waits_for_configured_day_of_month() {
        let next = next_trigger_time(&schedule(5), Paris, utc(2025, 7, 2, 10, 0));
        assert_eq!(next, utc(2025, 7, 5, 16, 0));
    }

    #[test]
    fn month_boundary_uses_local_calendar() {
        // 23:30 UTC on Jan 31 is already Feb 1 in Paris.
        let mut early = schedule(1);
        early.hour = 8;
        let next = next_trigger_time(&early, Paris, utc(2025, 1, 31, 23, 30));
        assert_eq!(next, utc(2025, 2, 1, 7, 0));
    }
}
