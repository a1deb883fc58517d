use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use votebot_domain::{Announcement, GuildId, OutgoingMessage, Period, LAST_ANNOUNCED_MONTH_KEY};

use crate::commands::reward_commands::deliver_rewards;
use crate::dtos::{CycleOutcome, CycleSummary};
use crate::queries::announcement_queries::build_announcement;
use crate::{AppState, CycleError};

/// Runs the cycle on its own task. Dropping the handle, e.g. when an HTTP
/// request times out, does not cancel the cycle between post and gate write.
pub fn spawn_monthly_cycle(
    state: AppState,
    guild_id: GuildId,
    now: DateTime<Utc>,
) -> JoinHandle<Result<CycleOutcome, CycleError>> {
    tokio::spawn(async move { run_monthly_cycle(&state, &guild_id, now).await })
}

/// One check-and-post cycle for `guild_id`.
///
/// `NOT_ANNOUNCED(period) -> ANNOUNCED(period)` happens only once every
/// message was posted; any error leaves the gate as it was so the next
/// trigger redoes the whole cycle. A crash between the post and the gate
/// write can still produce a duplicate post.
pub async fn run_monthly_cycle(
    state: &AppState,
    guild_id: &GuildId,
    now: DateTime<Utc>,
) -> Result<CycleOutcome, CycleError> {
    let _guard = state.cycle_guard.lock().await;
    let period = Period::containing(now, state.config.timezone);
    let cycle_id = Uuid::new_v4();
    let span = info_span!(
        "monthly_cycle",
        cycle_id = %cycle_id,
        guild_id = %guild_id,
        period = %period
    );

    let result = run_cycle(state, guild_id, period, cycle_id)
        .instrument(span)
        .await;
    match &result {
        Ok(CycleOutcome::Skipped { .. }) => state.metrics.record_skipped(),
        Ok(CycleOutcome::NoVotes { .. }) => state.metrics.record_without_votes(),
        Ok(CycleOutcome::Announced(summary)) => {
            state
                .metrics
                .record_announced(summary.messages_sent, summary.unresolved);
            state
                .metrics
                .record_credits(summary.delivery.credited, summary.delivery.credit_failures);
        }
        Err(err) => {
            if let CycleError::Send { sent, .. } = err {
                state.metrics.record_messages(*sent);
            }
            state.metrics.record_failed();
            error!(
                %cycle_id,
                guild_id = %guild_id,
                period = %period,
                kind = err.kind(),
                "monthly cycle failed: {}",
                err
            );
        }
    }
    result
}

async fn run_cycle(
    state: &AppState,
    guild_id: &GuildId,
    period: Period,
    cycle_id: Uuid,
) -> Result<CycleOutcome, CycleError> {
    let last = state
        .meta_store
        .get_meta(guild_id, LAST_ANNOUNCED_MONTH_KEY)
        .await
        .map_err(CycleError::Persistence)?;
    if last.as_deref() == Some(period.key().as_str()) {
        info!("results already announced, skipping");
        return Ok(CycleOutcome::Skipped {
            guild_id: guild_id.clone(),
            period: period.key(),
        });
    }

    let announcement = build_announcement(state, guild_id, period).await?;
    if announcement.winners.is_empty() {
        // The ranking API may not have rolled over yet; retry on the next trigger.
        warn!("ranking has no votes, leaving the month open");
        return Ok(CycleOutcome::NoVotes {
            guild_id: guild_id.clone(),
            period: period.key(),
        });
    }
    let messages_sent = post_announcement(state, &announcement).await?;

    state
        .meta_store
        .set_meta(guild_id, LAST_ANNOUNCED_MONTH_KEY, &period.key())
        .await
        .map_err(CycleError::Persistence)?;

    let delivery = deliver_rewards(state, guild_id, &announcement).await;
    let summary = CycleSummary {
        cycle_id,
        guild_id: guild_id.clone(),
        period: period.key(),
        results_label: announcement.results_label.clone(),
        winners: announcement.winners.len(),
        participants: announcement.participants.len(),
        linked: announcement.linked_count(),
        unresolved: announcement.unresolved_count(),
        messages_sent,
        delivery,
    };
    info!(
        winners = summary.winners,
        linked = summary.linked,
        unresolved = summary.unresolved,
        messages = summary.messages_sent,
        credited = summary.delivery.credited,
        credit_failures = summary.delivery.credit_failures,
        "monthly results announced"
    );
    Ok(CycleOutcome::Announced(summary))
}

async fn post_announcement(state: &AppState, announcement: &Announcement) -> Result<usize, CycleError> {
    let channel_id = &state.config.results_channel_id;
    let mut sent = 0;
    for (position, chunk) in announcement.chunks.iter().enumerate() {
        let message = OutgoingMessage {
            content: chunk.clone(),
            // Only the first chunk carries the @everyone line.
            mention_everyone: announcement.mention_everyone && position == 0,
        };
        state
            .chat
            .send_message(channel_id, &message)
            .await
            .map_err(|source| CycleError::Send { sent, source })?;
        sent += 1;
    }
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_support::{fixture_now, TestHarness};
    use votebot_domain::{ChannelId, RankedPlayer};

    #[tokio::test]
    async fn second_cycle_in_same_period_is_skipped() {
        let harness = TestHarness::new();
        let guild = harness.state.config.guild_id.clone();

        let first = run_monthly_cycle(&harness.state, &guild, fixture_now())
            .await
            .expect("first cycle");
        assert!(!first.is_skipped());

        let second = run_monthly_cycle(&harness.state, &guild, fixture_now())
            .await
            .expect("second cycle");
        assert!(second.is_skipped());

        assert_eq!(harness.chat.sent().len(), 1);
        assert_eq!(
            harness.meta.value(&guild, LAST_ANNOUNCED_MONTH_KEY),
            Some("2025-07".to_string())
        );
        assert_eq!(harness.state.metrics.messages_sent(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_posts_nothing_and_keeps_gate() {
        let harness = TestHarness::new();
        harness.ranking.fail_with_status(503);
        let guild = harness.state.config.guild_id.clone();

        let err = run_monthly_cycle(&harness.state, &guild, fixture_now())
            .await
            .expect_err("fetch failure");
        assert!(matches!(err, CycleError::Fetch(_)));
        assert!(harness.chat.sent().is_empty());
        assert_eq!(harness.meta.write_count(), 0);
        assert_eq!(harness.meta.value(&guild, LAST_ANNOUNCED_MONTH_KEY), None);
    }

    #[tokio::test]
    async fn send_failure_keeps_gate_and_next_trigger_retries() {
        let harness = TestHarness::new();
        harness.chat.set_failing(true);
        let guild = harness.state.config.guild_id.clone();

        let err = run_monthly_cycle(&harness.state, &guild, fixture_now())
            .await
            .expect_err("send failure");
        assert!(matches!(err, CycleError::Send { sent: 0, .. }));
        assert_eq!(harness.meta.write_count(), 0);

        harness.chat.set_failing(false);
        let retried = run_monthly_cycle(&harness.state, &guild, fixture_now())
            .await
            .expect("retried cycle");
        assert!(!retried.is_skipped());
        assert_eq!(harness.chat.sent().len(), 1);
    }

    #[tokio::test]
    async fn gate_write_failure_is_reported_after_posting() {
        let harness = TestHarness::new();
        harness.meta.set_failing_writes(true);
        let guild = harness.state.config.guild_id.clone();

        let err = run_monthly_cycle(&harness.state, &guild, fixture_now())
            .await
            .expect_err("persistence failure");
        assert!(matches!(err, CycleError::Persistence(_)));
        assert_eq!(harness.chat.sent().len(), 1);
        assert_eq!(harness.meta.value(&guild, LAST_ANNOUNCED_MONTH_KEY), None);
    }

    #[tokio::test]
    async fn gate_read_failure_aborts_before_fetching() {
        let harness = TestHarness::new();
        harness.meta.set_failing_reads(true);
        let guild = harness.state.config.guild_id.clone();

        let err = run_monthly_cycle(&harness.state, &guild, fixture_now())
            .await
            .expect_err("persistence failure");
        assert!(matches!(err, CycleError::Persistence(_)));
        assert_eq!(harness.ranking.calls(), 0);
        assert!(harness.chat.sent().is_empty());
    }

    #[tokio::test]
    async fn announcement_mentions_linked_winner_and_flags_unlinked() {
        let harness = TestHarness::new();
        let guild = harness.state.config.guild_id.clone();

        let outcome = run_monthly_cycle(&harness.state, &guild, fixture_now())
            .await
            .expect("cycle");
        let CycleOutcome::Announced(summary) = outcome else {
            panic!("expected an announcement");
        };
        assert_eq!(summary.results_label, "JUIN 2025");
        assert_eq!(summary.linked, 1);
        assert_eq!(summary.unresolved, 1);

        let sent = harness.chat.sent();
        let (channel, message) = &sent[0];
        assert_eq!(channel.as_str(), "200");
        assert!(message.mention_everyone);
        assert!(message.content.contains("<@1>"));
        assert!(message.content.contains("Mystery (non lié)"));
    }

    #[tokio::test]
    async fn new_month_announces_again() {
        let harness = TestHarness::new();
        let guild = harness.state.config.guild_id.clone();
        harness.meta.seed(&guild, LAST_ANNOUNCED_MONTH_KEY, "2025-06");

        let outcome = run_monthly_cycle(&harness.state, &guild, fixture_now())
            .await
            .expect("cycle");
        assert!(!outcome.is_skipped());
        assert_eq!(
            harness.meta.value(&guild, LAST_ANNOUNCED_MONTH_KEY),
            Some("2025-07".to_string())
        );
    }

    #[tokio::test]
    async fn abandoned_trigger_still_closes_the_gate() {
        let harness = TestHarness::new();
        harness.meta.set_write_delay(Duration::from_millis(200));
        let guild = harness.state.config.guild_id.clone();

        let first = tokio::time::timeout(
            Duration::from_millis(50),
            spawn_monthly_cycle(harness.state.clone(), guild.clone(), fixture_now()),
        )
        .await;
        assert!(first.is_err(), "caller gave up before the gate write");

        // Waits on the cycle mutex until the detached cycle has finished.
        let second = run_monthly_cycle(&harness.state, &guild, fixture_now())
            .await
            .expect("second cycle");
        assert!(second.is_skipped());
        assert_eq!(harness.chat.sent().len(), 1);
        assert_eq!(
            harness.meta.value(&guild, LAST_ANNOUNCED_MONTH_KEY),
            Some("2025-07".to_string())
        );
    }

    #[tokio::test]
    async fn member_listing_failure_posts_nothing_and_keeps_gate() {
        let harness = TestHarness::new();
        harness.chat.set_failing_members(true);
        let guild = harness.state.config.guild_id.clone();

        let err = run_monthly_cycle(&harness.state, &guild, fixture_now())
            .await
            .expect_err("members failure");
        assert!(matches!(err, CycleError::Members(_)));
        assert_eq!(err.kind(), "members");
        assert!(harness.chat.sent().is_empty());
        assert_eq!(harness.meta.write_count(), 0);
        assert_eq!(harness.ledger.credits().len(), 0);
    }

    #[tokio::test]
    async fn empty_ranking_is_retried_on_next_trigger() {
        let harness = TestHarness::with_players(vec![
            RankedPlayer::new("Alice", 0),
            RankedPlayer::new("Mystery", 0),
        ]);
        let guild = harness.state.config.guild_id.clone();

        let outcome = run_monthly_cycle(&harness.state, &guild, fixture_now())
            .await
            .expect("cycle");
        assert!(matches!(outcome, CycleOutcome::NoVotes { ref period, .. } if period == "2025-07"));
        assert!(harness.chat.sent().is_empty());
        assert_eq!(harness.meta.write_count(), 0);
        assert!(harness
            .state
            .metrics
            .render_prometheus()
            .contains("votebot_cycles_without_votes_total 1"));
    }

    #[tokio::test]
    async fn rewards_are_paid_after_the_gate_closes() {
        let mut harness = TestHarness::with_players(vec![
            RankedPlayer::new("Mystery", 12),
            RankedPlayer::new("Ghost", 9),
            RankedPlayer::new("Alice", 7),
        ]);
        harness.state.config.delivery.admin_log_channel_id = Some(ChannelId("300".to_string()));
        let guild = harness.state.config.guild_id.clone();

        let outcome = run_monthly_cycle(&harness.state, &guild, fixture_now())
            .await
            .expect("cycle");
        let CycleOutcome::Announced(summary) = outcome else {
            panic!("expected an announcement");
        };
        assert_eq!(summary.delivery.credited, 1);
        assert!(summary.delivery.admin_log_sent);
        assert_eq!(harness.ledger.credits()[0].1, 3000);

        let sent = harness.chat.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0.as_str(), "200");
        assert!(sent[0].1.content.contains("automatiquement crédités"));
        assert_eq!(sent[1].0.as_str(), "300");

        let again = run_monthly_cycle(&harness.state, &guild, fixture_now())
            .await
            .expect("second cycle");
        assert!(again.is_skipped());
        assert_eq!(harness.ledger.credits().len(), 1);
    }

    #[tokio::test]
    async fn gate_write_failure_credits_nothing() {
        let harness = TestHarness::with_players(vec![
            RankedPlayer::new("Mystery", 12),
            RankedPlayer::new("Ghost", 9),
            RankedPlayer::new("Alice", 7),
        ]);
        harness.meta.set_failing_writes(true);
        let guild = harness.state.config.guild_id.clone();

        let err = run_monthly_cycle(&harness.state, &guild, fixture_now())
            .await
            .expect_err("persistence failure");
        assert!(matches!(err, CycleError::Persistence(_)));
        assert!(harness.ledger.credits().is_empty());
    }
}
